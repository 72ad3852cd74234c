use crate::{
    domain::recommendation::entities::RecommendationRecord, entity::recommendations,
};

impl From<&recommendations::Model> for RecommendationRecord {
    fn from(model: &recommendations::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            source: model.source.as_str().into(),
            profile_snapshot: serde_json::from_value(model.profile_snapshot.clone())
                .unwrap_or_default(),
            recommendation_snapshot: serde_json::from_value(
                model.recommendation_snapshot.clone(),
            )
            .unwrap_or_default(),
            image_analysis: model.image_analysis.clone(),
            image_url: model.image_url.clone(),
            analysis_scores: model.analysis_scores.clone(),
            image_data: model.image_data.clone(),
            image_mime_type: model.image_mime_type.clone(),
            created_at: model.created_at.to_utc(),
        }
    }
}

impl From<recommendations::Model> for RecommendationRecord {
    fn from(model: recommendations::Model) -> Self {
        Self::from(&model)
    }
}
