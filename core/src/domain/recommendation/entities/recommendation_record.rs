use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::common::generate_timestamp;
use crate::domain::profile::entities::SkinProfile;
use crate::domain::recommendation::entities::routine_plan::RoutinePlan;
use crate::domain::recommendation::value_objects::SynthesisSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Form,
    Image,
}

impl Source {
    pub fn as_str(&self) -> &str {
        match self {
            Source::Form => "form",
            Source::Image => "image",
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        match s {
            "image" => Source::Image,
            _ => Source::Form,
        }
    }
}

/// The synthesized output worth replaying from history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSnapshot {
    pub recommended_ingredients: Vec<String>,
    pub routine: RoutinePlan,
    pub synthesis_source: SynthesisSource,
}

impl Default for RecommendationSnapshot {
    fn default() -> Self {
        Self {
            recommended_ingredients: Vec::new(),
            routine: RoutinePlan::default(),
            synthesis_source: SynthesisSource::RulesOnly,
        }
    }
}

/// Persisted snapshot of one recommendation request. Created once when the
/// caller is authenticated; only ever mutated to backfill the derived image
/// URL. Deletion is an external lifecycle concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub source: Source,
    pub profile_snapshot: SkinProfile,
    pub recommendation_snapshot: RecommendationSnapshot,
    /// Stored loosely: older rows may predate the normalizer, so readers
    /// re-normalize defensively.
    pub image_analysis: Option<Value>,
    pub image_url: Option<String>,
    pub analysis_scores: Option<Value>,
    #[serde(skip)]
    pub image_data: Option<Vec<u8>>,
    #[serde(skip)]
    pub image_mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RecommendationRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Option<Uuid>,
        source: Source,
        profile_snapshot: SkinProfile,
        recommendation_snapshot: RecommendationSnapshot,
        image_analysis: Option<Value>,
        analysis_scores: Option<Value>,
        image_data: Option<Vec<u8>>,
        image_mime_type: Option<String>,
    ) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            user_id,
            source,
            profile_snapshot,
            recommendation_snapshot,
            image_analysis,
            image_url: None,
            analysis_scores,
            image_data,
            image_mime_type,
            created_at: now,
        }
    }
}

/// Raw check-in photo bytes as returned to the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}
