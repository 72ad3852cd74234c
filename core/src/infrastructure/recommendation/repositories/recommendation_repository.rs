use sea_orm::{
    sea_query::Expr, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        recommendation::{
            entities::{RecommendationRecord, Source},
            ports::RecommendationRepository,
        },
    },
    entity::recommendations::{ActiveModel, Column, Entity},
};

#[derive(Debug, Clone)]
pub struct PostgresRecommendationRepository {
    pub db: DatabaseConnection,
}

impl PostgresRecommendationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl RecommendationRepository for PostgresRecommendationRepository {
    async fn create(
        &self,
        record: RecommendationRecord,
    ) -> Result<RecommendationRecord, CoreError> {
        let profile_snapshot = serde_json::to_value(&record.profile_snapshot).map_err(|e| {
            error!("Failed to serialize profile snapshot: {}", e);
            CoreError::InternalServerError
        })?;
        let recommendation_snapshot = serde_json::to_value(&record.recommendation_snapshot)
            .map_err(|e| {
                error!("Failed to serialize recommendation snapshot: {}", e);
                CoreError::InternalServerError
            })?;

        let created = Entity::insert(ActiveModel {
            id: Set(record.id),
            user_id: Set(record.user_id),
            source: Set(record.source.as_str().to_string()),
            profile_snapshot: Set(profile_snapshot),
            recommendation_snapshot: Set(recommendation_snapshot),
            image_analysis: Set(record.image_analysis),
            image_url: Set(record.image_url),
            analysis_scores: Set(record.analysis_scores),
            image_data: Set(record.image_data),
            image_mime_type: Set(record.image_mime_type),
            created_at: Set(record.created_at.fixed_offset()),
        })
        .exec_with_returning(&self.db)
        .await
        .map(RecommendationRecord::from)
        .map_err(|e| {
            error!("Failed to create recommendation record: {}", e);
            CoreError::InternalServerError
        })?;

        Ok(created)
    }

    async fn set_image_url(&self, record_id: Uuid, image_url: String) -> Result<(), CoreError> {
        Entity::update_many()
            .col_expr(Column::ImageUrl, Expr::value(image_url))
            .filter(Column::Id.eq(record_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to set recommendation image url: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(())
    }

    async fn get_by_user(
        &self,
        user_id: Uuid,
        limit: u32,
        source: Option<Source>,
    ) -> Result<Vec<RecommendationRecord>, CoreError> {
        let mut query = Entity::find().filter(Column::UserId.eq(user_id));

        if let Some(source) = source {
            query = query.filter(Column::Source.eq(source.as_str()));
        }

        let records = query
            .order_by_desc(Column::CreatedAt)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to fetch recommendation records: {}", e);
                CoreError::InternalServerError
            })?
            .iter()
            .map(RecommendationRecord::from)
            .collect();

        Ok(records)
    }

    async fn get_by_id(
        &self,
        record_id: Uuid,
    ) -> Result<Option<RecommendationRecord>, CoreError> {
        let record = Entity::find_by_id(record_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to fetch recommendation record: {}", e);
                CoreError::InternalServerError
            })?
            .map(RecommendationRecord::from);

        Ok(record)
    }
}
