use uuid::Uuid;

use crate::domain::common::entities::app_errors::CoreError;
use crate::domain::common::services::Service;
use crate::domain::progress::ports::ProgressService;
use crate::domain::progress::tracker;
use crate::domain::progress::value_objects::ProgressReport;
use crate::domain::recommendation::entities::Source;
use crate::domain::recommendation::ports::{
    IngredientRepository, LlmClient, MarketplaceGateway, ProductRepository,
    RecommendationRepository,
};

impl<RR, PR, IR, MG, LLM> ProgressService for Service<RR, PR, IR, MG, LLM>
where
    RR: RecommendationRepository,
    PR: ProductRepository,
    IR: IngredientRepository,
    MG: MarketplaceGateway,
    LLM: LlmClient,
{
    async fn get_photo_progress(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> Result<ProgressReport, CoreError> {
        let limit = tracker::clamp_limit(limit);

        let records = self
            .recommendation_repository
            .get_by_user(user_id, limit, Some(Source::Image))
            .await?;

        Ok(tracker::build_report(&records))
    }
}
