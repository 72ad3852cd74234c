use std::future::Future;
use uuid::Uuid;

use crate::domain::common::entities::app_errors::CoreError;
use crate::domain::profile::entities::SkinProfile;
use crate::domain::recommendation::entities::{
    IngredientInsight, MarketplaceLink, Product, RecommendationRecord, Source, StoredImage,
};
use crate::domain::recommendation::value_objects::{
    AnalysisHints, HistoryPage, ImagePayload, RecommendInput, RecommendWithImageInput,
    RecommendationResponse, RequestContext,
};

/// Client for the external text/image generation service. Both calls may
/// fail; callers degrade to rule-based/default paths instead of surfacing
/// the error.
#[cfg_attr(test, mockall::automock)]
pub trait LlmClient: Send + Sync {
    fn generate_ingredient_advice(
        &self,
        profile: SkinProfile,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn analyze_image(
        &self,
        image: ImagePayload,
        hints: AnalysisHints,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Repository for persisted recommendation snapshots.
#[cfg_attr(test, mockall::automock)]
pub trait RecommendationRepository: Send + Sync {
    fn create(
        &self,
        record: RecommendationRecord,
    ) -> impl Future<Output = Result<RecommendationRecord, CoreError>> + Send;

    /// Backfill the derived image URL after the record got its storage id.
    fn set_image_url(
        &self,
        record_id: Uuid,
        image_url: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Most-recent-first.
    fn get_by_user(
        &self,
        user_id: Uuid,
        limit: u32,
        source: Option<Source>,
    ) -> impl Future<Output = Result<Vec<RecommendationRecord>, CoreError>> + Send;

    fn get_by_id(
        &self,
        record_id: Uuid,
    ) -> impl Future<Output = Result<Option<RecommendationRecord>, CoreError>> + Send;
}

/// Product catalog lookup.
#[cfg_attr(test, mockall::automock)]
pub trait ProductRepository: Send + Sync {
    fn find_by_ingredients(
        &self,
        names: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Product>, CoreError>> + Send;
}

/// Ingredient metadata lookup for insight cards.
#[cfg_attr(test, mockall::automock)]
pub trait IngredientRepository: Send + Sync {
    fn find_by_names(
        &self,
        names: Vec<String>,
    ) -> impl Future<Output = Result<Vec<IngredientInsight>, CoreError>> + Send;
}

/// External shopping-link builder, only consulted when the catalog match is
/// thin.
#[cfg_attr(test, mockall::automock)]
pub trait MarketplaceGateway: Send + Sync {
    fn search_by_ingredients(
        &self,
        names: Vec<String>,
    ) -> impl Future<Output = Result<Vec<MarketplaceLink>, CoreError>> + Send;
}

/// Service trait for recommendation business logic.
#[cfg_attr(test, mockall::automock)]
pub trait RecommendationService: Send + Sync {
    fn recommend(
        &self,
        input: RecommendInput,
        ctx: RequestContext,
    ) -> impl Future<Output = Result<RecommendationResponse, CoreError>> + Send;

    fn recommend_with_image(
        &self,
        input: RecommendWithImageInput,
        ctx: RequestContext,
    ) -> impl Future<Output = Result<RecommendationResponse, CoreError>> + Send;

    fn get_history(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<HistoryPage, CoreError>> + Send;

    fn get_progress_image(
        &self,
        record_id: Uuid,
    ) -> impl Future<Output = Result<Option<StoredImage>, CoreError>> + Send;
}
