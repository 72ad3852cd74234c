use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::profile::entities::SkinProfile;
use crate::domain::profile::value_objects::RawProfileInput;
use crate::domain::recommendation::entities::{
    ImageAnalysis, IngredientInsight, MarketplaceLink, RankedProduct, RecommendationRecord,
    RecommendationSnapshot, RoutinePlan, Source,
};

pub const DEFAULT_HISTORY_LIMIT: u32 = 20;
pub const MAX_HISTORY_LIMIT: u32 = 50;

/// Entitlement gate for supplementary insights. The tier itself is decided
/// by the auth layer, never derived here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Pro,
}

/// Who is asking. Anonymous requests still get recommendations; they are
/// just never persisted.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub user_id: Option<Uuid>,
    pub plan_tier: PlanTier,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            plan_tier: PlanTier::Free,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecommendInput {
    pub profile: RawProfileInput,
}

#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub data: Bytes,
    pub mime_type: String,
}

/// Context forwarded to the image analysis call so the model can weigh the
/// self-reported profile against what it sees.
#[derive(Debug, Clone, Default)]
pub struct AnalysisHints {
    pub skin_type: String,
    pub concerns: Vec<String>,
    pub photo_notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendWithImageInput {
    pub profile: RawProfileInput,
    /// Absence is the one hard caller error on the image path.
    pub image: Option<ImagePayload>,
}

/// How the final ingredient list was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SynthesisSource {
    #[serde(rename = "rules-only")]
    RulesOnly,
    #[serde(rename = "ai+rules")]
    AiAssisted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub source: SynthesisSource,
    /// True when a history record was written for this request.
    pub saved: bool,
    pub generated_at: DateTime<Utc>,
}

/// Pro-tier supplementary insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProInsights {
    pub weekly_focus: Vec<String>,
    pub layering_warnings: Vec<String>,
    pub estimated_consistency_window: String,
    pub observation_summary: Vec<String>,
    pub image_confidence: Option<f64>,
}

/// Full recommendation response returned to the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub profile: SkinProfile,
    pub recommended_ingredients: Vec<String>,
    pub insights: Vec<IngredientInsight>,
    pub matching_products: Vec<RankedProduct>,
    pub marketplace_links: Vec<MarketplaceLink>,
    pub routine: RoutinePlan,
    pub image_analysis: Option<ImageAnalysis>,
    pub pro_insights: Option<ProInsights>,
    pub meta: ResponseMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub source: Source,
    pub profile_snapshot: SkinProfile,
    pub recommendation_snapshot: RecommendationSnapshot,
    pub image_url: Option<String>,
}

impl From<RecommendationRecord> for HistoryItem {
    fn from(record: RecommendationRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            source: record.source,
            profile_snapshot: record.profile_snapshot,
            recommendation_snapshot: record.recommendation_snapshot,
            image_url: record.image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub items: Vec<HistoryItem>,
}
