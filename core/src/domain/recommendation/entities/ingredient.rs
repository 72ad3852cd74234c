use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Insight card for one recommended ingredient. Catalog-backed entries come
/// from the ingredient repository; the rest are inferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInsight {
    pub name: String,
    pub description: String,
    pub benefits: Vec<String>,
}
