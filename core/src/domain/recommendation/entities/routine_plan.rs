use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Day-part routine with safety cautions. Step sequences are ordered;
/// cautions may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutinePlan {
    pub morning: Vec<String>,
    pub evening: Vec<String>,
    pub cautions: Vec<String>,
}
