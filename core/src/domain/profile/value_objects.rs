use serde::Deserialize;
use serde_json::Value;

/// Raw profile fields as they arrive from the boundary. List-shaped fields
/// are kept as loose JSON values: clients have been observed sending native
/// arrays, JSON-encoded array strings, and plain comma-separated strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProfileInput {
    pub skin_type: Option<String>,
    pub concerns: Option<Value>,
    pub sensitivities: Option<Value>,
    pub routine_goal: Option<String>,
    pub budget_level: Option<String>,
    pub photo_notes: Option<String>,
}
