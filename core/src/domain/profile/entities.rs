use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::profile::value_objects::RawProfileInput;

pub const DEFAULT_SKIN_TYPE: &str = "normal";

/// Canonical skin profile. Every string collection is lower-cased,
/// punctuation-stripped, deduplicated and free of empty entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkinProfile {
    pub skin_type: String,
    pub concerns: Vec<String>,
    pub sensitivities: Vec<String>,
    pub routine_goal: Option<String>,
    pub budget_level: Option<String>,
}

impl Default for SkinProfile {
    fn default() -> Self {
        Self {
            skin_type: DEFAULT_SKIN_TYPE.to_string(),
            concerns: Vec::new(),
            sensitivities: Vec::new(),
            routine_goal: None,
            budget_level: None,
        }
    }
}

impl SkinProfile {
    /// Canonicalize raw boundary input. Malformed input never errors: the
    /// worst case is an empty collection or the default skin type.
    pub fn from_raw(raw: &RawProfileInput) -> Self {
        let skin_type = raw
            .skin_type
            .as_deref()
            .and_then(normalize_token)
            .unwrap_or_else(|| DEFAULT_SKIN_TYPE.to_string());

        Self {
            skin_type,
            concerns: normalize_list(raw.concerns.as_ref()),
            sensitivities: normalize_list(raw.sensitivities.as_ref()),
            routine_goal: raw
                .routine_goal
                .as_deref()
                .map(str::trim)
                .filter(|goal| !goal.is_empty())
                .map(str::to_string),
            budget_level: raw
                .budget_level
                .as_deref()
                .and_then(normalize_token),
        }
    }
}

/// Lower-case a single token, keep only word characters, whitespace,
/// hyphens and plus signs, and collapse internal whitespace. Returns `None`
/// when nothing survives.
pub fn normalize_token(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '+' | '_'))
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Coerce a loose JSON value into a normalized token list. Accepts a native
/// array, a JSON-encoded array string, or a comma-separated string, in that
/// order; anything unparsable degrades to an empty list.
fn normalize_list(value: Option<&Value>) -> Vec<String> {
    let raw_entries: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(text)) => match serde_json::from_str::<Vec<String>>(text.trim()) {
            Ok(parsed) => parsed,
            Err(_) => text.split(',').map(str::to_string).collect(),
        },
        _ => Vec::new(),
    };

    dedupe_tokens(raw_entries.iter().map(String::as_str))
}

/// Normalize and deduplicate tokens preserving first-seen order.
pub fn dedupe_tokens<'a>(entries: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    for entry in entries {
        if let Some(token) = normalize_token(entry) {
            if !seen.contains(&token) {
                seen.push(token);
            }
        }
    }
    seen
}
