use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::profile::entities::{dedupe_tokens, normalize_token};

pub const DEFAULT_SCORE: f64 = 50.0;
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// The six tracked concern severities, each in [0,100]. Higher is worse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConcernScores {
    pub acne: f64,
    pub pigmentation: f64,
    pub redness: f64,
    pub texture: f64,
    pub dehydration: f64,
    pub oiliness: f64,
}

impl Default for ConcernScores {
    fn default() -> Self {
        Self {
            acne: DEFAULT_SCORE,
            pigmentation: DEFAULT_SCORE,
            redness: DEFAULT_SCORE,
            texture: DEFAULT_SCORE,
            dehydration: DEFAULT_SCORE,
            oiliness: DEFAULT_SCORE,
        }
    }
}

impl ConcernScores {
    pub fn average(&self) -> f64 {
        (self.acne + self.pigmentation + self.redness + self.texture + self.dehydration
            + self.oiliness)
            / 6.0
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("acne".to_string(), self.acne),
            ("pigmentation".to_string(), self.pigmentation),
            ("redness".to_string(), self.redness),
            ("texture".to_string(), self.texture),
            ("dehydration".to_string(), self.dehydration),
            ("oiliness".to_string(), self.oiliness),
        ])
    }
}

/// Bounded record derived from an LLM skin-photo reply. Every numeric field
/// is clamped on construction; absent or mistyped fields take fixed
/// defaults, so a partially garbled reply still yields a usable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub suggested_skin_type: Option<String>,
    pub detected_concerns: Vec<String>,
    pub observations: Vec<String>,
    pub confidence: f64,
    pub concern_scores: ConcernScores,
    pub overall_skin_score: f64,
}

impl Default for ImageAnalysis {
    fn default() -> Self {
        Self {
            suggested_skin_type: None,
            detected_concerns: Vec::new(),
            observations: Vec::new(),
            confidence: DEFAULT_CONFIDENCE,
            concern_scores: ConcernScores::default(),
            overall_skin_score: DEFAULT_SCORE,
        }
    }
}

impl ImageAnalysis {
    /// Normalize a loosely-typed parsed object. Each field is defaulted and
    /// clamped independently; a single bad field never rejects the record.
    /// Idempotent: normalizing an already-normalized value is identity.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value.filter(|v| v.is_object()) else {
            return Self::default();
        };

        let suggested_skin_type = value
            .get("suggestedSkinType")
            .and_then(Value::as_str)
            .and_then(normalize_token);

        let detected_concerns = dedupe_tokens(string_entries(value.get("detectedConcerns")));
        let observations = dedupe_sentences(string_entries(value.get("observations")));

        let confidence = number_or(value.get("confidence"), DEFAULT_CONFIDENCE).clamp(0.0, 1.0);

        let concern_scores = ConcernScores {
            acne: concern_score(value, "acne"),
            pigmentation: concern_score(value, "pigmentation"),
            redness: concern_score(value, "redness"),
            texture: concern_score(value, "texture"),
            dehydration: concern_score(value, "dehydration"),
            oiliness: concern_score(value, "oiliness"),
        };

        let overall_skin_score =
            number_or(value.get("overallSkinScore"), DEFAULT_SCORE).clamp(0.0, 100.0);

        Self {
            suggested_skin_type,
            detected_concerns,
            observations,
            confidence,
            concern_scores,
            overall_skin_score,
        }
    }
}

/// Persisted score subset for photo progress tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisScores {
    pub overall_skin_score: f64,
    pub confidence: f64,
    pub concern_scores: ConcernScores,
}

impl AnalysisScores {
    /// Parse a persisted subset. `None` means the payload is unusable and
    /// the record should be skipped, not that the batch should fail.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        value.get("overallSkinScore")?.as_f64()?;

        let analysis = ImageAnalysis::from_value(Some(value));
        Some(Self::from(&analysis))
    }
}

impl From<&ImageAnalysis> for AnalysisScores {
    fn from(analysis: &ImageAnalysis) -> Self {
        Self {
            overall_skin_score: analysis.overall_skin_score,
            confidence: analysis.confidence,
            concern_scores: analysis.concern_scores.clone(),
        }
    }
}

fn string_entries(value: Option<&Value>) -> impl Iterator<Item = &str> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str))
        .into_iter()
        .flatten()
}

fn dedupe_sentences<'a>(entries: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    for entry in entries {
        let trimmed = entry.trim();
        if !trimmed.is_empty() && !seen.iter().any(|s| s == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}

fn number_or(value: Option<&Value>, default: f64) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(default)
}

/// Scores are accepted both nested under `concernScores` and at the top
/// level, because the upstream model flattens them unpredictably.
fn concern_score(value: &Value, key: &str) -> f64 {
    let nested = value.get("concernScores").and_then(|scores| scores.get(key));
    number_or(nested.or_else(|| value.get(key)), DEFAULT_SCORE).clamp(0.0, 100.0)
}
