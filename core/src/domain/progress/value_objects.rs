use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_PROGRESS_LIMIT: u32 = 15;
pub const MIN_PROGRESS_LIMIT: u32 = 2;
pub const MAX_PROGRESS_LIMIT: u32 = 60;

/// Absolute two-point delta at or beyond which a comparison stops reading
/// as stable. Kept as a named constant for compatibility with historical
/// summaries.
pub const TREND_THRESHOLD: f64 = 4.0;

/// One photo check-in reduced to comparable numeric scores. Derived on
/// read from stored records, never persisted itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPoint {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub overall_skin_score: f64,
    /// Mean of the six concern severities, rounded. Higher is worse.
    pub average_concern_severity: f64,
    pub confidence: f64,
    pub concern_scores: BTreeMap<String, f64>,
}

/// Three aligned series for the timeline chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgressChart {
    pub labels: Vec<String>,
    pub overall_skin_score: Vec<f64>,
    pub average_concern_severity: Vec<f64>,
}

/// Deltas between the last two points, rounded to one decimal. Severity
/// deltas are oriented so positive means improvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDeltas {
    pub overall_skin_score: f64,
    pub average_concern_severity: f64,
    pub concern_deltas: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressComparison {
    pub previous: Option<ProgressPoint>,
    pub latest: Option<ProgressPoint>,
    pub deltas: Option<ProgressDeltas>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub chart: ProgressChart,
    pub comparison: ProgressComparison,
}
