//! Pure reduction of stored photo check-ins into chart series and a
//! two-point comparison. All I/O stays in the service layer.

use std::collections::BTreeMap;

use crate::domain::progress::value_objects::{
    ProgressChart, ProgressComparison, ProgressDeltas, ProgressPoint, ProgressReport,
    DEFAULT_PROGRESS_LIMIT, MAX_PROGRESS_LIMIT, MIN_PROGRESS_LIMIT, TREND_THRESHOLD,
};
use crate::domain::recommendation::entities::{AnalysisScores, ImageAnalysis, RecommendationRecord};

const SUMMARY_NO_POINTS: &str =
    "Upload at least one photo to start tracking your skin progress.";
const SUMMARY_ONE_POINT: &str =
    "Baseline saved. Upload a second photo to compare your progress.";
const SUMMARY_POSITIVE: &str =
    "Positive trend: your skin metrics have improved since the previous photo.";
const SUMMARY_SETBACK: &str =
    "Setback: some skin metrics declined since the previous photo. Stay consistent with your routine.";
const SUMMARY_STABLE: &str = "Stable: no significant change since the previous photo.";

pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(DEFAULT_PROGRESS_LIMIT)
        .clamp(MIN_PROGRESS_LIMIT, MAX_PROGRESS_LIMIT)
}

/// Reduce one stored record to a progress point. Prefers the persisted
/// score subset and falls back to re-normalizing the full stored analysis;
/// records carrying neither are skipped rather than failing the batch.
pub fn point_from_record(record: &RecommendationRecord) -> Option<ProgressPoint> {
    let scores = scores_from_record(record)?;

    Some(ProgressPoint {
        id: record.id,
        created_at: record.created_at,
        image_url: record.image_url.clone(),
        overall_skin_score: scores.overall_skin_score,
        average_concern_severity: scores.concern_scores.average().round(),
        confidence: scores.confidence,
        concern_scores: scores.concern_scores.to_map(),
    })
}

fn scores_from_record(record: &RecommendationRecord) -> Option<AnalysisScores> {
    if let Some(scores) = record
        .analysis_scores
        .as_ref()
        .and_then(AnalysisScores::from_value)
    {
        return Some(scores);
    }

    record
        .image_analysis
        .as_ref()
        .filter(|value| value.is_object())
        .map(|value| AnalysisScores::from(&ImageAnalysis::from_value(Some(value))))
}

/// Build the full report from records in most-recent-first storage order.
pub fn build_report(records: &[RecommendationRecord]) -> ProgressReport {
    let points: Vec<ProgressPoint> = records
        .iter()
        .rev()
        .filter_map(point_from_record)
        .collect();

    let chart = ProgressChart {
        labels: points
            .iter()
            .map(|p| p.created_at.format("%b %-d").to_string())
            .collect(),
        overall_skin_score: points.iter().map(|p| p.overall_skin_score).collect(),
        average_concern_severity: points
            .iter()
            .map(|p| p.average_concern_severity)
            .collect(),
    };

    ProgressReport {
        chart,
        comparison: compare_points(&points),
    }
}

fn compare_points(points: &[ProgressPoint]) -> ProgressComparison {
    match points {
        [] => ProgressComparison {
            previous: None,
            latest: None,
            deltas: None,
            summary: SUMMARY_NO_POINTS.to_string(),
        },
        [only] => ProgressComparison {
            previous: None,
            latest: Some(only.clone()),
            deltas: None,
            summary: SUMMARY_ONE_POINT.to_string(),
        },
        [.., previous, latest] => {
            let deltas = compute_deltas(previous, latest);
            let summary = classify(&deltas).to_string();
            ProgressComparison {
                previous: Some(previous.clone()),
                latest: Some(latest.clone()),
                deltas: Some(deltas),
                summary,
            }
        }
    }
}

fn compute_deltas(previous: &ProgressPoint, latest: &ProgressPoint) -> ProgressDeltas {
    let mut concern_deltas = BTreeMap::new();
    let keys = previous.concern_scores.keys().chain(latest.concern_scores.keys());
    for key in keys {
        if concern_deltas.contains_key(key) {
            continue;
        }
        let before = previous.concern_scores.get(key).copied().unwrap_or(0.0);
        let after = latest.concern_scores.get(key).copied().unwrap_or(0.0);
        concern_deltas.insert(key.clone(), round1(before - after));
    }

    ProgressDeltas {
        overall_skin_score: round1(latest.overall_skin_score - previous.overall_skin_score),
        average_concern_severity: round1(
            previous.average_concern_severity - latest.average_concern_severity,
        ),
        concern_deltas,
    }
}

fn classify(deltas: &ProgressDeltas) -> &'static str {
    let overall = deltas.overall_skin_score;
    let severity = deltas.average_concern_severity;

    if overall >= TREND_THRESHOLD || severity >= TREND_THRESHOLD {
        SUMMARY_POSITIVE
    } else if overall <= -TREND_THRESHOLD || severity <= -TREND_THRESHOLD {
        SUMMARY_SETBACK
    } else {
        SUMMARY_STABLE
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
