use crate::domain::recommendation::entities::{ImageAnalysis, IngredientInsight};
use crate::domain::recommendation::value_objects::ProInsights;

pub const ESTIMATED_CONSISTENCY_WINDOW: &str = "4-6 weeks of consistent use";

/// Pairs that should never be layered in one routine.
const LAYERING_CONFLICTS: &[(&str, &str)] =
    &[("retinol", "glycolic acid"), ("retinol", "benzoyl peroxide")];

/// Name-substring framing for ingredients the catalog knows nothing about.
const INFERRED_FRAMINGS: &[(&[&str], &str, &[&str])] = &[
    (
        &["salicylic", "benzoyl"],
        "Targets congestion and blemish-causing bacteria to keep breakouts in check.",
        &["acne control", "pore clearing"],
    ),
    (
        &["hyaluronic", "glycerin"],
        "Draws water into the skin and keeps it there for lasting hydration.",
        &["hydration", "plumping"],
    ),
    (
        &["retinol", "peptide"],
        "Supports collagen production and smooths the look of fine lines over time.",
        &["anti-aging", "skin renewal"],
    ),
    (
        &["tranexamic", "arbutin", "vitamin c"],
        "Fades discoloration and evens overall skin tone with regular use.",
        &["brightening", "tone evening"],
    ),
    (
        &["centella", "allantoin", "panthenol"],
        "Calms visible irritation and helps repair a stressed skin barrier.",
        &["calming", "barrier support"],
    ),
];

/// Build one insight card per recommended ingredient, preferring catalog
/// metadata and inferring a framing for the rest.
pub fn build_ingredient_insights(
    recommended: &[String],
    catalog: Vec<IngredientInsight>,
) -> Vec<IngredientInsight> {
    recommended
        .iter()
        .map(|ingredient| {
            catalog
                .iter()
                .find(|entry| entry.name.eq_ignore_ascii_case(ingredient))
                .cloned()
                .unwrap_or_else(|| infer_insight(ingredient))
        })
        .collect()
}

fn infer_insight(name: &str) -> IngredientInsight {
    for (needles, description, benefits) in INFERRED_FRAMINGS {
        if needles.iter().any(|needle| name.contains(needle)) {
            return IngredientInsight {
                name: name.to_string(),
                description: (*description).to_string(),
                benefits: benefits.iter().map(|b| (*b).to_string()).collect(),
            };
        }
    }

    IngredientInsight {
        name: name.to_string(),
        description: "Supports overall skin health as part of a balanced routine.".to_string(),
        benefits: vec!["general skincare".to_string()],
    }
}

/// Gated supplementary insights for pro-tier callers.
pub fn build_pro_insights(
    concerns: &[String],
    recommended: &[String],
    analysis: Option<&ImageAnalysis>,
) -> ProInsights {
    let weekly_focus: Vec<String> = concerns.iter().take(2).cloned().collect();

    let contains = |name: &str| recommended.iter().any(|r| r == name);
    let layering_warnings = LAYERING_CONFLICTS
        .iter()
        .filter(|(a, b)| contains(a) && contains(b))
        .map(|(a, b)| format!("Avoid layering {a} with {b} in the same routine."))
        .collect();

    ProInsights {
        weekly_focus,
        layering_warnings,
        estimated_consistency_window: ESTIMATED_CONSISTENCY_WINDOW.to_string(),
        observation_summary: analysis
            .map(|a| a.observations.clone())
            .unwrap_or_default(),
        image_confidence: analysis.map(|a| a.confidence),
    }
}
