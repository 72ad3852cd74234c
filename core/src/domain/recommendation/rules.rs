//! Static recommendation rule tables. Pure immutable lookup data, consulted
//! on every request; the AI path layers on top of these, never replaces
//! them.

use crate::domain::profile::entities::SkinProfile;

/// Hard cap on the synthesized ingredient list.
pub const MAX_RECOMMENDED_INGREDIENTS: usize = 10;

const SKIN_TYPE_INGREDIENTS: &[(&str, &[&str])] = &[
    ("oily", &["niacinamide", "salicylic acid", "zinc pca"]),
    ("dry", &["hyaluronic acid", "ceramides", "squalane"]),
    (
        "combination",
        &["niacinamide", "hyaluronic acid", "green tea extract"],
    ),
    ("sensitive", &["centella asiatica", "panthenol", "allantoin"]),
    ("normal", &["vitamin c", "niacinamide", "hyaluronic acid"]),
];

const CONCERN_INGREDIENTS: &[(&str, &[&str])] = &[
    ("acne", &["salicylic acid", "niacinamide", "benzoyl peroxide"]),
    (
        "pigmentation",
        &["vitamin c", "tranexamic acid", "alpha arbutin"],
    ),
    ("dark spots", &["vitamin c", "alpha arbutin", "azelaic acid"]),
    ("redness", &["centella asiatica", "azelaic acid", "allantoin"]),
    ("texture", &["glycolic acid", "lactic acid", "retinol"]),
    ("dehydration", &["hyaluronic acid", "glycerin", "panthenol"]),
    ("aging", &["retinol", "peptides", "bakuchiol"]),
    ("wrinkles", &["retinol", "peptides", "ceramides"]),
    ("dullness", &["vitamin c", "glycolic acid", "niacinamide"]),
    ("oiliness", &["niacinamide", "zinc pca", "green tea extract"]),
    ("sensitivity", &["centella asiatica", "panthenol", "allantoin"]),
];

/// Sensitivity -> ingredient substrings to exclude. Matching is by
/// substring so `"retinol"` also knocks out `"encapsulated retinol"`.
const SENSITIVITY_EXCLUSIONS: &[(&str, &[&str])] = &[
    ("pregnant", &["retinol", "retinal", "hydroquinone"]),
    ("pregnancy", &["retinol", "retinal", "hydroquinone"]),
    ("fragrance", &["fragrance", "parfum", "essential oil"]),
    ("retinoids", &["retinol", "retinal"]),
    ("acids", &["glycolic acid", "lactic acid", "salicylic acid"]),
    ("vitamin c", &["vitamin c", "ascorbic"]),
    ("niacinamide", &["niacinamide"]),
];

/// Loose key match: literal or whitespace-stripped, so "dark spots" and
/// "darkspots" resolve to the same row.
fn key_matches(key: &str, token: &str) -> bool {
    key == token || key.replace(' ', "") == token.replace(' ', "")
}

fn lookup<'a>(table: &'a [(&str, &[&str])], token: &str) -> Option<&'a [&'a str]> {
    table
        .iter()
        .find(|(key, _)| key_matches(key, token))
        .map(|(_, ingredients)| *ingredients)
}

/// Rule-based candidates: the skin-type row (falling back to `normal`)
/// plus every matched concern row. Unmatched concerns contribute nothing.
pub fn rule_candidates(profile: &SkinProfile) -> Vec<String> {
    let mut candidates = Vec::new();

    let skin_type_row = lookup(SKIN_TYPE_INGREDIENTS, &profile.skin_type)
        .or_else(|| lookup(SKIN_TYPE_INGREDIENTS, "normal"))
        .unwrap_or_default();
    push_unique(&mut candidates, skin_type_row);

    for concern in &profile.concerns {
        if let Some(row) = lookup(CONCERN_INGREDIENTS, concern) {
            push_unique(&mut candidates, row);
        }
    }

    candidates
}

/// Union of excluded-ingredient substrings across the profile's
/// sensitivities.
pub fn exclusion_substrings(profile: &SkinProfile) -> Vec<&'static str> {
    let mut excluded = Vec::new();
    for sensitivity in &profile.sensitivities {
        if let Some(row) = lookup(SENSITIVITY_EXCLUSIONS, sensitivity) {
            for substring in row {
                if !excluded.contains(substring) {
                    excluded.push(substring);
                }
            }
        }
    }
    excluded
}

/// Merge AI and rule candidates into the final ranked ingredient list:
/// AI-sourced entries first, first-seen dedup, sensitivity exclusions
/// removed, capped at [`MAX_RECOMMENDED_INGREDIENTS`].
pub fn synthesize_ingredients(ai_candidates: &[String], profile: &SkinProfile) -> Vec<String> {
    let excluded = exclusion_substrings(profile);

    let mut final_list: Vec<String> = Vec::new();
    let merged = ai_candidates
        .iter()
        .cloned()
        .chain(rule_candidates(profile));

    for ingredient in merged {
        if final_list.len() == MAX_RECOMMENDED_INGREDIENTS {
            break;
        }
        if excluded
            .iter()
            .any(|substring| ingredient.contains(substring))
        {
            continue;
        }
        if !final_list.contains(&ingredient) {
            final_list.push(ingredient);
        }
    }

    final_list
}

fn push_unique(candidates: &mut Vec<String>, row: &[&str]) {
    for ingredient in row {
        if !candidates.iter().any(|c| c == ingredient) {
            candidates.push((*ingredient).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(skin_type: &str, concerns: &[&str], sensitivities: &[&str]) -> SkinProfile {
        SkinProfile {
            skin_type: skin_type.to_string(),
            concerns: concerns.iter().map(|c| c.to_string()).collect(),
            sensitivities: sensitivities.iter().map(|s| s.to_string()).collect(),
            routine_goal: None,
            budget_level: None,
        }
    }

    #[test]
    fn oily_acne_without_ai_draws_from_rule_tables() {
        let profile = profile("oily", &["acne"], &[]);
        let list = synthesize_ingredients(&[], &profile);

        assert!(!list.is_empty());
        let allowed = [
            "niacinamide",
            "salicylic acid",
            "zinc pca",
            "benzoyl peroxide",
        ];
        for ingredient in &list {
            assert!(allowed.contains(&ingredient.as_str()), "{ingredient}");
        }
        assert!(exclusion_substrings(&profile).is_empty());
    }

    #[test]
    fn unknown_skin_type_falls_back_to_normal_row() {
        let list = synthesize_ingredients(&[], &profile("alien", &[], &[]));
        assert_eq!(list, vec!["vitamin c", "niacinamide", "hyaluronic acid"]);
    }

    #[test]
    fn unmatched_concerns_contribute_nothing() {
        let with_unknown = synthesize_ingredients(&[], &profile("dry", &["halitosis"], &[]));
        let without = synthesize_ingredients(&[], &profile("dry", &[], &[]));
        assert_eq!(with_unknown, without);
    }

    #[test]
    fn concern_lookup_ignores_whitespace() {
        let spaced = synthesize_ingredients(&[], &profile("normal", &["dark spots"], &[]));
        let packed = synthesize_ingredients(&[], &profile("normal", &["darkspots"], &[]));
        assert_eq!(spaced, packed);
        assert!(spaced.contains(&"alpha arbutin".to_string()));
    }

    #[test]
    fn pregnant_sensitivity_removes_retinol() {
        let profile = profile("normal", &["aging"], &["pregnant"]);
        let list = synthesize_ingredients(&["encapsulated retinol".to_string()], &profile);

        assert!(!list.is_empty());
        assert!(list.iter().all(|i| !i.contains("retinol")));
    }

    #[test]
    fn ai_candidates_come_first_and_duplicates_collapse() {
        let ai = vec!["squalane".to_string(), "niacinamide".to_string()];
        let list = synthesize_ingredients(&ai, &profile("oily", &[], &[]));

        assert_eq!(&list[..2], &["squalane", "niacinamide"]);
        assert_eq!(
            list.iter().filter(|i| i.as_str() == "niacinamide").count(),
            1
        );
    }

    #[test]
    fn list_is_capped_at_ten() {
        let ai: Vec<String> = (0..20).map(|i| format!("ingredient {i}")).collect();
        let list = synthesize_ingredients(&ai, &profile("dry", &["acne", "aging"], &[]));
        assert_eq!(list.len(), MAX_RECOMMENDED_INGREDIENTS);
    }
}
