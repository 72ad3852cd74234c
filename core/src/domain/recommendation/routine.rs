use crate::domain::profile::entities::SkinProfile;
use crate::domain::recommendation::entities::RoutinePlan;

/// Morning focus candidates, scanned in order; first match against the
/// recommended list wins.
pub const MORNING_FOCUS_PRIORITY: &[&str] =
    &["vitamin c", "niacinamide", "hyaluronic acid", "azelaic acid"];

pub const EVENING_FOCUS_PRIORITY: &[&str] = &[
    "retinol",
    "salicylic acid",
    "peptides",
    "tranexamic acid",
    "ceramides",
];

/// Assign recommended ingredients to fixed three-step AM/PM templates and
/// raise static interaction cautions.
pub fn build_routine(recommended: &[String], profile: &SkinProfile) -> RoutinePlan {
    let morning_focus = pick_focus(MORNING_FOCUS_PRIORITY, recommended);
    let evening_focus = pick_focus(EVENING_FOCUS_PRIORITY, recommended);

    let morning_treatment = match &morning_focus {
        Some(focus) => format!("Apply a {focus} serum"),
        None => "Apply a lightweight hydrating serum".to_string(),
    };
    let evening_treatment = match &evening_focus {
        Some(focus) => format!("Treat with {focus}"),
        None => "Treat with a barrier-repair night cream".to_string(),
    };

    RoutinePlan {
        morning: vec![
            "Cleanse with a gentle, low-pH cleanser".to_string(),
            morning_treatment,
            "Finish with moisturizer and broad-spectrum SPF 30+".to_string(),
        ],
        evening: vec![
            "Double cleanse to remove sunscreen and buildup".to_string(),
            evening_treatment,
            "Seal in with a richer night moisturizer".to_string(),
        ],
        cautions: build_cautions(recommended, profile),
    }
}

fn pick_focus(priority: &[&str], recommended: &[String]) -> Option<String> {
    priority
        .iter()
        .find(|candidate| recommended.iter().any(|r| r == *candidate))
        .map(|candidate| (*candidate).to_string())
        .or_else(|| recommended.first().cloned())
}

fn build_cautions(recommended: &[String], profile: &SkinProfile) -> Vec<String> {
    let mut cautions = Vec::new();

    let contains = |name: &str| recommended.iter().any(|r| r == name);
    if contains("retinol") && contains("salicylic acid") {
        cautions.push(
            "Use retinol and salicylic acid on alternate nights instead of layering them."
                .to_string(),
        );
    }

    let sensitive_profile = !profile.sensitivities.is_empty()
        || profile
            .concerns
            .iter()
            .any(|c| c == "sensitivity" || c == "redness");
    if sensitive_profile {
        cautions.push(
            "Patch test new products for 24 hours before applying them to your full face."
                .to_string(),
        );
    }

    cautions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SkinProfile {
        SkinProfile {
            skin_type: "normal".to_string(),
            concerns: Vec::new(),
            sensitivities: Vec::new(),
            routine_goal: None,
            budget_level: None,
        }
    }

    fn recommended(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn priority_match_wins_over_list_order() {
        let plan = build_routine(&recommended(&["squalane", "niacinamide"]), &profile());
        assert_eq!(plan.morning[1], "Apply a niacinamide serum");
    }

    #[test]
    fn falls_back_to_first_recommended_ingredient() {
        let plan = build_routine(&recommended(&["squalane"]), &profile());
        assert_eq!(plan.morning[1], "Apply a squalane serum");
        assert_eq!(plan.evening[1], "Treat with squalane");
    }

    #[test]
    fn empty_list_still_yields_three_step_templates() {
        let plan = build_routine(&[], &profile());
        assert_eq!(plan.morning.len(), 3);
        assert_eq!(plan.evening.len(), 3);
        assert_eq!(plan.morning[1], "Apply a lightweight hydrating serum");
    }

    #[test]
    fn retinol_with_salicylic_acid_raises_exactly_one_alternating_caution() {
        let plan = build_routine(
            &recommended(&["retinol", "salicylic acid", "squalane"]),
            &profile(),
        );
        let alternating: Vec<_> = plan
            .cautions
            .iter()
            .filter(|c| c.contains("alternate nights"))
            .collect();
        assert_eq!(alternating.len(), 1);
    }

    #[test]
    fn no_conflicting_pair_means_no_alternating_caution() {
        let plan = build_routine(&recommended(&["niacinamide", "squalane"]), &profile());
        assert!(plan.cautions.iter().all(|c| !c.contains("alternate nights")));
    }

    #[test]
    fn sensitive_profiles_get_patch_test_caution() {
        let mut sensitive = profile();
        sensitive.concerns.push("redness".to_string());
        let plan = build_routine(&recommended(&["niacinamide"]), &sensitive);
        assert!(plan.cautions.iter().any(|c| c.contains("Patch test")));

        let plan = build_routine(&recommended(&["niacinamide"]), &profile());
        assert!(plan.cautions.is_empty());
    }

    #[test]
    fn declared_sensitivities_also_trigger_patch_test_caution() {
        let mut sensitive = profile();
        sensitive.sensitivities.push("fragrance".to_string());
        let plan = build_routine(&recommended(&["niacinamide"]), &sensitive);
        assert!(plan.cautions.iter().any(|c| c.contains("Patch test")));
    }
}
