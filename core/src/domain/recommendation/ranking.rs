use crate::domain::profile::entities::dedupe_tokens;
use crate::domain::recommendation::entities::{Product, RankedProduct};

/// Below this many ranked products the marketplace-link fallback kicks in.
pub const MARKETPLACE_FALLBACK_MIN_MATCHES: usize = 3;

/// How many recommended ingredients feed the marketplace search.
pub const MARKETPLACE_QUERY_INGREDIENTS: usize = 5;

/// Score a catalog subset against the synthesized ingredient list.
/// `match_score` is the integer percentage of recommended ingredients the
/// product contains; an empty recommended list scores everything 0. Sorted
/// by score descending, ties broken by ascending name.
pub fn rank_products(products: Vec<Product>, recommended: &[String]) -> Vec<RankedProduct> {
    let mut ranked: Vec<RankedProduct> = products
        .into_iter()
        .map(|product| {
            let matched_ingredients = if recommended.is_empty() {
                Vec::new()
            } else {
                let product_ingredients =
                    dedupe_tokens(product.ingredients.iter().map(String::as_str));
                recommended
                    .iter()
                    .filter(|ingredient| product_ingredients.contains(ingredient))
                    .cloned()
                    .collect::<Vec<_>>()
            };

            let match_score = if recommended.is_empty() {
                0
            } else {
                (100.0 * matched_ingredients.len() as f64 / recommended.len() as f64).round()
                    as i32
            };

            RankedProduct {
                product,
                match_score,
                matched_ingredients,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| a.product.name.cmp(&b.product.name))
    });

    ranked
}
