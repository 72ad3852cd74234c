//! Defensive parsing of raw LLM replies. The upstream model is expected to
//! return clean JSON and routinely does not: markdown fences, prose
//! preambles and truncated bodies all show up in production. Parsing runs an
//! ordered list of strategies and short-circuits on the first one that
//! yields at least one normalized ingredient. An empty result is a valid
//! outcome, never an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::profile::entities::dedupe_tokens;
use crate::domain::recommendation::entities::ImageAnalysis;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("static regex"));

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("static regex"));

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+[.)]?|[-*•])\s*").expect("static regex"));

type Strategy = fn(&str) -> Option<Vec<String>>;

/// Strategies in preference order: structured first, lexical wreckage last.
const INGREDIENT_STRATEGIES: &[Strategy] = &[
    parse_whole_json,
    parse_bracket_slice,
    parse_quoted_strings,
    parse_delimited_lines,
];

/// Extract an ingredient list from an arbitrary text blob.
pub fn parse_ingredient_list(raw: &str) -> Vec<String> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Vec::new();
    }

    for strategy in INGREDIENT_STRATEGIES {
        if let Some(ingredients) = strategy(&cleaned) {
            return ingredients;
        }
    }

    Vec::new()
}

/// Extract an image-analysis object from an arbitrary text blob. Field-level
/// defaulting happens in [`ImageAnalysis::from_value`]; a reply with no
/// recoverable object degrades to the default record.
pub fn parse_image_analysis(raw: &str) -> ImageAnalysis {
    let cleaned = strip_code_fences(raw);

    let parsed: Option<Value> = serde_json::from_str(&cleaned)
        .ok()
        .filter(Value::is_object)
        .or_else(|| {
            let start = cleaned.find('{')?;
            let end = cleaned.rfind('}')?;
            if end <= start {
                return None;
            }
            serde_json::from_str(&cleaned[start..=end])
                .ok()
                .filter(Value::is_object)
        });

    ImageAnalysis::from_value(parsed.as_ref())
}

fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE.replace_all(raw, "").trim().to_string()
}

fn parse_whole_json(cleaned: &str) -> Option<Vec<String>> {
    let value: Value = serde_json::from_str(cleaned).ok()?;
    ingredients_from_value(&value)
}

fn parse_bracket_slice(cleaned: &str) -> Option<Vec<String>> {
    let start = cleaned.find('[')?;
    let end = cleaned.rfind(']')?;
    if end <= start {
        return None;
    }
    let value: Value = serde_json::from_str(&cleaned[start..=end]).ok()?;
    ingredients_from_value(&value)
}

/// A string array, or an object carrying an `ingredients` string array.
fn ingredients_from_value(value: &Value) -> Option<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.get("ingredients")?.as_array()?,
        _ => return None,
    };

    non_empty(dedupe_tokens(
        items.iter().filter_map(Value::as_str),
    ))
}

fn parse_quoted_strings(cleaned: &str) -> Option<Vec<String>> {
    non_empty(dedupe_tokens(
        QUOTED
            .captures_iter(cleaned)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str()),
    ))
}

/// Last resort: split on newlines and commas, drop anything before a colon
/// ("Sure! Try: ..."), strip leading list markers.
fn parse_delimited_lines(cleaned: &str) -> Option<Vec<String>> {
    let segments = cleaned
        .split(['\n', ','])
        .map(|segment| match segment.rfind(':') {
            Some(index) => &segment[index + 1..],
            None => segment,
        })
        .map(|segment| LIST_MARKER.replace(segment, ""));

    let mut tokens = Vec::new();
    for segment in segments {
        for token in dedupe_tokens(std::iter::once(segment.as_ref())) {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    non_empty(tokens)
}

fn non_empty(tokens: Vec<String>) -> Option<Vec<String>> {
    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}
