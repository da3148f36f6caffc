//! Response Parser — turns raw model output into a validated (category, reasoning) pair.
//!
//! Total function: strict JSON first, then substring search, then fixed
//! defaults. It never fails, whatever the model sends back.

use serde::Deserialize;

use crate::models::screening::FitCategory;

/// Reasoning used when the lenient path cannot find any reasoning text.
pub const DEFAULT_REASONING: &str = "Could not determine fit based on available information.";

/// A validated evaluation result. `category` is always one of the three
/// literals; `reasoning` is always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub category: FitCategory,
    pub reasoning: String,
}

#[derive(Deserialize)]
struct StrictEvaluation {
    category: String,
    reasoning: String,
}

/// Parses raw model output into an `Evaluation`.
///
/// Strict path: the whole text (minus code fences) is a JSON object with
/// non-empty `category` and `reasoning`. An unknown category value is
/// silently replaced with Maybe Fit; it is not an error. An empty field
/// counts as missing and falls through.
///
/// Lenient path, when the strict parse fails: search for the "Good Fit"
/// literal first, then "Not a Fit", defaulting to Maybe Fit; reasoning comes
/// from a loose `reasoning: ...` match, or a fixed placeholder.
pub fn parse_evaluation(raw: &str) -> Evaluation {
    let stripped = strip_json_fences(raw);

    if let Ok(strict) = serde_json::from_str::<StrictEvaluation>(stripped) {
        if !strict.category.trim().is_empty() && !strict.reasoning.trim().is_empty() {
            return Evaluation {
                category: FitCategory::parse(&strict.category).unwrap_or_default(),
                reasoning: strict.reasoning,
            };
        }
    }

    let category = if raw.contains(FitCategory::GoodFit.as_str()) {
        FitCategory::GoodFit
    } else if raw.contains(FitCategory::NotAFit.as_str()) {
        FitCategory::NotAFit
    } else {
        FitCategory::MaybeFit
    };

    let reasoning =
        extract_reasoning(raw).unwrap_or_else(|| DEFAULT_REASONING.to_string());

    Evaluation { category, reasoning }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Loose `reasoning: ...` extraction for non-JSON output.
/// Accepts optional quotes and colon after the keyword, captures up to the
/// next double quote or end of input.
fn extract_reasoning(raw: &str) -> Option<String> {
    const NEEDLE: &[u8] = b"reasoning";

    let start = raw
        .as_bytes()
        .windows(NEEDLE.len())
        .position(|window| window.eq_ignore_ascii_case(NEEDLE))?;

    let mut rest = raw[start + NEEDLE.len()..].trim_start_matches('"').trim_start();
    rest = rest.strip_prefix(':').unwrap_or(rest).trim_start();
    rest = rest.strip_prefix('"').unwrap_or(rest);

    let snippet = match rest.find('"') {
        Some(end) => &rest[..end],
        None => rest,
    };
    let snippet = snippet.trim();

    if snippet.is_empty() {
        None
    } else {
        Some(snippet.to_string())
    }
}
