//! Pulls the evaluation JSON out of free-form model output.
//!
//! Models wrap JSON in prose or markdown fences often enough that the raw text
//! cannot be parsed directly. The strategies below are tried in order and the
//! first candidate that parses as JSON wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```json\s*(.*?)```").expect("fenced json pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A markdown block fenced with ```` ```json ````.
    FencedBlock,
    /// The first balanced top-level `{...}` span.
    BraceSpan,
    /// The whole output.
    RawText,
}

pub const STRATEGIES: [Strategy; 3] = [
    Strategy::FencedBlock,
    Strategy::BraceSpan,
    Strategy::RawText,
];

impl Strategy {
    fn candidate(self, raw: &str) -> Option<&str> {
        match self {
            Strategy::FencedBlock => FENCED_JSON
                .captures(raw)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str()),
            Strategy::BraceSpan => brace_span(raw),
            Strategy::RawText => Some(raw),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no JSON object found in model output")]
    Unparseable,
    #[error("JSON has neither 'criteria' nor 'overallVerdict'")]
    MissingFields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub value: Value,
    pub strategy: Strategy,
}

pub fn parse_provider_output(raw: &str) -> Result<Extracted, ExtractError> {
    let (value, strategy) = STRATEGIES
        .iter()
        .find_map(|strategy| {
            let candidate = strategy.candidate(raw)?;
            serde_json::from_str::<Value>(candidate.trim())
                .ok()
                .map(|v| (v, *strategy))
        })
        .ok_or(ExtractError::Unparseable)?;

    if value.get("criteria").is_none() && value.get("overallVerdict").is_none() {
        return Err(ExtractError::MissingFields);
    }
    Ok(Extracted { value, strategy })
}

/// Returns the first `{...}` span whose braces balance, skipping braces inside
/// JSON strings. Falls back to first `{` .. last `}` when nothing balances.
fn brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_the_fenced_block() {
        let raw = "Sure! {\"note\": 1}\n```json\n{\"overallVerdict\": \"PASS\", \"criteria\": []}\n```\n";
        let extracted = parse_provider_output(raw).unwrap();

        assert_eq!(extracted.strategy, Strategy::FencedBlock);
        assert_eq!(extracted.value["overallVerdict"], "PASS");
    }

    #[test]
    fn falls_back_to_the_first_balanced_brace_span() {
        let raw = "Here is my evaluation: {\"overallVerdict\": \"FAIL\", \"criteria\": [{\"reasoning\": \"uses } inside\"}]} Thanks {x}";
        let extracted = parse_provider_output(raw).unwrap();

        assert_eq!(extracted.strategy, Strategy::BraceSpan);
        assert_eq!(extracted.value["criteria"][0]["reasoning"], "uses } inside");
    }

    #[test]
    fn broken_fence_falls_through_to_later_strategies() {
        let raw = "```json\nnot json at all\n```\n{\"overallVerdict\": \"PASS\"}";
        let extracted = parse_provider_output(raw).unwrap();

        assert_eq!(extracted.strategy, Strategy::BraceSpan);
        assert_eq!(extracted.value, json!({"overallVerdict": "PASS"}));
    }

    #[test]
    fn raw_text_is_the_last_resort() {
        assert_eq!(brace_span("[1, 2]"), None);
        let err = parse_provider_output("[1, 2]").unwrap_err();
        // Parses as raw JSON, but is not an evaluation.
        assert_eq!(err, ExtractError::MissingFields);
    }

    #[test]
    fn unparseable_output_is_reported() {
        assert_eq!(
            parse_provider_output("I cannot evaluate this { submission").unwrap_err(),
            ExtractError::Unparseable
        );
    }

    #[test]
    fn object_without_evaluation_fields_is_rejected() {
        assert_eq!(
            parse_provider_output("{\"answer\": 42}").unwrap_err(),
            ExtractError::MissingFields
        );
    }
}
