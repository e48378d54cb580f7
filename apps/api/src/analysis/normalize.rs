//! Normalization of untrusted model output into a `MatchResult`.
//!
//! Two steps, kept separate so each can be tested without a network call:
//! 1. `parse_model_output`: text → `serde_json::Value`, or `AnalysisError::Format`.
//! 2. `coerce_match_result`: any `Value` → `MatchResult`. Total: every field has a default.

use serde_json::Value;
use tracing::error;

use crate::analysis::{AnalysisError, MatchResult};

pub const DEFAULT_SCORE: u8 = 50;
pub const DEFAULT_SUMMARY: &str = "Analysis completed.";

/// Parses the generated text as JSON. The raw text is logged, never returned.
pub fn parse_model_output(text: &str, provider: &str) -> Result<Value, AnalysisError> {
    let cleaned = strip_json_fences(text);
    serde_json::from_str(cleaned).map_err(|e| {
        error!(provider, error = %e, raw_output = %text, "Failed to parse model output");
        AnalysisError::Format
    })
}

/// Coerces an arbitrary JSON value into the result contract, field by field.
pub fn coerce_match_result(raw: &Value) -> MatchResult {
    MatchResult {
        score: coerce_score(raw.get("score")),
        summary: coerce_summary(raw.get("summary")),
        strengths: coerce_list(raw.get("strengths")),
        gaps: coerce_list(raw.get("gaps")),
        suggestions: coerce_list(raw.get("suggestions")),
    }
}

fn coerce_score(value: Option<&Value>) -> u8 {
    match value.and_then(Value::as_f64) {
        Some(n) => n.clamp(0.0, 100.0).round() as u8,
        None => DEFAULT_SCORE,
    }
}

fn coerce_summary(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
        .unwrap_or_else(|| DEFAULT_SUMMARY.to_string())
}

/// Arrays pass through; string items verbatim, other items as compact JSON, nulls dropped.
fn coerce_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect()
        })
        .unwrap_or_default()
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
