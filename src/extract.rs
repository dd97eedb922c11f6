//! Best-effort recovery of the `{"questions": [...]}` object from free-form model output.
//!
//! The span runs from the first `{` to the last `}` and is then parsed strictly.
//! This is a heuristic: prose containing stray braces around the object defeats it,
//! and the caller falls back to [`FALLBACK_QUESTIONS`].

use serde_json::Value;
use std::fmt;

/// Returned whenever extraction fails.
pub const FALLBACK_QUESTIONS: [&str; 3] = [
    "What was your main role or contribution?",
    "What was the biggest challenge you faced?",
    "What was the most important lesson you learned?",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Questions(Vec<Value>),
    Failed(ExtractionFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionFailure {
    /// No `{ ... }` span in the text.
    NoJsonObject,
    /// The span is not valid JSON.
    InvalidJson(String),
    /// Valid JSON, but not an object holding a `questions` array.
    MissingQuestions,
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionFailure::NoJsonObject => {
                write!(f, "no JSON object found in the model response")
            }
            ExtractionFailure::InvalidJson(e) => write!(f, "JSON span did not parse: {}", e),
            ExtractionFailure::MissingQuestions => {
                write!(f, "JSON is valid but the 'questions' array is missing")
            }
        }
    }
}

/// Greedy brace span: first `{` through last `}` inclusive.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

pub fn extract_questions(text: &str) -> Extraction {
    let Some(span) = brace_span(text) else {
        return Extraction::Failed(ExtractionFailure::NoJsonObject);
    };
    let value: Value = match serde_json::from_str(span) {
        Ok(v) => v,
        Err(e) => return Extraction::Failed(ExtractionFailure::InvalidJson(e.to_string())),
    };
    match value {
        Value::Object(mut obj) => match obj.remove("questions") {
            Some(Value::Array(items)) => Extraction::Questions(items),
            _ => Extraction::Failed(ExtractionFailure::MissingQuestions),
        },
        _ => Extraction::Failed(ExtractionFailure::MissingQuestions),
    }
}

pub fn fallback_questions() -> Vec<Value> {
    FALLBACK_QUESTIONS
        .iter()
        .map(|q| Value::String((*q).to_string()))
        .collect()
}
