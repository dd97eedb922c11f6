//! Request and response shapes shared by the server and the client flow.
//!
//! A phase-1 request carries only a topic; a phase-2 request also carries the
//! user's answers (`details` on the wire). Exactly one result variant comes back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PostSparkError, Result};

pub const TOPIC_REQUIRED_MESSAGE: &str = "Topic is required.";

/// Question text → answer text, in the order the questions were asked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(Map<String, Value>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// One empty answer per question.
    pub fn for_questions<S: AsRef<str>>(questions: &[S]) -> Self {
        let mut map = Map::new();
        for q in questions {
            map.insert(q.as_ref().to_string(), Value::String(String::new()));
        }
        Self(map)
    }

    pub fn set(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.0.insert(question.into(), Value::String(answer.into()));
    }

    pub fn answer(&self, question: &str) -> Option<&str> {
        self.0.get(question).and_then(Value::as_str)
    }

    pub fn contains(&self, question: &str) -> bool {
        self.0.contains_key(question)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Pretty JSON with two-space indentation, as embedded in the persona prompt.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = AnswerMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

/// Optional tone controls on a 0–100 scale.
///
/// Values are whatever JSON the caller sent; only numbers are range-checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToneHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Value>,
}

impl ToneHints {
    /// Numeric values clamped into [0, 100]; anything else is kept as sent.
    pub fn clamped(&self) -> Self {
        Self {
            emotion: self.emotion.as_ref().map(clamp_level),
            urgency: self.urgency.as_ref().map(clamp_level),
        }
    }
}

fn clamp_level(v: &Value) -> Value {
    match v.as_f64() {
        Some(n) if n < 0.0 => Value::from(0),
        Some(n) if n > 100.0 => Value::from(100),
        _ => v.clone(),
    }
}

/// Text interpolated into the prompt for a tone value; strings go in unquoted.
pub fn level_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One call to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    /// Phase 1: turn a bare topic into clarifying questions.
    Analyze { topic: String },
    /// Phase 2: turn topic + answers into the final post.
    Generate {
        topic: String,
        answers: AnswerMap,
        tone: ToneHints,
    },
}

impl GenerationRequest {
    pub fn topic(&self) -> &str {
        match self {
            GenerationRequest::Analyze { topic } | GenerationRequest::Generate { topic, .. } => {
                topic
            }
        }
    }

    pub fn is_analysis(&self) -> bool {
        matches!(self, GenerationRequest::Analyze { .. })
    }
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AnswerMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Value>,
}

impl GenerateRequestBody {
    /// Validate the topic and pick the branch from the presence of `details`.
    pub fn into_request(self) -> Result<GenerationRequest> {
        let topic = match self.topic {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(PostSparkError::validation(TOPIC_REQUIRED_MESSAGE)),
        };
        Ok(match self.details {
            None => GenerationRequest::Analyze { topic },
            Some(answers) => GenerationRequest::Generate {
                topic,
                answers,
                tone: ToneHints {
                    emotion: self.emotion,
                    urgency: self.urgency,
                },
            },
        })
    }
}

impl From<GenerationRequest> for GenerateRequestBody {
    fn from(req: GenerationRequest) -> Self {
        match req {
            GenerationRequest::Analyze { topic } => Self {
                topic: Some(topic),
                ..Default::default()
            },
            GenerationRequest::Generate {
                topic,
                answers,
                tone,
            } => Self {
                topic: Some(topic),
                details: Some(answers),
                emotion: tone.emotion,
                urgency: tone.urgency,
            },
        }
    }
}

/// Exactly one of these is returned per successful call.
///
/// Questions are kept as raw JSON values: the model's array is passed through unvalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationResult {
    Post {
        post: String,
    },
    Questions {
        #[serde(rename = "followUpQuestions")]
        questions: Vec<Value>,
    },
}

impl GenerationResult {
    pub fn post(text: impl Into<String>) -> Self {
        GenerationResult::Post { post: text.into() }
    }

    pub fn questions<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        GenerationResult::Questions {
            questions: items.into_iter().map(|q| Value::String(q.into())).collect(),
        }
    }
}

/// Error body returned with 4xx/5xx statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Display text for one follow-up question. Non-string items render as compact JSON.
pub fn question_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
