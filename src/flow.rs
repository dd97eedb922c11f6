//! Client flow controller: topic → questions → result → (reset) topic.
//!
//! A submission is split in two so a front end can render the busy state while
//! the call is in flight: [`FlowController::begin_submit`] hands out a [`Ticket`]
//! and the request to send, [`FlowController::complete`] applies the outcome.
//! Tickets issued before a [`FlowController::reset`] are stale and their
//! outcomes are dropped.

use thiserror::Error;

use crate::client::{ApiError, GenerateApi};
use crate::models::{AnswerMap, GenerationRequest, GenerationResult, ToneHints, question_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Topic,
    Questions,
    Result,
}

/// Identifies one outstanding call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("a request is already in progress")]
    Busy,
    #[error("enter a topic first")]
    EmptyTopic,
    #[error("nothing to submit; start a new post")]
    NothingToSubmit,
}

#[derive(Debug, Clone)]
pub struct FlowController {
    phase: Phase,
    topic: String,
    questions: Vec<String>,
    answers: AnswerMap,
    tone: ToneHints,
    post: String,
    error: Option<String>,
    busy: bool,
    epoch: u64,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowController {
    pub fn new() -> Self {
        Self {
            phase: Phase::Topic,
            topic: String::new(),
            questions: Vec::new(),
            answers: AnswerMap::new(),
            tone: ToneHints::default(),
            post: String::new(),
            error: None,
            busy: false,
            epoch: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Final post text; empty outside [`Phase::Result`].
    pub fn post(&self) -> &str {
        &self.post
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        match self.phase {
            _ if self.busy => false,
            Phase::Topic => !self.topic.trim().is_empty(),
            Phase::Questions => true,
            Phase::Result => false,
        }
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        if self.phase == Phase::Topic {
            self.topic = topic.into();
        }
    }

    /// Returns false when `question` is not one of the questions shown.
    pub fn set_answer(&mut self, question: &str, answer: impl Into<String>) -> bool {
        if self.phase != Phase::Questions || !self.answers.contains(question) {
            return false;
        }
        self.answers.set(question, answer);
        true
    }

    pub fn set_tone(&mut self, tone: ToneHints) {
        self.tone = tone;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Mark the controller busy and build the request for the current phase.
    pub fn begin_submit(&mut self) -> Result<(Ticket, GenerationRequest), FlowError> {
        if self.busy {
            return Err(FlowError::Busy);
        }
        let request = match self.phase {
            Phase::Topic => {
                if self.topic.trim().is_empty() {
                    return Err(FlowError::EmptyTopic);
                }
                GenerationRequest::Analyze {
                    topic: self.topic.clone(),
                }
            }
            Phase::Questions => GenerationRequest::Generate {
                topic: self.topic.clone(),
                answers: self.answers.clone(),
                tone: self.tone.clone(),
            },
            Phase::Result => return Err(FlowError::NothingToSubmit),
        };

        self.busy = true;
        self.error = None;
        self.post.clear();
        Ok((Ticket { epoch: self.epoch }, request))
    }

    /// Apply the outcome of a call. Returns false when the ticket is stale and the outcome was dropped.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<GenerationResult, ApiError>,
    ) -> bool {
        if ticket.epoch != self.epoch {
            tracing::debug!("Discarding result of a request issued before reset");
            return false;
        }
        self.busy = false;

        match outcome {
            Ok(GenerationResult::Questions { questions }) if questions.is_empty() => {
                // Nothing to answer; keep the topic so it can be resubmitted
                self.questions.clear();
                self.answers = AnswerMap::new();
                self.phase = Phase::Topic;
            }
            Ok(GenerationResult::Questions { questions }) => {
                self.questions = questions.iter().map(question_text).collect();
                self.answers = AnswerMap::for_questions(self.questions.as_slice());
                self.phase = Phase::Questions;
            }
            Ok(GenerationResult::Post { post }) => {
                self.post = post;
                self.questions.clear();
                self.answers = AnswerMap::new();
                self.phase = Phase::Result;
            }
            Err(e) => {
                tracing::debug!("Request failed: {}", e);
                self.error = Some(e.banner());
            }
        }
        true
    }

    /// Submit the current phase through `api` and apply the result.
    pub async fn submit<A>(&mut self, api: &A) -> Result<Phase, FlowError>
    where
        A: GenerateApi + ?Sized,
    {
        let (ticket, request) = self.begin_submit()?;
        let outcome = api.generate(request).await;
        self.complete(ticket, outcome);
        Ok(self.phase)
    }

    /// Back to an empty topic. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        let epoch = self.epoch.wrapping_add(1);
        *self = Self {
            epoch,
            tone: std::mem::take(&mut self.tone),
            ..Self::new()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_topic_cannot_be_submitted() {
        let mut flow = FlowController::new();
        flow.set_topic("   ");
        assert!(!flow.can_submit());
        assert_eq!(flow.begin_submit().unwrap_err(), FlowError::EmptyTopic);
        assert!(!flow.is_busy());
    }

    #[test]
    fn busy_blocks_second_submission() {
        let mut flow = FlowController::new();
        flow.set_topic("Won a hackathon");
        let (_ticket, request) = flow.begin_submit().unwrap();
        assert!(request.is_analysis());
        assert!(flow.is_busy());
        assert!(!flow.can_submit());
        assert_eq!(flow.begin_submit().unwrap_err(), FlowError::Busy);
    }

    #[test]
    fn stale_ticket_is_discarded_after_reset() {
        let mut flow = FlowController::new();
        flow.set_topic("Won a hackathon");
        let (ticket, _) = flow.begin_submit().unwrap();
        flow.reset();
        assert!(!flow.is_busy());
        let applied = flow.complete(ticket, Ok(GenerationResult::questions(["a?"])));
        assert!(!applied);
        assert_eq!(flow.phase(), Phase::Topic);
        assert!(flow.questions().is_empty());
    }

    #[test]
    fn answers_only_for_shown_questions() {
        let mut flow = FlowController::new();
        flow.set_topic("t");
        let (ticket, _) = flow.begin_submit().unwrap();
        flow.complete(ticket, Ok(GenerationResult::questions(["a?", "b?"])));
        assert!(flow.set_answer("a?", "yes"));
        assert!(!flow.set_answer("c?", "no"));
        assert_eq!(flow.answers().len(), 2);
        assert_eq!(flow.answers().answer("b?"), Some(""));
    }

    #[test]
    fn empty_question_set_stays_on_topic() {
        let mut flow = FlowController::new();
        flow.set_topic("Won a hackathon");
        let (ticket, _) = flow.begin_submit().unwrap();
        assert!(flow.complete(ticket, Ok(GenerationResult::questions(Vec::<String>::new()))));
        assert_eq!(flow.phase(), Phase::Topic);
        assert_eq!(flow.topic(), "Won a hackathon");
        assert!(flow.questions().is_empty());
        assert!(flow.answers().is_empty());
        assert!(flow.can_submit());
        let (_, request) = flow.begin_submit().unwrap();
        assert!(request.is_analysis());
    }

    #[test]
    fn non_string_questions_render_as_json() {
        let mut flow = FlowController::new();
        flow.set_topic("t");
        let (ticket, _) = flow.begin_submit().unwrap();
        flow.complete(
            ticket,
            Ok(GenerationResult::Questions {
                questions: vec![serde_json::json!("plain?"), serde_json::json!(42)],
            }),
        );
        assert_eq!(flow.questions(), ["plain?".to_string(), "42".to_string()]);
    }
}
