//! Conversation orchestrator: one model call per request.
//!
//! Analysis replies are parsed and replaced with the fallback set when they are
//! not the expected JSON; post replies are returned untouched, whatever they contain.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::LanguageModel;
use crate::error::Result;
use crate::extract::{Extraction, extract_questions, fallback_questions};
use crate::models::{AnswerMap, GenerationRequest, GenerationResult, ToneHints};
use crate::prompts::{analysis_prompt, persona_prompt};

#[derive(Clone)]
pub struct Orchestrator {
    model: Arc<dyn LanguageModel>,
}

impl Orchestrator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn handle(&self, request: GenerationRequest) -> Result<GenerationResult> {
        match request {
            GenerationRequest::Analyze { topic } => self.analyze(&topic).await,
            GenerationRequest::Generate {
                topic,
                answers,
                tone,
            } => self.generate(&topic, &answers, tone).await,
        }
    }

    async fn analyze(&self, topic: &str) -> Result<GenerationResult> {
        let prompt = analysis_prompt(topic);
        let raw = self.model.generate(&prompt).await?;

        let questions = match extract_questions(&raw) {
            Extraction::Questions(questions) => {
                debug!("Extracted {} follow-up questions", questions.len());
                questions
            }
            Extraction::Failed(reason) => {
                warn!("Failed to parse model response, using fallback: {}", reason);
                warn!("Original model response: {}", raw);
                fallback_questions()
            }
        };

        Ok(GenerationResult::Questions { questions })
    }

    async fn generate(
        &self,
        topic: &str,
        answers: &AnswerMap,
        tone: ToneHints,
    ) -> Result<GenerationResult> {
        let prompt = persona_prompt(topic, answers, &tone.clamped())?;
        let post = self.model.generate(&prompt).await?;
        info!("Generated post ({} chars, {} answers)", post.len(), answers.len());
        Ok(GenerationResult::Post { post })
    }
}
