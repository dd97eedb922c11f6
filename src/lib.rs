//! post-spark: turn a short accomplishment into a social-media post, optionally after
//! a round of clarifying questions.

pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod extract;
pub mod flow;
pub mod http;
pub mod models;
pub mod orchestrator;
pub mod prompts;

use std::sync::Arc;

use clients::GeminiClient;
use config::Config;
use orchestrator::Orchestrator;

/// Build the orchestrator backed by the configured Gemini model.
pub fn build_orchestrator(config: &Config) -> error::Result<Orchestrator> {
    let model = GeminiClient::new(config.runtime.gemini_api_key.clone(), &config.model)
        .map_err(|e| error::PostSparkError::Config {
            message: e.to_string(),
        })?;
    tracing::info!("Using model {}", model.model());
    Ok(Orchestrator::new(Arc::new(model)))
}
