//! Client side of `POST /generate`.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::models::{ErrorBody, GenerateRequestBody, GenerationRequest, GenerationResult};

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx reply; carries the server's `message` when it sent one.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for the error banner.
    pub fn banner(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Transport used by the flow controller.
#[async_trait]
pub trait GenerateApi: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpGenerateApi {
    client: Client,
    endpoint: String,
}

impl HttpGenerateApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/generate", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerateApi for HttpGenerateApi {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, ApiError> {
        let body = GenerateRequestBody::from(request);
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<GenerationResult>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
