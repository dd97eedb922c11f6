#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use post_spark::client::{ApiError, GENERIC_FAILURE_MESSAGE, GenerateApi};
use post_spark::clients::{LanguageModel, ModelError};
use post_spark::http::router;
use post_spark::models::{ErrorBody, GenerateRequestBody, GenerationRequest, GenerationResult};
use post_spark::orchestrator::Orchestrator;
use serde_json::Value;
use tower::ServiceExt;

pub const ORIGIN: &str = "http://localhost:3000";

/// Model that replays canned replies in order and records every prompt.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(e)) => Err(ModelError::Transport(e)),
            None => Err(ModelError::EmptyResponse),
        }
    }
}

pub fn app(model: Arc<ScriptedModel>) -> Router {
    router(Orchestrator::new(model), ORIGIN).unwrap()
}

pub fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Client transport that calls the router in-process.
pub struct RouterApi {
    pub app: Router,
}

#[async_trait]
impl GenerateApi for RouterApi {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, ApiError> {
        let body = serde_json::to_string(&GenerateRequestBody::from(request)).unwrap();
        let resp = self
            .app
            .clone()
            .oneshot(post_json(&body))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
