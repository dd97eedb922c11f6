//! Domain-specific error types for post-spark

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::clients::ModelError;

/// Message returned to callers when the model call fails. Details stay in the server log.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate post. Please check the server logs.";

/// Main error type for the post-spark server
#[derive(Error, Debug)]
pub enum PostSparkError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Generation failed: {source}")]
    Generation {
        #[from]
        source: ModelError,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PostSparkError {
    pub fn validation(message: impl Into<String>) -> Self {
        PostSparkError::Validation {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PostSparkError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            PostSparkError::Validation { message } => message.clone(),
            PostSparkError::Generation { .. } => GENERATION_FAILED_MESSAGE.to_string(),
            _ => "Internal server error.".to_string(),
        }
    }
}

impl From<anyhow::Error> for PostSparkError {
    fn from(err: anyhow::Error) -> Self {
        PostSparkError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PostSparkError {
    fn from(err: serde_json::Error) -> Self {
        PostSparkError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Convert PostSparkError to an HTTP response with a `{ message }` body
impl IntoResponse for PostSparkError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Error in /generate endpoint: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
        (status, Json(json!({ "message": self.public_message() }))).into_response()
    }
}

/// Result type alias for post-spark operations
pub type Result<T> = std::result::Result<T, PostSparkError>;
