//! HTTP transport module for post-spark
//!
//! Axum server exposing `POST /generate` plus a plain `GET /health` probe.
//! CORS admits a single configured origin.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderValue, Method, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::error::{PostSparkError, Result};
use crate::models::{GenerateRequestBody, GenerationResult};
use crate::orchestrator::Orchestrator;

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Phase is chosen by the presence of `details` in the body.
pub async fn generate_handler(
    State(state): State<HttpState>,
    payload: std::result::Result<Json<GenerateRequestBody>, JsonRejection>,
) -> Result<Json<GenerationResult>> {
    let Json(body) = payload.map_err(|e| PostSparkError::validation(e.body_text()))?;
    let request = body.into_request()?;
    tracing::debug!(
        "{} request, topic {} chars",
        if request.is_analysis() { "analysis" } else { "generation" },
        request.topic().len()
    );
    let result = state.orchestrator.handle(request).await?;
    Ok(Json(result))
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();
    let resp = next.run(req).await;
    let latency_ms = start.elapsed().as_millis();
    if resp.status().is_server_error() {
        tracing::warn!("{} {} -> {} ({}ms)", method, path, resp.status(), latency_ms);
    } else {
        tracing::info!("{} {} -> {} ({}ms)", method, path, resp.status(), latency_ms);
    }
    resp
}

/// Only a request whose `Origin` equals the configured one gets an allow header back.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|e| PostSparkError::Config {
            message: format!("invalid CORS origin '{}': {}", origin, e),
        })?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Build the application router
pub fn router(orchestrator: Orchestrator, cors_origin: &str) -> Result<Router> {
    let state = HttpState {
        orchestrator: Arc::new(orchestrator),
    };

    Ok(Router::new()
        .route("/health", get(health_handler))
        .route("/generate", post(generate_handler))
        .layer(cors_layer(cors_origin)?)
        .layer(middleware::from_fn(log_requests))
        .with_state(state))
}

/// Start the HTTP server
pub async fn start_http_server(config: &Config, orchestrator: Orchestrator) -> anyhow::Result<()> {
    let app = router(orchestrator, &config.server.cors_origin)?;

    let listener = tokio::net::TcpListener::bind(config.server.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!(
        "API server is listening on {} (CORS origin {})",
        config.server.bind,
        config.server.cors_origin
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
