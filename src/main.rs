use anyhow::Result;
use post_spark::config::{self, Config};
use post_spark::{build_orchestrator, http::start_http_server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Tracing must be initialised before Config::load, which warns on a missing file
    Config::load_env_files();
    tracing_subscriber::fmt()
        .with_env_filter(config::log_filter(|key| std::env::var(key).ok()))
        .init();

    // The process refuses to start without an API key
    let config = Config::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        "Starting post-spark: model={}, bind={}",
        config.model.name, config.server.bind
    );

    let orchestrator = build_orchestrator(&config)?;
    start_http_server(&config, orchestrator).await
}
