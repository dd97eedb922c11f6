use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CORS_ORIGIN: &str = "https://linkdln-post1.vercel.app";
pub const DEFAULT_LOG_LEVEL: &str = "post_spark=info,tower_http=info";

/// Main configuration structure loaded from post_spark.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// The only origin allowed by CORS
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

/// Generative model settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub api_base: String,
    /// Request timeout; none when unset
    pub timeout_ms: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_ms: None,
        }
    }
}

/// Secrets, never read from the TOML file
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub gemini_api_key: String,
}

/// Tracing filter: `RUST_LOG` if set, otherwise [`DEFAULT_LOG_LEVEL`].
pub fn log_filter(lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("RUST_LOG")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

impl Config {
    /// Load `POST_SPARK_ENV_FILE` (or `.env`) into the process environment.
    /// Variables already set are not overridden, so calling this twice is harmless.
    pub fn load_env_files() {
        if let Ok(env_path) = std::env::var("POST_SPARK_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }
    }

    /// Load configuration from TOML file and environment variables
    /// Uses POST_SPARK_CONFIG environment variable or defaults to "post_spark.toml"
    pub fn load() -> anyhow::Result<Self> {
        Self::load_env_files();

        let config_path = std::env::var("POST_SPARK_CONFIG")
            .unwrap_or_else(|_| "post_spark.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides (env-first). `lookup` returns the value of a variable.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").and_then(|v| v.parse::<u16>().ok()) {
            self.server.bind = SocketAddr::from(([0, 0, 0, 0], port));
        }
        if let Some(bind) = lookup("POST_SPARK_BIND").and_then(|v| v.parse::<SocketAddr>().ok()) {
            self.server.bind = bind;
        }
        if let Some(origin) = lookup("POST_SPARK_CORS_ORIGIN") {
            self.server.cors_origin = origin;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.model.name = model;
        }
        if let Some(base) = lookup("GEMINI_API_BASE") {
            self.model.api_base = base;
        }
        if let Some(ms) = lookup("GEMINI_TIMEOUT_MS").and_then(|v| v.parse::<u64>().ok()) {
            self.model.timeout_ms = Some(ms).filter(|&ms| ms > 0);
        }

        self.runtime.gemini_api_key = lookup("GEMINI_API_KEY")
            .map(|k| k.trim().to_string())
            .unwrap_or_default();
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.runtime.gemini_api_key.is_empty() {
            anyhow::bail!("GEMINI_API_KEY is not defined in your environment or .env file");
        }
        if self.model.name.trim().is_empty() {
            anyhow::bail!("model name must not be empty");
        }
        if !self.model.api_base.starts_with("http://") && !self.model.api_base.starts_with("https://")
        {
            anyhow::bail!(
                "model api_base '{}' must start with http:// or https://",
                self.model.api_base
            );
        }
        if self.server.cors_origin.trim().is_empty() {
            anyhow::bail!("cors_origin must not be empty");
        }
        Ok(())
    }
}
