use std::path::PathBuf;

use catapult_llm::openai::{
    OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_DRAFT_MODEL, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use catapult_store::StorageBackend;

/// Server configuration loaded from environment variables.
///
/// Everything except `OPENAI_API_KEY` (and `BUCKET_NAME` for the S3
/// backend) has a default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`). Generation runs
    /// several model calls, so this is far longer than a CRUD timeout.
    pub request_timeout_secs: u64,
    /// Blob store backend and its settings.
    pub storage: StorageBackend,
    /// Write the built-in default templates at startup when missing.
    pub seed_default_templates: bool,
    /// Text generation endpoint and models.
    pub openai: OpenAiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                     |
    /// |--------------------------|-----------------------------|
    /// | `HOST`                   | `0.0.0.0`                   |
    /// | `PORT`                   | `3000`                      |
    /// | `CORS_ORIGINS`           | `http://localhost:3000`     |
    /// | `REQUEST_TIMEOUT_SECS`   | `300`                       |
    /// | `STORAGE_BACKEND`        | `memory`                    |
    /// | `STORAGE_ROOT`           | `./data`                    |
    /// | `BUCKET_NAME`            | required for `s3`           |
    /// | `S3_ENDPOINT`            | unset                       |
    /// | `SEED_DEFAULT_TEMPLATES` | `false`                     |
    /// | `OPENAI_API_KEY`         | required                    |
    /// | `OPENAI_BASE_URL`        | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`           | `gpt-4.1`                   |
    /// | `OPENAI_DRAFT_MODEL`     | `gpt-4.1-mini`              |
    /// | `OPENAI_TEMPERATURE`     | `0.7`                       |
    ///
    /// Panics on invalid values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "300")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let storage = match env_or("STORAGE_BACKEND", "memory").to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "local" => StorageBackend::Local {
                root: PathBuf::from(env_or("STORAGE_ROOT", "./data")),
            },
            "s3" => StorageBackend::S3 {
                bucket: std::env::var("BUCKET_NAME")
                    .expect("BUCKET_NAME must be set for the s3 storage backend"),
                endpoint: std::env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
            other => panic!("STORAGE_BACKEND must be one of memory, local, s3 (got '{other}')"),
        };

        let seed_default_templates = parse_bool(&env_or("SEED_DEFAULT_TEMPLATES", "false"))
            .expect("SEED_DEFAULT_TEMPLATES must be true or false");

        let temperature: f32 = env_or("OPENAI_TEMPERATURE", &DEFAULT_TEMPERATURE.to_string())
            .parse()
            .expect("OPENAI_TEMPERATURE must be a number");

        let openai = OpenAiConfig {
            api_key: std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set"),
            base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            model: env_or("OPENAI_MODEL", DEFAULT_MODEL),
            draft_model: env_or("OPENAI_DRAFT_MODEL", DEFAULT_DRAFT_MODEL),
            temperature,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage,
            seed_default_templates,
            openai,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
