use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub auth_secret_key: String,
    pub auth_token_ttl_minutes: i64,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    /// `None` disables the Ollama provider.
    pub ollama_base_url: Option<String>,
    pub ollama_model: String,
    pub chat_history_ttl_secs: u64,
    pub cors_allowed_origin: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            auth_secret_key: require_env("AUTH_SECRET_KEY")?,
            auth_token_ttl_minutes: env_or("AUTH_ACCESS_TOKEN_EXPIRE_MINUTES", "60")
                .parse::<i64>()
                .context("AUTH_ACCESS_TOKEN_EXPIRE_MINUTES must be an integer")?,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_MODEL", "gpt-3.5-turbo"),
            ollama_base_url: match std::env::var("OLLAMA_BASE_URL") {
                Ok(url) if url.trim().is_empty() => None,
                Ok(url) => Some(url),
                Err(_) => Some("http://localhost:11434".to_string()),
            },
            ollama_model: env_or("OLLAMA_MODEL", "llama2"),
            chat_history_ttl_secs: env_or("CHAT_HISTORY_TTL_SECS", "86400")
                .parse::<u64>()
                .context("CHAT_HISTORY_TTL_SECS must be a positive integer")?,
            cors_allowed_origin: env_or("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
