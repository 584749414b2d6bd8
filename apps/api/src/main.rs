mod auth;
mod chat;
mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod resume;
mod routes;
mod state;
mod validation;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::history::RedisConversationStore;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::{LlmClient, LlmProvider, OllamaProvider, OpenAiProvider};
use crate::matching::catalog::StaticJobCatalog;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Leap API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize Redis (connection is opened on first chat request)
    let redis = redis::Client::open(config.redis_url.clone())?;
    let conversations = Arc::new(RedisConversationStore::new(
        redis,
        config.chat_history_ttl_secs,
    ));
    info!("Redis conversation store initialized");

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize LLM provider chain
    let llm = build_llm_client(&config)?;
    info!("LLM provider chain: {}", llm.provider_names().join(" -> "));

    let state = AppState {
        db,
        s3,
        llm,
        config: config.clone(),
        jobs: Arc::new(StaticJobCatalog::sample()),
        conversations,
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_allowed_origin
                .parse::<HeaderValue>()
                .context("CORS_ALLOWED_ORIGIN must be a valid header value")?,
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAI first when a key is configured, then Ollama, then the stub.
fn build_llm_client(config: &Config) -> Result<LlmClient> {
    let mut providers: Vec<Arc<dyn LlmProvider>> = Vec::new();
    if let Some(api_key) = &config.openai_api_key {
        providers.push(Arc::new(OpenAiProvider::new(
            api_key.clone(),
            config.openai_model.clone(),
        )?));
    }
    if let Some(base_url) = &config.ollama_base_url {
        providers.push(Arc::new(OllamaProvider::new(
            base_url.clone(),
            config.ollama_model.clone(),
        )?));
    }
    Ok(LlmClient::new(providers))
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "careerleap-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
