use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::chat::history::ConversationStore;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::catalog::JobRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Job source for matching and search. Default: the built-in sample catalog.
    pub jobs: Arc<dyn JobRepository>,
    /// Chat history backend. Default: Redis lists with a sliding TTL.
    pub conversations: Arc<dyn ConversationStore>,
}
