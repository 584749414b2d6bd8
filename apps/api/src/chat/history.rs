use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::ChatMessage;

/// Most recent turns kept per conversation and replayed to the model.
pub const MAX_REPLAYED_TURNS: isize = 20;

/// Persisted conversation turns, keyed by conversation id.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Returns up to [`MAX_REPLAYED_TURNS`] most recent turns, oldest first.
    async fn load(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, AppError>;

    /// Appends `turns`, drops all but the newest [`MAX_REPLAYED_TURNS`] and
    /// refreshes the conversation's expiry.
    async fn append(&self, conversation_id: &str, turns: &[ChatMessage]) -> Result<(), AppError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTurn {
    role: String,
    content: String,
    timestamp: String,
}

pub fn conversation_key(conversation_id: &str) -> String {
    format!("chat:conversation:{conversation_id}")
}

/// RPUSH, LTRIM to the newest turns, then EXPIRE, as one MULTI/EXEC.
fn append_pipeline(key: &str, entries: Vec<String>, ttl_secs: u64) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .rpush(key, entries)
        .ignore()
        .ltrim(key, -MAX_REPLAYED_TURNS, -1)
        .ignore()
        .expire(key, ttl_secs as i64)
        .ignore();
    pipe
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

/// Stores each conversation as a Redis list of JSON turns with a sliding TTL.
pub struct RedisConversationStore {
    client: redis::Client,
    connection: OnceCell<MultiplexedConnection>,
    ttl_secs: u64,
}

impl RedisConversationStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self {
            client,
            connection: OnceCell::new(),
            ttl_secs,
        }
    }

    /// Connects lazily so startup does not depend on Redis being reachable.
    async fn connection(&self) -> Result<MultiplexedConnection, AppError> {
        let conn = self
            .connection
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl ConversationStore for RedisConversationStore {
    async fn load(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, AppError> {
        let mut conn = self.connection().await?;
        let raw: Vec<String> = conn
            .lrange(conversation_key(conversation_id), -MAX_REPLAYED_TURNS, -1)
            .await?;

        let turns = raw
            .iter()
            .filter_map(|entry| match serde_json::from_str::<StoredTurn>(entry) {
                Ok(turn) => Some(ChatMessage {
                    role: turn.role,
                    content: turn.content,
                }),
                Err(e) => {
                    warn!("Skipping unreadable turn in conversation {conversation_id}: {e}");
                    None
                }
            })
            .collect::<Vec<_>>();
        debug!("Loaded {} turns for conversation {conversation_id}", turns.len());
        Ok(turns)
    }

    async fn append(&self, conversation_id: &str, turns: &[ChatMessage]) -> Result<(), AppError> {
        if turns.is_empty() {
            return Ok(());
        }

        let timestamp = Utc::now().to_rfc3339();
        let entries = turns
            .iter()
            .map(|m| {
                serde_json::to_string(&StoredTurn {
                    role: m.role.clone(),
                    content: m.content.clone(),
                    timestamp: timestamp.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serializing chat turn: {e}")))?;

        let key = conversation_key(conversation_id);
        let mut conn = self.connection().await?;
        append_pipeline(&key, entries, self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
