use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde_json::{json, Value};

use crate::models::chat_turn::{Actor, ChatTurn};

const KEY_PREFIX: &str = "message_store:";

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("History store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("Corrupt history entry: {0}")]
    Corrupt(String),
}

/// Externally persisted, per-session conversation log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatHistoryStore: Send + Sync {
    /// All turns recorded for the session, oldest first.
    async fn messages(&self, session_id: &str) -> Result<Vec<ChatTurn>, HistoryError>;

    async fn add_messages(&self, session_id: &str, turns: &[ChatTurn]) -> Result<(), HistoryError>;
}

/// Request-scoped view of one session's history.
pub struct SessionHistory {
    store: Arc<dyn ChatHistoryStore>,
    session_id: String,
}

pub fn history_for(store: Arc<dyn ChatHistoryStore>, session_id: &str) -> SessionHistory {
    SessionHistory { store, session_id: session_id.to_string() }
}

impl SessionHistory {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn turns(&self) -> Result<Vec<ChatTurn>, HistoryError> {
        self.store.messages(&self.session_id).await
    }

    pub async fn append(&self, turns: &[ChatTurn]) -> Result<(), HistoryError> {
        self.store.add_messages(&self.session_id, turns).await
    }
}

/// Redis list-backed history, laid out the way LangChain's
/// `RedisChatMessageHistory` stores it so existing sessions stay readable.
#[derive(Clone)]
pub struct RedisChatHistory {
    connection: ConnectionManager,
    ttl_seconds: Option<i64>,
}

impl RedisChatHistory {
    pub async fn connect(url: &str, ttl_seconds: Option<i64>) -> Result<Self, HistoryError> {
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(RedisChatHistory { connection, ttl_seconds })
    }
}

fn session_key(session_id: &str) -> String {
    format!("{}{}", KEY_PREFIX, session_id)
}

#[async_trait]
impl ChatHistoryStore for RedisChatHistory {
    async fn messages(&self, session_id: &str) -> Result<Vec<ChatTurn>, HistoryError> {
        let mut connection = self.connection.clone();
        let raw: Vec<String> = connection.lrange(session_key(session_id), 0, -1).await?;
        decode_entries(&raw)
    }

    async fn add_messages(&self, session_id: &str, turns: &[ChatTurn]) -> Result<(), HistoryError> {
        if turns.is_empty() {
            return Ok(());
        }
        let key = session_key(session_id);
        let mut connection = self.connection.clone();
        append_pipeline(&key, turns, self.ttl_seconds)
            .query_async::<_, ()>(&mut connection)
            .await?;
        debug!("Appended {} turn(s) to {}", turns.len(), key);
        Ok(())
    }
}

/// One LPUSH per turn in insertion order, then EXPIRE when a TTL is set.
fn append_pipeline(key: &str, turns: &[ChatTurn], ttl_seconds: Option<i64>) -> redis::Pipeline {
    let mut pipeline = redis::pipe();
    for turn in turns {
        pipeline.lpush(key, encode_turn(turn)).ignore();
    }
    if let Some(ttl) = ttl_seconds {
        pipeline.expire(key, ttl).ignore();
    }
    pipeline
}

/// Decodes an `LRANGE 0 -1` reply. LPUSH stores newest first, so the entries
/// are reversed back into insertion order.
fn decode_entries(raw: &[String]) -> Result<Vec<ChatTurn>, HistoryError> {
    raw.iter().rev().map(|entry| decode_turn(entry)).collect()
}

fn encode_turn(turn: &ChatTurn) -> String {
    let kind = turn.actor.as_str();
    json!({
        "type": kind,
        "data": {
            "content": turn.message,
            "additional_kwargs": {},
            "response_metadata": {},
            "type": kind,
            "name": null,
            "id": null,
            "example": false,
        }
    })
    .to_string()
}

fn decode_turn(entry: &str) -> Result<ChatTurn, HistoryError> {
    let value: Value = serde_json::from_str(entry).map_err(|e| HistoryError::Corrupt(e.to_string()))?;
    let actor = match value.get("type").and_then(Value::as_str) {
        Some("human") => Actor::Human,
        Some("ai") => Actor::Ai,
        Some("system") => Actor::System,
        other => return Err(HistoryError::Corrupt(format!("unknown message type {:?}", other))),
    };
    let message = value
        .pointer("/data/content")
        .and_then(Value::as_str)
        .ok_or_else(|| HistoryError::Corrupt("message without string content".to_string()))?;
    Ok(ChatTurn { actor, message: message.to_string() })
}
