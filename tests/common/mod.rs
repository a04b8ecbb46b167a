// Shared in-memory stand-ins for the external services.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map};

use JellyChatAgent::models::chat_turn::ChatTurn;
use JellyChatAgent::models::retrieved_document::RetrievedDocument;
use JellyChatAgent::models::vector_database::{VectorStore, VectorStoreError};
use JellyChatAgent::routes::app_state::AppState;
use JellyChatAgent::services::chat_service::AnswerService;
use JellyChatAgent::services::history_service::{ChatHistoryStore, HistoryError};
use JellyChatAgent::services::llm_service::{ChatModel, LlmError};
use JellyChatAgent::services::mail_service::{MailError, MailRelay, MailService};
use JellyChatAgent::services::prompt_service::StructuredPrompt;

pub fn document(summary: &str, original: &str) -> RetrievedDocument {
    let mut metadata = Map::new();
    metadata.insert("original_content".to_string(), json!(original));
    RetrievedDocument { content: summary.to_string(), metadata }
}

/// Returns the same ranked documents for every query, or fails when unavailable.
#[derive(Default)]
pub struct FakeVectorStore {
    pub documents: Vec<RetrievedDocument>,
    pub unavailable: bool,
}

#[async_trait]
impl VectorStore for FakeVectorStore {
    async fn similarity_search(&self, _query: &str, k: usize) -> Result<Vec<RetrievedDocument>, VectorStoreError> {
        if self.unavailable {
            return Err(VectorStoreError::Api { status: 503, body: "index unavailable".to_string() });
        }
        Ok(self.documents.iter().take(k).cloned().collect())
    }

    async fn add_documents(&self, documents: &[RetrievedDocument]) -> Result<Vec<String>, VectorStoreError> {
        Ok((0..documents.len()).map(|i| i.to_string()).collect())
    }
}

#[derive(Default)]
pub struct InMemoryHistory {
    sessions: Mutex<HashMap<String, Vec<ChatTurn>>>,
}

impl InMemoryHistory {
    pub fn turns(&self, session_id: &str) -> Vec<ChatTurn> {
        self.sessions.lock().unwrap().get(session_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatHistoryStore for InMemoryHistory {
    async fn messages(&self, session_id: &str) -> Result<Vec<ChatTurn>, HistoryError> {
        Ok(self.turns(session_id))
    }

    async fn add_messages(&self, session_id: &str, turns: &[ChatTurn]) -> Result<(), HistoryError> {
        self.sessions
            .lock()
            .unwrap()
            .entry(session_id.to_string())
            .or_default()
            .extend(turns.iter().cloned());
        Ok(())
    }
}

/// Records every prompt and answers with numbered replies. Fails while
/// `failing` is set.
#[derive(Default)]
pub struct RecordingModel {
    pub prompts: Mutex<Vec<StructuredPrompt>>,
    pub failing: Mutex<bool>,
}

impl RecordingModel {
    pub fn prompts(&self) -> Vec<StructuredPrompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl ChatModel for RecordingModel {
    async fn complete(&self, prompt: &StructuredPrompt) -> Result<String, LlmError> {
        if *self.failing.lock().unwrap() {
            return Err(LlmError::Api { status: 500, body: "model overloaded".to_string() });
        }
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.clone());
        Ok(format!("reply {}", prompts.len()))
    }
}

#[derive(Default)]
pub struct RecordingRelay {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail_with_auth_error: bool,
}

#[async_trait]
impl MailRelay for RecordingRelay {
    fn recipient(&self) -> String {
        "sales@example.com".to_string()
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        if self.fail_with_auth_error {
            return Err(MailError::NotConfigured);
        }
        self.sent.lock().unwrap().push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub store: Arc<FakeVectorStore>,
    pub history: Arc<InMemoryHistory>,
    pub model: Arc<RecordingModel>,
    pub relay: Arc<RecordingRelay>,
}

impl Harness {
    pub fn new(store: FakeVectorStore, relay: RecordingRelay) -> Self {
        Harness {
            store: Arc::new(store),
            history: Arc::new(InMemoryHistory::default()),
            model: Arc::new(RecordingModel::default()),
            relay: Arc::new(relay),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            answer_service: Arc::new(AnswerService::new(
                self.store.clone(),
                self.model.clone(),
                self.history.clone(),
            )),
            mail_service: Arc::new(MailService::new(self.relay.clone())),
        }
    }
}
