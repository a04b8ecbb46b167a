use std::sync::Arc;

use log::info;

use crate::error::AppError;
use crate::models::chat_turn::ChatTurn;
use crate::models::query_request::QueryRequest;
use crate::models::vector_database::VectorStore;
use crate::services::history_service::{history_for, ChatHistoryStore};
use crate::services::llm_service::ChatModel;
use crate::services::prompt_service::{assemble, PERSONA_TEMPLATE};
use crate::services::retrieval_service::ContextRetriever;

/// Answers website chat queries: retrieve context, replay the session's
/// history, ask the model once, record the exchange.
#[derive(Clone)]
pub struct AnswerService {
    retriever: ContextRetriever,
    model: Arc<dyn ChatModel>,
    history: Arc<dyn ChatHistoryStore>,
    persona: &'static str,
}

impl AnswerService {
    pub fn new(
        store: Arc<dyn VectorStore>,
        model: Arc<dyn ChatModel>,
        history: Arc<dyn ChatHistoryStore>,
    ) -> Self {
        AnswerService {
            retriever: ContextRetriever::new(store),
            model,
            history,
            persona: PERSONA_TEMPLATE,
        }
    }

    pub async fn answer(&self, request: &QueryRequest) -> Result<String, AppError> {
        if let Some(extra) = &request.context {
            log::debug!("Ignoring {} client-supplied context item(s)", extra.len());
        }

        let context = self.retriever.retrieve(&request.query).await?;

        let session = history_for(self.history.clone(), &request.session_id);
        let prior_turns = session.turns().await?;
        info!(
            "Answering query for session {} with {} prior turn(s)",
            session.session_id(),
            prior_turns.len()
        );

        let prompt = assemble(self.persona, &context, &prior_turns, &request.query);
        let reply = self.model.complete(&prompt).await?;

        session
            .append(&[ChatTurn::human(request.query.clone()), ChatTurn::ai(reply.clone())])
            .await?;

        Ok(reply)
    }
}
