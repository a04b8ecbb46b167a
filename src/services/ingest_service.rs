use std::sync::Arc;

use log::info;
use serde_json::{Map, Value};

use crate::models::chat_turn::ChatTurn;
use crate::models::retrieved_document::{RetrievedDocument, ORIGINAL_CONTENT_KEY};
use crate::models::vector_database::{VectorStore, VectorStoreError};
use crate::services::llm_service::{ChatModel, LlmError};
use crate::services::prompt_service::StructuredPrompt;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Summarization failed: {0}")]
    Summary(#[from] LlmError),

    #[error("Indexing failed: {0}")]
    Index(#[from] VectorStoreError),
}

pub fn summary_prompt(document: &str) -> StructuredPrompt {
    StructuredPrompt {
        turns: vec![ChatTurn::human(format!("Summarize the following document:\n\n{}", document))],
    }
}

/// Indexes source documents by their summaries, keeping the full text in
/// metadata so retrieval can hand it back verbatim.
pub struct Ingestor {
    summarizer: Arc<dyn ChatModel>,
    store: Arc<dyn VectorStore>,
    batch_size: usize,
}

impl Ingestor {
    pub fn new(summarizer: Arc<dyn ChatModel>, store: Arc<dyn VectorStore>, batch_size: usize) -> Self {
        Ingestor { summarizer, store, batch_size: batch_size.max(1) }
    }

    pub async fn summarize(&self, document: &str) -> Result<RetrievedDocument, IngestError> {
        let summary = self.summarizer.complete(&summary_prompt(document)).await?;
        let mut metadata = Map::new();
        metadata.insert(ORIGINAL_CONTENT_KEY.to_string(), Value::String(document.to_string()));
        Ok(RetrievedDocument { content: summary, metadata })
    }

    /// Summarizes every document and upserts the summaries in batches.
    /// Returns the ids of all stored vectors.
    pub async fn ingest(&self, documents: &[String]) -> Result<Vec<String>, IngestError> {
        let mut ids = Vec::with_capacity(documents.len());
        for (batch_number, batch) in documents.chunks(self.batch_size).enumerate() {
            let mut summaries = Vec::with_capacity(batch.len());
            for document in batch {
                summaries.push(self.summarize(document).await?);
            }
            ids.extend(self.store.add_documents(&summaries).await?);
            info!("Indexed batch {} ({} document(s))", batch_number + 1, batch.len());
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vector_database::MockVectorStore;
    use crate::services::llm_service::MockChatModel;

    #[tokio::test]
    async fn test_ingest_stores_summary_with_original_content() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .withf(|prompt| prompt.turns[0].message.starts_with("Summarize the following document:\n\n"))
            .returning(|prompt| Ok(format!("summary of {}", prompt.turns[0].message.len())));

        let mut store = MockVectorStore::new();
        store
            .expect_add_documents()
            .times(2)
            .returning(|docs| {
                assert!(docs.iter().all(|d| d.original_content().is_some()));
                assert!(docs.iter().all(|d| d.content.starts_with("summary of")));
                Ok(docs.iter().map(|d| d.original_content().unwrap().to_string()).collect())
            });

        let ingestor = Ingestor::new(Arc::new(model), Arc::new(store), 2);
        let documents = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
        let ids = ingestor.ingest(&documents).await.unwrap();
        assert_eq!(ids, documents);
    }

    #[tokio::test]
    async fn test_summary_failure_aborts_before_upsert() {
        let mut model = MockChatModel::new();
        model.expect_complete().returning(|_| Err(LlmError::EmptyResponse));
        let mut store = MockVectorStore::new();
        store.expect_add_documents().never();

        let ingestor = Ingestor::new(Arc::new(model), Arc::new(store), 10);
        let err = ingestor.ingest(&["doc".to_string()]).await.unwrap_err();
        assert!(matches!(err, IngestError::Summary(LlmError::EmptyResponse)));
    }
}
