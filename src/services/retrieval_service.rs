use std::sync::Arc;

use log::{debug, info};

use crate::models::retrieved_document::ORIGINAL_CONTENT_KEY;
use crate::models::vector_database::{VectorStore, VectorStoreError};

/// Context handed to the prompt when the index has nothing relevant.
pub const FALLBACK_CONTEXT: &str =
    "Frame a professional answer which shows the positive image of the company and should be relevant to the query";

/// Finds the single source document best matching a query.
#[derive(Clone)]
pub struct ContextRetriever {
    store: Arc<dyn VectorStore>,
}

impl ContextRetriever {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        ContextRetriever { store }
    }

    /// Returns the full original text of the top match, or
    /// [`FALLBACK_CONTEXT`] when the index returns nothing.
    pub async fn retrieve(&self, query: &str) -> Result<String, VectorStoreError> {
        let documents = self.store.similarity_search(query, 1).await?;
        match documents.into_iter().next() {
            Some(document) => {
                debug!("Top match summary: {}", document.content);
                document
                    .original_content()
                    .map(str::to_string)
                    .ok_or(VectorStoreError::MissingMetadata(ORIGINAL_CONTENT_KEY))
            }
            None => {
                info!("No indexed document matched the query; using fallback context");
                Ok(FALLBACK_CONTEXT.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::retrieved_document::RetrievedDocument;
    use crate::models::vector_database::MockVectorStore;
    use mockall::predicate::*;
    use serde_json::{json, Map};

    fn document(summary: &str, original: Option<&str>) -> RetrievedDocument {
        let mut metadata = Map::new();
        if let Some(original) = original {
            metadata.insert(ORIGINAL_CONTENT_KEY.to_string(), json!(original));
        }
        RetrievedDocument { content: summary.to_string(), metadata }
    }

    #[tokio::test]
    async fn test_retrieve_returns_original_content_not_summary() {
        let mut store = MockVectorStore::new();
        store
            .expect_similarity_search()
            .with(eq("Who is the CEO?"), eq(1))
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    document("Leadership summary", Some("CEO of the Company: Gaurav Chauhan")),
                    document("Other summary", Some("unrelated")),
                ])
            });

        let retriever = ContextRetriever::new(Arc::new(store));
        let context = retriever.retrieve("Who is the CEO?").await.unwrap();
        assert_eq!(context, "CEO of the Company: Gaurav Chauhan");
    }

    #[tokio::test]
    async fn test_retrieve_falls_back_when_nothing_matches() {
        let mut store = MockVectorStore::new();
        store.expect_similarity_search().returning(|_, _| Ok(vec![]));

        let retriever = ContextRetriever::new(Arc::new(store));
        let context = retriever.retrieve("tell me a joke").await.unwrap();
        assert_eq!(context, FALLBACK_CONTEXT);
    }

    #[tokio::test]
    async fn test_retrieve_errors_on_missing_original_content() {
        let mut store = MockVectorStore::new();
        store
            .expect_similarity_search()
            .returning(|_, _| Ok(vec![document("summary only", None)]));

        let retriever = ContextRetriever::new(Arc::new(store));
        let err = retriever.retrieve("services").await.unwrap_err();
        assert!(matches!(err, VectorStoreError::MissingMetadata("original_content")));
        assert_eq!(err.to_string(), "missing metadata field 'original_content'");
    }

    #[tokio::test]
    async fn test_retrieve_propagates_store_failure() {
        let mut store = MockVectorStore::new();
        store.expect_similarity_search().returning(|_, _| {
            Err(VectorStoreError::Api { status: 503, body: "unavailable".to_string() })
        });

        let retriever = ContextRetriever::new(Arc::new(store));
        let err = retriever.retrieve("services").await.unwrap_err();
        assert_eq!(err.to_string(), "Vector store returned 503: unavailable");
    }
}
