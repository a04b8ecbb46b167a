use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::models::retrieved_document::RetrievedDocument;
use crate::services::embedding_service::{Embedder, EmbeddingError};

const PINECONE_CONTROL_URL: &str = "https://api.pinecone.io";
const PINECONE_API_VERSION: &str = "2024-07";
/// Metadata key holding the indexed text of each vector.
pub const TEXT_KEY: &str = "text";

#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("Vector store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Vector store returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed vector store response: {0}")]
    MalformedResponse(String),

    #[error("missing metadata field '{0}'")]
    MissingMetadata(&'static str),
}

/// Similarity search over an external vector index.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Returns up to `k` documents ranked by similarity to `query`, best first.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>, VectorStoreError>;

    /// Embeds and stores documents, returning the ids they were stored under.
    async fn add_documents(&self, documents: &[RetrievedDocument]) -> Result<Vec<String>, VectorStoreError>;
}

/// A Pinecone serverless index reached over its data-plane host.
#[derive(Clone)]
pub struct PineconeVectorStore {
    client: Client,
    api_key: String,
    host: String,
    namespace: String,
    embedder: Arc<dyn Embedder>,
}

impl PineconeVectorStore {
    pub fn new(client: Client, api_key: &str, host: &str, embedder: Arc<dyn Embedder>) -> Self {
        let host = host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };
        PineconeVectorStore {
            client,
            api_key: api_key.to_string(),
            host,
            namespace: String::new(),
            embedder,
        }
    }

    /// Connects to `index_name`, asking the control plane for its host unless
    /// one is given.
    pub async fn connect(
        client: Client,
        api_key: &str,
        index_name: &str,
        host: Option<&str>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, VectorStoreError> {
        let host = match host {
            Some(host) => host.to_string(),
            None => describe_index_host(&client, api_key, index_name).await?,
        };
        info!("Using Pinecone index {} at {}", index_name, host);
        Ok(Self::new(client, api_key, &host, embedder))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
    }
}

async fn describe_index_host(client: &Client, api_key: &str, index_name: &str) -> Result<String, VectorStoreError> {
    let url = format!("{}/indexes/{}", PINECONE_CONTROL_URL, index_name);
    let response = client
        .get(&url)
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
        .send()
        .await?;
    let json = checked_json(response).await?;
    json.get("host")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| VectorStoreError::MalformedResponse(format!("index {} has no host", index_name)))
}

async fn checked_json(response: reqwest::Response) -> Result<Value, VectorStoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(VectorStoreError::Api { status: status.as_u16(), body });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl VectorStore for PineconeVectorStore {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>, VectorStoreError> {
        let vector = self.embedder.embed_query(query).await?;
        let body = json!({
            "vector": vector,
            "topK": k,
            "includeMetadata": true,
            "includeValues": false,
            "namespace": self.namespace,
        });
        let response = self
            .authorized(self.client.post(format!("{}/query", self.host)))
            .json(&body)
            .send()
            .await?;
        let json = checked_json(response).await?;
        let documents = parse_query_response(&json)?;
        debug!("Similarity search returned {} document(s)", documents.len());
        Ok(documents)
    }

    async fn add_documents(&self, documents: &[RetrievedDocument]) -> Result<Vec<String>, VectorStoreError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = documents.iter().map(|doc| doc.content.clone()).collect();
        let vectors = self.embedder.embed_documents(&texts).await?;

        let mut ids = Vec::with_capacity(documents.len());
        let records: Vec<Value> = documents
            .iter()
            .zip(vectors)
            .map(|(doc, values)| {
                let id = Uuid::new_v4().to_string();
                ids.push(id.clone());
                json!({ "id": id, "values": values, "metadata": upsert_metadata(doc) })
            })
            .collect();

        let response = self
            .authorized(self.client.post(format!("{}/vectors/upsert", self.host)))
            .json(&json!({ "vectors": records, "namespace": self.namespace }))
            .send()
            .await?;
        checked_json(response).await?;
        info!("Upserted {} vector(s)", ids.len());
        Ok(ids)
    }
}

fn upsert_metadata(doc: &RetrievedDocument) -> Map<String, Value> {
    let mut metadata = doc.metadata.clone();
    metadata.insert(TEXT_KEY.to_string(), Value::String(doc.content.clone()));
    metadata
}

fn parse_query_response(json: &Value) -> Result<Vec<RetrievedDocument>, VectorStoreError> {
    let matches = json
        .get("matches")
        .and_then(Value::as_array)
        .ok_or_else(|| VectorStoreError::MalformedResponse("missing matches array".to_string()))?;

    let mut documents = Vec::with_capacity(matches.len());
    for item in matches {
        let mut metadata = match item.get("metadata") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        match metadata.remove(TEXT_KEY) {
            Some(Value::String(content)) => documents.push(RetrievedDocument { content, metadata }),
            _ => warn!(
                "Skipping match {} without '{}' metadata",
                item.get("id").and_then(Value::as_str).unwrap_or("<unknown>"),
                TEXT_KEY
            ),
        }
    }
    Ok(documents)
}
