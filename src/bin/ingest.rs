//! Populates the vector index from a directory of plain-text documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use log::{info, warn};

use JellyChatAgent::config::{self, AppConfig, SUMMARY_MODEL};
use JellyChatAgent::models::vector_database::PineconeVectorStore;
use JellyChatAgent::services::embedding_service::OpenAiEmbeddings;
use JellyChatAgent::services::ingest_service::Ingestor;
use JellyChatAgent::services::llm_service::OpenAiCompatibleChat;

#[derive(Parser, Debug)]
#[command(about = "Summarize documents and upsert them into the vector index")]
struct Args {
    /// Directory containing `.txt` or `.md` documents, one document per file.
    dir: PathBuf,

    /// Chat model used to write the summaries that get embedded.
    #[arg(long, default_value = SUMMARY_MODEL)]
    summary_model: String,

    /// Number of documents upserted per request.
    #[arg(long, default_value_t = 32)]
    batch_size: usize,
}

fn read_documents(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("cannot read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(path.extension().and_then(|ext| ext.to_str()), Some("txt") | Some("md"))
        })
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))?;
        if text.trim().is_empty() {
            warn!("Skipping empty document {}", path.display());
            continue;
        }
        documents.push(text);
    }
    Ok(documents)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::init_logging();
    let args = Args::parse();
    let config = AppConfig::from_env()?;

    let documents = read_documents(&args.dir)?;
    if documents.is_empty() {
        bail!("no documents found in {}", args.dir.display());
    }
    info!("Loaded {} document(s) from {}", documents.len(), args.dir.display());

    let http = reqwest::Client::new();
    let embeddings = OpenAiEmbeddings::new(
        http.clone(),
        &config.openai_api_base,
        &config.openai_api_key,
        &config.embedding_model,
    );
    let store = PineconeVectorStore::connect(
        http.clone(),
        &config.pinecone_api_key,
        &config.pinecone_index_name,
        config.pinecone_index_host.as_deref(),
        Arc::new(embeddings),
    )
    .await?;
    let summarizer = OpenAiCompatibleChat::new(http, &config.openai_api_base, &config.openai_api_key, &args.summary_model);

    let ingestor = Ingestor::new(Arc::new(summarizer), Arc::new(store), args.batch_size);
    let ids = ingestor.ingest(&documents).await?;
    info!("Indexed {} document(s) into {}", ids.len(), config.pinecone_index_name);
    Ok(())
}
