use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::{info, warn};

use JellyChatAgent::config::{self, AppConfig};
use JellyChatAgent::models::vector_database::PineconeVectorStore;
use JellyChatAgent::routes::{self, app_state::AppState};
use JellyChatAgent::services::chat_service::AnswerService;
use JellyChatAgent::services::embedding_service::OpenAiEmbeddings;
use JellyChatAgent::services::history_service::RedisChatHistory;
use JellyChatAgent::services::llm_service::OpenAiCompatibleChat;
use JellyChatAgent::services::mail_service::{DisabledMailRelay, MailRelay, MailService, SmtpMailRelay};

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
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
    .await
    .context("failed to reach the vector index")?;

    let model = OpenAiCompatibleChat::new(http, &config.groq_api_base, &config.groq_api_key, &config.chat_model);
    info!("Using chat model {}", model.model());

    let history = RedisChatHistory::connect(&config.redis_url, config.history_ttl_seconds)
        .await
        .context("failed to connect to the history store")?;

    let relay: Arc<dyn MailRelay> = match &config.mail {
        Some(settings) => Arc::new(SmtpMailRelay::new(settings).context("invalid mail settings")?),
        None => {
            warn!("SENDER/PASSWORD/RECIPENT not set; /sendMail will fail until they are configured");
            Arc::new(DisabledMailRelay)
        }
    };

    Ok(AppState {
        answer_service: Arc::new(AnswerService::new(Arc::new(store), Arc::new(model), Arc::new(history))),
        mail_service: Arc::new(MailService::new(relay)),
    })
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    config::init_logging();

    let config = AppConfig::from_env()?;
    info!("Configuration loaded: {:?}", config);

    let state = build_state(&config).await?;

    info!("Starting server on http://{}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(routes::cors())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::init_routes)
    })
    .bind(&config.bind_address)?
    .run()
    .await?;

    Ok(())
}
