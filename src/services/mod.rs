pub mod chat_service;
pub mod embedding_service;
pub mod history_service;
pub mod ingest_service;
pub mod llm_service;
pub mod mail_service;
pub mod prompt_service;
pub mod retrieval_service;
