pub mod chat_turn;
pub mod email_request;
pub mod query_request;
pub mod retrieved_document;
pub mod vector_database;
