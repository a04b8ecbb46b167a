pub mod chat_handler;
pub mod mail_handler;
