use std::sync::Arc;

use crate::services::chat_service::AnswerService;
use crate::services::mail_service::MailService;

/// Long-lived service clients shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub answer_service: Arc<AnswerService>,
    pub mail_service: Arc<MailService>,
}
