use actix_web::{web, HttpResponse};
use log::{error, info};
use serde_json::json;

use crate::error::AppError;
use crate::models::email_request::EmailRequest;
use crate::routes::app_state::AppState;

pub async fn handle_send_mail(
    data: web::Data<AppState>,
    req_body: web::Json<EmailRequest>,
) -> Result<HttpResponse, AppError> {
    let request = req_body.into_inner();

    match data.mail_service.send_transcript(&request).await {
        Ok(recipient) => {
            info!("Transcript for session {} sent to {}", request.session_id, recipient);
            Ok(HttpResponse::Ok().json(json!({ "message": format!("Email sent successfully to {}", recipient) })))
        }
        Err(e) => {
            let e = AppError::from(e);
            error!("Sending transcript for session {} failed ({}): {}", request.session_id, e.kind(), e);
            Err(e)
        }
    }
}
