use actix_web::{post, web, Responder};

use crate::models::email_request::EmailRequest;
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(send_mail);
}

#[post("/sendMail")]
async fn send_mail(
    data: web::Data<AppState>,
    req_body: web::Json<EmailRequest>,
) -> impl Responder {
    crate::handlers::mail_handler::handle_send_mail(data, req_body).await
}
