use actix_web::{get, post, web, Responder};

use crate::models::query_request::QueryRequest;
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(greet).service(answer_query);
}

#[get("/")]
async fn greet() -> impl Responder {
    crate::handlers::chat_handler::greet().await
}

#[post("/query")]
async fn answer_query(
    data: web::Data<AppState>,
    req_body: web::Json<QueryRequest>,
) -> impl Responder {
    crate::handlers::chat_handler::handle_query(data, req_body).await
}
