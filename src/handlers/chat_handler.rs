use actix_web::{web, HttpResponse};
use log::{error, info};

use crate::config::GREETING;
use crate::error::AppError;
use crate::models::query_request::QueryRequest;
use crate::routes::app_state::AppState;

pub async fn greet() -> HttpResponse {
    HttpResponse::Ok().json(GREETING)
}

pub async fn handle_query(
    data: web::Data<AppState>,
    req_body: web::Json<QueryRequest>,
) -> Result<HttpResponse, AppError> {
    let request = req_body.into_inner();
    info!("Processing query for session {}: {}", request.session_id, request.query);

    match data.answer_service.answer(&request).await {
        Ok(reply) => Ok(HttpResponse::Ok().json(reply)),
        Err(e) => {
            error!("Query failed for session {} ({}): {}", request.session_id, e.kind(), e);
            Err(e)
        }
    }
}
