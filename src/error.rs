use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde_json::json;

use crate::models::vector_database::VectorStoreError;
use crate::services::history_service::HistoryError;
use crate::services::llm_service::LlmError;
use crate::services::mail_service::MailError;

/// Any failure of a downstream collaborator while serving a request. Every
/// variant is reported to the caller as a 500 whose `detail` is the
/// underlying error text; the variant only shows up in logs.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Retrieval(#[from] VectorStoreError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Model(#[from] LlmError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Retrieval(VectorStoreError::Embedding(_)) => "embedding",
            AppError::Retrieval(_) => "retrieval",
            AppError::History(_) => "history",
            AppError::Model(_) => "model",
            AppError::Mail(_) => "mail",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}

/// Body validation failures get a 422 with the parser's message as `detail`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = err.to_string();
    log::warn!("Rejected request body: {}", detail);
    actix_web::error::InternalError::from_response(
        err,
        HttpResponse::UnprocessableEntity().json(json!({ "detail": detail })),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::embedding_service::EmbeddingError;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_error_response_carries_detail() {
        let err = AppError::from(MailError::NotConfigured);
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "detail": MailError::NotConfigured.to_string() }));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(AppError::from(LlmError::EmptyResponse).kind(), "model");
        assert_eq!(AppError::from(HistoryError::Corrupt("x".into())).kind(), "history");
        assert_eq!(AppError::from(VectorStoreError::MissingMetadata("original_content")).kind(), "retrieval");
    }

    #[test]
    fn test_embedding_failure_has_its_own_label() {
        let err = AppError::from(VectorStoreError::from(EmbeddingError::MalformedResponse("no data".into())));
        assert_eq!(err.kind(), "embedding");
        assert_eq!(err.to_string(), EmbeddingError::MalformedResponse("no data".into()).to_string());
    }
}
