use crate::error::{BlockchainError, Result};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::json;

impl ResponseError for BlockchainError {
    fn status_code(&self) -> StatusCode {
        match self {
            BlockchainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BlockchainError::Authentication(_)
            | BlockchainError::Serialization(_)
            | BlockchainError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            BlockchainError::NotFound(_) => StatusCode::NOT_FOUND,
            BlockchainError::PeerUnreachable { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            BlockchainError::Validation(fields) => json!({ "error": fields }),
            other => json!({ "error": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Malformed JSON bodies answer like every other serialization failure
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        BlockchainError::Serialization(err.to_string()).into()
    })
}

/// Run ledger or peer work on the blocking pool, off the async workers
pub async fn run_blocking<F, R>(work: F) -> Result<R>
where
    F: FnOnce() -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    web::block(work)
        .await
        .map_err(|e| BlockchainError::Io(format!("Blocking task failed: {e}")))?
}
