use actix_web::{HttpResponse, http::StatusCode};
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

/// Failures surfaced by the entity stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not open a database connection: {0}")]
    Connection(#[from] r2d2::Error),
    #[error("record not found")]
    NotFound,
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Request-level failures, each mapped onto one HTTP response shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("database connection error")]
    Connection(#[source] r2d2::Error),
    #[error("error writing to file storage")]
    Storage(#[source] std::io::Error),
    #[error("upload exceeds the configured size limit")]
    PayloadTooLarge,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Map a store failure, labelling NOT-FOUND with the entity it concerns.
    pub fn from_store(err: StoreError, what: &str) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound(what.to_string()),
            other => other.into(),
        }
    }

    fn cause(&self) -> Option<String> {
        match self {
            ApiError::Connection(e) => Some(e.to_string()),
            ApiError::Storage(e) => Some(e.to_string()),
            ApiError::Internal(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection(e) => ApiError::Connection(e),
            StoreError::NotFound => ApiError::NotFound("record".to_string()),
            StoreError::Query(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Connection(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // 5xx bodies carry the underlying cause; 4xx bodies only the message
        let body = match self.cause() {
            Some(cause) if status.is_server_error() => {
                error!("{self}: {cause}");
                json!({ "message": self.to_string(), "error": cause })
            }
            _ => {
                warn!("{self}");
                json!({ "message": self.to_string() })
            }
        };
        HttpResponse::build(status).json(body)
    }
}
