use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    Config(String),
    NotFound(String),
    Internal(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Config(msg) => write!(f, "Configuration error: {msg}"),
            HostError::NotFound(msg) => write!(f, "Not found: {msg}"),
            HostError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

impl ResponseError for HostError {
    fn status_code(&self) -> StatusCode {
        match self {
            HostError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
            HostError::NotFound(_) => StatusCode::NOT_FOUND,
            HostError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, message) = match self {
            HostError::Config(msg) => ("Service not configured", msg),
            HostError::NotFound(msg) => ("Not found", msg),
            HostError::Internal(msg) => ("Internal server error", msg),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": error,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}

impl From<serde_json::Error> for HostError {
    fn from(err: serde_json::Error) -> Self {
        HostError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for HostError {
    fn from(err: anyhow::Error) -> Self {
        HostError::Internal(err.to_string())
    }
}
