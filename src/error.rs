use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Failure talking to a remote cloud function.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Failure obtaining a sentiment label.
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("classifier unavailable (HTTP {status})")]
    Unavailable { status: u16 },

    #[error("malformed classifier response: {0}")]
    Malformed(String),

    #[error("unknown sentiment label `{0}`")]
    UnknownLabel(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid car ID")]
    InvalidCar(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCar(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // internals stay in the log
            AppError::Database(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).body(body)
    }
}
