//! Typed errors and HTTP mapping.

use crate::response::Envelope;
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid schema name: '{0}'")]
    InvalidSchema(String),
    #[error("unknown store backend: '{0}'")]
    UnknownBackend(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Request body or identifier could not be parsed.
    #[error("{0}")]
    MalformedInput(String),
    /// The backing store failed; the message is passed through unchanged.
    #[error("{0}")]
    Persistence(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::MalformedInput(e.to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::MalformedInput(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            AppError::Persistence(_) => {
                tracing::warn!(error = %self, "persistence failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(Envelope::error(self.to_string()))).into_response()
    }
}
