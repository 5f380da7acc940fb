use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::TermKey;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown term: {0}")]
    UnknownTerm(TermKey),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    pub fn log_safe(&self) -> String {
        match self {
            Error::UnknownTerm(term) => format!("Unknown term: {term}"),
            Error::Search(msg) => format!("Search error: {msg}"),
            Error::Tantivy(_) => "Search index error".to_string(),
            // Snapshot payloads may be large; never echo them
            Error::Json(_) => "Course snapshot could not be decoded".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::Validation(msg) => format!("Validation error: {msg}"),
            Error::Internal(msg) => format!("Internal error: {msg}"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        let (status, error_message) = match &self {
            Error::UnknownTerm(term) => (StatusCode::NOT_FOUND, format!("Unknown term: {term}")),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Search(_) | Error::Tantivy(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Search error".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_term_maps_to_not_found() {
        let err = Error::UnknownTerm(TermKey::new("25", "fall"));
        assert_eq!(err.to_string(), "Unknown term: 25 fall");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = Error::Validation("Missing 'year'".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
