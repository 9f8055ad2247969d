//! Error types for the Abovesaid server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::html::HtmlError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
            AppError::Json(e) => {
                tracing::error!("Stored highlights are not valid JSON: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "serialization_error",
                    "Failed to read stored highlights".to_string(),
                )
            }
            AppError::Html(e) => (StatusCode::BAD_REQUEST, "invalid_html", e.to_string()),
            AppError::Analysis(e) => {
                let (status, error_type) = match e {
                    AnalysisError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
                    AnalysisError::PayloadTooLarge => {
                        (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
                    }
                    AnalysisError::NotConfigured(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "not_configured")
                    }
                    AnalysisError::InsufficientText { .. } => {
                        (StatusCode::BAD_REQUEST, "insufficient_text")
                    }
                    AnalysisError::Unknown(_) => {
                        tracing::error!("Analysis failed: {}", e);
                        (StatusCode::BAD_GATEWAY, "analysis_failed")
                    }
                };
                (status, error_type, e.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
