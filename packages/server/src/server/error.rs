//! HTTP error mapping.
//!
//! Every failure leaves the server as `{"error": "..."}`. Internal errors
//! are logged and masked.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pitch_extraction::{CrawlError, DocumentError, ExtractionError};
use serde::Serialize;
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error body returned by every route.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors a handler can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ExtractionError::Document(doc) => match doc {
                DocumentError::TooLarge { .. } => ApiError::PayloadTooLarge(doc.to_string()),
                DocumentError::InvalidBase64(_) => ApiError::BadRequest(doc.to_string()),
                DocumentError::InsufficientText { .. } => ApiError::Unprocessable(doc.to_string()),
            },
            ExtractionError::Crawl(crawl) => match crawl {
                CrawlError::Security(_) | CrawlError::InvalidUrl { .. } => {
                    ApiError::BadRequest(crawl.to_string())
                }
                CrawlError::Timeout { .. } => ApiError::Timeout(crawl.to_string()),
                CrawlError::Http(_) | CrawlError::Status { .. } => {
                    ApiError::BadGateway(crawl.to_string())
                }
            },
            ExtractionError::AI(_) => ApiError::BadGateway(err.to_string()),
            ExtractionError::Timeout { .. } => ApiError::Timeout(err.to_string()),
            ExtractionError::JsonParse(_) | ExtractionError::Config(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("Request body is too large".to_string())
        } else {
            ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                INTERNAL_MESSAGE.to_string()
            }
            other => {
                tracing::warn!(status = status.as_u16(), error = %other, "Request rejected");
                other.to_string()
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
