use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned to clients for any failure whose details stay server-side.
pub const GENERIC_FAILURE_MESSAGE: &str = "Extraction failed";

/// Wire shape of every error response: `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Extraction failed")]
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),
}

impl ScanError {
    pub fn status(&self) -> StatusCode {
        match self {
            ScanError::Validation(_) => StatusCode::BAD_REQUEST,
            ScanError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ScanError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ScanError::OcrUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ScanError::Processing(_)
            | ScanError::Http(_)
            | ScanError::Json(_)
            | ScanError::Io(_)
            | ScanError::Internal(_)
            | ScanError::Ocr(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show a client. Internal failures collapse to
    /// [`GENERIC_FAILURE_MESSAGE`].
    pub fn public_message(&self) -> String {
        match self {
            ScanError::Validation(msg)
            | ScanError::PayloadTooLarge(msg)
            | ScanError::UnsupportedMedia(msg)
            | ScanError::OcrUnavailable(msg) => msg.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(ErrorBody {
            error: self.public_message(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
