use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Upload exceeds the request body limit (max file size: {max} bytes)")]
    UploadTooLarge { max: usize },

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Malformed report: {0}")]
    MalformedReport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VerifyError {
    /// Stable machine-readable code returned in error bodies
    pub fn code(&self) -> &'static str {
        match self {
            VerifyError::EngineUnavailable(_) => "ENGINE_UNAVAILABLE",
            VerifyError::OcrFailed(_) => "OCR_FAILED",
            VerifyError::InvalidImage(_) => "INVALID_IMAGE",
            VerifyError::ImageTooLarge { .. } | VerifyError::UploadTooLarge { .. } => {
                "IMAGE_TOO_LARGE"
            }
            VerifyError::MissingFile => "MISSING_FILE",
            VerifyError::InvalidRequest(_) => "INVALID_REQUEST",
            VerifyError::MalformedReport(_) => "MALFORMED_REPORT",
            VerifyError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            VerifyError::EngineUnavailable(_)
            | VerifyError::OcrFailed(_)
            | VerifyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            VerifyError::ImageTooLarge { .. } | VerifyError::UploadTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            VerifyError::InvalidImage(_)
            | VerifyError::MissingFile
            | VerifyError::InvalidRequest(_)
            | VerifyError::MalformedReport(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}
