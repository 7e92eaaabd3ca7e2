use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::current_request_id;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported file type: {content_type} for {file_name}")]
    UnsupportedFileType { file_name: String, content_type: String },

    #[error("No image files were uploaded")]
    MissingFile,

    #[error("Invalid upload: {message}")]
    InvalidUpload { message: String },

    #[error("Upload exceeds limit of {limit_mb}MB")]
    UploadTooLarge { limit_mb: usize },

    #[error("Failed to process {file_name}: {reason}")]
    DecodeFailed { file_name: String, reason: String },

    #[error("PDF generation failed: {message}")]
    Assembly { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            AppError::MissingFile => "MISSING_FILE",
            AppError::InvalidUpload { .. } => "INVALID_UPLOAD",
            AppError::UploadTooLarge { .. } => "UPLOAD_TOO_LARGE",
            AppError::DecodeFailed { .. } => "DECODE_ERROR",
            AppError::Assembly { .. } => "PDF_GENERATION_FAILED",
            AppError::Internal { .. } => "INTERNAL_ERROR",
            AppError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFileType { .. } => StatusCode::BAD_REQUEST,
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::InvalidUpload { .. } => StatusCode::BAD_REQUEST,
            AppError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::DecodeFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Assembly { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client. Decoder and writer internals stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::DecodeFailed { file_name, .. } => format!("Failed to process {}", file_name),
            AppError::Assembly { .. } => "PDF generation failed".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.public_message();
        let request_id = current_request_id();
        let timestamp = chrono::Utc::now().to_rfc3339();

        tracing::error!(
            error_code = error_code,
            status_code = %status,
            request_id = %request_id,
            error_message = %self,
            "API error occurred"
        );

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
                "request_id": request_id,
                "timestamp": timestamp
            },
            "data": null
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::Assembly {
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::internal(format!("Conversion task failed: {}", err))
    }
}

impl AppError {
    pub fn unsupported_type(file_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        AppError::UnsupportedFileType {
            file_name: file_name.into(),
            content_type: content_type.into(),
        }
    }

    pub fn decode(file_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        AppError::DecodeFailed {
            file_name: file_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn assembly(message: impl Into<String>) -> Self {
        AppError::Assembly {
            message: message.into(),
        }
    }

    pub fn invalid_upload(message: impl Into<String>) -> Self {
        AppError::InvalidUpload {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::ConfigError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}
