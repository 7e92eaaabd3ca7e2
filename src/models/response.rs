use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

pub const PDF_FILE_NAME: &str = "converted.pdf";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub service: String,
}

/// Finished PDF returned as a download.
#[derive(Debug)]
pub struct PdfAttachment {
    pub content: Vec<u8>,
}

impl PdfAttachment {
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }
}

impl IntoResponse for PdfAttachment {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", PDF_FILE_NAME),
                ),
            ],
            self.content,
        )
            .into_response()
    }
}
