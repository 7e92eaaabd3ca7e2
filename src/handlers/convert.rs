use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::middleware::current_request_id;
use crate::models::{ImageInput, PdfAttachment};

/// Multipart field carrying the images; repeated once per file.
pub const FILES_FIELD: &str = "files";

pub async fn convert_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<PdfAttachment> {
    let start = Instant::now();
    let request_id = current_request_id();

    info!(request_id = %request_id, "Starting image to PDF conversion request");

    let images = match collect_images(&mut multipart, state.max_upload_size_mb).await {
        Ok(images) => {
            info!(
                request_id = %request_id,
                file_count = images.len(),
                total_bytes = images.iter().map(ImageInput::size).sum::<usize>(),
                "Images extracted from multipart form"
            );
            images
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Failed to read uploaded images");
            return Err(e);
        }
    };

    let converter = state.converter;
    let pdf = match tokio::task::spawn_blocking(move || converter.convert(&images)).await? {
        Ok(pdf) => pdf,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "PDF conversion failed");
            return Err(e);
        }
    };

    info!(
        request_id = %request_id,
        pdf_size = pdf.len(),
        total_time_ms = start.elapsed().as_millis() as u64,
        "Request completed successfully"
    );

    Ok(PdfAttachment::new(pdf))
}

async fn collect_images(multipart: &mut Multipart, limit_mb: usize) -> AppResult<Vec<ImageInput>> {
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit_mb))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != FILES_FIELD {
            debug!(field = %field_name, "Ignoring unexpected multipart field");
            continue;
        }

        let file_name = field.file_name().unwrap_or("unknown").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();

        let data = field.bytes().await.map_err(|e| multipart_error(e, limit_mb))?;

        debug!(
            "Received file: {} ({} bytes, type: {:?})",
            file_name,
            data.len(),
            content_type
        );

        images.push(ImageInput::new(file_name, content_type, data));
    }

    Ok(images)
}

fn multipart_error(err: MultipartError, limit_mb: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge { limit_mb }
    } else {
        AppError::invalid_upload(format!("Failed to read multipart body: {}", err.body_text()))
    }
}
