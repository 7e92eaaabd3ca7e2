use std::time::Instant;

use image::GenericImageView;

use crate::error::{AppError, AppResult};
use crate::models::ImageInput;
use crate::services::geometry::{PageGeometry, PageSize};
use crate::services::pdf_writer::{PageImage, PdfWriter};

/// Turns an ordered batch of uploaded images into one PDF, one page per image.
#[derive(Debug, Clone, Copy)]
pub struct PdfConverter {
    reference: PageSize,
}

impl PdfConverter {
    pub fn new() -> Self {
        Self {
            reference: PageSize::LETTER,
        }
    }

    /// Converts `images` into PDF bytes.
    ///
    /// All declared types are checked before anything is decoded. Any failure
    /// aborts the whole batch; no partial document is ever returned.
    pub fn convert(&self, images: &[ImageInput]) -> AppResult<Vec<u8>> {
        let start = Instant::now();

        validate_types(images)?;

        let mut writer = PdfWriter::new();

        for input in images {
            let decoded = image::load_from_memory(&input.content).map_err(|e| {
                tracing::error!(
                    file_name = %input.file_name,
                    error = %e,
                    "Error processing image"
                );
                AppError::decode(&input.file_name, e)
            })?;

            let (image_width, image_height) = decoded.dimensions();
            let geometry = PageGeometry::fit(image_width, image_height, self.reference)
                .ok_or_else(|| AppError::decode(&input.file_name, "image has no pixels"))?;

            let page_image = PageImage::from(decoded);

            tracing::debug!(
                file_name = %input.file_name,
                image_width = page_image.width,
                image_height = page_image.height,
                page_width = geometry.width,
                page_height = geometry.height,
                "Image decoded"
            );

            writer.add_page(geometry, &page_image)?;
        }

        let pages = writer.page_count();
        let pdf = writer.finish()?;

        tracing::info!(
            pages = pages,
            pdf_size = pdf.len(),
            processing_time_ms = start.elapsed().as_millis() as u64,
            "PDF assembled"
        );

        Ok(pdf)
    }
}

impl Default for PdfConverter {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_types(images: &[ImageInput]) -> AppResult<()> {
    if images.is_empty() {
        return Err(AppError::MissingFile);
    }

    match images.iter().find(|input| !input.has_allowed_type()) {
        Some(input) => {
            tracing::warn!(
                file_name = %input.file_name,
                content_type = %input.content_type,
                "Rejecting unsupported file type"
            );
            Err(AppError::unsupported_type(&input.file_name, &input.content_type))
        }
        None => Ok(()),
    }
}
