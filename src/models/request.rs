use std::collections::HashSet;
use bytes::Bytes;
use once_cell::sync::Lazy;

/// Content types accepted for conversion. Compared as exact strings.
pub static ALLOWED_IMAGE_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["image/jpeg", "image/png", "image/gif", "image/bmp"]
        .into_iter()
        .collect()
});

/// One uploaded file, in upload order.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub file_name: String,
    pub content_type: String,
    pub content: Bytes,
}

impl ImageInput {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn has_allowed_type(&self) -> bool {
        ALLOWED_IMAGE_TYPES.contains(self.content_type.as_str())
    }
}
