use std::io::Write;

use flate2::{write::ZlibEncoder, Compression};
use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, ObjectId, Stream,
};

use crate::error::{AppError, AppResult};
use crate::services::geometry::PageGeometry;

const PDF_VERSION: &str = "1.5";
const IMAGE_RESOURCE: &[u8] = b"Im0";
const PRODUCER: &str = concat!("img2pdf ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRgb,
    DeviceGray,
}

impl ColorSpace {
    fn pdf_name(self) -> &'static str {
        match self {
            ColorSpace::DeviceRgb => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }
}

/// Opaque 8-bit pixels ready to be embedded as an image XObject.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub pixels: Vec<u8>,
}

impl PageImage {
    fn rgb(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            color_space: ColorSpace::DeviceRgb,
            pixels: img.into_raw(),
        }
    }

    fn gray(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            color_space: ColorSpace::DeviceGray,
            pixels: img.into_raw(),
        }
    }
}

/// Any alpha channel is dropped, not composited. Greyscale stays greyscale;
/// everything else becomes 8-bit RGB. 8-bit opaque buffers are moved, not copied.
impl From<DynamicImage> for PageImage {
    fn from(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageRgb8(rgb) => Self::rgb(rgb),
            DynamicImage::ImageLuma8(gray) => Self::gray(gray),
            other if other.color().has_color() => Self::rgb(other.to_rgb8()),
            other => Self::gray(other.to_luma8()),
        }
    }
}

/// Builds a PDF one full-bleed image page at a time.
///
/// Each `add_page` call writes a complete page before returning, so pages
/// never overlap. `finish` consumes the writer; a document is serialized once.
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Appends a page of `geometry` and draws `image` over all of it.
    pub fn add_page(&mut self, geometry: PageGeometry, image: &PageImage) -> AppResult<()> {
        let width = geometry.width as i64;
        let height = geometry.height as i64;

        let image_id = self.doc.add_object(encode_image(image)?);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![width.into(), 0.into(), 0.into(), height.into(), 0.into(), 0.into()],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        self.page_ids.push(page_id);

        tracing::debug!(
            page = self.page_ids.len(),
            width = geometry.width,
            height = geometry.height,
            "Page appended"
        );

        Ok(())
    }

    /// Closes the page tree and serializes the document.
    pub fn finish(mut self) -> AppResult<Vec<u8>> {
        if self.page_ids.is_empty() {
            return Err(AppError::assembly("document has no pages"));
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| AppError::assembly(format!("failed to serialize PDF: {}", e)))?;

        Ok(buffer)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_image(image: &PageImage) -> AppResult<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&image.pixels)
        .map_err(|e| AppError::assembly(format!("failed to compress image data: {}", e)))?;
    let compressed = encoder
        .finish()
        .map_err(|e| AppError::assembly(format!("failed to finish compression: {}", e)))?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width as i64,
        "Height" => image.height as i64,
        "ColorSpace" => image.color_space.pdf_name(),
        "BitsPerComponent" => 8_i64,
        "Filter" => "FlateDecode",
    };

    Ok(Stream::new(dict, compressed))
}
