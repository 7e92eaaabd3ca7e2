pub mod converter;
pub mod geometry;
pub mod pdf_writer;

pub use converter::PdfConverter;
pub use geometry::{PageGeometry, PageSize};
pub use pdf_writer::{ColorSpace, PageImage, PdfWriter};
