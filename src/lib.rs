//! img2pdf
//!
//! A small HTTP service that turns a batch of uploaded images into a single
//! PDF, one full-bleed page per image, each page sized to its image's aspect
//! ratio within a US Letter bound.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::create_router;
pub use services::PdfConverter;
