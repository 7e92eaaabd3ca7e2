//! Integration tests for the img2pdf HTTP service

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
use img2pdf::{config::Config, create_router};
use lopdf::Document;
use serde_json::Value;
use std::io::Cursor;
use tower::ServiceExt;

const BOUNDARY: &str = "img2pdf-test-boundary";

struct Part<'a> {
    name: &'a str,
    file_name: &'a str,
    content_type: Option<&'a str>,
    data: Vec<u8>,
}

impl<'a> Part<'a> {
    fn file(file_name: &'a str, content_type: &'a str, data: Vec<u8>) -> Self {
        Self {
            name: "files",
            file_name,
            content_type: Some(content_type),
            data,
        }
    }
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, part.file_name
            )
            .as_bytes(),
        );
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn encode(img: DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([30, 90, 160]))),
        ImageOutputFormat::Jpeg(85),
    )
}

fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([250, 20, 20, 60]))),
        ImageOutputFormat::Png,
    )
}

fn app() -> Router {
    create_router(&Config::default())
}

async fn post_files(app: Router, parts: &[Part<'_>]) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri("/convert-to-pdf")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();

    app.oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn json_body(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn page_sizes(pdf: &[u8]) -> Vec<(i64, i64)> {
    let doc = Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .values()
        .map(|id| {
            let media_box = doc
                .get_object(*id)
                .unwrap()
                .as_dict()
                .unwrap()
                .get(b"MediaBox")
                .unwrap()
                .as_array()
                .unwrap()
                .clone();
            (media_box[2].as_i64().unwrap(), media_box[3].as_i64().unwrap())
        })
        .collect()
}

#[tokio::test]
async fn test_convert_returns_pdf_attachment() {
    let parts = [
        Part::file("landscape.jpg", "image/jpeg", jpeg(800, 600)),
        Part::file("portrait.png", "image/png", rgba_png(600, 900)),
    ];

    let response = post_files(app(), &parts).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=converted.pdf"
    );
    assert!(response.headers().contains_key("x-request-id"));

    let pdf = body_bytes(response).await;
    assert!(pdf.starts_with(b"%PDF"));
    assert_eq!(page_sizes(&pdf), vec![(612, 459), (528, 792)]);
}

#[tokio::test]
async fn test_other_fields_are_ignored() {
    let parts = [
        Part {
            name: "comment",
            file_name: "notes.txt",
            content_type: Some("text/plain"),
            data: b"ignored".to_vec(),
        },
        Part::file("square.jpg", "image/jpeg", jpeg(50, 50)),
    ];

    let response = post_files(app(), &parts).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(page_sizes(&body_bytes(response).await), vec![(612, 612)]);
}

#[tokio::test]
async fn test_unsupported_type_is_bad_request() {
    let parts = [
        Part::file("photo.jpg", "image/jpeg", jpeg(80, 60)),
        Part::file("notes.txt", "text/plain", b"hello".to_vec()),
    ];

    let response = post_files(app(), &parts).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNSUPPORTED_FILE_TYPE");
    assert_eq!(
        body["error"]["message"],
        "Unsupported file type: text/plain for notes.txt"
    );
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let parts = [Part {
        name: "files",
        file_name: "mystery.bin",
        content_type: None,
        data: jpeg(10, 10),
    }];

    let response = post_files(app(), &parts).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "UNSUPPORTED_FILE_TYPE");
}

#[tokio::test]
async fn test_corrupt_image_is_server_error_naming_file() {
    let parts = [
        Part::file("good.jpg", "image/jpeg", jpeg(80, 60)),
        Part::file("corrupt.png", "image/png", b"\x89PNG\r\n\x1a\ngarbage".to_vec()),
    ];

    let response = post_files(app(), &parts).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "DECODE_ERROR");
    assert_eq!(body["error"]["message"], "Failed to process corrupt.png");
}

#[tokio::test]
async fn test_error_body_carries_response_request_id() {
    let parts = [Part::file("corrupt.png", "image/png", b"not a png".to_vec())];

    let response = post_files(app(), &parts).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let header = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body = json_body(response).await;
    assert_eq!(body["error"]["request_id"], header.as_str());
}

#[tokio::test]
async fn test_upload_without_files_is_bad_request() {
    let parts = [Part {
        name: "comment",
        file_name: "notes.txt",
        content_type: Some("text/plain"),
        data: b"no images here".to_vec(),
    }];

    let response = post_files(app(), &parts).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "MISSING_FILE");
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let config = Config {
        max_upload_size_mb: 1,
        ..Config::default()
    };
    let parts = [Part::file("huge.bmp", "image/bmp", vec![0u8; 2 * 1024 * 1024])];

    let response = post_files(create_router(&config), &parts).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json_body(response).await["error"]["code"], "UPLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_index_serves_upload_page() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("/convert-to-pdf"));
    assert!(html.contains("converted.pdf"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "img2pdf");
}
