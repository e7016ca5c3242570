//! HTTP shell tests: the router is driven in-process with `tower::ServiceExt::oneshot`.

#![cfg(feature = "server")]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use textport::server::create_router;
use textport::PipelineConfig;
use tower::ServiceExt;

const BOUNDARY: &str = "textport-test-boundary";

fn multipart_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/extract-text")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(PipelineConfig::default())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn extract_text_upload() {
    let (status, body) = send(multipart_request("file", "a.txt", b"  hello\nworld  ")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "extractedText": "hello\nworld" }));
}

#[tokio::test]
async fn missing_file_field_is_400() {
    let (status, body) = send(multipart_request("other", "a.txt", b"hello")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No file uploaded" }));
}

#[tokio::test]
async fn non_multipart_upload_is_json_400() {
    let (status, body) = send(json_request("/api/extract-text", json!({ "file": "a.txt" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No file uploaded" }));
}

#[tokio::test]
async fn malformed_pdf_is_500_with_prefix() {
    let (status, body) = send(multipart_request("file", "x.pdf", b"garbage")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let msg = body["error"].as_str().unwrap();
    assert!(msg.starts_with("Extraction failed: "), "{msg}");
}

#[tokio::test]
async fn unsupported_extension_is_500() {
    let (status, body) = send(multipart_request("file", "file.xyz", b"data")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains(".xyz"));
}

#[tokio::test]
async fn convert_txt() {
    let (status, body) = send(json_request(
        "/api/convert",
        json!({ "text": "A\nB", "format": "txt", "filename": "report" }),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filename"], "report.txt");
    assert_eq!(body["mimeType"], "text/plain");
    let data = STANDARD.decode(body["fileData"].as_str().unwrap()).unwrap();
    assert_eq!(data, b"A\nB");
}

#[tokio::test]
async fn convert_pdf_and_doc() {
    for (format, mime) in [
        ("pdf", "application/pdf"),
        (
            "doc",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
    ] {
        let (status, body) = send(json_request(
            "/api/convert",
            json!({ "text": "hello", "format": format }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK, "{format}");
        assert_eq!(body["filename"], format!("output.{format}"));
        assert_eq!(body["mimeType"], mime);
    }
}

#[tokio::test]
async fn convert_unknown_format_is_500() {
    let (status, body) = send(json_request(
        "/api/convert",
        json!({ "text": "x", "format": "rtf", "filename": "x" }),
    ))
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Conversion failed: "));
}

#[tokio::test]
async fn convert_missing_text_is_400() {
    let (status, body) = send(json_request("/api/convert", json!({ "format": "txt" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No text provided" }));
}

#[tokio::test]
async fn convert_invalid_json_is_400() {
    let request = Request::post("/api/convert")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn health() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
