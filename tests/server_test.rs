mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use certverify::config::Config;
use certverify::engines::EngineInfo;
use certverify::server::{router, AppState};
use certverify::verification::report;
use certverify::verification::{TextExtractor, Verifier};
use common::{blank_page, png_bytes, StubEngine};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "certverify-test-boundary";

fn app_with(engine: StubEngine, config: Config) -> Router {
    let info = EngineInfo::of(&engine);
    let extractor = TextExtractor::new(Arc::new(engine));
    router(AppState {
        verifier: Arc::new(Verifier::new(extractor)),
        engines: Arc::new(vec![info]),
        config: Arc::new(config),
    })
}

fn app(text: &str) -> Router {
    app_with(StubEngine::reading(text), Config::default())
}

fn multipart_request(uri: &str, field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"certificate.png\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, json) = send_json(app(""), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(!json["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_info_endpoint() {
    let request = Request::get("/info").body(Body::empty()).unwrap();
    let (status, json) = send_json(app(""), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["engine"], "stub");
    assert_eq!(json["available_engines"][0]["name"], "stub");
    assert_eq!(json["thresholds"]["max_score"], 10);
    assert_eq!(json["thresholds"]["proceed_from"], 7);
    assert_eq!(json["thresholds"]["review_from"], 5);
}

#[tokio::test]
async fn test_verify_returns_report() {
    let app = app("Certificate of Birth\nRegistration 4471902B");
    let request = multipart_request("/verify", "file", "image/png", &png_bytes(&blank_page()));
    let (status, json) = send_json(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["document_type"], "certificate_of_birth");
    assert_eq!(json["document_type_label"], "Certificate of Birth");
    assert_eq!(json["serial_number"], "4471902B");
    assert_eq!(json["seal"]["verdict"], "not_detected");
    assert_eq!(json["pixelation"]["verdict"], "high_pixelation");
    assert_eq!(json["score"], 5);
    assert_eq!(json["max_score"], 10);
    assert_eq!(json["recommendation"], "hold_for_review");
    assert_eq!(json["engine"], "stub");
    assert!(json["report_text"]
        .as_str()
        .unwrap()
        .contains("Final Confidence Score: 5/10\n"));
}

#[tokio::test]
async fn test_verify_without_serial_reports_null() {
    let request = multipart_request("/verify", "file", "image/png", &png_bytes(&blank_page()));
    let (status, json) = send_json(app("smudged"), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["serial_number"].is_null());
    assert_eq!(json["score"], 0);
    assert_eq!(json["recommendation"], "high_fraud_risk");
}

#[tokio::test]
async fn test_report_download_matches_inline_report() {
    let text = "Certified Transcript of Birth";
    let bytes = png_bytes(&blank_page());

    let (_, json) = send_json(
        app(text),
        multipart_request("/verify", "file", "image/png", &bytes),
    )
    .await;
    let (status, headers, body) = send(
        app(text),
        multipart_request("/verify/report", "file", "image/png", &bytes),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_TYPE].to_str().unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        headers[header::CONTENT_DISPOSITION].to_str().unwrap(),
        "attachment; filename=\"validation_report.txt\""
    );

    let downloaded = String::from_utf8(body).unwrap();
    assert_eq!(downloaded, json["report_text"].as_str().unwrap());

    let fields = report::parse(&downloaded).unwrap();
    assert_eq!(fields.score, 3);
}

#[tokio::test]
async fn test_missing_file_is_bad_request() {
    let request = multipart_request("/verify", "document", "image/png", b"ignored");
    let (status, json) = send_json(app(""), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_FILE");
}

#[tokio::test]
async fn test_undecodable_image_is_bad_request() {
    let request = multipart_request("/verify", "file", "image/jpeg", b"not really a jpeg");
    let (status, json) = send_json(app(""), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_IMAGE");
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let config = Config {
        max_file_size: 64,
        ..Config::default()
    };
    let app = app_with(StubEngine::reading(""), config);
    let request = multipart_request("/verify", "file", "image/png", &[0u8; 512]);
    let (status, json) = send_json(app, request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["code"], "IMAGE_TOO_LARGE");
}

#[tokio::test]
async fn test_upload_beyond_body_limit_is_payload_too_large() {
    let config = Config {
        max_file_size: 64,
        ..Config::default()
    };
    let app = app_with(StubEngine::reading(""), config);
    let request = multipart_request("/verify", "file", "image/png", &vec![0u8; 200 * 1024]);
    let (status, json) = send_json(app, request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["code"], "IMAGE_TOO_LARGE");
}
