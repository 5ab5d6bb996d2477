//! End-to-end tests of the web application with a scripted inference engine.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use banaclass::core::config::ServerConfig;
use banaclass::core::traits::InferenceEngine;
use banaclass::core::{BanaError, BanaResult, Tensor2D, Tensor4D};
use banaclass::models::BananaClassifierBuilder;
use banaclass::pipeline::InferencePipeline;
use banaclass::server::render::{INPUT_ERROR_MESSAGE, INTERNAL_ERROR_MESSAGE, REJECTION_MESSAGE};
use banaclass::server::{State, construct_router};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const BOUNDARY: &str = "banaclass-test-boundary";
const KEPOK: [f32; 5] = [0.05, 0.03, 0.02, 0.85001, 0.04999];
const FLAT: [f32; 5] = [0.2; 5];

/// Returns whatever row the test put in `row`; `None` makes inference fail.
#[derive(Debug, Clone)]
struct ScriptedEngine {
    row: Arc<Mutex<Option<[f32; 5]>>>,
}

impl InferenceEngine for ScriptedEngine {
    fn infer(&self, input: &Tensor4D) -> BanaResult<Tensor2D> {
        let Some(row) = *self.row.lock().unwrap() else {
            return Err(BanaError::inference_message("scripted", "session crashed"));
        };
        let batch = input.shape()[0];
        let data: Vec<f32> = (0..batch).flat_map(|_| row).collect();
        Ok(Tensor2D::from_shape_vec((batch, 5), data)?)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

struct TestApp {
    router: Router,
    row: Arc<Mutex<Option<[f32; 5]>>>,
}

impl TestApp {
    fn new(row: [f32; 5]) -> Self {
        let row = Arc::new(Mutex::new(Some(row)));
        let engine = ScriptedEngine { row: row.clone() };
        let classifier = BananaClassifierBuilder::new()
            .build_with_engine(Box::new(engine))
            .unwrap();
        let pipeline = Arc::new(InferencePipeline::new(classifier));
        let state = Arc::new(State::new(pipeline, ServerConfig::default()).unwrap());
        Self {
            router: construct_router(state),
            row,
        }
    }

    fn script(&self, row: Option<[f32; 5]>) {
        *self.row.lock().unwrap() = row;
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

fn jpeg_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(320, 240, Rgb([235, 205, 50]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Jpeg)
        .unwrap();
    buf.into_inner()
}

fn upload(uri: &str, file_name: &str, bytes: &[u8], cookie: Option<&str>) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// The `name=value` part of the `Set-Cookie` header.
fn session_cookie(response: &Response) -> String {
    let value = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();
    value.split(';').next().unwrap().to_string()
}

async fn text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_accepted_upload_is_remembered_by_session() {
    let app = TestApp::new(KEPOK);

    let response = app.send(upload("/classify", "kepok.jpg", &jpeg_bytes(), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let body = text(response).await;
    assert!(body.contains("Jenis Pisang Terprediksi:"));
    assert!(body.contains("Pisang Kepok"));
    assert!(body.contains("85.00%"));
    assert!(body.contains("Tabel Probabilitas:"));
    assert!(body.contains("<figcaption>Gambar Terunggah</figcaption>"));
    assert!(body.contains("src=\"data:image/jpeg;base64,"));

    let response = app.send(get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = text(response).await;
    assert!(body.contains("<td>Pisang Kepok</td><td>85.00%</td>"));
}

#[tokio::test]
async fn test_rejection_clears_previous_result() {
    let app = TestApp::new(KEPOK);
    let response = app.send(upload("/classify", "kepok.jpg", &jpeg_bytes(), None)).await;
    let cookie = session_cookie(&response);

    app.script(Some(FLAT));
    let response = app
        .send(upload("/classify", "cat.png", &jpeg_bytes(), Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains(REJECTION_MESSAGE));
    assert!(body.contains("Gambar Terunggah"));
    assert!(!body.contains("<svg"));

    let body = text(app.send(get("/", Some(&cookie))).await).await;
    assert!(!body.contains("Tabel Probabilitas:"));
}

#[tokio::test]
async fn test_failed_upload_leaves_session_untouched() {
    let app = TestApp::new(KEPOK);
    let response = app.send(upload("/classify", "kepok.jpg", &jpeg_bytes(), None)).await;
    let cookie = session_cookie(&response);

    let response = app
        .send(upload("/classify", "notes.png", b"definitely not a png", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = text(response).await;
    assert!(body.contains(INPUT_ERROR_MESSAGE));
    assert!(!body.contains("Gambar Terunggah"));

    app.script(None);
    let response = app
        .send(upload("/classify", "kepok.jpg", &jpeg_bytes(), Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(text(response).await.contains(INTERNAL_ERROR_MESSAGE));

    let body = text(app.send(get("/", Some(&cookie))).await).await;
    assert!(body.contains("<td>Pisang Kepok</td><td>85.00%</td>"));
}

#[tokio::test]
async fn test_session_cookie_only_follows_accepted_result() {
    let app = TestApp::new(FLAT);

    let response = app.send(get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let response = app.send(upload("/classify", "cat.png", &jpeg_bytes(), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    app.script(Some(KEPOK));
    let response = app.send(upload("/classify", "kepok.jpg", &jpeg_bytes(), None)).await;
    assert!(response.headers().get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn test_api_accepts_kepok() {
    let app = TestApp::new(KEPOK);
    let response = app
        .send(upload("/api/v1/classify", "kepok.jpg", &jpeg_bytes(), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["label"], "Pisang Kepok");
    assert_eq!(body["index"], 3);
    assert_eq!(body["probabilities"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["probabilities"][0]["label"], "Pisang Ambon");
    let percent = body["confidence_percent"].as_f64().unwrap();
    assert_eq!(format!("{percent:.2}"), "85.00");
}

#[tokio::test]
async fn test_api_rejects_at_exact_threshold() {
    let app = TestApp::new([0.85, 0.0375, 0.0375, 0.0375, 0.0375]);
    let response = app
        .send(upload("/api/v1/classify", "edge.jpg", &jpeg_bytes(), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["message"], REJECTION_MESSAGE);
    assert!(body.get("label").is_none());
    assert!(body.get("confidence").is_none());
    assert!(body.get("probabilities").is_none());
}

#[tokio::test]
async fn test_api_error_envelope() {
    let app = TestApp::new(KEPOK);

    let response = app
        .send(upload("/api/v1/classify", "banana.png", b"<html></html>", None))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json(response).await;
    assert_eq!(body["error"]["code"], "INPUT_FORMAT");
    assert!(body["error"].get("id").is_none());

    let response = app
        .send(upload("/api/v1/classify", "banana.gif", &jpeg_bytes(), None))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.script(None);
    let response = app
        .send(upload("/api/v1/classify", "banana.jpg", &jpeg_bytes(), None))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key("x-error-id"));
    let body = json(response).await;
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert!(body["error"]["id"].is_string());
}

#[tokio::test]
async fn test_static_pages_and_catalog() {
    let app = TestApp::new(KEPOK);

    let body = text(app.send(get("/varieties", None)).await).await;
    for name in ["Pisang Ambon", "Pisang Cavendish", "Pisang Genderuwo", "Pisang Kepok", "Pisang Tanduk"] {
        assert!(body.contains(name), "missing {name}");
    }

    let body = text(app.send(get("/about", None)).await).await;
    assert!(body.contains("Tentang Aplikasi"));

    let labels = json(app.send(get("/api/v1/labels", None)).await).await;
    assert_eq!(labels[0], "Pisang Ambon");
    assert_eq!(labels[4], "Pisang Tanduk");

    let varieties = json(app.send(get("/api/v1/varieties", None)).await).await;
    assert_eq!(varieties[3]["label"], "Pisang Kepok");
    assert_eq!(varieties[3]["image"], "pisang/Kepok.jpg");
}

#[tokio::test]
async fn test_health_reports_stats() {
    let app = TestApp::new(FLAT);
    app.send(upload("/api/v1/classify", "a.jpg", &jpeg_bytes(), None))
        .await;

    let response = app.send(get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "scripted");
    assert_eq!(body["stats"]["total_processed"], 1);
    assert_eq!(body["stats"]["rejected"], 1);
}
