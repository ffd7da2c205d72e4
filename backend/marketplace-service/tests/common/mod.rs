//! Shared fixtures for HTTP-level tests.
#![allow(dead_code)]

use std::sync::Arc;

use marketplace_service::config::Config;
use marketplace_service::repository::MemoryRepository;
use marketplace_service::{seed, AppState};
use tempfile::TempDir;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "test-admin-password";
pub const BOUNDARY: &str = "----marketplace-test-boundary";

/// Application state over an in-memory store, with uploads in a temp dir
/// that lives as long as the context.
pub struct TestContext {
    pub state: AppState,
    pub upload_dir: TempDir,
}

impl TestContext {
    pub fn uploaded_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub async fn context_with(tweak: impl FnOnce(&mut Config)) -> TestContext {
    let upload_dir = tempfile::tempdir().expect("create temp upload dir");
    let mut config = Config::for_memory(upload_dir.path());
    config.server.public_base_url = Some("http://test.local".to_string());
    tweak(&mut config);

    let repo = Arc::new(MemoryRepository::new());
    seed::run(repo.as_ref(), ADMIN_PASSWORD)
        .await
        .expect("seed memory store");

    let state = AppState::new(config, repo)
        .await
        .expect("build app state");
    TestContext { state, upload_dir }
}

/// Seeded catalog: products 1, 2 and 5 validated, 3 submitted, 4 under review.
pub async fn context() -> TestContext {
    context_with(|_| {}).await
}

/// Build an initialised test service for `$state`.
#[macro_export]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(marketplace_service::handlers::configure),
        )
        .await
    };
}

/// GET `$uri` and return the status with the JSON body.
#[macro_export]
macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let req = actix_web::test::TestRequest::get().uri($uri).to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}

pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: Option<&'a str>,
    pub bytes: &'a [u8],
}

/// Encode a `multipart/form-data` body. Returns the content type header value and the body.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some(file) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n",
                file.file_name
            )
            .as_bytes(),
        );
        if let Some(content_type) = file.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

pub fn listing_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("title", "Hermes Silk Scarf"),
        ("price", "320.50"),
        ("category", "Accessories"),
        ("description", "90cm carre, never worn"),
        ("sellerName", "Lea Martin"),
        ("sellerEmail", "lea@example.com"),
    ]
}

pub fn product_json() -> serde_json::Value {
    serde_json::json!({
        "title": "Dior Saddle Bag",
        "price": 1250.0,
        "category": "Accessories",
        "description": "Oblique canvas, with strap",
        "imageUrl": "https://images.example.com/saddle.jpg",
        "sellerName": "Nora Diaz",
        "sellerEmail": "nora@example.com"
    })
}
