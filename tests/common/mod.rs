//! Test utilities and common setup.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use tempfile::TempDir;

use picstore::{routes, AppState, Config};

pub const BOUNDARY: &str = "test-boundary";

/// Router plus the temp directories backing its state.
pub struct TestApp {
    pub router: Router,
    pub upload_dir: PathBuf,
    pub download_dir: PathBuf,
    _root: TempDir,
}

/// Create a test application over fresh temp directories.
///
/// Neither directory exists on disk until a handler creates it.
pub fn test_app() -> TestApp {
    let root = TempDir::new().unwrap();
    let upload_dir = root.path().join("uploads");
    let download_dir = root.path().join("downloads");
    let config = Arc::new(Config::default());

    let state = AppState {
        upload_dir: upload_dir.clone(),
        download_dir: download_dir.clone(),
        config: config.clone(),
    };

    let router = routes::file_routes(config.max_upload_size).with_state(state);

    TestApp {
        router,
        upload_dir,
        download_dir,
        _root: root,
    }
}

/// Build a multipart request against /upload carrying one file field.
pub fn upload_request(field: &str, file_name: &str, contents: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .uri("/upload")
        .method(Method::POST)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
