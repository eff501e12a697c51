#![allow(dead_code)]

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::Multipart,
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use cardkeep::config::Config;
use cardkeep::router::{CardState, card_router};
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDRfake-card-pixels";
pub const BOUNDARY: &str = "cardkeep-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub dir: TempDir,
}

pub fn test_config(dir: &Path, extraction_endpoint: &str) -> Config {
    let mut cfg = Config::default();
    cfg.storage.records_path = dir.join("business_cards.json");
    cfg.storage.accounts_path = dir.join("user_data.json");
    cfg.storage.image_dir = dir.join("business_card_images");
    cfg.extraction.endpoint = extraction_endpoint.to_string();
    cfg.extraction.connect_timeout_secs = 2;
    cfg.extraction.timeout_secs = 5;
    cfg.extraction.max_retries = 0;
    cfg.basic.insecure_cookie = true;
    cfg
}

pub async fn spawn_app(extraction_endpoint: &str) -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let cfg = test_config(dir.path(), extraction_endpoint);
    let state = CardState::from_config(&cfg).expect("failed to build state");
    TestApp {
        router: card_router(state),
        dir,
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("request failed")
    }

    pub async fn register(&self, username: &str, password: &str) -> Response {
        self.send(json_request(
            "POST",
            "/auth/register",
            json!({ "username": username, "password": password }),
        ))
        .await
    }

    /// Log in and return the `Cookie` header value for later requests.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let resp = self
            .send(json_request(
                "POST",
                "/auth/login",
                json!({ "username": username, "password": password }),
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK, "login failed for {username}");
        cookie_pair(&resp).expect("login did not set a session cookie")
    }

    pub async fn upload_card(&self, cookie: &str, fields: &[(&str, &str)]) -> Response {
        self.send(multipart_request("/cards", Some(cookie), fields, Some(PNG)))
            .await
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    with_cookie(Request::builder().method("GET").uri(uri), cookie)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn delete(uri: &str, cookie: Option<&str>) -> Request<Body> {
    with_cookie(Request::builder().method("DELETE").uri(uri), cookie)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn multipart_request(
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<&[u8]>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"card.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    with_cookie(Request::builder().method("POST").uri(uri), cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("failed to build request")
}

fn with_cookie(
    builder: axum::http::request::Builder,
    cookie: Option<&str>,
) -> axum::http::request::Builder {
    match cookie {
        Some(c) => builder.header(header::COOKIE, c),
        None => builder,
    }
}

/// `name=value` of the first `Set-Cookie` header.
pub fn cookie_pair(resp: &Response) -> Option<String> {
    let raw = resp.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(|pair| pair.trim().to_string())
}

pub async fn body_bytes(resp: Response) -> Vec<u8> {
    to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body")
        .to_vec()
}

pub async fn body_json(resp: Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).expect("response body was not JSON")
}

/// A stand-in extraction service. Answers PNG uploads with a partial field
/// set and anything else with 400.
pub async fn spawn_extractor() -> String {
    async fn upload(mut multipart: Multipart) -> Response {
        while let Ok(Some(field)) = multipart.next_field().await {
            if field.name() != Some("file") {
                continue;
            }
            let Ok(bytes) = field.bytes().await else {
                break;
            };
            if bytes.starts_with(b"\x89PNG") {
                return Json(json!({
                    "business_name": "Acme Ltd",
                    "name_of_card_holder": "Jane Roe",
                    "contact_no": 5551234,
                    "email": null
                }))
                .into_response();
            }
        }
        StatusCode::BAD_REQUEST.into_response()
    }

    serve(Router::new().route("/upload/", post(upload))).await
}

/// An extraction service that always fails with 500.
pub async fn spawn_broken_extractor() -> String {
    serve(Router::new().route(
        "/upload/",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind extractor");
    let addr = listener.local_addr().expect("extractor has no address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/upload/")
}
