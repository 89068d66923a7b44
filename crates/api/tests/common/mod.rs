#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use schemasmith_api::config::ServerConfig;
use schemasmith_api::router::build_app_router;
use schemasmith_api::state::AppState;
use schemasmith_llm::{Completion, CompletionClient, CompletionError, CompletionRequest};
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SCRIPTED_MODEL: &str = "scripted-model";

const BOUNDARY: &str = "schemasmith-test-boundary";

/// Completion double answering from a queue; once the queue is empty every
/// call answers `"ok"`.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new(replies: impl IntoIterator<Item = Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep for `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn model(&self) -> &str {
        SCRIPTED_MODEL
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()));
        reply.map(|text| Completion {
            text,
            model: SCRIPTED_MODEL.to_string(),
        })
    }
}

/// A router wired to a scripted completion client and a private output
/// directory, which lives as long as this value.
pub struct TestApp {
    router: Router,
    pub client: Arc<ScriptedClient>,
    pub dir: TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build a test `ServerConfig` writing under `dir`.
pub fn test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        output_dir: dir.path().join("outputs"),
        upload_dir: dir.path().join("uploads"),
        plantuml_server: "https://plantuml.example".to_string(),
        max_upload_bytes: 1024 * 1024,
    }
}

/// Build the full application router with a completion client that always
/// answers `"ok"`.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, ScriptedClient::new([]))
}

/// Build the full application router around `client`, using the same
/// middleware stack as production.
pub fn build_test_app_with(pool: PgPool, client: ScriptedClient) -> TestApp {
    build_test_app_configured(pool, client, |_| {})
}

/// Like [`build_test_app_with`], letting `configure` adjust the config first.
pub fn build_test_app_configured(
    pool: PgPool,
    client: ScriptedClient,
    configure: impl FnOnce(&mut ServerConfig),
) -> TestApp {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    configure(&mut config);
    let client = Arc::new(client);
    let state = AppState::new(pool, config.clone(), client.clone());
    TestApp {
        router: build_app_router(state, &config),
        client,
        dir,
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a multipart form with a single `file` field.
pub async fn post_file(app: Router, uri: &str, file_name: &str, contents: &[u8]) -> Response {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn library_project() -> serde_json::Value {
    serde_json::json!({
        "title": "Library System",
        "domain": "Education",
        "primary_entity": "Book",
        "constraints_text": "A member may borrow at most 3 books",
    })
}
