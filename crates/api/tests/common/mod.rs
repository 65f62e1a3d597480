//! Shared helpers for the HTTP integration tests.
//!
//! Every test builds the production router over an in-memory blob store
//! and a scripted [`StubGenerator`], then drives it with `oneshot`.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use catapult_api::config::ServerConfig;
use catapult_api::router::build_app_router;
use catapult_api::state::AppState;
use catapult_core::builtin::builtin_templates;
use catapult_llm::openai::OpenAiConfig;
use catapult_llm::{CompletionRequest, GenerationError, TextGenerator};
use catapult_store::memory::MemoryBlobStore;
use catapult_store::repositories::TemplateRepo;
use catapult_store::{SharedStore, StorageBackend};

/// Configuration that never touches the environment.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        storage: StorageBackend::Memory,
        seed_default_templates: false,
        openai: OpenAiConfig {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            model: "test-model".to_string(),
            draft_model: "test-draft-model".to_string(),
            temperature: 0.7,
        },
    }
}

// ---------------------------------------------------------------------------
// Scripted text generator
// ---------------------------------------------------------------------------

/// Fails every prompt containing one of `fail_on`; otherwise answers with
/// `reply` or, when unset, a line echoing the prompt's content type.
#[derive(Default)]
pub struct StubGenerator {
    fail_on: Vec<String>,
    reply: Option<String>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl StubGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(needles: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            fail_on: needles.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        })
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(request.clone());
        if self.fail_on.iter().any(|n| request.prompt.contains(n.as_str())) {
            return Err(GenerationError::Api {
                status: 500,
                body: "upstream exploded".to_string(),
            });
        }
        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }
        let content_type = request
            .prompt
            .lines()
            .find_map(|l| l.strip_prefix("Content type: "))
            .unwrap_or("unknown");
        Ok(format!("Generated {content_type}"))
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// An empty in-memory store.
pub fn empty_store() -> SharedStore {
    Arc::new(MemoryBlobStore::new())
}

/// An in-memory store holding the built-in default templates.
pub async fn seeded_store() -> SharedStore {
    let store = empty_store();
    TemplateRepo::seed_defaults(store.as_ref(), builtin_templates())
        .await
        .expect("seeding a memory store succeeds");
    store
}

/// Build the full application router, middleware included.
pub fn build_test_app(store: SharedStore, generator: Arc<dyn TextGenerator>) -> Router {
    let config = test_config();
    let state = AppState::new(store, generator, config.clone());
    build_app_router(state, &config)
}

/// Seeded store plus a default stub generator.
pub async fn default_app() -> Router {
    build_test_app(seeded_store().await, StubGenerator::new())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    let request = Request::put(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

/// A feature payload with the two required fields filled in.
pub fn feature(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "description": format!("{name} does useful things"),
        "keyBenefits": "Saves time",
    })
}
