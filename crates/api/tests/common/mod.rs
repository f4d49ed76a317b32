use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use mediaforge_api::config::{PipelineConfig, ProviderConfig, ServerConfig};
use mediaforge_api::router::build_app_router;
use mediaforge_api::state::AppState;
use mediaforge_providers::completion::{CompletionProvider, CompletionRequest};
use mediaforge_providers::ProviderError;

/// Build a test `ServerConfig` with safe defaults.
///
/// No provider keys are set and rate limiting is off.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        pipeline: PipelineConfig::default(),
        providers: ProviderConfig::default(),
    }
}

/// Completion provider that answers each pipeline stage with a fixed reply.
pub struct StageProvider {
    fail: bool,
    calls: AtomicUsize,
}

impl StageProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    /// Provider whose every call fails with an upstream 500.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for StageProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Api {
                provider: "completion",
                status: 500,
                body: "upstream exploded".to_string(),
            });
        }

        let system = request.system_prompt.as_str();
        let reply = if system.contains("context analysis agent") {
            r#"{"industry":"pets","objective":"engagement","audience":"cat lovers","visual_style":"playful","temporal_context":"evergreen","trending_topics":[],"confidence":0.8}"#
        } else if system.contains("visual generation agent") {
            r#"{"prompt":"A ginger cat riding a skateboard","confidence":0.8}"#
        } else if system.contains("video generation agent") {
            r#"{"prompt":"A ginger cat skateboards past the camera","camera_movement":"tracking shot","motion_intensity":"moderate","duration_seconds":5,"confidence":0.8}"#
        } else if system.contains("model optimization agent") {
            r#"{"optimized_prompt":"Ginger cat riding a skateboard, golden hour light","confidence":0.8}"#
        } else {
            r#"{"final_prompt":"Ginger cat riding a skateboard down a sunlit boardwalk, golden hour light","confidence":0.8}"#
        };
        Ok(reply.to_string())
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(provider: Arc<StageProvider>) -> Router {
    build_test_app_with(test_config(), provider)
}

pub fn build_test_app_with(config: ServerConfig, provider: Arc<StageProvider>) -> Router {
    let state = AppState::new(config.clone(), provider, reqwest::Client::new());
    build_app_router(state, &config)
}

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
