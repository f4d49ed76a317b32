//! Integration tests for the image, video, music and Replicate endpoints.
//!
//! Upstream providers are replaced by a local axum stub.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get as get_route, post as post_route};
use axum::{Json, Router};
use common::{body_json, build_test_app, build_test_app_with, get, post_json, test_config, StageProvider};
use serde_json::{json, Value};

/// App whose provider clients all point at `base_url` with keys configured.
fn app_with_providers(base_url: &str) -> Router {
    let mut config = test_config();
    let providers = &mut config.providers;
    providers.bfl_api_key = Some("bfl-key".into());
    providers.bfl_base_url = base_url.to_string();
    providers.kling_access_key = Some("kling-access".into());
    providers.kling_secret_key = Some("kling-secret".into());
    providers.kling_base_url = base_url.to_string();
    providers.aiml_api_key = Some("aiml-key".into());
    providers.aiml_base_url = base_url.to_string();
    providers.replicate_api_token = Some("r8-token".into());
    providers.replicate_base_url = base_url.to_string();
    build_test_app_with(config, StageProvider::new())
}

// ---------------------------------------------------------------------------
// Test: missing credentials are a configuration error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_without_api_key_returns_configuration_error() {
    let app = build_test_app(StageProvider::new());

    let response = post_json(app, "/api/v1/images/generate", json!({ "prompt": "a fox" })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "CONFIGURATION_ERROR");
    assert_eq!(json["error"], "BFL API key is not configured");
}

#[tokio::test]
async fn video_without_keys_returns_configuration_error() {
    let app = build_test_app(StageProvider::new());

    let response = post_json(app, "/api/v1/videos/generate", json!({ "prompt": "a fox" })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "CONFIGURATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: images
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_generation_forwards_platform_dimensions() {
    let stub = Router::new().route(
        "/v1/flux-pro-1.1",
        post_route(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["x-key"], "bfl-key");
            Json(json!({ "id": "task-1", "echo": body }))
        }),
    );
    let app = app_with_providers(&common::spawn_stub(stub).await);

    let body = json!({ "prompt": "a fox in the snow", "platform": "instagram" });
    let response = post_json(app, "/api/v1/images/generate", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["id"], "task-1");
    assert_eq!(json["data"]["echo"]["prompt"], "a fox in the snow");
    assert_eq!(json["data"]["echo"]["width"], 896);
    assert_eq!(json["data"]["echo"]["height"], 1120);
}

#[tokio::test]
async fn flux_schnell_is_rejected() {
    let app = build_test_app(StageProvider::new());

    let body = json!({ "prompt": "a fox", "model": "flux-schnell" });
    let response = post_json(app, "/api/v1/images/generate", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn provider_error_status_passes_through() {
    let stub = Router::new().route(
        "/v1/flux-pro-1.1",
        post_route(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": "prompt flagged" })),
            )
        }),
    );
    let app = app_with_providers(&common::spawn_stub(stub).await);

    let response = post_json(app, "/api/v1/images/generate", json!({ "prompt": "a fox" })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "PROVIDER_ERROR");
    assert_eq!(json["details"]["detail"], "prompt flagged");
}

#[tokio::test]
async fn image_result_is_returned_unchanged() {
    let stub = Router::new().route(
        "/v1/get_result",
        get_route(|| async { Json(json!({ "id": "task-1", "status": "Ready" })) }),
    );
    let app = app_with_providers(&common::spawn_stub(stub).await);

    let response = get(app, "/api/v1/images/task-1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "Ready");
}

// ---------------------------------------------------------------------------
// Test: videos
// ---------------------------------------------------------------------------

#[tokio::test]
async fn video_generation_sends_signed_request() {
    let stub = Router::new().route(
        "/v1/videos/text2video",
        post_route(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let auth = headers["authorization"].to_str().unwrap().to_string();
            assert!(auth.starts_with("Bearer "));
            Json(json!({
                "code": 0,
                "message": "SUCCEED",
                "data": {
                    "task_id": "vt-1",
                    "task_status": "submitted",
                    "model_name": body["model_name"],
                    "aspect_ratio": body["aspect_ratio"],
                },
            }))
        }),
    );
    let app = app_with_providers(&common::spawn_stub(stub).await);

    let body = json!({ "prompt": "a fox running", "platform": "tiktok" });
    let response = post_json(app, "/api/v1/videos/generate", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["data"]["task_id"], "vt-1");
    assert_eq!(json["data"]["data"]["model_name"], "kling-v1-6");
    assert_eq!(json["data"]["data"]["aspect_ratio"], "9:16");
}

#[tokio::test]
async fn kling_body_error_maps_to_502() {
    let stub = Router::new().route(
        "/v1/videos/text2video",
        post_route(|| async { Json(json!({ "code": 1201, "message": "invalid prompt" })) }),
    );
    let app = app_with_providers(&common::spawn_stub(stub).await);

    let response = post_json(app, "/api/v1/videos/generate", json!({ "prompt": "a fox" })).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["details"]["provider_code"], 1201);
}

#[tokio::test]
async fn unsupported_video_duration_returns_400() {
    let app = build_test_app(StageProvider::new());

    let body = json!({ "prompt": "a fox", "duration": 7 });
    let response = post_json(app, "/api/v1/videos/generate", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: music
// ---------------------------------------------------------------------------

#[tokio::test]
async fn music_generation_returns_generation_id() {
    let stub = Router::new().route(
        "/v2/generate/audio",
        post_route(|Json(body): Json<Value>| async move {
            assert_eq!(body["seconds_total"], 30);
            Json(json!({ "id": "gen-1", "status": "queued" }))
        }),
    );
    let app = app_with_providers(&common::spawn_stub(stub).await);

    let body = json!({ "prompt": "lofi beat", "seconds_total": 30 });
    let response = post_json(app, "/api/v1/music/generate", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], "gen-1");
}

#[tokio::test]
async fn music_longer_than_limit_returns_400() {
    let app = build_test_app(StageProvider::new());

    let body = json!({ "prompt": "lofi beat", "seconds_total": 60 });
    let response = post_json(app, "/api/v1/music/generate", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["details"]["seconds_total"][0], "seconds_total must be between 1 and 47");
}

// ---------------------------------------------------------------------------
// Test: replicate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn replicate_prediction_is_created() {
    let stub = Router::new().route(
        "/v1/predictions",
        post_route(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["authorization"], "Bearer r8-token");
            (
                StatusCode::CREATED,
                Json(json!({ "id": "p-1", "status": "starting", "version": body["version"] })),
            )
        }),
    );
    let app = app_with_providers(&common::spawn_stub(stub).await);

    let body = json!({ "version": "abc123", "input": { "prompt": "a fox" } });
    let response = post_json(app, "/api/v1/replicate/predictions", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], "p-1");
    assert_eq!(json["data"]["version"], "abc123");
}

#[tokio::test]
async fn replicate_input_must_be_an_object() {
    let app = build_test_app(StageProvider::new());

    let body = json!({ "version": "abc123", "input": "a fox" });
    let response = post_json(app, "/api/v1/replicate/predictions", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: path ids cannot reach other upstream paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn traversal_ids_are_rejected_before_any_upstream_call() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let stub = Router::new().fallback(move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Json(json!({ "code": 0, "data": {} }))
        }
    });
    let app = app_with_providers(&common::spawn_stub(stub).await);

    for uri in [
        "/api/v1/videos/..%2F..%2Faccount%2Fcosts",
        "/api/v1/videos/123%3Fx%3D1",
        "/api/v1/replicate/predictions/..%2Fmodels%2Fowner%2Fname",
        "/api/v1/images/..%2Fflux-pro",
        "/api/v1/music/..%2F..%2Fv1%2Fbilling",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR", "{uri}");
    }

    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn plain_task_id_is_forwarded() {
    let stub = Router::new().route(
        "/v1/videos/text2video/{task_id}",
        get_route(|axum::extract::Path(task_id): axum::extract::Path<String>| async move {
            Json(json!({ "code": 0, "data": { "task_id": task_id, "task_status": "succeed" } }))
        }),
    );
    let app = app_with_providers(&common::spawn_stub(stub).await);

    let response = get(app, "/api/v1/videos/781234567890").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["data"]["task_id"], "781234567890");
}
