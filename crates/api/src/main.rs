use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mediaforge_api::background::cache_cleanup;
use mediaforge_api::config::ServerConfig;
use mediaforge_api::router::build_app_router;
use mediaforge_api::state::AppState;
use mediaforge_providers::completion::ChatCompletionClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mediaforge_api=debug,mediaforge_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    if config.providers.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; prompt generation will fail");
    }

    // --- Outbound HTTP client ---
    let http = reqwest::Client::builder()
        .timeout(config.providers.completion_timeout())
        .build()
        .expect("Failed to build HTTP client");

    let completion = Arc::new(ChatCompletionClient::new(
        http.clone(),
        &config.providers.openai_base_url,
        config.providers.openai_api_key.clone(),
    ));

    // --- App state ---
    let state = AppState::new(config.clone(), completion, http);
    tracing::info!(
        model = %config.pipeline.completion_model,
        cache_ttl_secs = config.pipeline.cache_ttl_secs,
        rate_limit_enabled = config.pipeline.rate_limit.enabled,
        "Prompt service ready"
    );

    // --- Background tasks ---
    let cleanup_cancel = CancellationToken::new();
    let cleanup_handle = tokio::spawn(cache_cleanup::run(
        Arc::clone(state.prompt_service.cache()),
        Arc::clone(&state.rate_limiter),
        config.pipeline.cache_cleanup_interval(),
        cleanup_cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cleanup_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        cleanup_handle,
    )
    .await;
    tracing::info!("Cache cleanup job stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
