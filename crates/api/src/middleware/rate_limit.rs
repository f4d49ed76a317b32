//! Opt-in per-client rate limiting for the prompt endpoints.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use mediaforge_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Identifier used when no client address is known.
pub const ANONYMOUS_CLIENT: &str = "anonymous";

/// Admits the request if the client is under its limit.
///
/// A no-op unless `RATE_LIMIT_ENABLED` is set. Clients are identified by the
/// peer socket address. With `RATE_LIMIT_TRUST_PROXY` set, the first
/// `x-forwarded-for` entry, then `x-real-ip`, take precedence; only enable
/// that behind a proxy that overwrites those headers.
///
/// ```ignore
/// async fn generate(_limit: RateLimitGuard, State(state): State<AppState>) -> AppResult<...>
/// ```
#[derive(Debug, Clone)]
pub struct RateLimitGuard {
    pub client_id: String,
}

impl FromRequestParts<AppState> for RateLimitGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let client_id = client_identifier(parts, state.config.pipeline.rate_limit.trust_proxy);

        if !state.config.pipeline.rate_limit.enabled {
            return Ok(Self { client_id });
        }

        if !state.rate_limiter.is_allowed(&client_id).await {
            let retry_after = state.rate_limiter.reset_time(&client_id).await;
            tracing::warn!(
                client_id = %client_id,
                retry_after_ms = retry_after.as_millis() as u64,
                "Rate limit exceeded"
            );
            return Err(AppError::Core(CoreError::RateLimited {
                retry_after_ms: retry_after.as_millis() as u64,
            }));
        }

        Ok(Self { client_id })
    }
}

fn client_identifier(parts: &Parts, trust_proxy: bool) -> String {
    let forwarded = trust_proxy.then(|| forwarded_client(parts)).flatten();

    forwarded
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string())
}

/// Client address reported by a reverse proxy.
fn forwarded_client(parts: &Parts) -> Option<String> {
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    header("x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
        .or_else(|| header("x-real-ip").map(|v| v.trim().to_string()))
        .filter(|v| !v.is_empty())
}
