//! Route definitions for prompt generation.
//!
//! Mounted at `/prompts`.
//!
//! ```text
//! POST   /generate      generate_prompt
//! POST   /variations    generate_variations
//! POST   /optimize      optimize_prompt
//! GET    /metrics       get_metrics
//! DELETE /cache         clear_cache
//! ```

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::prompts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(prompts::generate_prompt))
        .route("/variations", post(prompts::generate_variations))
        .route("/optimize", post(prompts::optimize_prompt))
        .route("/metrics", get(prompts::get_metrics))
        .route("/cache", delete(prompts::clear_cache))
}
