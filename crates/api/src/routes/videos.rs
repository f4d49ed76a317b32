//! Route definitions for Kling video generation.
//!
//! Mounted at `/videos`.
//!
//! ```text
//! POST /generate     generate_video
//! GET  /{task_id}    get_video
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(videos::generate_video))
        .route("/{task_id}", get(videos::get_video))
}
