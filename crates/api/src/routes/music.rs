//! Route definitions for music generation.
//!
//! Mounted at `/music`.
//!
//! ```text
//! POST /generate           generate_music
//! GET  /{generation_id}    get_music
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::music;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(music::generate_music))
        .route("/{generation_id}", get(music::get_music))
}
