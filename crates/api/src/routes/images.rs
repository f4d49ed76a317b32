//! Route definitions for Flux image generation.
//!
//! Mounted at `/images`.
//!
//! ```text
//! POST /generate    generate_image
//! GET  /{id}        get_image
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::images;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(images::generate_image))
        .route("/{id}", get(images::get_image))
}
