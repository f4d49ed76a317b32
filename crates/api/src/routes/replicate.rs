//! Route definitions for Replicate predictions.
//!
//! Mounted at `/replicate`.
//!
//! ```text
//! POST /predictions         create_prediction
//! GET  /predictions/{id}    get_prediction
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::replicate;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predictions", post(replicate::create_prediction))
        .route("/predictions/{id}", get(replicate::get_prediction))
}
