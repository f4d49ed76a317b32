pub mod health;
pub mod images;
pub mod music;
pub mod prompts;
pub mod replicate;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /prompts/generate                         generate prompt (POST, cache-first)
/// /prompts/variations                       generate variations (POST)
/// /prompts/optimize                         optimize existing prompt (POST)
/// /prompts/metrics                          generation metrics (GET)
/// /prompts/cache                            clear prompt cache (DELETE)
///
/// /images/generate                          submit Flux task (POST)
/// /images/{id}                              Flux task result (GET)
///
/// /videos/generate                          create Kling task (POST)
/// /videos/{task_id}                         Kling task status (GET)
///
/// /music/generate                           submit Stable Audio generation (POST)
/// /music/{generation_id}                    generation status (GET)
///
/// /replicate/predictions                    create prediction (POST)
/// /replicate/predictions/{id}               prediction status (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/prompts", prompts::router())
        .nest("/images", images::router())
        .nest("/videos", videos::router())
        .nest("/music", music::router())
        .nest("/replicate", replicate::router())
}
