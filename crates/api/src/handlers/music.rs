//! Handlers for Stable Audio music generation through the AIML API.

use axum::extract::{Path, State};
use axum::Json;
use mediaforge_providers::aiml::{AudioRequest, MAX_AUDIO_SECONDS};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::check_resource_id;
use crate::middleware::validated_json::ValidatedJson;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body for `POST /music/generate`.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateMusicBody {
    #[validate(
        required(message = "prompt is required"),
        length(min = 1, max = 1000, message = "prompt must be between 1 and 1000 characters")
    )]
    pub prompt: Option<String>,
    /// Clip length in seconds, at most 47.
    #[validate(range(min = 1, max = 47, message = "seconds_total must be between 1 and 47"))]
    pub seconds_total: Option<u32>,
    #[validate(range(min = 1, max = 1000, message = "steps must be between 1 and 1000"))]
    pub steps: Option<u32>,
}

/// POST /music/generate
///
/// Queue an audio generation. The response carries the generation `id`.
pub async fn generate_music(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<GenerateMusicBody>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let prompt = body
        .prompt
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("prompt is required".into()))?;

    let mut request = AudioRequest::stable_audio(prompt);
    request.seconds_total = body.seconds_total.map(|s| s.min(MAX_AUDIO_SECONDS));
    request.steps = body.steps;

    let generation = state.providers.aiml.generate_audio(&request).await?;

    tracing::info!(
        seconds_total = ?request.seconds_total,
        generation_id = ?generation.get("id"),
        "Music generation submitted",
    );
    Ok(Json(ApiResponse::new(generation)))
}

/// GET /music/{generation_id}
pub async fn get_music(
    State(state): State<AppState>,
    Path(generation_id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    check_resource_id("generation_id", &generation_id)?;

    let generation = state.providers.aiml.get_audio(&generation_id).await?;
    Ok(Json(ApiResponse::new(generation)))
}
