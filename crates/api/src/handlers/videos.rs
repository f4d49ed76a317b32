//! Handlers for Kling text-to-video generation.

use axum::extract::{Path, State};
use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::model_config::{aspect_ratio_for, DEFAULT_KLING_DURATION, KLING_DURATIONS};
use mediaforge_core::types::{ContentType, KlingModel, Platform};
use mediaforge_providers::kling::{KlingMode, KlingVideoRequest};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::check_resource_id;
use crate::middleware::validated_json::ValidatedJson;
use crate::response::ApiResponse;
use crate::state::AppState;

pub const DEFAULT_KLING_MODEL: KlingModel = KlingModel::V1_6;

/// Aspect ratios Kling accepts.
const KLING_ASPECT_RATIOS: &[&str] = &["16:9", "9:16", "1:1"];

/// Body for `POST /videos/generate`.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateVideoBody {
    #[validate(
        required(message = "prompt is required"),
        length(min = 1, max = 2500, message = "prompt must be between 1 and 2500 characters")
    )]
    pub prompt: Option<String>,
    pub model: Option<KlingModel>,
    #[validate(length(max = 2500, message = "negative_prompt must be at most 2500 characters"))]
    pub negative_prompt: Option<String>,
    #[validate(range(min = 0.0, max = 1.0, message = "cfg_scale must be between 0 and 1"))]
    pub cfg_scale: Option<f32>,
    pub mode: Option<KlingMode>,
    /// Defaults to the platform's preferred video ratio.
    pub aspect_ratio: Option<String>,
    pub platform: Option<Platform>,
    /// Seconds; 5 or 10.
    pub duration: Option<u32>,
}

fn build_kling_request(body: GenerateVideoBody) -> Result<KlingVideoRequest, CoreError> {
    let prompt = body
        .prompt
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| CoreError::Validation("prompt is required".into()))?;

    let aspect_ratio = body.aspect_ratio.unwrap_or_else(|| {
        aspect_ratio_for(body.platform.unwrap_or(Platform::General), ContentType::Video).to_string()
    });
    if !KLING_ASPECT_RATIOS.contains(&aspect_ratio.as_str()) {
        return Err(CoreError::Validation(format!(
            "aspect_ratio must be one of {} (got {aspect_ratio})",
            KLING_ASPECT_RATIOS.join(", ")
        )));
    }

    let duration = body.duration.unwrap_or(DEFAULT_KLING_DURATION);
    if !KLING_DURATIONS.contains(&duration) {
        return Err(CoreError::Validation(format!(
            "duration must be 5 or 10 seconds (got {duration})"
        )));
    }

    Ok(KlingVideoRequest {
        model_name: body.model.unwrap_or(DEFAULT_KLING_MODEL),
        prompt,
        negative_prompt: body.negative_prompt.filter(|p| !p.trim().is_empty()),
        cfg_scale: body.cfg_scale,
        mode: body.mode.unwrap_or(KlingMode::Std),
        aspect_ratio,
        duration: duration.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /videos/generate
///
/// Create a Kling text-to-video task. The response carries `data.task_id`.
pub async fn generate_video(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<GenerateVideoBody>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let request = build_kling_request(body)?;

    let task = state.providers.kling.create_video_task(&request).await?;

    tracing::info!(
        model = %request.model_name.as_str(),
        duration = %request.duration,
        aspect_ratio = %request.aspect_ratio,
        "Video generation submitted",
    );
    Ok(Json(ApiResponse::new(task)))
}

/// GET /videos/{task_id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    check_resource_id("task_id", &task_id)?;

    let task = state.providers.kling.get_video_task(&task_id).await?;
    Ok(Json(ApiResponse::new(task)))
}
