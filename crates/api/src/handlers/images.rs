//! Handlers for Flux image generation through the BFL API.
//!
//! Both endpoints return the provider's JSON unchanged inside the success
//! envelope.

use axum::extract::{Path, State};
use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::model_config::{aspect_ratio_for, dimensions_for_aspect_ratio, FLUX_DIMENSION_STEP};
use mediaforge_core::types::{ContentType, FluxModel, Platform};
use mediaforge_providers::bfl::{endpoint_for, FluxRequest};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::check_resource_id;
use crate::middleware::validated_json::ValidatedJson;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Model used when the body names none.
pub const DEFAULT_FLUX_MODEL: FluxModel = FluxModel::FluxPro11;

const MIN_DIMENSION: u32 = 256;
const MAX_DIMENSION: u32 = 1440;

/// Body for `POST /images/generate`.
///
/// Size comes from `width` + `height` when both are given, otherwise from
/// `aspect_ratio`, otherwise from the platform's preferred image ratio.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateImageBody {
    #[validate(
        required(message = "prompt is required"),
        length(min = 1, message = "prompt must not be empty")
    )]
    pub prompt: Option<String>,
    pub model: Option<FluxModel>,
    pub platform: Option<Platform>,
    pub aspect_ratio: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub seed: Option<u64>,
    pub prompt_upsampling: Option<bool>,
    #[validate(range(max = 6, message = "safety_tolerance must be between 0 and 6"))]
    pub safety_tolerance: Option<u8>,
    pub output_format: Option<String>,
}

/// Validate explicit pixel dimensions against Flux limits.
fn check_dimensions(width: u32, height: u32) -> Result<(u32, u32), CoreError> {
    for (name, value) in [("width", width), ("height", height)] {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) || value % FLUX_DIMENSION_STEP != 0 {
            return Err(CoreError::Validation(format!(
                "{name} must be a multiple of {FLUX_DIMENSION_STEP} between {MIN_DIMENSION} and {MAX_DIMENSION} (got {value})"
            )));
        }
    }
    Ok((width, height))
}

/// Build the BFL request body for `model`.
///
/// The Ultra endpoint takes an aspect ratio instead of pixel dimensions.
fn build_flux_request(body: GenerateImageBody, model: FluxModel) -> Result<FluxRequest, CoreError> {
    let prompt = body
        .prompt
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| CoreError::Validation("prompt is required".into()))?;

    let aspect_ratio = body.aspect_ratio.unwrap_or_else(|| {
        aspect_ratio_for(body.platform.unwrap_or(Platform::General), ContentType::Image).to_string()
    });

    let mut request = FluxRequest {
        prompt,
        seed: body.seed,
        prompt_upsampling: body.prompt_upsampling,
        safety_tolerance: body.safety_tolerance,
        output_format: body.output_format,
        ..Default::default()
    };

    if model == FluxModel::FluxPro11Ultra {
        dimensions_for_aspect_ratio(&aspect_ratio)?;
        request.aspect_ratio = Some(aspect_ratio);
        return Ok(request);
    }

    let (width, height) = match (body.width, body.height) {
        (Some(width), Some(height)) => check_dimensions(width, height)?,
        (None, None) => dimensions_for_aspect_ratio(&aspect_ratio)?,
        _ => {
            return Err(CoreError::Validation(
                "width and height must be given together".into(),
            ))
        }
    };
    request.width = Some(width);
    request.height = Some(height);
    Ok(request)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /images/generate
///
/// Queue a Flux generation task. The response carries the task `id` to poll.
pub async fn generate_image(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<GenerateImageBody>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let model = body.model.unwrap_or(DEFAULT_FLUX_MODEL);
    let endpoint = endpoint_for(model).ok_or_else(|| {
        CoreError::Validation(format!(
            "{} is not available through BFL; use /replicate/predictions",
            model.as_str()
        ))
    })?;
    let request = build_flux_request(body, model)?;

    let task = state.providers.bfl.submit(endpoint, &request).await?;

    tracing::info!(
        model = %model.as_str(),
        width = ?request.width,
        height = ?request.height,
        task_id = ?task.get("id"),
        "Image generation submitted",
    );
    Ok(Json(ApiResponse::new(task)))
}

/// GET /images/{id}
///
/// Fetch the status and, once ready, the result of a Flux task.
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    check_resource_id("id", &id)?;

    let result = state.providers.bfl.get_result(&id).await?;
    Ok(Json(ApiResponse::new(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn body(prompt: &str) -> GenerateImageBody {
        GenerateImageBody {
            prompt: Some(prompt.into()),
            model: None,
            platform: None,
            aspect_ratio: None,
            width: None,
            height: None,
            seed: None,
            prompt_upsampling: None,
            safety_tolerance: None,
            output_format: None,
        }
    }

    #[test]
    fn platform_ratio_sets_dimensions() {
        let mut b = body("a cat on a skateboard");
        b.platform = Some(Platform::Instagram);
        let request = build_flux_request(b, FluxModel::FluxPro).unwrap();
        assert_eq!((request.width, request.height), (Some(896), Some(1120)));
        assert_eq!(request.aspect_ratio, None);
    }

    #[test]
    fn explicit_dimensions_win() {
        let mut b = body("a cat");
        b.width = Some(1024);
        b.height = Some(768);
        b.aspect_ratio = Some("9:16".into());
        let request = build_flux_request(b, FluxModel::FluxDev).unwrap();
        assert_eq!((request.width, request.height), (Some(1024), Some(768)));
    }

    #[test]
    fn misaligned_dimensions_are_rejected() {
        let mut b = body("a cat");
        b.width = Some(1000);
        b.height = Some(768);
        assert_matches!(
            build_flux_request(b, FluxModel::FluxPro),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn lone_width_is_rejected() {
        let mut b = body("a cat");
        b.width = Some(1024);
        assert_matches!(
            build_flux_request(b, FluxModel::FluxPro),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn ultra_sends_aspect_ratio_only() {
        let mut b = body("a cat");
        b.aspect_ratio = Some("16:9".into());
        let request = build_flux_request(b, FluxModel::FluxPro11Ultra).unwrap();
        assert_eq!(request.aspect_ratio.as_deref(), Some("16:9"));
        assert_eq!(request.width, None);
    }

    #[test]
    fn unknown_aspect_ratio_is_rejected() {
        let mut b = body("a cat");
        b.aspect_ratio = Some("5:4".into());
        assert!(build_flux_request(b, FluxModel::FluxPro).is_err());
    }
}
