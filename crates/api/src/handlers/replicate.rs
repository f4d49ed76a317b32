//! Handlers for Replicate predictions (models not served directly, such as
//! `flux-schnell`).

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::check_resource_id;
use crate::middleware::validated_json::ValidatedJson;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body for `POST /replicate/predictions`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePredictionBody {
    #[validate(
        required(message = "version is required"),
        length(min = 1, message = "version must not be empty")
    )]
    pub version: Option<String>,
    #[validate(required(message = "input is required"))]
    pub input: Option<Value>,
}

/// POST /replicate/predictions
pub async fn create_prediction(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreatePredictionBody>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let (Some(version), Some(input)) = (body.version, body.input) else {
        return Err(AppError::BadRequest("version and input are required".into()));
    };
    if !input.is_object() {
        return Err(AppError::BadRequest("input must be a JSON object".into()));
    }

    let prediction = state
        .providers
        .replicate
        .create_prediction(&version, &input)
        .await?;

    tracing::info!(
        %version,
        prediction_id = ?prediction.get("id"),
        "Replicate prediction created",
    );
    Ok(Json(ApiResponse::new(prediction)))
}

/// GET /replicate/predictions/{id}
pub async fn get_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    check_resource_id("id", &id)?;

    let prediction = state.providers.replicate.get_prediction(&id).await?;
    Ok(Json(ApiResponse::new(prediction)))
}
