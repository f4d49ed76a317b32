//! Handlers for prompt generation, optimization, metrics and cache control.

use axum::extract::State;
use axum::Json;
use mediaforge_core::error::CoreError;
use mediaforge_core::metrics::MetricsSummaryEntry;
use mediaforge_core::request::{PromptGenerationRequest, DEFAULT_VARIATIONS};
use mediaforge_core::types::{ContentType, GenerationResponse, Platform, TargetModel};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::rate_limit::RateLimitGuard;
use crate::middleware::validated_json::ValidatedJson;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /prompts/generate`.
#[derive(Debug, Deserialize, Validate)]
pub struct GeneratePromptBody {
    #[validate(required(message = "user_input is required"))]
    pub user_input: Option<String>,
    #[validate(required(message = "platform is required"))]
    pub platform: Option<Platform>,
    /// Defaults to the kind implied by `target_model`.
    pub content_type: Option<ContentType>,
    #[validate(required(message = "target_model is required"))]
    pub target_model: Option<TargetModel>,
    pub style_preference: Option<String>,
}

impl GeneratePromptBody {
    fn into_request(self) -> Result<PromptGenerationRequest, CoreError> {
        PromptGenerationRequest::new(
            &required(self.user_input, "user_input")?,
            required(self.platform, "platform")?,
            self.content_type,
            required(self.target_model, "target_model")?,
            self.style_preference.as_deref(),
        )
    }
}

/// Body for `POST /prompts/variations`: the generate body plus `count`.
#[derive(Debug, Deserialize, Validate)]
pub struct VariationsBody {
    #[validate(required(message = "user_input is required"))]
    pub user_input: Option<String>,
    #[validate(required(message = "platform is required"))]
    pub platform: Option<Platform>,
    pub content_type: Option<ContentType>,
    #[validate(required(message = "target_model is required"))]
    pub target_model: Option<TargetModel>,
    pub style_preference: Option<String>,
    /// Defaults to 3.
    #[validate(range(min = 1, max = 5, message = "count must be between 1 and 5"))]
    pub count: Option<usize>,
}

impl VariationsBody {
    fn into_parts(self) -> Result<(PromptGenerationRequest, usize), CoreError> {
        let count = self.count.unwrap_or(DEFAULT_VARIATIONS);
        let request = GeneratePromptBody {
            user_input: self.user_input,
            platform: self.platform,
            content_type: self.content_type,
            target_model: self.target_model,
            style_preference: self.style_preference,
        }
        .into_request()?;
        Ok((request, count))
    }
}

/// Body for `POST /prompts/optimize`.
#[derive(Debug, Deserialize, Validate)]
pub struct OptimizePromptBody {
    #[validate(required(message = "existing_prompt is required"))]
    pub existing_prompt: Option<String>,
    #[validate(required(message = "platform is required"))]
    pub platform: Option<Platform>,
    pub content_type: Option<ContentType>,
    #[validate(required(message = "target_model is required"))]
    pub target_model: Option<TargetModel>,
}

#[derive(Debug, Serialize)]
pub struct VariationsResponse {
    pub variations: Vec<GenerationResponse>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub optimized_prompt: String,
    pub platform: Platform,
    pub target_model: TargetModel,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub total_generations: usize,
    pub cache_entries: usize,
    pub series: Vec<MetricsSummaryEntry>,
}

#[derive(Debug, Serialize)]
pub struct CacheClearedResponse {
    pub cleared: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Unwrap a field already checked by `#[validate(required)]`.
fn required<T>(value: Option<T>, field: &str) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// POST /prompts/generate
///
/// Run the prompt pipeline (or serve the cached result) for one request.
pub async fn generate_prompt(
    _limit: RateLimitGuard,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<GeneratePromptBody>,
) -> AppResult<Json<ApiResponse<GenerationResponse>>> {
    let request = body.into_request()?;

    let response = state.prompt_service.generate(&request).await?;

    tracing::info!(
        platform = %request.platform(),
        target_model = %request.target_model(),
        confidence = response.metadata.confidence_score,
        "Prompt generated",
    );
    Ok(Json(ApiResponse::new(response)))
}

/// POST /prompts/variations
///
/// Generate `count` (default 3) independent variations. Fails as a whole if
/// any variation fails.
pub async fn generate_variations(
    _limit: RateLimitGuard,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<VariationsBody>,
) -> AppResult<Json<ApiResponse<VariationsResponse>>> {
    let (request, count) = body.into_parts()?;

    let variations = state
        .prompt_service
        .generate_variations(&request, count)
        .await?;

    tracing::info!(
        count,
        platform = %request.platform(),
        target_model = %request.target_model(),
        "Prompt variations generated",
    );
    Ok(Json(ApiResponse::new(VariationsResponse { variations })))
}

/// POST /prompts/optimize
///
/// Rewrite an existing prompt for the target model and platform.
pub async fn optimize_prompt(
    _limit: RateLimitGuard,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<OptimizePromptBody>,
) -> AppResult<Json<ApiResponse<OptimizeResponse>>> {
    let existing_prompt = required(body.existing_prompt, "existing_prompt")?;
    let platform = required(body.platform, "platform")?;
    let target_model = required(body.target_model, "target_model")?;

    let optimized_prompt = state
        .prompt_service
        .optimize(&existing_prompt, platform, body.content_type, target_model)
        .await?;

    Ok(Json(ApiResponse::new(OptimizeResponse {
        optimized_prompt,
        platform,
        target_model,
    })))
}

// ---------------------------------------------------------------------------
// Metrics and cache
// ---------------------------------------------------------------------------

/// GET /prompts/metrics
pub async fn get_metrics(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MetricsResponse>>> {
    let metrics = state.prompt_service.metrics();

    Ok(Json(ApiResponse::new(MetricsResponse {
        total_generations: metrics.total_generations().await,
        cache_entries: state.prompt_service.cache().len().await,
        series: metrics.summary().await,
    })))
}

/// DELETE /prompts/cache
pub async fn clear_cache(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CacheClearedResponse>>> {
    let cleared = state.prompt_service.cache().clear().await;
    tracing::info!(cleared, "Prompt cache cleared");
    Ok(Json(ApiResponse::new(CacheClearedResponse { cleared })))
}
