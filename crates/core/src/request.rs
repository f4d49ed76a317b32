//! Validated prompt generation requests and request-level limits.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{ContentType, Platform, TargetModel};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of raw user input in characters.
pub const MAX_USER_INPUT_LENGTH: usize = 2_000;

/// Maximum length of an existing prompt submitted for optimization.
pub const MAX_EXISTING_PROMPT_LENGTH: usize = 5_000;

/// Maximum length of a style preference hint.
pub const MAX_STYLE_PREFERENCE_LENGTH: usize = 200;

/// Bounds on the number of variations per request.
pub const MIN_VARIATIONS: usize = 1;
pub const MAX_VARIATIONS: usize = 5;

/// Variation count used when the caller does not specify one.
pub const DEFAULT_VARIATIONS: usize = 3;

// ---------------------------------------------------------------------------
// PromptGenerationRequest
// ---------------------------------------------------------------------------

/// Input to one pipeline run.
///
/// Fields are private so every instance has passed [`PromptGenerationRequest::new`];
/// the request is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptGenerationRequest {
    user_input: String,
    platform: Platform,
    content_type: ContentType,
    target_model: TargetModel,
    style_preference: Option<String>,
}

impl PromptGenerationRequest {
    /// Build a request, validating input lengths and model/content agreement.
    ///
    /// When `content_type` is `None` it is taken from the model kind.
    /// `user_input` is trimmed; a blank `style_preference` is dropped.
    pub fn new(
        user_input: &str,
        platform: Platform,
        content_type: Option<ContentType>,
        target_model: TargetModel,
        style_preference: Option<&str>,
    ) -> Result<Self, CoreError> {
        let user_input = user_input.trim();
        validate_user_input(user_input)?;
        let content_type = resolve_content_type(content_type, target_model)?;

        let style_preference = style_preference
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.chars().count() > MAX_STYLE_PREFERENCE_LENGTH {
                    Err(CoreError::Validation(format!(
                        "style_preference exceeds maximum length of {MAX_STYLE_PREFERENCE_LENGTH} characters"
                    )))
                } else {
                    Ok(s.to_string())
                }
            })
            .transpose()?;

        Ok(Self {
            user_input: user_input.to_string(),
            platform,
            content_type,
            target_model,
            style_preference,
        })
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn target_model(&self) -> TargetModel {
        self.target_model
    }

    pub fn style_preference(&self) -> Option<&str> {
        self.style_preference.as_deref()
    }

    /// Cache key derived from content type, platform, target model and the
    /// JSON-serialized user input.
    pub fn cache_key(&self) -> String {
        let input = serde_json::Value::String(self.user_input.clone());
        format!(
            "{}:{}:{}:{}",
            self.content_type, self.platform, self.target_model, input
        )
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate raw user input: must be non-empty and within length limit.
pub fn validate_user_input(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "user_input must not be empty".to_string(),
        ));
    }
    let len = text.chars().count();
    if len > MAX_USER_INPUT_LENGTH {
        return Err(CoreError::Validation(format!(
            "user_input exceeds maximum length of {MAX_USER_INPUT_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate a prompt submitted for optimization.
pub fn validate_existing_prompt(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "existing_prompt must not be empty".to_string(),
        ));
    }
    let len = text.chars().count();
    if len > MAX_EXISTING_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "existing_prompt exceeds maximum length of {MAX_EXISTING_PROMPT_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate the number of requested variations.
pub fn validate_variation_count(count: usize) -> Result<(), CoreError> {
    if !(MIN_VARIATIONS..=MAX_VARIATIONS).contains(&count) {
        return Err(CoreError::Validation(format!(
            "count must be between {MIN_VARIATIONS} and {MAX_VARIATIONS} (got {count})"
        )));
    }
    Ok(())
}

/// Resolve the content type for `target_model`, rejecting mismatches.
pub fn resolve_content_type(
    content_type: Option<ContentType>,
    target_model: TargetModel,
) -> Result<ContentType, CoreError> {
    let implied = target_model.content_type();
    match content_type {
        None => Ok(implied),
        Some(ct) if ct == implied => Ok(ct),
        Some(ct) => Err(CoreError::Validation(format!(
            "target_model '{target_model}' produces {implied} content, not {ct}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
