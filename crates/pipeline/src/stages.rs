//! Stage names and ordering.

use mediaforge_core::types::ContentType;

pub const CONTEXT_ANALYZER: &str = "context_analyzer";
pub const VISUAL_GENERATOR: &str = "visual_generator";
pub const VIDEO_GENERATOR: &str = "video_generator";
pub const MODEL_OPTIMIZER: &str = "model_optimizer";
pub const COORDINATOR: &str = "coordinator";

/// Number of stages in one pipeline run, for either content type.
pub const STAGE_COUNT: usize = 4;

/// Name of the drafting stage for a content type.
pub fn drafting_stage(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Image => VISUAL_GENERATOR,
        ContentType::Video => VIDEO_GENERATOR,
    }
}

/// Stage names in execution order.
pub fn stage_order(content_type: ContentType) -> [&'static str; STAGE_COUNT] {
    [
        CONTEXT_ANALYZER,
        drafting_stage(content_type),
        MODEL_OPTIMIZER,
        COORDINATOR,
    ]
}
