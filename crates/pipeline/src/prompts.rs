//! Instructions sent to the completion model for each stage.
//!
//! Every system prompt names the stage's role and the exact JSON object the
//! stage must answer with; see [`crate::parse`] for the matching reply types.

use std::fmt::Write as _;

use mediaforge_core::model_config::{aspect_ratio_for, model_profile, platform_profile, KLING_DURATIONS};
use mediaforge_core::request::PromptGenerationRequest;
use mediaforge_core::types::{ContentType, ContextData, Platform, TargetModel};

/// System and user prompt for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePrompt {
    pub system: String,
    pub user: String,
}

const JSON_ONLY: &str = "Respond with a single JSON object and nothing else.";

fn describe_platform(platform: Platform) -> String {
    format!("{platform} ({})", platform_profile(platform).style_guidance)
}

fn describe_context(context: &ContextData) -> String {
    let topics = if context.trending_topics.is_empty() {
        "none".to_string()
    } else {
        context.trending_topics.join(", ")
    };
    format!(
        "Industry: {}\nObjective: {}\nAudience: {}\nVisual style: {}\nTemporal context: {}\nTrending topics: {}",
        context.industry,
        context.objective,
        context.audience,
        context.visual_style,
        context.temporal_context,
        topics,
    )
}

fn request_header(request: &PromptGenerationRequest) -> String {
    let mut out = format!(
        "User request: {}\nPlatform: {}\nTarget model: {}",
        request.user_input(),
        describe_platform(request.platform()),
        request.target_model(),
    );
    if let Some(style) = request.style_preference() {
        let _ = write!(out, "\nStyle preference: {style}");
    }
    out
}

// ---------------------------------------------------------------------------
// Stage 1: context analysis
// ---------------------------------------------------------------------------

pub fn context_analyzer(request: &PromptGenerationRequest) -> StagePrompt {
    let system = format!(
        "You are the context analysis agent in a prompt-engineering pipeline for AI {} generation. \
         Infer the intent behind the user's request. {JSON_ONLY} Keys: \
         \"industry\", \"objective\", \"audience\", \"visual_style\", \"temporal_context\" (strings), \
         \"trending_topics\" (array of strings, may be empty), \
         \"confidence\" (number between 0 and 1).",
        request.content_type(),
    );
    StagePrompt {
        system,
        user: request_header(request),
    }
}

// ---------------------------------------------------------------------------
// Stage 2: drafting
// ---------------------------------------------------------------------------

pub fn visual_generator(request: &PromptGenerationRequest, context: &ContextData) -> StagePrompt {
    let system = format!(
        "You are the visual generation agent in a prompt-engineering pipeline. \
         Write a vivid, concrete image prompt that serves the analysed context. \
         Cover subject, composition, lighting, colour palette and style. {JSON_ONLY} Keys: \
         \"prompt\" (string), \"confidence\" (number between 0 and 1)."
    );
    let user = format!(
        "{}\nAspect ratio: {}\n\nContext:\n{}",
        request_header(request),
        aspect_ratio_for(request.platform(), ContentType::Image),
        describe_context(context),
    );
    StagePrompt { system, user }
}

pub fn video_generator(request: &PromptGenerationRequest, context: &ContextData) -> StagePrompt {
    let durations = KLING_DURATIONS
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" or ");
    let system = format!(
        "You are the video generation agent in a prompt-engineering pipeline. \
         Write a single-shot video prompt describing the subject, its motion, the camera \
         movement and the pacing. {JSON_ONLY} Keys: \"prompt\" (string), \
         \"camera_movement\" (string), \"motion_intensity\" (\"low\", \"moderate\" or \"high\"), \
         \"duration_seconds\" ({durations}), \"confidence\" (number between 0 and 1)."
    );
    let user = format!(
        "{}\nAspect ratio: {}\n\nContext:\n{}",
        request_header(request),
        aspect_ratio_for(request.platform(), ContentType::Video),
        describe_context(context),
    );
    StagePrompt { system, user }
}

// ---------------------------------------------------------------------------
// Stage 3: model optimization
// ---------------------------------------------------------------------------

pub fn model_optimizer(
    draft: &str,
    platform: Platform,
    content_type: ContentType,
    target_model: TargetModel,
) -> StagePrompt {
    let profile = model_profile(target_model);

    let mut system = format!(
        "You are the model optimization agent in a prompt-engineering pipeline. \
         Rewrite the prompt so it gets the best results from {}. \
         Follow this structure: {}\nGuidelines:",
        profile.display_name, profile.template,
    );
    for guideline in profile.guidelines {
        let _ = write!(system, "\n- {guideline}");
    }
    let _ = write!(
        system,
        "\nKeep it under {} words. {JSON_ONLY} Keys: \"optimized_prompt\" (string), \
         \"confidence\" (number between 0 and 1).",
        profile.max_prompt_words,
    );

    let user = format!(
        "Prompt to optimize:\n{draft}\n\nContent type: {content_type}\nPlatform: {}\nAspect ratio: {}",
        describe_platform(platform),
        aspect_ratio_for(platform, content_type),
    );
    StagePrompt { system, user }
}

// ---------------------------------------------------------------------------
// Stage 4: coordination
// ---------------------------------------------------------------------------

pub fn coordinator(
    request: &PromptGenerationRequest,
    context: &ContextData,
    draft: &str,
    optimized: &str,
) -> StagePrompt {
    let system = format!(
        "You are the coordinator agent in a prompt-engineering pipeline for AI {} generation. \
         Merge the stage outputs into one final prompt that keeps the optimized structure, \
         stays faithful to the user's request and fits the platform. {JSON_ONLY} Keys: \
         \"final_prompt\" (string), \"confidence\" (number between 0 and 1).",
        request.content_type(),
    );
    let user = format!(
        "{}\n\nContext:\n{}\n\nDraft prompt:\n{draft}\n\nOptimized prompt:\n{optimized}",
        request_header(request),
        describe_context(context),
    );
    StagePrompt { system, user }
}
