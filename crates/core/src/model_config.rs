//! Static lookup tables for target models and publishing platforms.
//!
//! The optimization stage injects a model's prompt template and guideline
//! list into its instructions; the video stage and the image routes read the
//! platform's preferred aspect ratios.

use crate::error::CoreError;
use crate::types::{ContentType, FluxModel, KlingModel, Platform, TargetModel};

// ---------------------------------------------------------------------------
// Model profiles
// ---------------------------------------------------------------------------

/// Prompt-writing rules for a single generation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelProfile {
    pub display_name: &'static str,
    /// Structural template the optimized prompt should follow.
    pub template: &'static str,
    pub guidelines: &'static [&'static str],
    /// Soft upper bound on prompt length in words.
    pub max_prompt_words: usize,
}

const FLUX_TEMPLATE: &str =
    "[main subject], [action or pose], [environment], [lighting], [camera and lens], [artistic style], [mood]";

const FLUX_GUIDELINES: &[&str] = &[
    "Lead with the main subject and describe it concretely",
    "State the lighting explicitly (direction, quality, colour temperature)",
    "Name a camera, lens or film stock for photographic looks",
    "Describe what should appear instead of what should not",
    "Put any text to render inside double quotes",
];

const FLUX_FAST_GUIDELINES: &[&str] = &[
    "Lead with the main subject",
    "Keep to one scene and one style",
    "Prefer short comma-separated descriptive phrases",
];

const KLING_TEMPLATE: &str =
    "[subject] [single clear action], [camera movement], [environment], [lighting], [visual style], [pacing]";

const KLING_GUIDELINES: &[&str] = &[
    "Describe one continuous shot without scene cuts",
    "Give the subject one clear, physically plausible action",
    "Specify exactly one camera movement (e.g. slow dolly in, orbit, static)",
    "State the motion speed and intensity",
    "Keep the environment stable across the clip",
];

const KLING_V2_GUIDELINES: &[&str] = &[
    "Describe one continuous shot without scene cuts",
    "Sequence up to two actions with temporal words (first, then)",
    "Specify the camera movement and its speed",
    "Describe facial expression and body language for people",
    "Keep the environment stable across the clip",
];

/// Look up the prompt-writing profile for a target model.
pub fn model_profile(model: TargetModel) -> ModelProfile {
    match model {
        TargetModel::Flux(flux) => flux_profile(flux),
        TargetModel::Kling(kling) => kling_profile(kling),
    }
}

fn flux_profile(model: FluxModel) -> ModelProfile {
    match model {
        FluxModel::FluxPro => ModelProfile {
            display_name: "FLUX.1 [pro]",
            template: FLUX_TEMPLATE,
            guidelines: FLUX_GUIDELINES,
            max_prompt_words: 150,
        },
        FluxModel::FluxPro11 => ModelProfile {
            display_name: "FLUX1.1 [pro]",
            template: FLUX_TEMPLATE,
            guidelines: FLUX_GUIDELINES,
            max_prompt_words: 150,
        },
        FluxModel::FluxPro11Ultra => ModelProfile {
            display_name: "FLUX1.1 [pro] Ultra",
            template: FLUX_TEMPLATE,
            guidelines: FLUX_GUIDELINES,
            max_prompt_words: 200,
        },
        FluxModel::FluxDev => ModelProfile {
            display_name: "FLUX.1 [dev]",
            template: FLUX_TEMPLATE,
            guidelines: FLUX_GUIDELINES,
            max_prompt_words: 120,
        },
        FluxModel::FluxSchnell => ModelProfile {
            display_name: "FLUX.1 [schnell]",
            template: "[main subject], [environment], [style]",
            guidelines: FLUX_FAST_GUIDELINES,
            max_prompt_words: 60,
        },
    }
}

fn kling_profile(model: KlingModel) -> ModelProfile {
    match model {
        KlingModel::V1 => ModelProfile {
            display_name: "Kling 1.0",
            template: KLING_TEMPLATE,
            guidelines: KLING_GUIDELINES,
            max_prompt_words: 80,
        },
        KlingModel::V1_5 => ModelProfile {
            display_name: "Kling 1.5",
            template: KLING_TEMPLATE,
            guidelines: KLING_GUIDELINES,
            max_prompt_words: 100,
        },
        KlingModel::V1_6 => ModelProfile {
            display_name: "Kling 1.6",
            template: KLING_TEMPLATE,
            guidelines: KLING_GUIDELINES,
            max_prompt_words: 100,
        },
        KlingModel::V2Master => ModelProfile {
            display_name: "Kling 2.0 Master",
            template: KLING_TEMPLATE,
            guidelines: KLING_V2_GUIDELINES,
            max_prompt_words: 120,
        },
    }
}

// ---------------------------------------------------------------------------
// Kling clip durations
// ---------------------------------------------------------------------------

/// Clip lengths (seconds) Kling accepts.
pub const KLING_DURATIONS: &[u32] = &[5, 10];

/// Default Kling clip length in seconds.
pub const DEFAULT_KLING_DURATION: u32 = 5;

/// Snap a requested duration to the nearest supported Kling duration.
pub fn snap_kling_duration(requested: u32) -> u32 {
    KLING_DURATIONS
        .iter()
        .copied()
        .min_by_key(|d| d.abs_diff(requested))
        .unwrap_or(DEFAULT_KLING_DURATION)
}

// ---------------------------------------------------------------------------
// Platform profiles
// ---------------------------------------------------------------------------

/// Publishing conventions for a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    pub image_aspect_ratio: &'static str,
    /// Always one of the ratios Kling accepts (`16:9`, `9:16`, `1:1`).
    pub video_aspect_ratio: &'static str,
    pub style_guidance: &'static str,
}

pub fn platform_profile(platform: Platform) -> PlatformProfile {
    match platform {
        Platform::Instagram => PlatformProfile {
            image_aspect_ratio: "4:5",
            video_aspect_ratio: "9:16",
            style_guidance: "Polished, scroll-stopping visuals with strong colour and a clear focal point",
        },
        Platform::Tiktok => PlatformProfile {
            image_aspect_ratio: "9:16",
            video_aspect_ratio: "9:16",
            style_guidance: "Energetic, authentic, vertical framing with motion in the first second",
        },
        Platform::Youtube => PlatformProfile {
            image_aspect_ratio: "16:9",
            video_aspect_ratio: "16:9",
            style_guidance: "Cinematic widescreen composition with readable subjects at thumbnail size",
        },
        Platform::Twitter => PlatformProfile {
            image_aspect_ratio: "16:9",
            video_aspect_ratio: "16:9",
            style_guidance: "Bold, simple compositions that read instantly in a fast feed",
        },
        Platform::Linkedin => PlatformProfile {
            image_aspect_ratio: "1:1",
            video_aspect_ratio: "16:9",
            style_guidance: "Professional, clean and credible with restrained colour",
        },
        Platform::Facebook => PlatformProfile {
            image_aspect_ratio: "1:1",
            video_aspect_ratio: "1:1",
            style_guidance: "Warm, relatable, community-oriented imagery",
        },
        Platform::Pinterest => PlatformProfile {
            image_aspect_ratio: "2:3",
            video_aspect_ratio: "9:16",
            style_guidance: "Aspirational, aesthetic, tall compositions with tidy styling",
        },
        Platform::General => PlatformProfile {
            image_aspect_ratio: "1:1",
            video_aspect_ratio: "16:9",
            style_guidance: "Versatile, high-quality visuals without platform-specific cropping",
        },
    }
}

/// Preferred aspect ratio for `content_type` on `platform`.
pub fn aspect_ratio_for(platform: Platform, content_type: ContentType) -> &'static str {
    let profile = platform_profile(platform);
    match content_type {
        ContentType::Image => profile.image_aspect_ratio,
        ContentType::Video => profile.video_aspect_ratio,
    }
}

// ---------------------------------------------------------------------------
// Image dimensions
// ---------------------------------------------------------------------------

/// Flux requires width and height to be multiples of this value.
pub const FLUX_DIMENSION_STEP: u32 = 32;

/// Pixel dimensions (width, height) for a supported aspect ratio.
pub fn dimensions_for_aspect_ratio(aspect_ratio: &str) -> Result<(u32, u32), CoreError> {
    match aspect_ratio {
        "1:1" => Ok((1024, 1024)),
        "4:5" => Ok((896, 1120)),
        "2:3" => Ok((832, 1248)),
        "9:16" => Ok((768, 1344)),
        "16:9" => Ok((1344, 768)),
        other => Err(CoreError::Validation(format!(
            "Unsupported aspect ratio '{other}'. Must be one of: 1:1, 4:5, 2:3, 9:16, 16:9"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
