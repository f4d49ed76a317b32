//! Shared domain types for prompt generation.
//!
//! Enums serialize to the lowercase / kebab-case strings used on the wire
//! (`"instagram"`, `"image"`, `"flux-pro"`, `"kling-v1-6"`).

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Target publishing destination for generated media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Tiktok,
    Youtube,
    #[serde(alias = "x")]
    Twitter,
    Linkedin,
    Facebook,
    Pinterest,
    General,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Youtube,
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Facebook,
        Platform::Pinterest,
        Platform::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Facebook => "facebook",
            Platform::Pinterest => "pinterest",
            Platform::General => "general",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Content type
// ---------------------------------------------------------------------------

/// Kind of media a prompt is being written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Image,
    Video,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Image => "image",
            ContentType::Video => "video",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Target models
// ---------------------------------------------------------------------------

/// Black Forest Labs image models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FluxModel {
    #[serde(rename = "flux-pro")]
    FluxPro,
    #[serde(rename = "flux-pro-1.1")]
    FluxPro11,
    #[serde(rename = "flux-pro-1.1-ultra")]
    FluxPro11Ultra,
    #[serde(rename = "flux-dev")]
    FluxDev,
    #[serde(rename = "flux-schnell")]
    FluxSchnell,
}

impl FluxModel {
    pub fn as_str(self) -> &'static str {
        match self {
            FluxModel::FluxPro => "flux-pro",
            FluxModel::FluxPro11 => "flux-pro-1.1",
            FluxModel::FluxPro11Ultra => "flux-pro-1.1-ultra",
            FluxModel::FluxDev => "flux-dev",
            FluxModel::FluxSchnell => "flux-schnell",
        }
    }
}

/// Kling video models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KlingModel {
    #[serde(rename = "kling-v1")]
    V1,
    #[serde(rename = "kling-v1-5")]
    V1_5,
    #[serde(rename = "kling-v1-6")]
    V1_6,
    #[serde(rename = "kling-v2-master")]
    V2Master,
}

impl KlingModel {
    pub fn as_str(self) -> &'static str {
        match self {
            KlingModel::V1 => "kling-v1",
            KlingModel::V1_5 => "kling-v1-5",
            KlingModel::V1_6 => "kling-v1-6",
            KlingModel::V2Master => "kling-v2-master",
        }
    }
}

/// The downstream generation model a prompt is optimized for.
///
/// Serialized as the bare model name, so `"flux-pro"` and `"kling-v1-6"`
/// both deserialize into the right variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetModel {
    Flux(FluxModel),
    Kling(KlingModel),
}

impl TargetModel {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetModel::Flux(m) => m.as_str(),
            TargetModel::Kling(m) => m.as_str(),
        }
    }

    /// The only content type this model can produce.
    pub fn content_type(self) -> ContentType {
        match self {
            TargetModel::Flux(_) => ContentType::Image,
            TargetModel::Kling(_) => ContentType::Video,
        }
    }
}

impl fmt::Display for TargetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FluxModel> for TargetModel {
    fn from(model: FluxModel) -> Self {
        TargetModel::Flux(model)
    }
}

impl From<KlingModel> for TargetModel {
    fn from(model: KlingModel) -> Self {
        TargetModel::Kling(model)
    }
}

// ---------------------------------------------------------------------------
// Pipeline records
// ---------------------------------------------------------------------------

/// Context inferred from raw user intent by the first pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextData {
    pub content_type: ContentType,
    pub industry: String,
    pub objective: String,
    pub audience: String,
    pub visual_style: String,
    pub temporal_context: String,
    pub trending_topics: Vec<String>,
}

/// Output of a single pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub agent_name: String,
    pub content: String,
    /// Stage self-reported confidence, clamped to `[0, 1]`.
    pub confidence: f64,
    /// Wall-clock duration of the stage's completion call in milliseconds.
    pub processing_time: u64,
}

/// Camera and motion parameters produced for video prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSpecs {
    pub duration_seconds: u32,
    pub aspect_ratio: String,
    pub camera_movement: String,
    pub motion_intensity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub context_data: ContextData,
    /// Sum of per-stage processing times in milliseconds.
    pub processing_time: u64,
    pub agents_used: Vec<String>,
    pub confidence_score: f64,
    pub target_model: TargetModel,
    pub content_type: ContentType,
    pub estimated_tokens: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_specs: Option<VideoSpecs>,
}

/// Terminal artifact of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub final_prompt: String,
    pub metadata: GenerationMetadata,
    /// Stage outputs in execution order.
    pub agent_responses: Vec<AgentResponse>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
