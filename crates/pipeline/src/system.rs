//! The prompt-agent pipeline.
//!
//! One run executes four stages strictly in sequence, each a single
//! completion call:
//!
//! | # | Stage                                   | Produces                          |
//! |---|-----------------------------------------|-----------------------------------|
//! | 1 | `context_analyzer`                      | [`ContextData`]                   |
//! | 2 | `visual_generator` / `video_generator`  | draft prompt (+ [`VideoSpecs`])   |
//! | 3 | `model_optimizer`                       | prompt shaped for the target model |
//! | 4 | `coordinator`                           | final prompt                      |
//!
//! Any stage failure aborts the run; there are no retries and no partial
//! results.

use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use mediaforge_core::model_config::{aspect_ratio_for, snap_kling_duration, DEFAULT_KLING_DURATION};
use mediaforge_core::request::{
    resolve_content_type, validate_existing_prompt, validate_variation_count,
    PromptGenerationRequest,
};
use mediaforge_core::tokens::estimate_token_count;
use mediaforge_core::types::{
    AgentResponse, ContentType, ContextData, GenerationMetadata, GenerationResponse, Platform,
    TargetModel, VideoSpecs,
};
use mediaforge_providers::completion::{CompletionProvider, CompletionRequest, DEFAULT_MODEL};

use crate::confidence::aggregate_confidence;
use crate::error::PipelineError;
use crate::parse::{
    normalize_confidence, parse_stage_reply, require_text, ContextReply, CoordinatorReply,
    OptimizerReply, VideoReply, VisualReply,
};
use crate::prompts::{self, StagePrompt};
use crate::stages::{CONTEXT_ANALYZER, COORDINATOR, MODEL_OPTIMIZER, VIDEO_GENERATOR, VISUAL_GENERATOR};

/// Default sampling temperature for a single run.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion token budget per stage.
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Temperature added per variation index.
const VARIATION_TEMPERATURE_STEP: f32 = 0.15;

/// Upper bound for variation temperatures.
const MAX_TEMPERATURE: f32 = 1.3;

const DEFAULT_CAMERA_MOVEMENT: &str = "static";
const DEFAULT_MOTION_INTENSITY: &str = "moderate";

/// Completion parameters shared by every stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Sampling temperature for the `index`-th variation.
pub fn variation_temperature(base: f32, index: usize) -> f32 {
    (base + VARIATION_TEMPERATURE_STEP * index as f32).min(MAX_TEMPERATURE)
}

/// Raw text and timing of one completion call.
struct StageOutput {
    text: String,
    elapsed_ms: u64,
}

/// Result of the drafting stage.
struct Draft {
    prompt: String,
    response: AgentResponse,
    video_specs: Option<VideoSpecs>,
}

pub struct PromptAgentSystem {
    provider: Arc<dyn CompletionProvider>,
    settings: PipelineSettings,
}

impl PromptAgentSystem {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: PipelineSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run the full pipeline once.
    pub async fn generate_prompt(
        &self,
        request: &PromptGenerationRequest,
    ) -> Result<GenerationResponse, PipelineError> {
        self.run(request, self.settings.temperature).await
    }

    /// Run the pipeline `count` times concurrently, each run with its own
    /// temperature. Fails as a whole if any run fails.
    pub async fn generate_variations(
        &self,
        request: &PromptGenerationRequest,
        count: usize,
    ) -> Result<Vec<GenerationResponse>, PipelineError> {
        validate_variation_count(count)?;

        let runs = (0..count)
            .map(|index| self.run(request, variation_temperature(self.settings.temperature, index)));
        let variations = try_join_all(runs).await?;

        tracing::info!(
            count = variations.len(),
            platform = %request.platform(),
            target_model = %request.target_model(),
            "Prompt variations generated",
        );
        Ok(variations)
    }

    /// Rewrite an existing prompt for `target_model` using only the
    /// optimization stage.
    pub async fn optimize_existing_prompt(
        &self,
        existing_prompt: &str,
        platform: Platform,
        content_type: Option<ContentType>,
        target_model: TargetModel,
    ) -> Result<String, PipelineError> {
        let existing_prompt = existing_prompt.trim();
        validate_existing_prompt(existing_prompt)?;
        let content_type = resolve_content_type(content_type, target_model)?;

        let prompt = prompts::model_optimizer(existing_prompt, platform, content_type, target_model);
        let output = self
            .call_stage(MODEL_OPTIMIZER, prompt, self.settings.temperature)
            .await?;
        let reply: OptimizerReply = parse_stage_reply(MODEL_OPTIMIZER, &output.text)?;
        let optimized = require_text(MODEL_OPTIMIZER, "optimized_prompt", reply.optimized_prompt)?;

        tracing::info!(
            %platform,
            %target_model,
            elapsed_ms = output.elapsed_ms,
            "Existing prompt optimized",
        );
        Ok(optimized)
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    async fn run(
        &self,
        request: &PromptGenerationRequest,
        temperature: f32,
    ) -> Result<GenerationResponse, PipelineError> {
        let (context, context_response) = self.analyze_context(request, temperature).await?;

        let draft = match request.content_type() {
            ContentType::Image => self.draft_visual(request, &context, temperature).await?,
            ContentType::Video => self.draft_video(request, &context, temperature).await?,
        };

        let (optimized, optimizer_response) = self
            .optimize_draft(request, &draft.prompt, temperature)
            .await?;

        let (final_prompt, coordinator_response) = self
            .coordinate(request, &context, &draft.prompt, &optimized, temperature)
            .await?;

        let agent_responses = vec![
            context_response,
            draft.response,
            optimizer_response,
            coordinator_response,
        ];

        let metadata = GenerationMetadata {
            context_data: context,
            processing_time: agent_responses.iter().map(|r| r.processing_time).sum(),
            agents_used: agent_responses.iter().map(|r| r.agent_name.clone()).collect(),
            confidence_score: aggregate_confidence(&agent_responses),
            target_model: request.target_model(),
            content_type: request.content_type(),
            estimated_tokens: estimate_token_count(&final_prompt),
            video_specs: draft.video_specs,
        };

        tracing::info!(
            content_type = %metadata.content_type,
            platform = %request.platform(),
            target_model = %metadata.target_model,
            processing_time_ms = metadata.processing_time,
            confidence = metadata.confidence_score,
            "Prompt pipeline completed",
        );

        Ok(GenerationResponse {
            final_prompt,
            metadata,
            agent_responses,
        })
    }

    async fn analyze_context(
        &self,
        request: &PromptGenerationRequest,
        temperature: f32,
    ) -> Result<(ContextData, AgentResponse), PipelineError> {
        let output = self
            .call_stage(CONTEXT_ANALYZER, prompts::context_analyzer(request), temperature)
            .await?;
        let reply: ContextReply = parse_stage_reply(CONTEXT_ANALYZER, &output.text)?;

        let context = ContextData {
            content_type: request.content_type(),
            industry: reply.industry,
            objective: reply.objective,
            audience: reply.audience,
            visual_style: reply.visual_style,
            temporal_context: reply.temporal_context,
            trending_topics: reply.trending_topics,
        };
        let content = serde_json::to_string(&context).map_err(|e| PipelineError::Unparsable {
            agent: CONTEXT_ANALYZER,
            message: e.to_string(),
        })?;

        let response = agent_response(CONTEXT_ANALYZER, content, reply.confidence, &output);
        Ok((context, response))
    }

    async fn draft_visual(
        &self,
        request: &PromptGenerationRequest,
        context: &ContextData,
        temperature: f32,
    ) -> Result<Draft, PipelineError> {
        let output = self
            .call_stage(
                VISUAL_GENERATOR,
                prompts::visual_generator(request, context),
                temperature,
            )
            .await?;
        let reply: VisualReply = parse_stage_reply(VISUAL_GENERATOR, &output.text)?;
        let prompt = require_text(VISUAL_GENERATOR, "prompt", reply.prompt)?;

        Ok(Draft {
            response: agent_response(VISUAL_GENERATOR, prompt.clone(), reply.confidence, &output),
            prompt,
            video_specs: None,
        })
    }

    async fn draft_video(
        &self,
        request: &PromptGenerationRequest,
        context: &ContextData,
        temperature: f32,
    ) -> Result<Draft, PipelineError> {
        let output = self
            .call_stage(
                VIDEO_GENERATOR,
                prompts::video_generator(request, context),
                temperature,
            )
            .await?;
        let reply: VideoReply = parse_stage_reply(VIDEO_GENERATOR, &output.text)?;
        let prompt = require_text(VIDEO_GENERATOR, "prompt", reply.prompt)?;

        let video_specs = VideoSpecs {
            duration_seconds: snap_kling_duration(
                reply.duration_seconds.unwrap_or(DEFAULT_KLING_DURATION),
            ),
            aspect_ratio: aspect_ratio_for(request.platform(), ContentType::Video).to_string(),
            camera_movement: non_blank_or(reply.camera_movement, DEFAULT_CAMERA_MOVEMENT),
            motion_intensity: non_blank_or(reply.motion_intensity, DEFAULT_MOTION_INTENSITY),
        };

        Ok(Draft {
            response: agent_response(VIDEO_GENERATOR, prompt.clone(), reply.confidence, &output),
            prompt,
            video_specs: Some(video_specs),
        })
    }

    async fn optimize_draft(
        &self,
        request: &PromptGenerationRequest,
        draft: &str,
        temperature: f32,
    ) -> Result<(String, AgentResponse), PipelineError> {
        let prompt = prompts::model_optimizer(
            draft,
            request.platform(),
            request.content_type(),
            request.target_model(),
        );
        let output = self.call_stage(MODEL_OPTIMIZER, prompt, temperature).await?;
        let reply: OptimizerReply = parse_stage_reply(MODEL_OPTIMIZER, &output.text)?;
        let optimized = require_text(MODEL_OPTIMIZER, "optimized_prompt", reply.optimized_prompt)?;

        let response = agent_response(MODEL_OPTIMIZER, optimized.clone(), reply.confidence, &output);
        Ok((optimized, response))
    }

    async fn coordinate(
        &self,
        request: &PromptGenerationRequest,
        context: &ContextData,
        draft: &str,
        optimized: &str,
        temperature: f32,
    ) -> Result<(String, AgentResponse), PipelineError> {
        let prompt = prompts::coordinator(request, context, draft, optimized);
        let output = self.call_stage(COORDINATOR, prompt, temperature).await?;
        let reply: CoordinatorReply = parse_stage_reply(COORDINATOR, &output.text)?;
        let final_prompt = require_text(COORDINATOR, "final_prompt", reply.final_prompt)?;

        let response = agent_response(COORDINATOR, final_prompt.clone(), reply.confidence, &output);
        Ok((final_prompt, response))
    }

    /// Issue one completion call and time it.
    async fn call_stage(
        &self,
        agent: &'static str,
        prompt: StagePrompt,
        temperature: f32,
    ) -> Result<StageOutput, PipelineError> {
        let request = CompletionRequest::new(prompt.system, prompt.user, self.settings.model.as_str())
            .with_temperature(temperature)
            .with_max_tokens(self.settings.max_tokens);

        let started = Instant::now();
        let result = self.provider.complete(&request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                tracing::debug!(agent, elapsed_ms, "Stage completed");
                Ok(StageOutput { text, elapsed_ms })
            }
            Err(source) => {
                tracing::warn!(agent, elapsed_ms, error = %source, "Stage failed");
                Err(PipelineError::Stage { agent, source })
            }
        }
    }
}

fn agent_response(
    agent: &'static str,
    content: String,
    confidence: Option<f64>,
    output: &StageOutput,
) -> AgentResponse {
    AgentResponse {
        agent_name: agent.to_string(),
        content,
        confidence: normalize_confidence(confidence),
        processing_time: output.elapsed_ms,
    }
}

fn non_blank_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
