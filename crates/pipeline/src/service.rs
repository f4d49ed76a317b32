//! Composition of the pipeline with the shared cache and metrics.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mediaforge_core::cache::PromptCache;
use mediaforge_core::metrics::{GenerationRecord, MetricsCollector};
use mediaforge_core::request::PromptGenerationRequest;
use mediaforge_core::types::{ContentType, GenerationResponse, Platform, TargetModel};

use crate::error::PipelineError;
use crate::system::PromptAgentSystem;

/// Front door for prompt generation.
///
/// `generate` is cache-first; variations always run the pipeline. Every
/// pipeline run (not cache hits) is recorded in the metrics collector.
pub struct PromptService {
    system: PromptAgentSystem,
    cache: Arc<PromptCache>,
    metrics: Arc<MetricsCollector>,
    cache_ttl: Option<Duration>,
}

impl PromptService {
    pub fn new(
        system: PromptAgentSystem,
        cache: Arc<PromptCache>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            system,
            cache,
            metrics,
            cache_ttl: None,
        }
    }

    /// Override the TTL used when storing results (defaults to the cache's).
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn cache(&self) -> &Arc<PromptCache> {
        &self.cache
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    pub async fn generate(
        &self,
        request: &PromptGenerationRequest,
    ) -> Result<GenerationResponse, PipelineError> {
        if let Some(cached) = self.cache.get(request).await {
            tracing::debug!(
                platform = %request.platform(),
                target_model = %request.target_model(),
                "Prompt cache hit",
            );
            return Ok(cached);
        }

        let response = self.system.generate_prompt(request).await?;
        self.record(request, &response).await;
        self.cache.set(request, response.clone(), self.cache_ttl).await;
        Ok(response)
    }

    pub async fn generate_variations(
        &self,
        request: &PromptGenerationRequest,
        count: usize,
    ) -> Result<Vec<GenerationResponse>, PipelineError> {
        let variations = self.system.generate_variations(request, count).await?;
        for variation in &variations {
            self.record(request, variation).await;
        }
        Ok(variations)
    }

    pub async fn optimize(
        &self,
        existing_prompt: &str,
        platform: Platform,
        content_type: Option<ContentType>,
        target_model: TargetModel,
    ) -> Result<String, PipelineError> {
        self.system
            .optimize_existing_prompt(existing_prompt, platform, content_type, target_model)
            .await
    }

    async fn record(&self, request: &PromptGenerationRequest, response: &GenerationResponse) {
        let record = GenerationRecord {
            timestamp: Utc::now(),
            content_type: request.content_type(),
            platform: request.platform(),
            model: request.target_model(),
            processing_time: response.metadata.processing_time,
            confidence: response.metadata.confidence_score,
            prompt_length: response.final_prompt.chars().count(),
            agents_used: response.metadata.agents_used.len(),
        };
        self.metrics.record_generation(record).await;
    }
}
