use std::sync::Arc;

use mediaforge_core::cache::PromptCache;
use mediaforge_core::metrics::MetricsCollector;
use mediaforge_core::rate_limit::RateLimiter;
use mediaforge_pipeline::{PipelineSettings, PromptAgentSystem, PromptService};
use mediaforge_providers::aiml::AimlClient;
use mediaforge_providers::bfl::BflClient;
use mediaforge_providers::completion::CompletionProvider;
use mediaforge_providers::kling::KlingClient;
use mediaforge_providers::replicate::ReplicateClient;

use crate::config::{ProviderConfig, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Cache-first prompt generation; owns the shared cache and metrics.
    pub prompt_service: Arc<PromptService>,
    /// Per-client limiter used by the opt-in rate-limit extractor.
    pub rate_limiter: Arc<RateLimiter>,
    pub providers: Arc<ProviderClients>,
}

impl AppState {
    /// Wire the cache, metrics, pipeline and provider clients from config.
    ///
    /// `completion` backs every pipeline stage; `http` is shared by the
    /// media provider clients.
    pub fn new(
        config: ServerConfig,
        completion: Arc<dyn CompletionProvider>,
        http: reqwest::Client,
    ) -> Self {
        let pipeline = &config.pipeline;

        let cache = Arc::new(PromptCache::new(pipeline.cache_ttl()));
        let metrics = Arc::new(MetricsCollector::new(pipeline.metrics_max_series_len));
        let settings = PipelineSettings {
            model: pipeline.completion_model.clone(),
            ..PipelineSettings::default()
        };
        let system = PromptAgentSystem::new(completion, settings);
        let prompt_service = Arc::new(PromptService::new(system, cache, metrics));

        let rate_limiter = Arc::new(RateLimiter::new(
            pipeline.rate_limit.max_requests,
            pipeline.rate_limit.window(),
        ));

        let providers = Arc::new(ProviderClients::from_config(http, &config.providers));

        Self {
            config: Arc::new(config),
            prompt_service,
            rate_limiter,
            providers,
        }
    }
}

/// Clients for the external media generation APIs.
pub struct ProviderClients {
    pub bfl: BflClient,
    pub kling: KlingClient,
    pub aiml: AimlClient,
    pub replicate: ReplicateClient,
}

impl ProviderClients {
    pub fn from_config(http: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            bfl: BflClient::new(http.clone(), &config.bfl_base_url, config.bfl_api_key.clone()),
            kling: KlingClient::new(
                http.clone(),
                &config.kling_base_url,
                config.kling_access_key.clone(),
                config.kling_secret_key.clone(),
            ),
            aiml: AimlClient::new(http.clone(), &config.aiml_base_url, config.aiml_api_key.clone()),
            replicate: ReplicateClient::new(
                http,
                &config.replicate_base_url,
                config.replicate_api_token.clone(),
            ),
        }
    }
}
