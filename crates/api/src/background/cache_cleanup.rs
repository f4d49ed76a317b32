//! Periodic sweep of expired prompt cache entries.
//!
//! The cache only expires entries lazily on lookup; this task removes the
//! ones nobody asks for again. It also drops rate-limiter state for clients
//! whose window has emptied.

use std::sync::Arc;
use std::time::Duration;

use mediaforge_core::cache::PromptCache;
use mediaforge_core::rate_limit::RateLimiter;
use tokio_util::sync::CancellationToken;

/// Run the cleanup loop until `cancel` is triggered.
pub async fn run(
    cache: Arc<PromptCache>,
    rate_limiter: Arc<RateLimiter>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Cache cleanup job started");

    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately; nothing can have expired yet.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Cache cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                let expired = cache.cleanup().await;
                let idle_clients = rate_limiter.purge_idle().await;
                if expired > 0 || idle_clients > 0 {
                    tracing::info!(expired, idle_clients, "Cache cleanup: purged stale entries");
                } else {
                    tracing::debug!("Cache cleanup: nothing to purge");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediaforge_core::request::PromptGenerationRequest;
    use mediaforge_core::types::{
        ContentType, ContextData, FluxModel, GenerationMetadata, GenerationResponse, Platform,
        TargetModel,
    };

    fn sample() -> (PromptGenerationRequest, GenerationResponse) {
        let model = TargetModel::Flux(FluxModel::FluxPro);
        let request =
            PromptGenerationRequest::new("a cat", Platform::General, None, model, None).unwrap();
        let response = GenerationResponse {
            final_prompt: "a cat".into(),
            metadata: GenerationMetadata {
                context_data: ContextData {
                    content_type: ContentType::Image,
                    industry: "general".into(),
                    objective: "general".into(),
                    audience: "general".into(),
                    visual_style: "general".into(),
                    temporal_context: "general".into(),
                    trending_topics: vec![],
                },
                processing_time: 0,
                agents_used: vec![],
                confidence_score: 0.75,
                target_model: model,
                content_type: ContentType::Image,
                estimated_tokens: 2,
                video_specs: None,
            },
            agent_responses: vec![],
        };
        (request, response)
    }

    #[tokio::test]
    async fn sweeps_expired_entries_and_stops_on_cancel() {
        let cache = Arc::new(PromptCache::new(Duration::from_millis(10)));
        let limiter = Arc::new(RateLimiter::default());
        let (request, response) = sample();
        cache.set(&request, response, None).await;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            Arc::clone(&cache),
            limiter,
            Duration::from_millis(20),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.is_empty().await);

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("cleanup task did not stop")
            .unwrap();
    }
}
