//! TTL cache for prompt generation results.
//!
//! Entries expire lazily: an expired entry is removed by the lookup that
//! finds it. [`PromptCache::cleanup`] sweeps all expired entries and is meant
//! to be driven by an external scheduler; the cache never spawns tasks.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::request::PromptGenerationRequest;
use crate::types::GenerationResponse;

/// Default time-to-live for cached results: 5 minutes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    result: GenerationResponse,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

/// Keyed result cache shared across requests.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct PromptCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

impl PromptCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Store `result` under the request's cache key, replacing any previous
    /// entry. `ttl` falls back to the cache default.
    pub async fn set(
        &self,
        request: &PromptGenerationRequest,
        result: GenerationResponse,
        ttl: Option<Duration>,
    ) {
        self.set_at(request, result, ttl, Instant::now()).await;
    }

    pub async fn set_at(
        &self,
        request: &PromptGenerationRequest,
        result: GenerationResponse,
        ttl: Option<Duration>,
        now: Instant,
    ) {
        let entry = CacheEntry {
            result,
            inserted_at: now,
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.entries.write().await.insert(request.cache_key(), entry);
    }

    /// Return the cached result if present and fresh.
    ///
    /// An expired entry is deleted as a side effect.
    pub async fn get(&self, request: &PromptGenerationRequest) -> Option<GenerationResponse> {
        self.get_at(request, Instant::now()).await
    }

    pub async fn get_at(
        &self,
        request: &PromptGenerationRequest,
        now: Instant,
    ) -> Option<GenerationResponse> {
        let key = request.cache_key();
        let mut entries = self.entries.write().await;
        match entries.get(&key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(&key);
                tracing::debug!(%key, "Prompt cache entry expired");
                None
            }
            Some(entry) => Some(entry.result.clone()),
            None => None,
        }
    }

    /// Remove every entry. Returns how many were removed.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        count
    }

    /// Sweep expired entries. Returns how many were removed.
    pub async fn cleanup(&self) -> usize {
        self.cleanup_at(Instant::now()).await
    }

    pub async fn cleanup_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for PromptCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
