//! In-memory aggregation of generation statistics.
//!
//! Records are grouped by `(content_type, platform, model)`. Each series is
//! capped at `max_series_len`; once full, the oldest record is evicted.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::types::{ContentType, Platform, TargetModel};

/// Default cap on records retained per series.
pub const DEFAULT_MAX_SERIES_LEN: usize = 1_000;

/// One completed generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRecord {
    pub timestamp: DateTime<Utc>,
    pub content_type: ContentType,
    pub platform: Platform,
    pub model: TargetModel,
    /// Milliseconds.
    pub processing_time: u64,
    pub confidence: f64,
    /// Final prompt length in characters.
    pub prompt_length: usize,
    pub agents_used: usize,
}

impl GenerationRecord {
    pub fn key(&self) -> MetricsKey {
        MetricsKey {
            content_type: self.content_type,
            platform: self.platform,
            model: self.model,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MetricsKey {
    pub content_type: ContentType,
    pub platform: Platform,
    pub model: TargetModel,
}

impl fmt::Display for MetricsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.content_type, self.platform, self.model)
    }
}

/// Aggregated statistics for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummaryEntry {
    pub key: String,
    pub content_type: ContentType,
    pub platform: Platform,
    pub model: TargetModel,
    pub count: usize,
    pub average_processing_time: f64,
    pub average_confidence: f64,
    pub average_prompt_length: f64,
    pub last_generated_at: DateTime<Utc>,
}

/// Shared metrics store.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc`.
pub struct MetricsCollector {
    series: RwLock<HashMap<MetricsKey, VecDeque<GenerationRecord>>>,
    max_series_len: usize,
}

impl MetricsCollector {
    /// `max_series_len` is clamped to at least 1.
    pub fn new(max_series_len: usize) -> Self {
        Self {
            series: RwLock::new(HashMap::new()),
            max_series_len: max_series_len.max(1),
        }
    }

    pub async fn record_generation(&self, record: GenerationRecord) {
        let key = record.key();
        let mut series = self.series.write().await;
        let records = series.entry(key).or_default();
        if records.len() >= self.max_series_len {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Mean processing time (ms) over the retained series, `None` if empty.
    pub async fn average_processing_time(&self, key: &MetricsKey) -> Option<f64> {
        let series = self.series.read().await;
        series
            .get(key)
            .and_then(|records| mean(records.iter().map(|r| r.processing_time as f64)))
    }

    /// Mean confidence over the retained series, `None` if empty.
    pub async fn average_confidence(&self, key: &MetricsKey) -> Option<f64> {
        let series = self.series.read().await;
        series
            .get(key)
            .and_then(|records| mean(records.iter().map(|r| r.confidence)))
    }

    /// Number of retained records for `key`.
    pub async fn count(&self, key: &MetricsKey) -> usize {
        self.series.read().await.get(key).map_or(0, VecDeque::len)
    }

    /// Aggregated stats for every observed key, ordered by key.
    pub async fn summary(&self) -> Vec<MetricsSummaryEntry> {
        let series = self.series.read().await;
        let mut entries: Vec<MetricsSummaryEntry> = series
            .iter()
            .filter_map(|(key, records)| summarize(key, records))
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    pub async fn total_generations(&self) -> usize {
        self.series.read().await.values().map(VecDeque::len).sum()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SERIES_LEN)
    }
}

fn summarize(key: &MetricsKey, records: &VecDeque<GenerationRecord>) -> Option<MetricsSummaryEntry> {
    let last = records.iter().map(|r| r.timestamp).max()?;
    Some(MetricsSummaryEntry {
        key: key.to_string(),
        content_type: key.content_type,
        platform: key.platform,
        model: key.model,
        count: records.len(),
        average_processing_time: mean(records.iter().map(|r| r.processing_time as f64))?,
        average_confidence: mean(records.iter().map(|r| r.confidence))?,
        average_prompt_length: mean(records.iter().map(|r| r.prompt_length as f64))?,
        last_generated_at: last,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
