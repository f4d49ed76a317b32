//! Aggregation of per-stage confidence into the run's `confidence_score`.
//!
//! Weighted mean with the coordinator counted twice. A stage reporting below
//! [`FATAL_CONFIDENCE`] drags the aggregate down to the minimum stage value.

use mediaforge_core::types::AgentResponse;

use crate::stages::COORDINATOR;

/// Stage confidence below this value dominates the aggregate.
pub const FATAL_CONFIDENCE: f64 = 0.2;

const COORDINATOR_WEIGHT: f64 = 2.0;
const STAGE_WEIGHT: f64 = 1.0;

fn weight(agent_name: &str) -> f64 {
    if agent_name == COORDINATOR {
        COORDINATOR_WEIGHT
    } else {
        STAGE_WEIGHT
    }
}

/// Aggregate confidence for a completed run. `0.0` for no stages.
pub fn aggregate_confidence(responses: &[AgentResponse]) -> f64 {
    if responses.is_empty() {
        return 0.0;
    }

    let min = responses
        .iter()
        .map(|r| r.confidence)
        .fold(f64::INFINITY, f64::min);
    if min < FATAL_CONFIDENCE {
        return min;
    }

    let (weighted, total) = responses.iter().fold((0.0, 0.0), |(sum, total), r| {
        let w = weight(&r.agent_name);
        (sum + r.confidence * w, total + w)
    });
    (weighted / total).clamp(0.0, 1.0)
}
