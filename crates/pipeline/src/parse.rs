//! Parsing of stage replies.
//!
//! Every stage asks the completion model for a single JSON object. Models
//! often wrap that object in a Markdown code fence or add a sentence around
//! it, so [`extract_json`] peels both off before deserializing.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::PipelineError;

/// Confidence assumed when a stage reply omits it.
pub const DEFAULT_CONFIDENCE: f64 = 0.75;

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("valid regex")
});

/// Return the JSON object text inside a stage reply.
///
/// Takes the first fenced block that holds a `{...}` span; otherwise the span
/// from the first `{` to the last `}` of the whole reply.
pub fn extract_json(raw: &str) -> Option<&str> {
    CODE_FENCE_RE
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|body| object_span(body.as_str()))
        .or_else(|| object_span(raw))
}

fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Deserialize a stage reply into `T`.
pub fn parse_stage_reply<T: DeserializeOwned>(
    agent: &'static str,
    raw: &str,
) -> Result<T, PipelineError> {
    let json = extract_json(raw).ok_or_else(|| PipelineError::Unparsable {
        agent,
        message: "reply does not contain a JSON object".to_string(),
    })?;

    serde_json::from_str(json).map_err(|e| PipelineError::Unparsable {
        agent,
        message: e.to_string(),
    })
}

/// Clamp a reported confidence to `[0, 1]`, defaulting when absent or NaN.
pub fn normalize_confidence(reported: Option<f64>) -> f64 {
    match reported {
        Some(value) if !value.is_nan() => value.clamp(0.0, 1.0),
        _ => DEFAULT_CONFIDENCE,
    }
}

/// Reject blank prompt text in a stage reply.
pub fn require_text(agent: &'static str, field: &str, text: String) -> Result<String, PipelineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::Unparsable {
            agent,
            message: format!("field '{field}' is empty"),
        });
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Reply shapes
// ---------------------------------------------------------------------------

fn general() -> String {
    "general".to_string()
}

/// Reply of the context analysis stage. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextReply {
    #[serde(default = "general")]
    pub industry: String,
    #[serde(default = "general")]
    pub objective: String,
    #[serde(default = "general")]
    pub audience: String,
    #[serde(default = "general")]
    pub visual_style: String,
    #[serde(default = "general")]
    pub temporal_context: String,
    #[serde(default)]
    pub trending_topics: Vec<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Reply of the image drafting stage.
#[derive(Debug, Clone, Deserialize)]
pub struct VisualReply {
    #[serde(alias = "visual_prompt")]
    pub prompt: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Reply of the video drafting stage.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoReply {
    #[serde(alias = "video_prompt")]
    pub prompt: String,
    #[serde(default)]
    pub camera_movement: Option<String>,
    #[serde(default)]
    pub motion_intensity: Option<String>,
    #[serde(default, alias = "duration")]
    pub duration_seconds: Option<u32>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Reply of the model optimization stage.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerReply {
    #[serde(alias = "prompt")]
    pub optimized_prompt: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Reply of the coordination stage.
#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatorReply {
    #[serde(alias = "prompt")]
    pub final_prompt: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -- extract_json --

    #[test]
    fn bare_object_is_returned_as_is() {
        assert_eq!(extract_json(r#"{"a":1}"#), Some(r#"{"a":1}"#));
    }

    #[test]
    fn json_fence_is_stripped() {
        let raw = "```json\n{\"prompt\": \"a cat\"}\n```";
        assert_eq!(extract_json(raw), Some("{\"prompt\": \"a cat\"}"));
    }

    #[test]
    fn plain_fence_is_stripped() {
        let raw = "```\n{\"prompt\": \"a cat\"}\n```";
        assert_eq!(extract_json(raw), Some("{\"prompt\": \"a cat\"}"));
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let raw = "Here you go:\n{\"prompt\": \"a cat\"}\nLet me know!";
        assert_eq!(extract_json(raw), Some("{\"prompt\": \"a cat\"}"));
    }

    #[test]
    fn later_fence_is_used_when_first_has_no_object() {
        let raw = "Notes:\n```text\nkept it short\n```\n```json\n{\"prompt\": \"a cat\"}\n```";
        assert_eq!(extract_json(raw), Some("{\"prompt\": \"a cat\"}"));

        let reply: VisualReply = parse_stage_reply("visual_generator", raw).unwrap();
        assert_eq!(reply.prompt, "a cat");
    }

    #[test]
    fn unfenced_object_after_text_fence_is_found() {
        let raw = "```text\nsummary\n```\n{\"prompt\": \"a cat\"}";
        assert_eq!(extract_json(raw), Some("{\"prompt\": \"a cat\"}"));
    }

    #[test]
    fn no_object_yields_none() {
        assert_eq!(extract_json("just words"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    // -- parse_stage_reply --

    #[test]
    fn parses_fenced_visual_reply() {
        let raw = "```json\n{\"prompt\": \"a cat on a skateboard\", \"confidence\": 0.9}\n```";
        let reply: VisualReply = parse_stage_reply("visual_generator", raw).unwrap();
        assert_eq!(reply.prompt, "a cat on a skateboard");
        assert_eq!(reply.confidence, Some(0.9));
    }

    #[test]
    fn missing_required_field_is_unparsable() {
        let err = parse_stage_reply::<VisualReply>("visual_generator", r#"{"confidence": 0.9}"#)
            .unwrap_err();
        assert_matches!(err, PipelineError::Unparsable { agent: "visual_generator", .. });
    }

    #[test]
    fn prose_only_reply_is_unparsable() {
        let err = parse_stage_reply::<ContextReply>("context_analyzer", "I cannot help with that")
            .unwrap_err();
        assert_matches!(err, PipelineError::Unparsable { agent: "context_analyzer", .. });
    }

    #[test]
    fn context_reply_fills_defaults() {
        let reply: ContextReply =
            parse_stage_reply("context_analyzer", r#"{"industry": "pets"}"#).unwrap();
        assert_eq!(reply.industry, "pets");
        assert_eq!(reply.audience, "general");
        assert!(reply.trending_topics.is_empty());
        assert_eq!(reply.confidence, None);
    }

    #[test]
    fn optimizer_accepts_prompt_alias() {
        let reply: OptimizerReply =
            parse_stage_reply("model_optimizer", r#"{"prompt": "tuned"}"#).unwrap();
        assert_eq!(reply.optimized_prompt, "tuned");
    }

    // -- normalize_confidence --

    #[test]
    fn confidence_defaults_and_clamps() {
        assert_eq!(normalize_confidence(None), DEFAULT_CONFIDENCE);
        assert_eq!(normalize_confidence(Some(f64::NAN)), DEFAULT_CONFIDENCE);
        assert_eq!(normalize_confidence(Some(1.4)), 1.0);
        assert_eq!(normalize_confidence(Some(-0.2)), 0.0);
        assert_eq!(normalize_confidence(Some(0.6)), 0.6);
    }

    // -- require_text --

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_text("coordinator", "final_prompt", "   ".into()).is_err());
        assert_eq!(
            require_text("coordinator", "final_prompt", " ok ".into()).unwrap(),
            "ok"
        );
    }
}
