use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mediaforge_pipeline::{PipelineSettings, PromptAgentSystem};
use mediaforge_providers::completion::{CompletionProvider, CompletionRequest};
use mediaforge_providers::ProviderError;

pub const CONTEXT_REPLY: &str = r#"{"industry":"pets","objective":"engagement","audience":"cat lovers","visual_style":"playful","temporal_context":"evergreen","trending_topics":["skateboarding"],"confidence":0.8}"#;

pub const VISUAL_REPLY: &str = "```json\n{\"prompt\":\"A ginger cat riding a skateboard down a sunny boardwalk\",\"confidence\":0.85}\n```";

pub const VIDEO_REPLY: &str = r#"{"prompt":"A ginger cat rides a skateboard along a boardwalk","camera_movement":"tracking shot","motion_intensity":"high","duration_seconds":8,"confidence":0.8}"#;

pub const OPTIMIZER_REPLY: &str = r#"{"optimized_prompt":"Ginger cat riding a skateboard, boardwalk, golden hour light, 35mm photo","confidence":0.9}"#;

pub const COORDINATOR_REPLY: &str = r#"{"final_prompt":"Ginger cat riding a skateboard down a sunlit boardwalk, golden hour light, shot on 35mm, playful mood","confidence":0.9}"#;

/// Identify the stage from its system prompt.
pub fn stage_of(request: &CompletionRequest) -> &'static str {
    let system = request.system_prompt.as_str();
    if system.contains("context analysis agent") {
        "context_analyzer"
    } else if system.contains("visual generation agent") {
        "visual_generator"
    } else if system.contains("video generation agent") {
        "video_generator"
    } else if system.contains("model optimization agent") {
        "model_optimizer"
    } else if system.contains("coordinator agent") {
        "coordinator"
    } else {
        "unknown"
    }
}

/// Completion provider answering each stage with a canned reply.
pub struct ScriptedProvider {
    overrides: HashMap<&'static str, String>,
    failing_stage: Option<&'static str>,
    fail_from_call: Option<usize>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            failing_stage: None,
            fail_from_call: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer `stage` with `reply` instead of the default.
    pub fn reply(mut self, stage: &'static str, reply: &str) -> Self {
        self.overrides.insert(stage, reply.to_string());
        self
    }

    /// Fail every call made by `stage`.
    pub fn fail_stage(mut self, stage: &'static str) -> Self {
        self.failing_stage = Some(stage);
        self
    }

    /// Fail every call from the `n`-th (zero-based) onwards.
    pub fn fail_from_call(mut self, n: usize) -> Self {
        self.fail_from_call = Some(n);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn stages_called(&self) -> Vec<&'static str> {
        self.requests().iter().map(stage_of).collect()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let stage = stage_of(request);

        let failing = self.failing_stage == Some(stage)
            || self.fail_from_call.is_some_and(|n| call >= n);
        if failing {
            return Err(ProviderError::Api {
                provider: "completion",
                status: 500,
                body: "scripted failure".to_string(),
            });
        }

        if let Some(reply) = self.overrides.get(stage) {
            return Ok(reply.clone());
        }
        let reply = match stage {
            "context_analyzer" => CONTEXT_REPLY,
            "visual_generator" => VISUAL_REPLY,
            "video_generator" => VIDEO_REPLY,
            "model_optimizer" => OPTIMIZER_REPLY,
            "coordinator" => COORDINATOR_REPLY,
            _ => "{}",
        };
        Ok(reply.to_string())
    }
}

pub fn system_with(provider: Arc<ScriptedProvider>) -> PromptAgentSystem {
    PromptAgentSystem::new(provider, PipelineSettings::default())
}
