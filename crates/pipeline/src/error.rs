use mediaforge_core::error::CoreError;
use mediaforge_providers::ProviderError;

/// Errors from a pipeline run. Any stage failure aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid input, rejected before any stage runs.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A stage's completion call failed.
    #[error("{agent} stage failed: {source}")]
    Stage {
        agent: &'static str,
        #[source]
        source: ProviderError,
    },

    /// A stage answered with content that could not be parsed.
    #[error("{agent} stage returned unparsable output: {message}")]
    Unparsable { agent: &'static str, message: String },
}

impl PipelineError {
    /// Name of the stage that failed, if the failure came from a stage.
    pub fn agent(&self) -> Option<&'static str> {
        match self {
            PipelineError::Stage { agent, .. } | PipelineError::Unparsable { agent, .. } => {
                Some(agent)
            }
            PipelineError::Core(_) => None,
        }
    }
}
