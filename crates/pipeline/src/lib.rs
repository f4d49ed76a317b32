//! Prompt-agent orchestration.
//!
//! [`system::PromptAgentSystem`] runs a fixed sequence of completion-backed
//! stages (context analysis, visual or video drafting, model optimization,
//! coordination) over a [`mediaforge_core::request::PromptGenerationRequest`].
//! [`service::PromptService`] wraps it with the shared cache and metrics.

pub mod confidence;
pub mod error;
pub mod parse;
pub mod prompts;
pub mod service;
pub mod stages;
pub mod system;

pub use error::PipelineError;
pub use service::PromptService;
pub use system::{PipelineSettings, PromptAgentSystem};
