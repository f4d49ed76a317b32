//! HTTP clients for the external services MediaForge depends on.
//!
//! - [`completion`]: OpenAI-compatible chat completions, used by every
//!   prompt pipeline stage through the [`completion::CompletionProvider`] seam.
//! - [`bfl`]: Black Forest Labs (Flux) image generation.
//! - [`kling`]: Kling text-to-video, authenticated with a short-lived JWT.
//! - [`aiml`]: AIML API audio generation (Stable Audio).
//! - [`replicate`]: Replicate predictions.
//!
//! Generation clients return the provider's JSON unchanged; callers treat
//! those payloads as opaque.

pub mod aiml;
pub mod bfl;
pub mod completion;
pub mod error;
pub mod kling;
pub mod replicate;
mod response;

pub use error::ProviderError;
