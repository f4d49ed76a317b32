//! Domain types and in-process services for the MediaForge backend.
//!
//! This crate has no internal dependencies. It holds the request/response
//! model of the prompt pipeline, the static model and platform tables, and
//! the three shared in-memory services (prompt cache, metrics collector,
//! rate limiter) that the API owns and injects.

pub mod cache;
pub mod error;
pub mod metrics;
pub mod model_config;
pub mod rate_limit;
pub mod request;
pub mod tokens;
pub mod types;
