//! Request extractors shared by handlers.
//!
//! - [`validated_json::ValidatedJson`] -- JSON body that must pass `validator` rules.
//! - [`rate_limit::RateLimitGuard`] -- Per-client sliding-window limit (opt-in).

pub mod rate_limit;
pub mod validated_json;
