/// Errors from the external provider layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered 429.
    #[error("{provider} rate limit exceeded")]
    RateLimited { provider: &'static str },

    /// The provider accepted the request but reported a failure in its body.
    #[error("{provider} rejected the request (code {code}): {message}")]
    Rejected {
        provider: &'static str,
        code: i64,
        message: String,
    },

    /// The completion response contained no usable text.
    #[error("{provider} returned an empty completion")]
    EmptyCompletion { provider: &'static str },

    /// No API key is configured for the provider.
    #[error("Missing API key for {0}")]
    MissingApiKey(&'static str),

    /// Request signing failed.
    #[error("Failed to sign request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl ProviderError {
    /// HTTP status reported by the provider, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}
