//! Status handling shared by every provider client.

use serde::de::DeserializeOwned;

use crate::error::ProviderError;

/// Map a non-success status and body to the matching error.
pub(crate) fn classify_status(provider: &'static str, status: u16, body: String) -> ProviderError {
    if status == 429 {
        ProviderError::RateLimited { provider }
    } else {
        ProviderError::Api {
            provider,
            status,
            body,
        }
    }
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or the classified error carrying the body text.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    tracing::warn!(provider, status = status.as_u16(), "Provider returned error status");
    Err(classify_status(provider, status.as_u16(), body))
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_json<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let response = ensure_success(provider, response).await?;
    Ok(response.json::<T>().await?)
}
