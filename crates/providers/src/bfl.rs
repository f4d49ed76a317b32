//! REST client for the Black Forest Labs (Flux) image API.
//!
//! Generation is asynchronous on the provider side: [`BflClient::submit`]
//! returns a task id and [`BflClient::get_result`] reports its status and,
//! once ready, the image URL.

use mediaforge_core::types::FluxModel;
use serde::Serialize;

use crate::error::ProviderError;
use crate::response;

const PROVIDER: &str = "bfl";

pub const DEFAULT_BASE_URL: &str = "https://api.bfl.ml";

/// Request body for a Flux generation task.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FluxRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Only honoured by the Ultra endpoint, which ignores width/height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_upsampling: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_tolerance: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
}

/// API path segment for a Flux model, or `None` when BFL does not serve it.
///
/// `flux-schnell` is only available through Replicate.
pub fn endpoint_for(model: FluxModel) -> Option<&'static str> {
    match model {
        FluxModel::FluxPro => Some("flux-pro"),
        FluxModel::FluxPro11 => Some("flux-pro-1.1"),
        FluxModel::FluxPro11Ultra => Some("flux-pro-1.1-ultra"),
        FluxModel::FluxDev => Some("flux-dev"),
        FluxModel::FluxSchnell => None,
    }
}

/// HTTP client for the BFL API.
pub struct BflClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl BflClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("BFL"))
    }

    /// Queue a generation task on the model's endpoint.
    ///
    /// Sends `POST /v1/{endpoint}` and returns the provider response
    /// (contains the task `id`).
    pub async fn submit(
        &self,
        endpoint: &str,
        request: &FluxRequest,
    ) -> Result<serde_json::Value, ProviderError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(format!("{}/v1/{}", self.base_url, endpoint))
            .header("x-key", api_key)
            .json(request)
            .send()
            .await?;

        response::parse_json(PROVIDER, response).await
    }

    /// Fetch the status (and result, once ready) of a task.
    ///
    /// Sends `GET /v1/get_result?id={id}`.
    pub async fn get_result(&self, id: &str) -> Result<serde_json::Value, ProviderError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(format!("{}/v1/get_result", self.base_url))
            .query(&[("id", id)])
            .header("x-key", api_key)
            .send()
            .await?;

        response::parse_json(PROVIDER, response).await
    }
}
