//! REST client for AIML API audio generation (Stable Audio).

use serde::Serialize;

use crate::error::ProviderError;
use crate::response;

const PROVIDER: &str = "aiml";

pub const DEFAULT_BASE_URL: &str = "https://api.aimlapi.com";

/// Model identifier for Stable Audio on AIML.
pub const STABLE_AUDIO_MODEL: &str = "stable-audio";

/// Longest clip Stable Audio produces, in seconds.
pub const MAX_AUDIO_SECONDS: u32 = 47;

/// Request body for `POST /v2/generate/audio`.
#[derive(Debug, Clone, Serialize)]
pub struct AudioRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds_total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
}

impl AudioRequest {
    pub fn stable_audio(prompt: impl Into<String>) -> Self {
        Self {
            model: STABLE_AUDIO_MODEL.to_string(),
            prompt: prompt.into(),
            seconds_total: None,
            steps: None,
        }
    }
}

/// HTTP client for the AIML audio endpoints.
pub struct AimlClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AimlClient {
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
            .ok_or(ProviderError::MissingApiKey("AIML"))
    }

    /// Queue an audio generation. Returns the provider response
    /// (contains the generation `id` and `status`).
    pub async fn generate_audio(
        &self,
        request: &AudioRequest,
    ) -> Result<serde_json::Value, ProviderError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(format!("{}/v2/generate/audio", self.base_url))
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        response::parse_json(PROVIDER, response).await
    }

    /// Fetch a generation's status and, once complete, the audio file URL.
    pub async fn get_audio(&self, generation_id: &str) -> Result<serde_json::Value, ProviderError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(format!("{}/v2/generate/audio", self.base_url))
            .query(&[("generation_id", generation_id)])
            .bearer_auth(api_key)
            .send()
            .await?;

        response::parse_json(PROVIDER, response).await
    }
}
