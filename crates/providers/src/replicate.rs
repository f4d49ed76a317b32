//! REST client for Replicate predictions.

use serde::Serialize;

use crate::error::ProviderError;
use crate::response;

const PROVIDER: &str = "replicate";

pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

#[derive(Debug, Serialize)]
struct CreatePredictionBody<'a> {
    version: &'a str,
    input: &'a serde_json::Value,
}

/// HTTP client for the Replicate predictions API.
pub struct ReplicateClient {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl ReplicateClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        }
    }

    fn api_token(&self) -> Result<&str, ProviderError> {
        self.api_token
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("Replicate"))
    }

    /// Start a prediction for a model version with the given input object.
    pub async fn create_prediction(
        &self,
        version: &str,
        input: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        let token = self.api_token()?;

        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .bearer_auth(token)
            .json(&CreatePredictionBody { version, input })
            .send()
            .await?;

        response::parse_json(PROVIDER, response).await
    }

    /// Fetch a prediction by id.
    pub async fn get_prediction(&self, id: &str) -> Result<serde_json::Value, ProviderError> {
        let token = self.api_token()?;

        let response = self
            .client
            .get(format!("{}/v1/predictions/{}", self.base_url, id))
            .bearer_auth(token)
            .send()
            .await?;

        response::parse_json(PROVIDER, response).await
    }
}
