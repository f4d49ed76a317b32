//! REST client for the Kling text-to-video API.
//!
//! Kling authenticates each call with a short-lived HS256 JWT signed with
//! the account's secret key (`iss` = access key). Application errors come
//! back as HTTP 200 with a non-zero `code` in the body.

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use mediaforge_core::types::KlingModel;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::response;

const PROVIDER: &str = "kling";

pub const DEFAULT_BASE_URL: &str = "https://api.klingai.com";

/// Token lifetime in seconds.
const TOKEN_TTL_SECS: i64 = 1800;

/// Backdate `nbf` to tolerate clock skew.
const TOKEN_NBF_SKEW_SECS: i64 = 5;

#[derive(Debug, Serialize, Deserialize)]
pub struct KlingClaims {
    pub iss: String,
    pub exp: i64,
    pub nbf: i64,
}

/// Generation quality mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KlingMode {
    Std,
    Pro,
}

/// Request body for `POST /v1/videos/text2video`.
#[derive(Debug, Clone, Serialize)]
pub struct KlingVideoRequest {
    pub model_name: KlingModel,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f32>,
    pub mode: KlingMode,
    pub aspect_ratio: String,
    /// Kling expects the clip length as a string ("5" or "10").
    pub duration: String,
}

/// HTTP client for the Kling API.
pub struct KlingClient {
    client: reqwest::Client,
    base_url: String,
    access_key: Option<String>,
    secret_key: Option<String>,
}

impl KlingClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key,
            secret_key,
        }
    }

    /// Sign a fresh bearer token.
    pub fn auth_token(&self) -> Result<String, ProviderError> {
        let (Some(access_key), Some(secret_key)) = (&self.access_key, &self.secret_key) else {
            return Err(ProviderError::MissingApiKey("Kling"));
        };
        sign_token(access_key, secret_key, Utc::now().timestamp())
    }

    /// Create a text-to-video task. Returns the provider response
    /// (`data.task_id`, `data.task_status`).
    pub async fn create_video_task(
        &self,
        request: &KlingVideoRequest,
    ) -> Result<serde_json::Value, ProviderError> {
        let token = self.auth_token()?;

        let response = self
            .client
            .post(format!("{}/v1/videos/text2video", self.base_url))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let body: serde_json::Value = response::parse_json(PROVIDER, response).await?;
        check_body_code(body)
    }

    /// Query a text-to-video task by id.
    pub async fn get_video_task(&self, task_id: &str) -> Result<serde_json::Value, ProviderError> {
        let token = self.auth_token()?;

        let response = self
            .client
            .get(format!("{}/v1/videos/text2video/{}", self.base_url, task_id))
            .bearer_auth(token)
            .send()
            .await?;

        let body: serde_json::Value = response::parse_json(PROVIDER, response).await?;
        check_body_code(body)
    }
}

fn sign_token(access_key: &str, secret_key: &str, now: i64) -> Result<String, ProviderError> {
    let claims = KlingClaims {
        iss: access_key.to_string(),
        exp: now + TOKEN_TTL_SECS,
        nbf: now - TOKEN_NBF_SKEW_SECS,
    };
    Ok(encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret_key.as_bytes()),
    )?)
}

/// Turn a body-level error (`code != 0`) into [`ProviderError::Rejected`].
fn check_body_code(body: serde_json::Value) -> Result<serde_json::Value, ProviderError> {
    let code = body.get("code").and_then(serde_json::Value::as_i64).unwrap_or(0);
    if code == 0 {
        return Ok(body);
    }
    let message = body
        .get("message")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    Err(ProviderError::Rejected {
        provider: PROVIDER,
        code,
        message,
    })
}
