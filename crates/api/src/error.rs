use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use mediaforge_core::error::CoreError;
use mediaforge_pipeline::PipelineError;
use mediaforge_providers::ProviderError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, provider and pipeline errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "success": false, "error", "code", "details"? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mediaforge_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A call to an external generation API failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The prompt pipeline failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A malformed request body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Well-formed body with invalid fields; `details` maps field to messages.
    #[error("Invalid request: {message}")]
    InvalidFields { message: String, details: Value },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, machine-readable code, message and optional details.
type ErrorParts = (StatusCode, &'static str, String, Option<Value>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retry_after_ms = match &self {
            AppError::Core(CoreError::RateLimited { retry_after_ms }) => Some(*retry_after_ms),
            _ => None,
        };

        let (status, code, message, details) = match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Provider(err) => classify_provider_error(err),
            AppError::Pipeline(err) => classify_pipeline_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            AppError::InvalidFields { message, details } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message,
                Some(details),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
        };

        let mut body = json!({
            "success": false,
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        let mut response = (status, axum::Json(body)).into_response();
        if let Some(ms) = retry_after_ms {
            let secs = ms.div_ceil(1000).max(1);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

fn internal_error() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}

fn classify_core_error(err: CoreError) -> ErrorParts {
    match err {
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None),
        CoreError::Configuration(msg) => {
            tracing::error!(error = %msg, "Configuration error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                msg,
                None,
            )
        }
        err @ CoreError::ExternalService { .. } => {
            tracing::error!(error = %err, "External service error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EXTERNAL_SERVICE_ERROR",
                err.to_string(),
                None,
            )
        }
        CoreError::RateLimited { retry_after_ms } => (
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMIT_EXCEEDED",
            "Too many requests, please try again later".to_string(),
            Some(json!({ "retry_after_ms": retry_after_ms })),
        ),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal_error()
        }
    }
}

/// Map a provider failure to a response.
///
/// - Missing credentials are a server misconfiguration (500).
/// - Provider 4xx/5xx statuses pass through with the provider body as details.
/// - Transport failures and body-level rejections map to 502.
fn classify_provider_error(err: ProviderError) -> ErrorParts {
    match err {
        ProviderError::MissingApiKey(provider) => {
            tracing::error!(provider, "Provider API key is not configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                format!("{provider} API key is not configured"),
                None,
            )
        }
        ProviderError::Api {
            provider,
            status,
            body,
        } => {
            tracing::warn!(provider, status, "Provider returned an error status");
            let status = StatusCode::from_u16(status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            let details = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
            (
                status,
                "PROVIDER_ERROR",
                format!("{provider} API request failed"),
                Some(details),
            )
        }
        ProviderError::RateLimited { provider } => (
            StatusCode::TOO_MANY_REQUESTS,
            "PROVIDER_RATE_LIMITED",
            format!("{provider} rate limit exceeded"),
            None,
        ),
        ProviderError::Rejected {
            provider,
            code,
            message,
        } => {
            tracing::warn!(provider, code, %message, "Provider rejected the request");
            (
                StatusCode::BAD_GATEWAY,
                "PROVIDER_ERROR",
                format!("{provider} rejected the request: {message}"),
                Some(json!({ "provider_code": code })),
            )
        }
        err @ (ProviderError::Request(_) | ProviderError::EmptyCompletion { .. }) => {
            tracing::error!(error = %err, "Provider request failed");
            (
                StatusCode::BAD_GATEWAY,
                "EXTERNAL_SERVICE_ERROR",
                "Upstream provider request failed".to_string(),
                None,
            )
        }
        ProviderError::Signing(err) => {
            tracing::error!(error = %err, "Failed to sign provider request");
            internal_error()
        }
    }
}

/// Map a pipeline failure to a response. Stage failures are always 500.
fn classify_pipeline_error(err: PipelineError) -> ErrorParts {
    match err {
        PipelineError::Core(core) => classify_core_error(core),
        PipelineError::Stage {
            agent,
            source: ProviderError::MissingApiKey(provider),
        } => {
            tracing::error!(agent, provider, "Completion API key is not configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                format!("{provider} key is not configured"),
                None,
            )
        }
        err => {
            tracing::error!(error = %err, "Prompt pipeline failed");
            let agent = err.agent();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EXTERNAL_SERVICE_ERROR",
                "Prompt generation failed".to_string(),
                agent.map(|agent| json!({ "agent": agent })),
            )
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, Vec<String>)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(msg) => msg.to_string(),
                        None => format!("{field} is invalid ({})", e.code),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .flat_map(|(_, messages)| messages.iter().cloned())
            .collect::<Vec<_>>()
            .join("; ");
        let details = fields
            .into_iter()
            .map(|(field, messages)| (field, Value::from(messages)))
            .collect::<serde_json::Map<_, _>>();

        AppError::InvalidFields {
            message,
            details: Value::Object(details),
        }
    }
}
