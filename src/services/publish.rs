//! Workflow Publish Client
//!
//! Pushes a finished (title, html) pair to the external workflow endpoint.
//! The endpoint answers in one of three shapes: a JSON document, a stream
//! of SSE-style `data:` lines, or plain text; all three are normalized
//! into one discriminated result. Structured error codes in any shape are
//! surfaced as typed failures.

use serde_json::Value;
use std::time::Duration;

use crate::models::settings::AppConfig;
use crate::utils::error::{AppError, AppResult};

/// Environment variables holding the publish authorization token.
pub const TOKEN_ENV: &str = "COZE_API_TOKEN";
pub const BEARER_TOKEN_ENV: &str = "COZE_BEARER_TOKEN";

/// Errors from the publish backend
#[derive(Debug, Clone)]
pub enum PublishError {
    /// No authorization token configured. Fatal, never retried.
    MissingCredential,
    /// Transport-level failure (connection refused, timeout).
    Network { message: String },
    /// Backend returned a non-success status.
    Status { code: u16, body: String },
    /// Structured failure reported by the workflow backend.
    Workflow { code: i64, message: String },
}

impl PublishError {
    fn workflow_missing(&self) -> bool {
        match self {
            PublishError::Workflow { message, .. } => {
                message.to_lowercase().contains("not exist") || message.contains("不存在")
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishError::MissingCredential => {
                write!(
                    f,
                    "environment variable {} or {} is not set",
                    TOKEN_ENV, BEARER_TOKEN_ENV
                )
            }
            PublishError::Network { message } => {
                write!(f, "network failure: {}", message)
            }
            PublishError::Status { code, body } => {
                write!(f, "request failed [code {}]: {}", code, body)
            }
            PublishError::Workflow { code, message } => {
                if self.workflow_missing() {
                    write!(
                        f,
                        "workflow error {}: the configured workflow does not exist, check workflow_id",
                        code
                    )
                } else {
                    write!(f, "workflow error {}: {}", code, message)
                }
            }
        }
    }
}

impl std::error::Error for PublishError {}

/// Result type for publish operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Normalized publish response.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishResponse {
    /// Whole body was a JSON document.
    Json(Value),
    /// SSE-style body: one entry per `data:` line, JSON-decoded when the
    /// payload parses, kept as a string otherwise.
    Events(Vec<Value>),
    /// Anything else, passed through verbatim.
    Text(String),
}

/// Client for the workflow publish endpoint
pub struct PublishClient {
    http: reqwest::blocking::Client,
    url: String,
    workflow_id: String,
    authorization: Option<String>,
}

impl PublishClient {
    /// Build a client from the app config. The token is resolved from the
    /// environment; its absence only fails at publish time.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Self::with_authorization(config, resolve_authorization())
    }

    /// Build a client with an explicit (possibly absent) authorization
    /// header value.
    pub fn with_authorization(
        config: &AppConfig,
        authorization: Option<String>,
    ) -> AppResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.publish_timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: config.publish_url.clone(),
            workflow_id: config.workflow_id.clone(),
            authorization,
        })
    }

    /// Publish a (title, html) pair to the workflow endpoint.
    pub fn publish(&self, title: &str, html_content: &str) -> PublishResult<PublishResponse> {
        let authorization = self
            .authorization
            .as_ref()
            .ok_or(PublishError::MissingCredential)?;

        tracing::info!(title, content_len = html_content.len(), "calling publish workflow");

        let body = serde_json::json!({
            "workflow_id": self.workflow_id,
            "parameters": {
                "title": title,
                "content": html_content,
            }
        });

        let response = self
            .http
            .post(&self.url)
            .header("Authorization", authorization)
            .json(&body)
            .send()
            .map_err(|e| PublishError::Network {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response.text().map_err(|e| PublishError::Network {
            message: e.to_string(),
        })?;

        if status != 200 {
            tracing::error!(status, "publish request failed");
            return Err(PublishError::Status {
                code: status,
                body: text,
            });
        }

        let normalized = normalize_response(&text);
        if let Some(err) = workflow_error(&normalized) {
            tracing::error!(error = %err, "publish workflow reported an error");
            return Err(err);
        }

        tracing::info!("publish workflow succeeded");
        Ok(normalized)
    }
}

/// Resolve the authorization header value from the environment, adding the
/// `Bearer ` prefix when the raw token lacks it.
pub fn resolve_authorization() -> Option<String> {
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.trim().is_empty() {
            if token.starts_with("Bearer ") {
                return Some(token);
            }
            return Some(format!("Bearer {}", token));
        }
    }
    if let Ok(token) = std::env::var(BEARER_TOKEN_ENV) {
        if !token.trim().is_empty() {
            return Some(format!("Bearer {}", token));
        }
    }
    None
}

/// Normalize a publish response body into its discriminated shape.
pub fn normalize_response(body: &str) -> PublishResponse {
    if body
        .lines()
        .any(|line| line.trim_start().starts_with("data:"))
    {
        let mut events = Vec::new();
        for line in body.lines() {
            let Some(payload) = line.trim_start().strip_prefix("data:") else {
                continue;
            };
            let payload = payload.trim();
            if payload.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(payload) {
                Ok(value) => events.push(value),
                Err(_) => events.push(Value::String(payload.to_string())),
            }
        }
        return PublishResponse::Events(events);
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value) => PublishResponse::Json(value),
        Err(_) => PublishResponse::Text(body.to_string()),
    }
}

/// Extract a structured workflow error from a normalized response, if any.
/// A JSON object with a non-zero numeric `code` counts as an error; the
/// message is taken from `msg`, `message` or `error_message`.
pub fn workflow_error(response: &PublishResponse) -> Option<PublishError> {
    fn check(value: &Value) -> Option<PublishError> {
        let object = value.as_object()?;
        let code = object.get("code")?.as_i64()?;
        if code == 0 {
            return None;
        }
        let message = object
            .get("msg")
            .or_else(|| object.get("message"))
            .or_else(|| object.get("error_message"))
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string();
        Some(PublishError::Workflow { code, message })
    }

    match response {
        PublishResponse::Json(value) => check(value),
        PublishResponse::Events(events) => events.iter().find_map(check),
        PublishResponse::Text(_) => None,
    }
}
