//! Generation Backend Client
//!
//! Blocking client for the Gemini-style `generateContent` endpoint. Sends a
//! fully-assembled prompt with per-stage temperature/token controls and
//! returns the raw response for extraction. No retry at this layer: every
//! failure propagates as a typed error with enough payload to log.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::settings::AppConfig;
use crate::services::extract;
use crate::utils::error::{AppError, AppResult};

/// Environment variable holding the generation API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Errors from the generation backend
#[derive(Debug, Clone)]
pub enum GenError {
    /// No API key configured. Fatal, never retried.
    MissingCredential,
    /// Transport-level failure (connection refused, timeout).
    Network { message: String },
    /// Backend returned a non-success status.
    Status { code: u16, body: String },
    /// Response JSON missing the expected structure. Carries the raw
    /// payload for diagnostics.
    Malformed { detail: String, payload: String },
    /// No usable text fragment in the response.
    NoContent,
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::MissingCredential => {
                write!(f, "environment variable {} is not set", API_KEY_ENV)
            }
            GenError::Network { message } => {
                write!(f, "network failure: {}", message)
            }
            GenError::Status { code, body } => {
                write!(f, "request failed [code {}]: {}", code, body)
            }
            GenError::Malformed { detail, payload } => {
                write!(f, "unexpected response structure: {}; payload: {}", detail, payload)
            }
            GenError::NoContent => {
                write!(f, "no usable content in response")
            }
        }
    }
}

impl std::error::Error for GenError {}

/// Result type for generation backend operations
pub type GenResult<T> = Result<T, GenError>;

// Request payload: {contents:[{parts:[{text}]}], generationConfig:{...}}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

// Response payload: {candidates:[{content:{parts:[{text}, ...]}}]}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// Absent when the backend refused to generate (finishReason only).
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

/// A raw generation result: the parsed response plus the original body,
/// kept for diagnostics when extraction fails.
#[derive(Debug, Clone)]
pub struct RawGeneration {
    pub response: GenerateResponse,
    pub body: String,
}

/// Abstraction over the text-generation backend, the seam that lets
/// pipeline stages run against a stub in tests.
pub trait Generator {
    /// Generate the final usable text for a prompt.
    fn generate(&self, prompt: &str, temperature: f32, max_tokens: u32) -> GenResult<String>;
}

/// Client for the Gemini-style generation endpoint
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build a client from the app config. The API key is resolved from
    /// the environment; its absence only fails at invoke time.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::with_api_key(config, api_key)
    }

    /// Build a client with an explicit (possibly absent) API key.
    pub fn with_api_key(config: &AppConfig, api_key: Option<String>) -> AppResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.generation_timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Invoke the generation endpoint and return the raw response.
    pub fn invoke(&self, prompt: &str, temperature: f32, max_tokens: u32) -> GenResult<RawGeneration> {
        let api_key = self.api_key.as_ref().ok_or(GenError::MissingCredential)?;

        tracing::info!(
            temperature,
            max_tokens,
            prompt_len = prompt.len(),
            model = %self.model,
            "calling generation backend"
        );

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| GenError::Network {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body_text = response.text().map_err(|e| GenError::Network {
            message: e.to_string(),
        })?;

        if status != 200 {
            tracing::error!(status, body = %truncate(&body_text, 200), "generation request failed");
            return Err(GenError::Status {
                code: status,
                body: body_text,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body_text).map_err(|e| GenError::Malformed {
                detail: format!("failed to parse response: {}", e),
                payload: body_text.clone(),
            })?;

        Ok(RawGeneration {
            response: parsed,
            body: body_text,
        })
    }
}

impl Generator for GeminiClient {
    fn generate(&self, prompt: &str, temperature: f32, max_tokens: u32) -> GenResult<String> {
        let raw = self.invoke(prompt, temperature, max_tokens)?;
        let text = extract::final_text(&raw.response, &raw.body)?;
        tracing::info!(content_len = text.len(), "generation succeeded");
        Ok(text)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
