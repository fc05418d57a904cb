//! Settings Models
//!
//! Application configuration and settings data structures. Secrets
//! (generation API key, publish token) are never part of the config file;
//! they are resolved from the environment at call time.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://1003.2.gptuu.cc:1003".to_string()
}

fn default_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_generation_timeout() -> u64 {
    180
}

fn default_publish_url() -> String {
    "https://api.coze.cn/v1/workflow/stream_run".to_string()
}

fn default_workflow_id() -> String {
    "7590055614313087003".to_string()
}

fn default_publish_timeout() -> u64 {
    120
}

fn default_prompts_dir() -> String {
    "prompts".to_string()
}

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation backend base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Generation model name
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-call generation timeout in seconds
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,
    /// Publish workflow endpoint
    #[serde(default = "default_publish_url")]
    pub publish_url: String,
    /// Publish workflow id
    #[serde(default = "default_workflow_id")]
    pub workflow_id: String,
    /// Per-call publish timeout in seconds
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_secs: u64,
    /// Directory holding per-category template subdirectories
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            generation_timeout_secs: default_generation_timeout(),
            publish_url: default_publish_url(),
            workflow_id: default_workflow_id(),
            publish_timeout_secs: default_publish_timeout(),
            prompts_dir: default_prompts_dir(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub generation_timeout_secs: Option<u64>,
    pub publish_url: Option<String>,
    pub workflow_id: Option<String>,
    pub publish_timeout_secs: Option<u64>,
    pub prompts_dir: Option<String>,
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.generation_timeout_secs == 0 || self.publish_timeout_secs == 0 {
            return Err("timeouts must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(base_url) = update.base_url {
            self.base_url = base_url;
        }
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(secs) = update.generation_timeout_secs {
            self.generation_timeout_secs = secs;
        }
        if let Some(publish_url) = update.publish_url {
            self.publish_url = publish_url;
        }
        if let Some(workflow_id) = update.workflow_id {
            self.workflow_id = workflow_id;
        }
        if let Some(secs) = update.publish_timeout_secs {
            self.publish_timeout_secs = secs;
        }
        if let Some(dir) = update.prompts_dir {
            self.prompts_dir = dir;
        }
    }

    /// Overlay environment variable overrides onto the loaded config.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.base_url = base_url;
            }
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL_NAME") {
            if !model.trim().is_empty() {
                self.model = model;
            }
        }
        self
    }
}
