//! Content Pipeline Models
//!
//! Entities for the topic → title → article → html chain. Rows are
//! append-only; the only post-creation mutation is the `selected` flag.

use serde::{Deserialize, Serialize};

/// Sentinel prompt recorded for manually entered titles.
pub const MANUAL_TITLE_PROMPT: &str = "自定义标题（手动输入）";
/// Sentinel prompt recorded for the title row of a manually entered article.
pub const MANUAL_COMBO_TITLE_PROMPT: &str = "自定义标题和短文（手动输入）";
/// Sentinel prompt recorded for manually entered articles.
pub const MANUAL_ARTICLE_PROMPT: &str = "自定义短文（手动输入）";

/// Root of the pipeline, created from user input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub topic_text: String,
    /// "draft" | "completed"
    pub status: String,
    pub created_at: Option<String>,
}

/// A candidate title generated (or manually entered) for a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    pub id: i64,
    pub topic_id: i64,
    pub title_text: String,
    /// Full prompt sent to the backend, or a manual-entry sentinel.
    pub prompt_text: String,
    pub template_id: Option<i64>,
    pub selected: bool,
    pub created_at: Option<String>,
}

/// An article generated (or manually entered) for a title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title_id: i64,
    pub article_text: String,
    pub prompt_text: String,
    pub template_id: Option<i64>,
    pub selected: bool,
    pub created_at: Option<String>,
}

/// HTML rendering generated for an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlOutput {
    pub id: i64,
    pub article_id: i64,
    pub html_content: String,
    pub prompt_text: String,
    pub template_id: Option<i64>,
    pub created_at: Option<String>,
}
