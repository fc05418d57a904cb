//! Prompt Template Models
//!
//! Data structures for categorized prompt templates. Each pipeline stage
//! draws its prompt from one template category.

use serde::{Deserialize, Serialize};

/// Template category, one per pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Title,
    Article,
    Html,
}

impl TemplateCategory {
    /// All categories, in pipeline order.
    pub const ALL: [TemplateCategory; 3] = [Self::Title, Self::Article, Self::Html];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Article => "article",
            Self::Html => "html",
        }
    }

    /// Parse a category name. Returns None for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "article" => Some(Self::Article),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    /// Placeholder token embedded verbatim in this category's template
    /// text, replaced once with the stage input.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Title => "{{topic}}",
            Self::Article => "[在此输入你的主题]",
            Self::Html => "{{content}}",
        }
    }

    /// Single-file template path from the pre-database layout, used as the
    /// last resolution fallback when the category has no stored templates.
    pub fn legacy_file(&self) -> &'static str {
        match self {
            Self::Title => "标题生成提示词",
            Self::Article => "qx-短文提示词",
            Self::Html => "html生成提示词",
        }
    }

    /// Human-readable label used in imported template descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "标题生成",
            Self::Article => "短文生成",
            Self::Html => "HTML生成",
        }
    }

    /// Generation temperature for this stage.
    pub fn temperature(&self) -> f32 {
        match self {
            Self::Title => 0.8,
            Self::Article => 0.7,
            Self::Html => 0.7,
        }
    }

    /// Generation output token cap for this stage.
    pub fn max_tokens(&self) -> u32 {
        match self {
            Self::Title => 2048,
            Self::Article => 8192,
            Self::Html => 4096,
        }
    }
}

impl std::fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("unknown template category '{}', expected title/article/html", s)
        })
    }
}

/// A stored prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: i64,
    pub category: TemplateCategory,
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    /// Whether this template is the category default. At most one template
    /// per category carries the flag; the store maintains the invariant.
    pub is_default: bool,
    /// Source file, when the template was bulk-imported.
    pub source_path: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Request to create a new prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCreateRequest {
    pub category: TemplateCategory,
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    pub is_default: bool,
    pub source_path: Option<String>,
}
