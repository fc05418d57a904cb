//! Copyforge - Content Generation Pipeline
//!
//! Turns a user-supplied topic into candidate titles, an article, and an
//! HTML rendering through a sequence of generation backend calls, with an
//! optional publish step to an external workflow API. Every stage artifact
//! is persisted so later stages can re-run against earlier ones.
//!
//! - `services::templates`: categorized prompt templates with default
//!   resolution and directory import
//! - `services::gemini` / `services::extract`: the generation client and
//!   the final-answer extraction over deliberation-leaking responses
//! - `services::pipeline`: the title/article/html stages
//! - `services::publish`: the workflow publish client
//! - `storage`: SQLite persistence and JSON config

pub mod cli;
pub mod commands;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use storage::database::Database;
pub use utils::error::{AppError, AppResult};
