//! Command Handlers
//!
//! Thin boundary layer between the CLI and the services: parse nothing,
//! validate nothing beyond what clap already did, call a service, print
//! the result.

pub mod articles;
pub mod config;
pub mod html;
pub mod init;
pub mod prompts;
pub mod titles;
pub mod topics;

use crate::cli::Command;
use crate::models::settings::AppConfig;
use crate::services::content::ContentService;
use crate::services::gemini::GeminiClient;
use crate::services::pipeline::Pipeline;
use crate::services::publish::PublishClient;
use crate::services::templates::TemplateService;
use crate::storage::config::ConfigService;
use crate::storage::database::Database;
use crate::utils::error::AppResult;

/// Shared handler context: the open database and the effective config.
pub struct Context {
    pub db: Database,
    pub config: AppConfig,
}

impl Context {
    pub fn load() -> AppResult<Self> {
        let config = ConfigService::new()?.effective_config();
        let db = Database::new()?;
        Ok(Self { db, config })
    }

    pub fn templates(&self) -> TemplateService {
        TemplateService::new(self.db.clone())
    }

    pub fn content(&self) -> AppResult<ContentService> {
        let client = GeminiClient::from_config(&self.config)?;
        let pipeline = Pipeline::new(self.templates(), Box::new(client));
        Ok(ContentService::new(self.db.clone(), pipeline))
    }

    pub fn publisher(&self) -> AppResult<PublishClient> {
        PublishClient::from_config(&self.config)
    }
}

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command) -> AppResult<()> {
    match command {
        // Config commands work without touching the database
        Command::Config { command } => config::run(command),
        command => {
            let ctx = Context::load()?;
            match command {
                Command::Init { prompts_dir } => init::run(&ctx, prompts_dir),
                Command::Topic { command } => topics::run(&ctx, command),
                Command::Title { command } => titles::run(&ctx, command),
                Command::Article { command } => articles::run(&ctx, command),
                Command::Html { command } => html::run(&ctx, command),
                Command::Prompt { command } => prompts::run(&ctx, command),
                Command::Config { .. } => unreachable!(),
            }
        }
    }
}

/// Truncate text to a character limit for list output.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push('…');
    }
    out.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("中文内容很长", 4), "中文内容…");
        assert_eq!(preview("short", 10), "short");
    }

    #[test]
    fn test_preview_flattens_newlines() {
        assert_eq!(preview("a\nb", 10), "a b");
    }
}
