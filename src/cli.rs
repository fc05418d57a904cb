//! CLI Definitions
//!
//! clap derive definitions for the command-line surface. Handlers live in
//! the `commands` module; this file only describes the shape.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "copyforge",
    about = "Topic-to-article content generation pipeline",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize the database and import prompt templates
    Init {
        /// Directory with per-category template subdirectories
        /// (defaults to the configured prompts directory)
        #[arg(long)]
        prompts_dir: Option<PathBuf>,
    },
    /// Manage topics and their generated titles
    Topic {
        #[command(subcommand)]
        command: TopicCommand,
    },
    /// Work with individual titles
    Title {
        #[command(subcommand)]
        command: TitleCommand,
    },
    /// Work with articles
    Article {
        #[command(subcommand)]
        command: ArticleCommand,
    },
    /// Inspect generated HTML outputs
    Html {
        #[command(subcommand)]
        command: HtmlCommand,
    },
    /// Manage prompt templates
    Prompt {
        #[command(subcommand)]
        command: PromptCommand,
    },
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the stored configuration
    Show,
    /// Change configuration values
    Set {
        /// Generation backend base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Generation model name
        #[arg(long)]
        model: Option<String>,
        /// Per-call generation timeout in seconds
        #[arg(long)]
        generation_timeout: Option<u64>,
        /// Publish workflow endpoint
        #[arg(long)]
        publish_url: Option<String>,
        /// Publish workflow id
        #[arg(long)]
        workflow_id: Option<String>,
        /// Per-call publish timeout in seconds
        #[arg(long)]
        publish_timeout: Option<u64>,
        /// Directory holding per-category template subdirectories
        #[arg(long)]
        prompts_dir: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TopicCommand {
    /// Create a topic and generate candidate titles for it
    New {
        /// The topic text
        text: String,
        /// Title template id to use instead of the category default
        #[arg(long)]
        template: Option<i64>,
    },
    /// Create a topic with manually entered titles
    Custom {
        /// The topic text
        text: String,
        /// One or more titles
        #[arg(required = true)]
        titles: Vec<String>,
    },
    /// List all topics
    List,
    /// Show the titles of a topic
    Titles {
        /// Topic id
        id: i64,
    },
    /// Delete a topic and everything generated from it
    Delete {
        /// Topic id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum TitleCommand {
    /// Generate an article for a title
    Article {
        /// Title id
        id: i64,
        /// Article template id to use instead of the category default
        #[arg(long)]
        template: Option<i64>,
    },
    /// Show a title and the prompt that produced it
    Show {
        /// Title id
        id: i64,
    },
    /// Mark a title as selected (or unselected)
    Select {
        /// Title id
        id: i64,
        /// Clear the flag instead of setting it
        #[arg(long)]
        unset: bool,
    },
    /// Ensure article and HTML exist for a title, then publish them
    Publish {
        /// Title id
        id: i64,
        /// HTML template id to use when the rendering is generated
        #[arg(long)]
        html_template: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum ArticleCommand {
    /// Save a manually written article (with its title, and optional topic)
    New {
        /// The title text
        title: String,
        /// The article text, or a path to a file holding it
        text: String,
        /// Topic text to attach the article to (reused when it exists)
        #[arg(long)]
        topic: Option<String>,
    },
    /// List all articles
    List,
    /// Generate an HTML rendering for an article
    Html {
        /// Article id
        id: i64,
        /// HTML template id to use instead of the category default
        #[arg(long)]
        template: Option<i64>,
    },
    /// Show an article and the prompt that produced it
    Show {
        /// Article id
        id: i64,
    },
    /// Mark an article as selected (or unselected)
    Select {
        /// Article id
        id: i64,
        /// Clear the flag instead of setting it
        #[arg(long)]
        unset: bool,
    },
}

#[derive(Subcommand)]
pub enum HtmlCommand {
    /// List all HTML outputs
    List,
    /// Show an HTML output and the prompt that produced it
    Show {
        /// HTML output id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum PromptCommand {
    /// Import templates from a directory tree (one subdirectory per category)
    Import {
        /// Directory to import from (defaults to the configured prompts
        /// directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// List templates in a category (title/article/html)
    List {
        /// Template category
        category: String,
    },
    /// Show a template in full
    Show {
        /// Template id
        id: i64,
    },
    /// Add a template from a file
    Add {
        /// Template category (title/article/html)
        category: String,
        /// Template name
        name: String,
        /// File holding the template content
        #[arg(long)]
        file: PathBuf,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Flag the template as the category default
        #[arg(long)]
        default: bool,
    },
    /// Delete a template
    Delete {
        /// Template id
        id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_topic_new_with_template() {
        let cli = Cli::try_parse_from(["copyforge", "topic", "new", "职场", "--template", "3"])
            .unwrap();
        match cli.command {
            Command::Topic {
                command: TopicCommand::New { text, template },
            } => {
                assert_eq!(text, "职场");
                assert_eq!(template, Some(3));
            }
            _ => panic!("unexpected parse"),
        }
    }

    #[test]
    fn test_parse_topic_custom_requires_titles() {
        assert!(Cli::try_parse_from(["copyforge", "topic", "custom", "主题"]).is_err());
    }

    #[test]
    fn test_parse_prompt_add() {
        let cli = Cli::try_parse_from([
            "copyforge", "prompt", "add", "title", "sharp", "--file", "t.txt", "--default",
        ])
        .unwrap();
        match cli.command {
            Command::Prompt {
                command:
                    PromptCommand::Add {
                        category,
                        name,
                        default,
                        ..
                    },
            } => {
                assert_eq!(category, "title");
                assert_eq!(name, "sharp");
                assert!(default);
            }
            _ => panic!("unexpected parse"),
        }
    }
}
