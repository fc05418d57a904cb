//! Topic Commands

use super::{preview, Context};
use crate::cli::TopicCommand;
use crate::utils::error::{AppError, AppResult};

pub fn run(ctx: &Context, command: TopicCommand) -> AppResult<()> {
    match command {
        TopicCommand::New { text, template } => new(ctx, &text, template),
        TopicCommand::Custom { text, titles } => custom(ctx, &text, titles),
        TopicCommand::List => list(ctx),
        TopicCommand::Titles { id } => titles(ctx, id),
        TopicCommand::Delete { id } => delete(ctx, id),
    }
}

fn new(ctx: &Context, text: &str, template: Option<i64>) -> AppResult<()> {
    let result = ctx.content()?.create_topic_with_titles(text, template)?;

    println!("Topic {} created.", result.topic_id);
    println!("Generated {} title(s):", result.titles.len());
    for (title_id, title) in result.title_ids.iter().zip(&result.titles) {
        println!("  [{}] {}", title_id, title);
    }
    if let Some(template_id) = result.template_id {
        println!("Template used: {}", template_id);
    }
    Ok(())
}

fn custom(ctx: &Context, text: &str, titles: Vec<String>) -> AppResult<()> {
    let result = ctx.content()?.create_topic_with_custom_titles(text, &titles)?;

    println!("Topic {} created with {} custom title(s):", result.topic_id, result.titles.len());
    for (title_id, title) in result.title_ids.iter().zip(&result.titles) {
        println!("  [{}] {}", title_id, title);
    }
    Ok(())
}

fn list(ctx: &Context) -> AppResult<()> {
    let topics = ctx.db.list_topics()?;
    if topics.is_empty() {
        println!("No topics yet.");
        return Ok(());
    }

    for topic in topics {
        let count = ctx.db.count_titles(topic.id)?;
        println!(
            "[{}] {} (status: {}, titles: {}, created: {})",
            topic.id,
            preview(&topic.topic_text, 60),
            topic.status,
            count,
            topic.created_at.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn titles(ctx: &Context, id: i64) -> AppResult<()> {
    let topic = ctx
        .db
        .get_topic(id)?
        .ok_or_else(|| AppError::not_found(format!("topic {}", id)))?;

    println!("Topic: {}", topic.topic_text);
    let titles = ctx.db.list_titles(id)?;
    if titles.is_empty() {
        println!("No titles yet.");
        return Ok(());
    }

    for title in titles {
        let mark = if title.selected { "✓" } else { " " };
        println!("  [{}] [{}] {}", mark, title.id, title.title_text);
    }
    Ok(())
}

fn delete(ctx: &Context, id: i64) -> AppResult<()> {
    if ctx.db.delete_topic(id)? {
        println!("Topic {} and everything under it deleted.", id);
        Ok(())
    } else {
        Err(AppError::not_found(format!("topic {}", id)))
    }
}
