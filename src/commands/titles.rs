//! Title Commands

use super::{preview, Context};
use crate::cli::TitleCommand;
use crate::services::publish::PublishResponse;
use crate::utils::error::{AppError, AppResult};

pub fn run(ctx: &Context, command: TitleCommand) -> AppResult<()> {
    match command {
        TitleCommand::Article { id, template } => article(ctx, id, template),
        TitleCommand::Show { id } => show(ctx, id),
        TitleCommand::Select { id, unset } => select(ctx, id, unset),
        TitleCommand::Publish { id, html_template } => publish(ctx, id, html_template),
    }
}

fn article(ctx: &Context, id: i64, template: Option<i64>) -> AppResult<()> {
    let article = ctx.content()?.generate_article_for_title(id, template)?;

    println!("Article {} generated for title {}.", article.id, id);
    println!("Preview: {}", preview(&article.article_text, 100));
    Ok(())
}

fn show(ctx: &Context, id: i64) -> AppResult<()> {
    let title = ctx
        .db
        .get_title(id)?
        .ok_or_else(|| AppError::not_found(format!("title {}", id)))?;

    println!("Title [{}]: {}", title.id, title.title_text);
    println!("Selected: {}", title.selected);
    match title.template_id {
        Some(template_id) => println!("Template: {}", template_id),
        None => println!("Template: -"),
    }
    println!("--- prompt ---");
    println!("{}", title.prompt_text);
    Ok(())
}

fn select(ctx: &Context, id: i64, unset: bool) -> AppResult<()> {
    ctx.db
        .get_title(id)?
        .ok_or_else(|| AppError::not_found(format!("title {}", id)))?;
    ctx.db.set_title_selected(id, !unset)?;
    println!("Title {} {}.", id, if unset { "unselected" } else { "selected" });
    Ok(())
}

fn publish(ctx: &Context, id: i64, html_template: Option<i64>) -> AppResult<()> {
    let content = ctx.content()?;
    let publisher = ctx.publisher()?;
    let outcome = content.publish_title(id, html_template, &publisher)?;

    println!("Published title {} ({}).", outcome.title_id, outcome.title_text);
    println!("Article: {}, HTML: {}", outcome.article_id, outcome.html_id);
    match outcome.response {
        PublishResponse::Json(value) => {
            println!("Workflow response: {}", serde_json::to_string_pretty(&value)?);
        }
        PublishResponse::Events(events) => {
            println!("Workflow events:");
            for event in events {
                println!("  {}", event);
            }
        }
        PublishResponse::Text(text) => {
            println!("Workflow response: {}", text);
        }
    }
    Ok(())
}
