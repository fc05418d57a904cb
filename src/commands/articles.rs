//! Article Commands

use std::path::Path;

use super::{preview, Context};
use crate::cli::ArticleCommand;
use crate::utils::error::{AppError, AppResult};

pub fn run(ctx: &Context, command: ArticleCommand) -> AppResult<()> {
    match command {
        ArticleCommand::New { title, text, topic } => new(ctx, &title, &text, topic.as_deref()),
        ArticleCommand::List => list(ctx),
        ArticleCommand::Html { id, template } => html(ctx, id, template),
        ArticleCommand::Show { id } => show(ctx, id),
        ArticleCommand::Select { id, unset } => select(ctx, id, unset),
    }
}

fn new(ctx: &Context, title: &str, text: &str, topic: Option<&str>) -> AppResult<()> {
    // Accept the article body inline or as a file path
    let article_text = if Path::new(text).is_file() {
        std::fs::read_to_string(text)?
    } else {
        text.to_string()
    };

    let result = ctx
        .content()?
        .create_custom_article(topic, title, &article_text)?;

    println!(
        "Saved custom article {} (topic {}, title {}).",
        result.article_id, result.topic_id, result.title_id
    );
    Ok(())
}

fn list(ctx: &Context) -> AppResult<()> {
    let articles = ctx.db.list_articles()?;
    if articles.is_empty() {
        println!("No articles yet.");
        return Ok(());
    }

    for article in articles {
        let mark = if article.selected { "✓" } else { " " };
        println!(
            "[{}] [{}] title {} | {}",
            mark,
            article.id,
            article.title_id,
            preview(&article.article_text, 80),
        );
    }
    Ok(())
}

fn html(ctx: &Context, id: i64, template: Option<i64>) -> AppResult<()> {
    let html = ctx.content()?.generate_html_for_article(id, template)?;

    println!("HTML {} generated for article {}.", html.id, id);
    println!("Preview: {}", preview(&html.html_content, 200));
    Ok(())
}

fn show(ctx: &Context, id: i64) -> AppResult<()> {
    let article = ctx
        .db
        .get_article(id)?
        .ok_or_else(|| AppError::not_found(format!("article {}", id)))?;

    println!("Article [{}] (title {})", article.id, article.title_id);
    println!("Selected: {}", article.selected);
    println!("--- text ---");
    println!("{}", article.article_text);
    println!("--- prompt ---");
    println!("{}", article.prompt_text);
    Ok(())
}

fn select(ctx: &Context, id: i64, unset: bool) -> AppResult<()> {
    ctx.db
        .get_article(id)?
        .ok_or_else(|| AppError::not_found(format!("article {}", id)))?;
    ctx.db.set_article_selected(id, !unset)?;
    println!("Article {} {}.", id, if unset { "unselected" } else { "selected" });
    Ok(())
}
