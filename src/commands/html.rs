//! HTML Output Commands

use super::Context;
use crate::cli::HtmlCommand;
use crate::utils::error::{AppError, AppResult};

pub fn run(ctx: &Context, command: HtmlCommand) -> AppResult<()> {
    match command {
        HtmlCommand::List => list(ctx),
        HtmlCommand::Show { id } => show(ctx, id),
    }
}

fn list(ctx: &Context) -> AppResult<()> {
    let outputs = ctx.db.list_html()?;
    if outputs.is_empty() {
        println!("No HTML outputs yet.");
        return Ok(());
    }

    for output in outputs {
        println!(
            "[{}] article {} (created: {})",
            output.id,
            output.article_id,
            output.created_at.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn show(ctx: &Context, id: i64) -> AppResult<()> {
    let output = ctx
        .db
        .get_html(id)?
        .ok_or_else(|| AppError::not_found(format!("html output {}", id)))?;

    println!("HTML [{}] (article {})", output.id, output.article_id);
    println!("--- content ---");
    println!("{}", output.html_content);
    println!("--- prompt ---");
    println!("{}", output.prompt_text);
    Ok(())
}
