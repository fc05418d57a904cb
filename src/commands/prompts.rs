//! Prompt Template Commands

use std::path::PathBuf;

use super::{preview, Context};
use crate::cli::PromptCommand;
use crate::models::{TemplateCategory, TemplateCreateRequest};
use crate::utils::error::{AppError, AppResult};

pub fn run(ctx: &Context, command: PromptCommand) -> AppResult<()> {
    match command {
        PromptCommand::Import { dir } => import(ctx, dir),
        PromptCommand::List { category } => list(ctx, &category),
        PromptCommand::Show { id } => show(ctx, id),
        PromptCommand::Add {
            category,
            name,
            file,
            description,
            default,
        } => add(ctx, &category, name, file, description, default),
        PromptCommand::Delete { id } => delete(ctx, id),
    }
}

fn parse_category(category: &str) -> AppResult<TemplateCategory> {
    category.parse::<TemplateCategory>().map_err(AppError::validation)
}

fn import(ctx: &Context, dir: Option<PathBuf>) -> AppResult<()> {
    let dir = dir.unwrap_or_else(|| PathBuf::from(&ctx.config.prompts_dir));
    let imported = ctx.templates().import_dir(&dir)?;
    println!("Imported {} prompt template(s) from {}.", imported, dir.display());
    Ok(())
}

fn list(ctx: &Context, category: &str) -> AppResult<()> {
    let category = parse_category(category)?;
    let templates = ctx.templates().list(category)?;
    if templates.is_empty() {
        println!("No {} templates yet.", category);
        return Ok(());
    }

    for template in templates {
        let mark = if template.is_default { "*" } else { " " };
        println!(
            "[{}] [{}] {} | {}",
            mark,
            template.id,
            template.name,
            preview(&template.content, 60),
        );
    }
    Ok(())
}

fn show(ctx: &Context, id: i64) -> AppResult<()> {
    let template = ctx
        .templates()
        .get(id)?
        .ok_or_else(|| AppError::not_found(format!("template {}", id)))?;

    println!("Template [{}] {} ({})", template.id, template.name, template.category);
    if let Some(description) = &template.description {
        println!("Description: {}", description);
    }
    println!("Default: {}", template.is_default);
    if let Some(path) = &template.source_path {
        println!("Source: {}", path);
    }
    println!("--- content ---");
    println!("{}", template.content);
    Ok(())
}

fn add(
    ctx: &Context,
    category: &str,
    name: String,
    file: PathBuf,
    description: Option<String>,
    default: bool,
) -> AppResult<()> {
    let category = parse_category(category)?;
    let content = std::fs::read_to_string(&file)?;

    let template = ctx.templates().create(TemplateCreateRequest {
        category,
        name,
        description,
        content,
        is_default: default,
        source_path: Some(file.display().to_string()),
    })?;

    println!("Template {} created (default: {}).", template.id, template.is_default);
    Ok(())
}

fn delete(ctx: &Context, id: i64) -> AppResult<()> {
    if ctx.templates().delete(id)? {
        println!("Template {} deleted.", id);
        Ok(())
    } else {
        Err(AppError::not_found(format!("template {}", id)))
    }
}
