//! Init Command
//!
//! One-time setup: the database schema is created on open, then the
//! prompt template directories are imported.

use std::path::PathBuf;

use super::Context;
use crate::utils::error::AppResult;

pub fn run(ctx: &Context, prompts_dir: Option<PathBuf>) -> AppResult<()> {
    let dir = prompts_dir.unwrap_or_else(|| PathBuf::from(&ctx.config.prompts_dir));

    println!("Database initialized.");

    let imported = ctx.templates().import_dir(&dir)?;
    println!("Imported {} prompt template(s) from {}.", imported, dir.display());

    Ok(())
}
