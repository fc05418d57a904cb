//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories. The app keeps its
//! config file and database under ~/.copyforge/.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Copyforge directory (~/.copyforge/)
pub fn copyforge_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".copyforge"))
}

/// Get the config file path (~/.copyforge/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(copyforge_dir()?.join("config.json"))
}

/// Get the database file path (~/.copyforge/data.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(copyforge_dir()?.join("data.db"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Copyforge directory, creating if it doesn't exist
pub fn ensure_copyforge_dir() -> AppResult<PathBuf> {
    let path = copyforge_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
