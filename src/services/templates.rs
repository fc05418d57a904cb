//! Template Store Service
//!
//! Manages categorized prompt templates: bulk import from per-category
//! directories, creation and deletion with default-flag maintenance, and
//! resolution of the template a pipeline stage should use.

use std::fs;
use std::path::Path;

use crate::models::{PromptTemplate, TemplateCategory, TemplateCreateRequest};
use crate::storage::database::Database;
use crate::utils::error::{AppError, AppResult};

/// A resolved template: the content to interpolate and the id that was
/// actually used (None when the legacy file fallback was taken).
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub content: String,
    pub template_id: Option<i64>,
}

/// Service over the template store
#[derive(Clone)]
pub struct TemplateService {
    db: Database,
}

impl TemplateService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Bulk-import templates from a directory tree with one subdirectory
    /// per category, each containing `{name}.txt` files. Files whose
    /// (category, name) already exists are skipped, so re-running the
    /// import is harmless. The first template landing in an empty category
    /// becomes that category's default. Returns the number imported.
    pub fn import_dir(&self, dir: &Path) -> AppResult<usize> {
        tracing::info!(dir = %dir.display(), "importing prompt templates");
        let mut imported = 0;

        for category in TemplateCategory::ALL {
            let category_dir = dir.join(category.as_str());
            if !category_dir.is_dir() {
                tracing::warn!(category = %category, dir = %category_dir.display(), "template directory missing, skipping");
                continue;
            }

            let mut entries: Vec<_> = fs::read_dir(&category_dir)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
                .collect();
            entries.sort();

            for path in entries {
                let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    continue;
                };

                if self.db.get_template_by_name(category, name)?.is_some() {
                    tracing::debug!(category = %category, name, "template already exists, skipping");
                    continue;
                }

                let content = match fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        tracing::error!(path = %path.display(), error = %e, "failed to read template file");
                        continue;
                    }
                };

                let is_default = self.db.default_template(category)?.is_none();
                self.db.insert_template(&TemplateCreateRequest {
                    category,
                    name: name.to_string(),
                    description: Some(format!("{}模板 - {}", category.label(), name)),
                    content,
                    is_default,
                    source_path: Some(path.display().to_string()),
                })?;
                imported += 1;
                tracing::info!(category = %category, name, is_default, "imported template");
            }
        }

        tracing::info!(imported, "template import finished");
        Ok(imported)
    }

    /// Create a template. When flagged default, any existing default in the
    /// same category is demoted first, so at most one default survives.
    pub fn create(&self, req: TemplateCreateRequest) -> AppResult<PromptTemplate> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("template name must not be empty"));
        }
        if req.content.trim().is_empty() {
            return Err(AppError::validation("template content must not be empty"));
        }

        if req.is_default {
            self.db.clear_default(req.category)?;
        }
        let id = self.db.insert_template(&req)?;
        tracing::info!(id, category = %req.category, name = %req.name, "created template");

        self.db
            .get_template(id)?
            .ok_or_else(|| AppError::database("template missing after insert"))
    }

    /// Delete a template. Returns false when it does not exist. Deleting
    /// the category default promotes an arbitrary remaining template in
    /// that category to default.
    pub fn delete(&self, id: i64) -> AppResult<bool> {
        let Some(template) = self.db.get_template(id)? else {
            return Ok(false);
        };

        self.db.delete_template(id)?;
        tracing::info!(id, category = %template.category, "deleted template");

        if template.is_default {
            if let Some(next) = self.db.first_template(template.category)? {
                self.db.set_template_default(next.id, true)?;
                tracing::info!(promoted = next.id, category = %template.category, "promoted new default template");
            }
        }

        Ok(true)
    }

    /// List templates in a category
    pub fn list(&self, category: TemplateCategory) -> AppResult<Vec<PromptTemplate>> {
        self.db.list_templates(category)
    }

    /// Get a template by id
    pub fn get(&self, id: i64) -> AppResult<Option<PromptTemplate>> {
        self.db.get_template(id)
    }

    /// Get the effective default template for a category: the flagged one,
    /// else the earliest-created.
    pub fn get_default(&self, category: TemplateCategory) -> AppResult<Option<PromptTemplate>> {
        if let Some(template) = self.db.default_template(category)? {
            return Ok(Some(template));
        }
        self.db.first_template(category)
    }

    /// Resolve the template content a stage should use.
    ///
    /// Fallback order: explicit id (when it exists) → category default →
    /// earliest-created in category → legacy single-file template (null
    /// id). Fails with NotFound when none of these is available.
    pub fn resolve(
        &self,
        category: TemplateCategory,
        explicit_id: Option<i64>,
    ) -> AppResult<ResolvedTemplate> {
        if let Some(id) = explicit_id {
            if let Some(template) = self.db.get_template(id)? {
                tracing::debug!(id, category = %category, "using explicitly requested template");
                return Ok(ResolvedTemplate {
                    content: template.content,
                    template_id: Some(template.id),
                });
            }
            tracing::warn!(id, category = %category, "requested template not found, falling back");
        }

        if let Some(template) = self.get_default(category)? {
            tracing::debug!(id = template.id, category = %category, "using default template");
            return Ok(ResolvedTemplate {
                content: template.content,
                template_id: Some(template.id),
            });
        }

        // Legacy single-file layout predating the template store
        let legacy = Path::new(category.legacy_file());
        if legacy.exists() {
            tracing::warn!(category = %category, file = %legacy.display(), "no stored templates, using legacy file");
            let content = fs::read_to_string(legacy)?;
            return Ok(ResolvedTemplate {
                content,
                template_id: None,
            });
        }

        Err(AppError::not_found(format!(
            "no {} prompt template available",
            category
        )))
    }
}
