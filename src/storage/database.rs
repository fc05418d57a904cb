//! SQLite Database
//!
//! Embedded database for persistent storage using rusqlite with r2d2
//! connection pooling. Holds the template store and the topic → title →
//! article → html chain; child rows are removed by cascade when a parent
//! is deleted.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::models::{
    Article, HtmlOutput, PromptTemplate, TemplateCategory, TemplateCreateRequest, Title, Topic,
};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::database_path;

/// Type alias for the connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

/// Database service for managing SQLite operations
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a database from an existing connection pool.
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create an in-memory database for testing.
    ///
    /// Uses an in-memory SQLite database with the same schema as the
    /// production database. Useful for integration and unit tests.
    pub fn new_in_memory() -> AppResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    /// Create a new database instance with connection pooling
    pub fn new() -> AppResult<Self> {
        let db_path = database_path()?;

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;

        Ok(db)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> AppResult<()> {
        let conn = self.get_connection()?;

        // Enable foreign keys (must be set per-connection in SQLite)
        conn.execute_batch("PRAGMA foreign_keys = ON")?;

        // Prompt templates. No uniqueness constraint on (category, name) or
        // on the default flag; both invariants are maintained in code.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS prompt_templates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                content TEXT NOT NULL,
                is_default INTEGER NOT NULL DEFAULT 0,
                source_path TEXT,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_prompt_templates_category
             ON prompt_templates(category)",
            [],
        )?;

        // Topics: root of the pipeline
        conn.execute(
            "CREATE TABLE IF NOT EXISTS topics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                topic_text TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'draft',
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        // Titles: one topic owns many titles
        conn.execute(
            "CREATE TABLE IF NOT EXISTS titles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                topic_id INTEGER NOT NULL,
                title_text TEXT NOT NULL,
                prompt_text TEXT NOT NULL,
                template_id INTEGER,
                selected INTEGER NOT NULL DEFAULT 0,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (topic_id) REFERENCES topics(id) ON DELETE CASCADE,
                FOREIGN KEY (template_id) REFERENCES prompt_templates(id) ON DELETE SET NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_titles_topic_id ON titles(topic_id)",
            [],
        )?;

        // Articles: 0..n per title, lookups take first-found
        conn.execute(
            "CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title_id INTEGER NOT NULL,
                article_text TEXT NOT NULL,
                prompt_text TEXT NOT NULL,
                template_id INTEGER,
                selected INTEGER NOT NULL DEFAULT 0,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (title_id) REFERENCES titles(id) ON DELETE CASCADE,
                FOREIGN KEY (template_id) REFERENCES prompt_templates(id) ON DELETE SET NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_articles_title_id ON articles(title_id)",
            [],
        )?;

        // HTML outputs: 0..n per article, lookups take first-found
        conn.execute(
            "CREATE TABLE IF NOT EXISTS html_outputs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                article_id INTEGER NOT NULL,
                html_content TEXT NOT NULL,
                prompt_text TEXT NOT NULL,
                template_id INTEGER,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (article_id) REFERENCES articles(id) ON DELETE CASCADE,
                FOREIGN KEY (template_id) REFERENCES prompt_templates(id) ON DELETE SET NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_html_outputs_article_id
             ON html_outputs(article_id)",
            [],
        )?;

        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> AppResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Check if the database is healthy
    pub fn is_healthy(&self) -> bool {
        if let Ok(conn) = self.pool.get() {
            conn.query_row("SELECT 1", [], |_| Ok(())).is_ok()
        } else {
            false
        }
    }

    // ========================================================================
    // Prompt Template Operations
    // ========================================================================

    /// Insert a new prompt template, returning its id
    pub fn insert_template(&self, req: &TemplateCreateRequest) -> AppResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO prompt_templates (category, name, description, content, is_default, source_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                req.category.as_str(),
                req.name,
                req.description,
                req.content,
                req.is_default as i32,
                req.source_path,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a prompt template by id
    pub fn get_template(&self, id: i64) -> AppResult<Option<PromptTemplate>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, category, name, description, content, is_default, source_path, created_at, updated_at
             FROM prompt_templates WHERE id = ?1",
            params![id],
            Self::row_to_template,
        );

        match result {
            Ok(template) => Ok(Some(template)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Get a prompt template by (category, name), used to skip re-imports
    pub fn get_template_by_name(
        &self,
        category: TemplateCategory,
        name: &str,
    ) -> AppResult<Option<PromptTemplate>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, category, name, description, content, is_default, source_path, created_at, updated_at
             FROM prompt_templates WHERE category = ?1 AND name = ?2",
            params![category.as_str(), name],
            Self::row_to_template,
        );

        match result {
            Ok(template) => Ok(Some(template)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// List templates in a category, default first, then oldest first
    pub fn list_templates(&self, category: TemplateCategory) -> AppResult<Vec<PromptTemplate>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, category, name, description, content, is_default, source_path, created_at, updated_at
             FROM prompt_templates WHERE category = ?1
             ORDER BY is_default DESC, id ASC",
        )?;

        let templates = stmt
            .query_map(params![category.as_str()], Self::row_to_template)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(templates)
    }

    /// Get the template flagged default in a category.
    ///
    /// If more than one row carries the flag (an invariant breach), the
    /// lowest id wins, so resolution stays deterministic.
    pub fn default_template(
        &self,
        category: TemplateCategory,
    ) -> AppResult<Option<PromptTemplate>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, category, name, description, content, is_default, source_path, created_at, updated_at
             FROM prompt_templates WHERE category = ?1 AND is_default = 1
             ORDER BY id ASC LIMIT 1",
            params![category.as_str()],
            Self::row_to_template,
        );

        match result {
            Ok(template) => Ok(Some(template)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Get the earliest-created template in a category
    pub fn first_template(&self, category: TemplateCategory) -> AppResult<Option<PromptTemplate>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, category, name, description, content, is_default, source_path, created_at, updated_at
             FROM prompt_templates WHERE category = ?1
             ORDER BY id ASC LIMIT 1",
            params![category.as_str()],
            Self::row_to_template,
        );

        match result {
            Ok(template) => Ok(Some(template)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Clear the default flag on every template in a category
    pub fn clear_default(&self, category: TemplateCategory) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "UPDATE prompt_templates SET is_default = 0, updated_at = CURRENT_TIMESTAMP
             WHERE category = ?1 AND is_default = 1",
            params![category.as_str()],
        )?;
        Ok(())
    }

    /// Set or clear the default flag on a single template
    pub fn set_template_default(&self, id: i64, is_default: bool) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "UPDATE prompt_templates SET is_default = ?2, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?1",
            params![id, is_default as i32],
        )?;
        Ok(())
    }

    /// Delete a prompt template. Returns false when no row matched.
    pub fn delete_template(&self, id: i64) -> AppResult<bool> {
        let conn = self.get_connection()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let affected = conn.execute("DELETE FROM prompt_templates WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    fn row_to_template(row: &rusqlite::Row) -> rusqlite::Result<PromptTemplate> {
        let category_str: String = row.get(1)?;
        let category = TemplateCategory::parse(&category_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                format!("unknown template category: {}", category_str).into(),
            )
        })?;
        let is_default: i32 = row.get(5)?;

        Ok(PromptTemplate {
            id: row.get(0)?,
            category,
            name: row.get(2)?,
            description: row.get(3)?,
            content: row.get(4)?,
            is_default: is_default != 0,
            source_path: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    // ========================================================================
    // Topic Operations
    // ========================================================================

    /// Insert a new topic with "draft" status, returning its id
    pub fn insert_topic(&self, topic_text: &str) -> AppResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO topics (topic_text, status) VALUES (?1, 'draft')",
            params![topic_text],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a topic by id
    pub fn get_topic(&self, id: i64) -> AppResult<Option<Topic>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, topic_text, status, created_at FROM topics WHERE id = ?1",
            params![id],
            Self::row_to_topic,
        );

        match result {
            Ok(topic) => Ok(Some(topic)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Get a topic by its exact text, used to reuse topics on manual entry
    pub fn get_topic_by_text(&self, topic_text: &str) -> AppResult<Option<Topic>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, topic_text, status, created_at FROM topics
             WHERE topic_text = ?1 ORDER BY id ASC LIMIT 1",
            params![topic_text],
            Self::row_to_topic,
        );

        match result {
            Ok(topic) => Ok(Some(topic)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// List all topics, newest first
    pub fn list_topics(&self) -> AppResult<Vec<Topic>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, topic_text, status, created_at FROM topics
             ORDER BY created_at DESC, id DESC",
        )?;

        let topics = stmt
            .query_map([], Self::row_to_topic)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(topics)
    }

    /// Delete a topic. Titles, articles and html outputs underneath it are
    /// cascade-deleted. Returns false when no row matched.
    pub fn delete_topic(&self, id: i64) -> AppResult<bool> {
        let conn = self.get_connection()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let affected = conn.execute("DELETE FROM topics WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Count titles owned by a topic
    pub fn count_titles(&self, topic_id: i64) -> AppResult<i64> {
        let conn = self.get_connection()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM titles WHERE topic_id = ?1",
            params![topic_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn row_to_topic(row: &rusqlite::Row) -> rusqlite::Result<Topic> {
        Ok(Topic {
            id: row.get(0)?,
            topic_text: row.get(1)?,
            status: row.get(2)?,
            created_at: row.get(3)?,
        })
    }

    // ========================================================================
    // Title Operations
    // ========================================================================

    /// Insert a new title row, returning its id
    pub fn insert_title(
        &self,
        topic_id: i64,
        title_text: &str,
        prompt_text: &str,
        template_id: Option<i64>,
    ) -> AppResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO titles (topic_id, title_text, prompt_text, template_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![topic_id, title_text, prompt_text, template_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a title by id
    pub fn get_title(&self, id: i64) -> AppResult<Option<Title>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, topic_id, title_text, prompt_text, template_id, selected, created_at
             FROM titles WHERE id = ?1",
            params![id],
            Self::row_to_title,
        );

        match result {
            Ok(title) => Ok(Some(title)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// List titles for a topic, newest first
    pub fn list_titles(&self, topic_id: i64) -> AppResult<Vec<Title>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, topic_id, title_text, prompt_text, template_id, selected, created_at
             FROM titles WHERE topic_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let titles = stmt
            .query_map(params![topic_id], Self::row_to_title)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(titles)
    }

    /// Update the selected flag on a title
    pub fn set_title_selected(&self, id: i64, selected: bool) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "UPDATE titles SET selected = ?2 WHERE id = ?1",
            params![id, selected as i32],
        )?;
        Ok(())
    }

    fn row_to_title(row: &rusqlite::Row) -> rusqlite::Result<Title> {
        let selected: i32 = row.get(5)?;
        Ok(Title {
            id: row.get(0)?,
            topic_id: row.get(1)?,
            title_text: row.get(2)?,
            prompt_text: row.get(3)?,
            template_id: row.get(4)?,
            selected: selected != 0,
            created_at: row.get(6)?,
        })
    }

    // ========================================================================
    // Article Operations
    // ========================================================================

    /// Insert a new article row, returning its id
    pub fn insert_article(
        &self,
        title_id: i64,
        article_text: &str,
        prompt_text: &str,
        template_id: Option<i64>,
    ) -> AppResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO articles (title_id, article_text, prompt_text, template_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![title_id, article_text, prompt_text, template_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get an article by id
    pub fn get_article(&self, id: i64) -> AppResult<Option<Article>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, title_id, article_text, prompt_text, template_id, selected, created_at
             FROM articles WHERE id = ?1",
            params![id],
            Self::row_to_article,
        );

        match result {
            Ok(article) => Ok(Some(article)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Get the first-found article for a title, if any.
    ///
    /// The schema permits several articles per title; readers take the
    /// earliest row, matching observed behavior.
    pub fn first_article_for_title(&self, title_id: i64) -> AppResult<Option<Article>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, title_id, article_text, prompt_text, template_id, selected, created_at
             FROM articles WHERE title_id = ?1 ORDER BY id ASC LIMIT 1",
            params![title_id],
            Self::row_to_article,
        );

        match result {
            Ok(article) => Ok(Some(article)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// List all articles, newest first
    pub fn list_articles(&self) -> AppResult<Vec<Article>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, title_id, article_text, prompt_text, template_id, selected, created_at
             FROM articles ORDER BY created_at DESC, id DESC",
        )?;

        let articles = stmt
            .query_map([], Self::row_to_article)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(articles)
    }

    /// Update the selected flag on an article
    pub fn set_article_selected(&self, id: i64, selected: bool) -> AppResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "UPDATE articles SET selected = ?2 WHERE id = ?1",
            params![id, selected as i32],
        )?;
        Ok(())
    }

    fn row_to_article(row: &rusqlite::Row) -> rusqlite::Result<Article> {
        let selected: i32 = row.get(5)?;
        Ok(Article {
            id: row.get(0)?,
            title_id: row.get(1)?,
            article_text: row.get(2)?,
            prompt_text: row.get(3)?,
            template_id: row.get(4)?,
            selected: selected != 0,
            created_at: row.get(6)?,
        })
    }

    // ========================================================================
    // HTML Output Operations
    // ========================================================================

    /// Insert a new html output row, returning its id
    pub fn insert_html(
        &self,
        article_id: i64,
        html_content: &str,
        prompt_text: &str,
        template_id: Option<i64>,
    ) -> AppResult<i64> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO html_outputs (article_id, html_content, prompt_text, template_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![article_id, html_content, prompt_text, template_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get an html output by id
    pub fn get_html(&self, id: i64) -> AppResult<Option<HtmlOutput>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, article_id, html_content, prompt_text, template_id, created_at
             FROM html_outputs WHERE id = ?1",
            params![id],
            Self::row_to_html,
        );

        match result {
            Ok(html) => Ok(Some(html)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Get the first-found html output for an article, if any
    pub fn first_html_for_article(&self, article_id: i64) -> AppResult<Option<HtmlOutput>> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            "SELECT id, article_id, html_content, prompt_text, template_id, created_at
             FROM html_outputs WHERE article_id = ?1 ORDER BY id ASC LIMIT 1",
            params![article_id],
            Self::row_to_html,
        );

        match result {
            Ok(html) => Ok(Some(html)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// List all html outputs, newest first
    pub fn list_html(&self) -> AppResult<Vec<HtmlOutput>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, article_id, html_content, prompt_text, template_id, created_at
             FROM html_outputs ORDER BY created_at DESC, id DESC",
        )?;

        let outputs = stmt
            .query_map([], Self::row_to_html)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(outputs)
    }

    fn row_to_html(row: &rusqlite::Row) -> rusqlite::Result<HtmlOutput> {
        Ok(HtmlOutput {
            id: row.get(0)?,
            article_id: row.get(1)?,
            html_content: row.get(2)?,
            prompt_text: row.get(3)?,
            template_id: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_req(category: TemplateCategory, name: &str, is_default: bool) -> TemplateCreateRequest {
        TemplateCreateRequest {
            category,
            name: name.to_string(),
            description: None,
            content: format!("content of {}", name),
            is_default,
            source_path: None,
        }
    }

    #[test]
    fn test_in_memory_database_is_healthy() {
        let db = Database::new_in_memory().unwrap();
        assert!(db.is_healthy());
    }

    #[test]
    fn test_template_crud() {
        let db = Database::new_in_memory().unwrap();
        let id = db
            .insert_template(&template_req(TemplateCategory::Title, "sharp", true))
            .unwrap();

        let template = db.get_template(id).unwrap().unwrap();
        assert_eq!(template.name, "sharp");
        assert!(template.is_default);
        assert_eq!(template.category, TemplateCategory::Title);

        assert!(db
            .get_template_by_name(TemplateCategory::Title, "sharp")
            .unwrap()
            .is_some());
        assert!(db
            .get_template_by_name(TemplateCategory::Article, "sharp")
            .unwrap()
            .is_none());

        assert!(db.delete_template(id).unwrap());
        assert!(!db.delete_template(id).unwrap());
        assert!(db.get_template(id).unwrap().is_none());
    }

    #[test]
    fn test_default_and_first_template_lookups() {
        let db = Database::new_in_memory().unwrap();
        let first = db
            .insert_template(&template_req(TemplateCategory::Article, "a", false))
            .unwrap();
        let second = db
            .insert_template(&template_req(TemplateCategory::Article, "b", true))
            .unwrap();

        assert_eq!(
            db.default_template(TemplateCategory::Article).unwrap().unwrap().id,
            second
        );
        assert_eq!(
            db.first_template(TemplateCategory::Article).unwrap().unwrap().id,
            first
        );
        assert!(db.default_template(TemplateCategory::Html).unwrap().is_none());
    }

    #[test]
    fn test_double_default_resolves_deterministically() {
        let db = Database::new_in_memory().unwrap();
        let first = db
            .insert_template(&template_req(TemplateCategory::Html, "x", true))
            .unwrap();
        // Improper state: two defaults flagged directly at the storage level
        let _second = db
            .insert_template(&template_req(TemplateCategory::Html, "y", true))
            .unwrap();

        let resolved = db.default_template(TemplateCategory::Html).unwrap().unwrap();
        assert_eq!(resolved.id, first);
    }

    #[test]
    fn test_chain_inserts_and_lookups() {
        let db = Database::new_in_memory().unwrap();
        let topic_id = db.insert_topic("职场生存").unwrap();
        let title_id = db.insert_title(topic_id, "标题一", "prompt", None).unwrap();
        let article_id = db.insert_article(title_id, "正文", "prompt", None).unwrap();
        let html_id = db.insert_html(article_id, "<p>正文</p>", "prompt", None).unwrap();

        assert_eq!(db.get_title(title_id).unwrap().unwrap().topic_id, topic_id);
        assert_eq!(
            db.first_article_for_title(title_id).unwrap().unwrap().id,
            article_id
        );
        assert_eq!(
            db.first_html_for_article(article_id).unwrap().unwrap().id,
            html_id
        );
        assert_eq!(db.count_titles(topic_id).unwrap(), 1);
    }

    #[test]
    fn test_first_found_takes_earliest() {
        let db = Database::new_in_memory().unwrap();
        let topic_id = db.insert_topic("t").unwrap();
        let title_id = db.insert_title(topic_id, "t1", "p", None).unwrap();
        let early = db.insert_article(title_id, "early", "p", None).unwrap();
        let _late = db.insert_article(title_id, "late", "p", None).unwrap();

        let found = db.first_article_for_title(title_id).unwrap().unwrap();
        assert_eq!(found.id, early);
        assert_eq!(found.article_text, "early");
    }

    #[test]
    fn test_cascade_delete_from_topic() {
        let db = Database::new_in_memory().unwrap();
        let topic_id = db.insert_topic("cascade").unwrap();
        let title_id = db.insert_title(topic_id, "t", "p", None).unwrap();
        let article_id = db.insert_article(title_id, "a", "p", None).unwrap();
        let html_id = db.insert_html(article_id, "<p/>", "p", None).unwrap();

        assert!(db.delete_topic(topic_id).unwrap());

        assert!(db.get_topic(topic_id).unwrap().is_none());
        assert!(db.get_title(title_id).unwrap().is_none());
        assert!(db.get_article(article_id).unwrap().is_none());
        assert!(db.get_html(html_id).unwrap().is_none());
    }

    #[test]
    fn test_template_delete_nulls_references() {
        let db = Database::new_in_memory().unwrap();
        let template_id = db
            .insert_template(&template_req(TemplateCategory::Title, "t", true))
            .unwrap();
        let topic_id = db.insert_topic("t").unwrap();
        let title_id = db
            .insert_title(topic_id, "generated", "p", Some(template_id))
            .unwrap();

        assert!(db.delete_template(template_id).unwrap());
        let title = db.get_title(title_id).unwrap().unwrap();
        assert_eq!(title.template_id, None);
    }

    #[test]
    fn test_selected_flag_updates() {
        let db = Database::new_in_memory().unwrap();
        let topic_id = db.insert_topic("t").unwrap();
        let title_id = db.insert_title(topic_id, "t", "p", None).unwrap();
        db.set_title_selected(title_id, true).unwrap();
        assert!(db.get_title(title_id).unwrap().unwrap().selected);
        db.set_title_selected(title_id, false).unwrap();
        assert!(!db.get_title(title_id).unwrap().unwrap().selected);
    }
}
