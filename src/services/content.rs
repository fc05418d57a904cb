//! Content Service
//!
//! Persistence orchestration around the pipeline: runs a stage, saves the
//! resulting artifact with the prompt that produced it, and serves the
//! read-back queries used by the boundary layer. Also hosts the combined
//! publish flow (ensure article → ensure html → publish).

use crate::models::{
    Article, HtmlOutput, Title, MANUAL_ARTICLE_PROMPT, MANUAL_COMBO_TITLE_PROMPT,
    MANUAL_TITLE_PROMPT,
};
use crate::services::gemini::GenError;
use crate::services::pipeline::Pipeline;
use crate::services::publish::{PublishClient, PublishResponse};
use crate::storage::database::Database;
use crate::utils::error::{AppError, AppResult};

/// Result of creating a topic together with its titles.
#[derive(Debug, Clone)]
pub struct TopicWithTitles {
    pub topic_id: i64,
    pub title_ids: Vec<i64>,
    pub titles: Vec<String>,
    pub template_id: Option<i64>,
}

/// Result of a manual article entry.
#[derive(Debug, Clone)]
pub struct CustomArticle {
    pub topic_id: i64,
    pub title_id: i64,
    pub article_id: i64,
}

/// Result of the combined publish flow.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub title_id: i64,
    pub title_text: String,
    pub article_id: i64,
    pub html_id: i64,
    pub response: PublishResponse,
}

/// Service tying pipeline stages to persistence
pub struct ContentService {
    db: Database,
    pipeline: Pipeline,
}

impl ContentService {
    pub fn new(db: Database, pipeline: Pipeline) -> Self {
        Self { db, pipeline }
    }

    /// Create a topic and generate its candidate titles.
    ///
    /// The topic row is created before generation, so a failed generation
    /// leaves the topic behind for a manual retry.
    pub fn create_topic_with_titles(
        &self,
        topic_text: &str,
        template_id: Option<i64>,
    ) -> AppResult<TopicWithTitles> {
        let topic_text = topic_text.trim();
        if topic_text.is_empty() {
            return Err(AppError::validation("topic must not be empty"));
        }

        let topic_id = self.db.insert_topic(topic_text)?;
        tracing::info!(topic_id, topic_text, "created topic");

        let batch = self.pipeline.generate_titles(topic_text, template_id)?;
        if batch.titles.is_empty() {
            return Err(AppError::Generation(GenError::NoContent));
        }

        let mut title_ids = Vec::with_capacity(batch.titles.len());
        for title_text in &batch.titles {
            let id =
                self.db
                    .insert_title(topic_id, title_text, &batch.prompt_sent, batch.template_id)?;
            title_ids.push(id);
        }
        tracing::info!(topic_id, count = title_ids.len(), "saved generated titles");

        Ok(TopicWithTitles {
            topic_id,
            title_ids,
            titles: batch.titles,
            template_id: batch.template_id,
        })
    }

    /// Create a topic with caller-supplied titles. The rows carry a fixed
    /// sentinel prompt and no template id.
    pub fn create_topic_with_custom_titles(
        &self,
        topic_text: &str,
        titles: &[String],
    ) -> AppResult<TopicWithTitles> {
        let topic_text = topic_text.trim();
        if topic_text.is_empty() {
            return Err(AppError::validation("topic must not be empty"));
        }
        if titles.iter().all(|t| t.trim().is_empty()) {
            return Err(AppError::validation("at least one title is required"));
        }

        let topic_id = self.db.insert_topic(topic_text)?;

        let mut title_ids = Vec::new();
        let mut kept = Vec::new();
        for title_text in titles {
            let title_text = title_text.trim();
            if title_text.is_empty() {
                continue;
            }
            let id = self
                .db
                .insert_title(topic_id, title_text, MANUAL_TITLE_PROMPT, None)?;
            title_ids.push(id);
            kept.push(title_text.to_string());
        }
        tracing::info!(topic_id, count = title_ids.len(), "saved custom titles");

        Ok(TopicWithTitles {
            topic_id,
            title_ids,
            titles: kept,
            template_id: None,
        })
    }

    /// Create a manually written article, together with its title row and
    /// topic. An existing topic with the exact same text is reused; with
    /// no topic given, the (truncated) title doubles as the topic.
    pub fn create_custom_article(
        &self,
        topic_text: Option<&str>,
        title_text: &str,
        article_text: &str,
    ) -> AppResult<CustomArticle> {
        let title_text = title_text.trim();
        if title_text.is_empty() {
            return Err(AppError::validation("title must not be empty"));
        }
        let article_text = article_text.trim();
        if article_text.is_empty() {
            return Err(AppError::validation("article text must not be empty"));
        }

        let topic_id = match topic_text.map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => match self.db.get_topic_by_text(text)? {
                Some(topic) => topic.id,
                None => self.db.insert_topic(text)?,
            },
            None => {
                let derived: String = title_text.chars().take(100).collect();
                self.db.insert_topic(&derived)?
            }
        };

        let title_id = self
            .db
            .insert_title(topic_id, title_text, MANUAL_COMBO_TITLE_PROMPT, None)?;
        let article_id =
            self.db
                .insert_article(title_id, article_text, MANUAL_ARTICLE_PROMPT, None)?;
        tracing::info!(topic_id, title_id, article_id, "saved custom article");

        Ok(CustomArticle {
            topic_id,
            title_id,
            article_id,
        })
    }

    /// Generate and save an article for an existing title.
    pub fn generate_article_for_title(
        &self,
        title_id: i64,
        template_id: Option<i64>,
    ) -> AppResult<Article> {
        let title = self
            .db
            .get_title(title_id)?
            .ok_or_else(|| AppError::not_found(format!("title {}", title_id)))?;

        let output = self.pipeline.generate_article(&title.title_text, template_id)?;
        let article_id = self.db.insert_article(
            title_id,
            &output.text,
            &output.prompt_sent,
            output.template_id,
        )?;
        tracing::info!(title_id, article_id, "saved generated article");

        self.db
            .get_article(article_id)?
            .ok_or_else(|| AppError::database("article missing after insert"))
    }

    /// Generate and save an HTML rendering for an existing article.
    pub fn generate_html_for_article(
        &self,
        article_id: i64,
        template_id: Option<i64>,
    ) -> AppResult<HtmlOutput> {
        let article = self
            .db
            .get_article(article_id)?
            .ok_or_else(|| AppError::not_found(format!("article {}", article_id)))?;

        let output = self.pipeline.generate_html(&article.article_text, template_id)?;
        let html_id = self.db.insert_html(
            article_id,
            &output.text,
            &output.prompt_sent,
            output.template_id,
        )?;
        tracing::info!(article_id, html_id, "saved generated html");

        self.db
            .get_html(html_id)?
            .ok_or_else(|| AppError::database("html output missing after insert"))
    }

    /// Ensure a title has an article, generating one with the default
    /// template when none exists. First-found wins when several exist.
    pub fn ensure_article_for_title(&self, title_id: i64) -> AppResult<Article> {
        if let Some(article) = self.db.first_article_for_title(title_id)? {
            tracing::info!(title_id, article_id = article.id, "reusing existing article");
            return Ok(article);
        }
        self.generate_article_for_title(title_id, None)
    }

    /// Ensure a title has an article and an HTML rendering, generating the
    /// missing pieces. Returns the title together with the html output.
    pub fn ensure_html_for_title(
        &self,
        title_id: i64,
        html_template_id: Option<i64>,
    ) -> AppResult<(Title, Article, HtmlOutput)> {
        let title = self
            .db
            .get_title(title_id)?
            .ok_or_else(|| AppError::not_found(format!("title {}", title_id)))?;

        let article = self.ensure_article_for_title(title_id)?;

        let html = match self.db.first_html_for_article(article.id)? {
            Some(html) => {
                tracing::info!(article_id = article.id, html_id = html.id, "reusing existing html");
                html
            }
            None => self.generate_html_for_article(article.id, html_template_id)?,
        };

        Ok((title, article, html))
    }

    /// Combined flow: ensure article and html exist for the title, then
    /// publish (title text, html content) to the workflow backend.
    pub fn publish_title(
        &self,
        title_id: i64,
        html_template_id: Option<i64>,
        publisher: &PublishClient,
    ) -> AppResult<PublishOutcome> {
        let (title, article, html) = self.ensure_html_for_title(title_id, html_template_id)?;

        let response = publisher.publish(&title.title_text, &html.html_content)?;

        Ok(PublishOutcome {
            title_id: title.id,
            title_text: title.title_text,
            article_id: article.id,
            html_id: html.id,
            response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TemplateCategory, TemplateCreateRequest};
    use crate::services::gemini::{GenResult, Generator};
    use crate::services::templates::TemplateService;

    /// Replies with a canned blob per stage, keyed by the token cap.
    struct StageStub;

    impl Generator for StageStub {
        fn generate(&self, _prompt: &str, _temperature: f32, max_tokens: u32) -> GenResult<String> {
            Ok(match max_tokens {
                2048 => "1. 标题一\n2. 标题二".to_string(),
                8192 => "生成的短文正文".to_string(),
                _ => "<html><body>正文</body></html>".to_string(),
            })
        }
    }

    fn seeded_service() -> (ContentService, Database) {
        let db = Database::new_in_memory().unwrap();
        let templates = TemplateService::new(db.clone());
        for (category, content) in [
            (TemplateCategory::Title, "标题主题：{{topic}}"),
            (TemplateCategory::Article, "短文主题：[在此输入你的主题]"),
            (TemplateCategory::Html, "排版：{{content}}"),
        ] {
            templates
                .create(TemplateCreateRequest {
                    category,
                    name: "default".to_string(),
                    description: None,
                    content: content.to_string(),
                    is_default: true,
                    source_path: None,
                })
                .unwrap();
        }
        let pipeline = Pipeline::new(templates, Box::new(StageStub));
        (ContentService::new(db.clone(), pipeline), db)
    }

    #[test]
    fn test_create_topic_with_titles_persists_chain() {
        let (service, db) = seeded_service();
        let result = service.create_topic_with_titles("职场", None).unwrap();

        assert_eq!(result.titles, vec!["标题一", "标题二"]);
        assert_eq!(result.title_ids.len(), 2);
        assert!(result.template_id.is_some());

        let saved = db.get_title(result.title_ids[0]).unwrap().unwrap();
        assert_eq!(saved.topic_id, result.topic_id);
        assert!(saved.prompt_text.contains("职场"));
        assert_eq!(saved.template_id, result.template_id);
    }

    #[test]
    fn test_create_topic_rejects_empty_text() {
        let (service, _db) = seeded_service();
        assert!(service.create_topic_with_titles("  ", None).is_err());
    }

    #[test]
    fn test_custom_titles_carry_sentinel_prompt() {
        let (service, db) = seeded_service();
        let result = service
            .create_topic_with_custom_titles("主题", &["一".to_string(), " ".to_string()])
            .unwrap();

        assert_eq!(result.titles, vec!["一"]);
        let title = db.get_title(result.title_ids[0]).unwrap().unwrap();
        assert_eq!(title.prompt_text, MANUAL_TITLE_PROMPT);
        assert_eq!(title.template_id, None);
    }

    #[test]
    fn test_custom_article_reuses_topic_by_text() {
        let (service, db) = seeded_service();
        let first = service
            .create_custom_article(Some("共享主题"), "标题A", "正文A")
            .unwrap();
        let second = service
            .create_custom_article(Some("共享主题"), "标题B", "正文B")
            .unwrap();

        assert_eq!(first.topic_id, second.topic_id);
        let article = db.get_article(second.article_id).unwrap().unwrap();
        assert_eq!(article.prompt_text, MANUAL_ARTICLE_PROMPT);
    }

    #[test]
    fn test_custom_article_derives_topic_from_title() {
        let (service, db) = seeded_service();
        let long_title = "标".repeat(150);
        let result = service
            .create_custom_article(None, &long_title, "正文")
            .unwrap();

        let topic = db.get_topic(result.topic_id).unwrap().unwrap();
        assert_eq!(topic.topic_text.chars().count(), 100);
    }

    #[test]
    fn test_generate_article_and_html_chain() {
        let (service, db) = seeded_service();
        let created = service.create_topic_with_titles("主题", None).unwrap();
        let title_id = created.title_ids[0];

        let article = service.generate_article_for_title(title_id, None).unwrap();
        assert_eq!(article.title_id, title_id);
        assert_eq!(article.article_text, "生成的短文正文");

        let html = service.generate_html_for_article(article.id, None).unwrap();
        assert_eq!(html.article_id, article.id);
        assert!(html.html_content.contains("<html>"));

        // Cascade removes everything under the topic
        assert!(db.delete_topic(created.topic_id).unwrap());
        assert!(db.get_article(article.id).unwrap().is_none());
        assert!(db.get_html(html.id).unwrap().is_none());
    }

    #[test]
    fn test_generate_article_for_missing_title() {
        let (service, _db) = seeded_service();
        let err = service.generate_article_for_title(404, None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_ensure_article_reuses_first_found() {
        let (service, db) = seeded_service();
        let created = service.create_topic_with_titles("主题", None).unwrap();
        let title_id = created.title_ids[0];

        let existing_id = db
            .insert_article(title_id, "已有短文", "prompt", None)
            .unwrap();
        let ensured = service.ensure_article_for_title(title_id).unwrap();
        assert_eq!(ensured.id, existing_id);
    }

    #[test]
    fn test_ensure_html_generates_missing_pieces() {
        let (service, db) = seeded_service();
        let created = service.create_topic_with_titles("主题", None).unwrap();
        let title_id = created.title_ids[0];

        let (title, article, html) = service.ensure_html_for_title(title_id, None).unwrap();
        assert_eq!(title.id, title_id);
        assert_eq!(article.title_id, title_id);
        assert_eq!(html.article_id, article.id);

        // Idempotent: a second call reuses both rows
        let (_, article2, html2) = service.ensure_html_for_title(title_id, None).unwrap();
        assert_eq!(article2.id, article.id);
        assert_eq!(html2.id, html.id);
        assert_eq!(db.list_articles().unwrap().len(), 1);
    }
}
