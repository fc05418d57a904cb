//! Pipeline chain integration tests.
//!
//! Runs the real pipeline (template resolution, placeholder substitution,
//! response extraction, title parsing, persistence) against a stub
//! backend that replays Gemini-shaped responses, including deliberation
//! leakage the extractor has to strip.

use copyforge::models::{TemplateCategory, TemplateCreateRequest, MANUAL_TITLE_PROMPT};
use copyforge::services::content::ContentService;
use copyforge::services::extract;
use copyforge::services::gemini::{GenResult, GenerateResponse, Generator};
use copyforge::services::pipeline::Pipeline;
use copyforge::services::templates::TemplateService;
use copyforge::storage::database::Database;

/// Stub backend that routes through the real extraction path: each reply
/// is a full Gemini-shaped response body, deliberation fragments included.
struct ReplayBackend;

impl Generator for ReplayBackend {
    fn generate(&self, _prompt: &str, _temperature: f32, max_tokens: u32) -> GenResult<String> {
        let body = match max_tokens {
            // Title stage: deliberation part before the answer part
            2048 => serde_json::json!({
                "candidates": [{ "content": { "parts": [
                    { "text": "**Reflections on the request..." },
                    { "text": "1. 职场甩锅的艺术\n2. 「开会生存法则」\n\n3) 摸鱼也是生产力" },
                ] } }]
            }),
            // Article stage: deliberation and answer inside one part
            8192 => serde_json::json!({
                "candidates": [{ "content": { "parts": [
                    { "text": "Okay, here is my plan for the essay...\n这是短文的第一段。\n这是短文的第二段。" },
                ] } }]
            }),
            // Html stage: clean single part
            _ => serde_json::json!({
                "candidates": [{ "content": { "parts": [
                    { "text": "<html><body><p>这是短文的第一段。</p></body></html>" },
                ] } }]
            }),
        };
        let raw = body.to_string();
        let response: GenerateResponse = serde_json::from_str(&raw).expect("stub body parses");
        extract::final_text(&response, &raw)
    }
}

fn seeded() -> (ContentService, Database) {
    let db = Database::new_in_memory().expect("in-memory db");
    let templates = TemplateService::new(db.clone());
    for (category, content) in [
        (TemplateCategory::Title, "请为主题“{{topic}}”生成标题"),
        (TemplateCategory::Article, "请围绕[在此输入你的主题]写一篇短文"),
        (TemplateCategory::Html, "请把下面的内容排版成HTML：{{content}}"),
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
            .expect("seed template");
    }
    let pipeline = Pipeline::new(templates, Box::new(ReplayBackend));
    (ContentService::new(db.clone(), pipeline), db)
}

#[test]
fn full_chain_links_children_to_parents() {
    let (service, db) = seeded();

    let created = service
        .create_topic_with_titles("职场生存", None)
        .expect("create topic with titles");

    // Deliberation fragment dropped, enumeration and quotes stripped
    assert_eq!(
        created.titles,
        vec!["职场甩锅的艺术", "开会生存法则", "摸鱼也是生产力"]
    );

    let first_title_id = created.title_ids[0];
    let title = db.get_title(first_title_id).unwrap().unwrap();
    assert_eq!(title.topic_id, created.topic_id);
    assert!(title.prompt_text.contains("职场生存"));
    assert_eq!(title.template_id, created.template_id);

    let article = service
        .generate_article_for_title(first_title_id, None)
        .expect("generate article");
    assert_eq!(article.title_id, first_title_id);
    // Single-fragment deliberation prefix stripped by the extractor
    assert_eq!(article.article_text, "这是短文的第一段。\n这是短文的第二段。");
    assert!(article.prompt_text.contains(&title.title_text));

    let html = service
        .generate_html_for_article(article.id, None)
        .expect("generate html");
    assert_eq!(html.article_id, article.id);
    assert!(html.html_content.starts_with("<html>"));
    assert!(html.prompt_text.contains("这是短文的第一段。"));
}

#[test]
fn deleting_topic_removes_all_descendants() {
    let (service, db) = seeded();

    let created = service.create_topic_with_titles("级联删除", None).unwrap();
    let title_id = created.title_ids[0];
    let article = service.generate_article_for_title(title_id, None).unwrap();
    let html = service.generate_html_for_article(article.id, None).unwrap();

    assert!(db.delete_topic(created.topic_id).unwrap());

    assert!(db.get_topic(created.topic_id).unwrap().is_none());
    for id in created.title_ids {
        assert!(db.get_title(id).unwrap().is_none());
    }
    assert!(db.get_article(article.id).unwrap().is_none());
    assert!(db.get_html(html.id).unwrap().is_none());
}

#[test]
fn publish_flow_reuses_existing_artifacts() {
    let (service, db) = seeded();

    let created = service.create_topic_with_titles("发布流程", None).unwrap();
    let title_id = created.title_ids[0];

    let (_, article, html) = service.ensure_html_for_title(title_id, None).unwrap();

    // Re-running the ensure step creates nothing new
    let (_, article2, html2) = service.ensure_html_for_title(title_id, None).unwrap();
    assert_eq!(article.id, article2.id);
    assert_eq!(html.id, html2.id);
    assert_eq!(db.list_articles().unwrap().len(), 1);
    assert_eq!(db.list_html().unwrap().len(), 1);
}

#[test]
fn manual_titles_store_sentinel_prompt() {
    let (service, db) = seeded();

    let created = service
        .create_topic_with_custom_titles("手动主题", &["手写标题".to_string()])
        .unwrap();

    let title = db.get_title(created.title_ids[0]).unwrap().unwrap();
    assert_eq!(title.prompt_text, MANUAL_TITLE_PROMPT);
    assert_eq!(title.template_id, None);
}

#[test]
fn substitution_result_contains_original_input() {
    let (service, db) = seeded();

    // Round-trip property: the stage input must appear verbatim inside
    // the prompt that was sent
    let created = service.create_topic_with_titles("独特的主题文本", None).unwrap();
    let title = db.get_title(created.title_ids[0]).unwrap().unwrap();
    assert!(title.prompt_text.contains("独特的主题文本"));
    assert!(!title.prompt_text.contains("{{topic}}"));
}
