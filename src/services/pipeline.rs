//! Pipeline Stages
//!
//! The three generation stages: topic → candidate titles, title → article,
//! article → HTML. Each stage resolves its template, substitutes the
//! category placeholder with the stage input, invokes the generation
//! backend with stage-specific parameters, and extracts the usable output.
//! Stages persist nothing; callers save results after a successful run.

use crate::models::TemplateCategory;
use crate::services::gemini::Generator;
use crate::services::templates::TemplateService;
use crate::utils::error::AppResult;
use crate::utils::text::TitleParser;

/// Trailing instruction appended to article prompts. Best-effort
/// mitigation asking the backend to keep deliberation out of the reply;
/// extraction still runs on whatever comes back.
const ARTICLE_FINAL_ONLY_INSTRUCTION: &str = "\n\n**重要提示**：请直接输出最终的中文短文，不要包含任何思考过程、英文内容或中间步骤。只返回按照上述框架创作的中文短文正文。";

/// Trailing instruction appended to title prompts.
const TITLE_FINAL_ONLY_INSTRUCTION: &str = "\n\n**重要提示**：请直接输出最终的中文标题列表，每行一个标题，不要包含任何思考过程、英文内容或中间步骤。";

/// Output of the article and html stages.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub text: String,
    /// The full prompt that was sent, stored alongside the artifact.
    pub prompt_sent: String,
    /// Template actually used; None when the legacy file fallback applied.
    pub template_id: Option<i64>,
}

/// Output of the title stage: the parsed title list.
#[derive(Debug, Clone)]
pub struct TitleBatch {
    pub titles: Vec<String>,
    pub prompt_sent: String,
    pub template_id: Option<i64>,
}

/// The generation pipeline, composing template resolution, placeholder
/// substitution, the backend client and output extraction.
pub struct Pipeline {
    templates: TemplateService,
    generator: Box<dyn Generator>,
    parser: TitleParser,
}

impl Pipeline {
    pub fn new(templates: TemplateService, generator: Box<dyn Generator>) -> Self {
        Self {
            templates,
            generator,
            parser: TitleParser::new(),
        }
    }

    fn run_stage(
        &self,
        category: TemplateCategory,
        input: &str,
        explicit_template_id: Option<i64>,
        trailing_instruction: Option<&str>,
    ) -> AppResult<StageOutput> {
        let resolved = self.templates.resolve(category, explicit_template_id)?;

        // Single literal replace of the first placeholder occurrence; a
        // template without the placeholder goes through unmodified.
        let mut prompt = resolved.content.replacen(category.placeholder(), input, 1);
        if let Some(instruction) = trailing_instruction {
            prompt.push_str(instruction);
        }
        tracing::debug!(category = %category, prompt_len = prompt.len(), "prompt assembled");

        let text = self
            .generator
            .generate(&prompt, category.temperature(), category.max_tokens())?;

        Ok(StageOutput {
            text,
            prompt_sent: prompt,
            template_id: resolved.template_id,
        })
    }

    /// Generate candidate titles for a topic and parse them into a list.
    pub fn generate_titles(
        &self,
        topic: &str,
        template_id: Option<i64>,
    ) -> AppResult<TitleBatch> {
        tracing::info!(topic, ?template_id, "generating titles");
        let stage = self.run_stage(
            TemplateCategory::Title,
            topic,
            template_id,
            Some(TITLE_FINAL_ONLY_INSTRUCTION),
        )?;

        let titles = self.parser.parse(&stage.text);
        tracing::info!(count = titles.len(), "titles parsed");

        Ok(TitleBatch {
            titles,
            prompt_sent: stage.prompt_sent,
            template_id: stage.template_id,
        })
    }

    /// Generate an article for a title.
    pub fn generate_article(
        &self,
        title: &str,
        template_id: Option<i64>,
    ) -> AppResult<StageOutput> {
        tracing::info!(title, ?template_id, "generating article");
        self.run_stage(
            TemplateCategory::Article,
            title,
            template_id,
            Some(ARTICLE_FINAL_ONLY_INSTRUCTION),
        )
    }

    /// Generate an HTML rendering for an article.
    pub fn generate_html(
        &self,
        article_text: &str,
        template_id: Option<i64>,
    ) -> AppResult<StageOutput> {
        tracing::info!(article_len = article_text.len(), ?template_id, "generating html");
        self.run_stage(TemplateCategory::Html, article_text, template_id, None)
    }
}
