//! Services
//!
//! Business logic services for the application.
//! Services handle the core functionality and are called by commands.

pub mod content;
pub mod extract;
pub mod gemini;
pub mod pipeline;
pub mod publish;
pub mod templates;

pub use content::ContentService;
pub use gemini::{GeminiClient, GenError, Generator};
pub use pipeline::Pipeline;
pub use publish::{PublishClient, PublishError, PublishResponse};
pub use templates::TemplateService;
