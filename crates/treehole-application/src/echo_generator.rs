//! Echo Generator
//!
//! Produces the short comforting reply attached to a new post by prompting an
//! [`EchoBackend`]. Every failure path resolves to a fixed placeholder, so
//! callers always get an [`Echo`] and never an error.

use std::sync::Arc;

use minijinja::{Environment, context};
use treehole_core::error::{Result, TreeholeError};
use treehole_core::{Echo, EchoBackend, Mood, PlaceholderReason};
use treehole_interaction::{EchoConfig, GeminiEchoBackend};

/// Upper bound on reply length, in characters, requested from the model.
pub const ECHO_MAX_CHARS: usize = 60;

const ECHO_PROMPT_TEMPLATE: &str = r#"用户刚刚在“树洞”应用里写下了一段心事。
内容: "{{ content }}"
当前心情标签: "{{ mood }}"

请你扮演一个住在古老树洞里的温柔精灵或回声。
任务：
{% for rule in rules -%}
{{ loop.index }}. {{ rule }}
{% endfor %}"#;

/// Renders the instruction sent to the text generation service.
pub fn render_prompt(content: &str, mood: Mood) -> Result<String> {
    let rules = [
        "用简短、温柔、充满诗意和治愈感的话语回复用户。".to_string(),
        "就像风吹过树叶的声音，给予抚慰或共鸣。".to_string(),
        format!("不要说教，不要长篇大论，字数控制在{ECHO_MAX_CHARS}字以内。"),
        "语气要温暖，像是一个拥抱。".to_string(),
    ];

    let env = Environment::new();
    let template = env
        .template_from_str(ECHO_PROMPT_TEMPLATE)
        .map_err(|e| TreeholeError::internal(format!("Invalid echo prompt template: {e}")))?;
    template
        .render(context! {
            content => content,
            mood => mood.tag(),
            rules => rules,
        })
        .map_err(|e| TreeholeError::internal(format!("Failed to render echo prompt: {e}")))
}

/// Generates echoes through an optional backend.
///
/// Without a backend (no credential configured) the generator answers with
/// the no-credential placeholder and never touches the network.
#[derive(Clone, Default)]
pub struct EchoGenerator {
    backend: Option<Arc<dyn EchoBackend>>,
}

impl EchoGenerator {
    pub fn new(backend: Arc<dyn EchoBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A generator with no credential.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Builds a generator backed by Gemini when a credential can be resolved.
    ///
    /// An unreadable secret file is logged and treated like a missing
    /// credential.
    pub fn from_config(config: &EchoConfig) -> Self {
        match config.resolve() {
            Ok(Some(gemini)) => {
                tracing::info!(model = %gemini.model, "Echo generator using Gemini");
                Self::new(Arc::new(GeminiEchoBackend::from_config(gemini)))
            }
            Ok(None) => {
                tracing::warn!("API key is missing. Echo replies will use a placeholder.");
                Self::unconfigured()
            }
            Err(e) => {
                tracing::warn!("Failed to load echo configuration: {}", e);
                Self::unconfigured()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Generates the echo for a post. Never fails.
    pub async fn generate(&self, content: &str, mood: Mood) -> Echo {
        let Some(backend) = &self.backend else {
            tracing::warn!("No echo credential configured, answering with placeholder");
            return Echo::placeholder(PlaceholderReason::NoCredential);
        };

        let prompt = match render_prompt(content, mood) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!("Error building echo prompt: {}", e);
                return Echo::placeholder(PlaceholderReason::ServiceError);
            }
        };

        match backend.generate(&prompt).await {
            Ok(Some(text)) => {
                let echo = Echo::generated(text);
                if echo.is_placeholder() {
                    tracing::warn!(model = backend.model(), "Echo service returned blank text");
                }
                echo
            }
            Ok(None) => {
                tracing::warn!(model = backend.model(), "Echo service returned no text");
                Echo::placeholder(PlaceholderReason::EmptyResponse)
            }
            Err(e) => {
                tracing::error!(model = backend.model(), "Error getting echo response: {}", e);
                Echo::placeholder(PlaceholderReason::ServiceError)
            }
        }
    }
}
