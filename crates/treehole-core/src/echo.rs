//! Echo domain module.
//!
//! An echo is the short, gentle reply the tree hole attaches to a new post.
//! This module defines the reply value, the fixed placeholder replies used when
//! generation is impossible, and the [`EchoBackend`] seam that external text
//! generation services implement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Why a placeholder was used instead of a generated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderReason {
    /// No credential is configured; the service was never contacted.
    NoCredential,
    /// The service answered but produced no usable text.
    EmptyResponse,
    /// The request failed (transport error or non-success status).
    ServiceError,
}

impl PlaceholderReason {
    /// The fixed reply shown for this reason.
    pub fn text(&self) -> &'static str {
        match self {
            PlaceholderReason::NoCredential => "树洞静悄悄的，似乎在倾听... (API Key missing)",
            PlaceholderReason::EmptyResponse => "风声温柔地拂过...",
            PlaceholderReason::ServiceError => "树洞今天似乎睡着了...",
        }
    }
}

/// Where an echo's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "reason")]
pub enum EchoSource {
    Generated,
    Placeholder(PlaceholderReason),
}

/// A resolved echo reply. The text is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub text: String,
    pub source: EchoSource,
}

impl Echo {
    /// Wraps generated text, falling back to the empty-response placeholder
    /// when the text is blank.
    pub fn generated(text: impl AsRef<str>) -> Self {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Self::placeholder(PlaceholderReason::EmptyResponse);
        }
        Self {
            text: trimmed.to_string(),
            source: EchoSource::Generated,
        }
    }

    pub fn placeholder(reason: PlaceholderReason) -> Self {
        Self {
            text: reason.text().to_string(),
            source: EchoSource::Placeholder(reason),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, EchoSource::Placeholder(_))
    }

    /// The placeholder reason, if this echo is a placeholder.
    pub fn placeholder_reason(&self) -> Option<PlaceholderReason> {
        match self.source {
            EchoSource::Placeholder(reason) => Some(reason),
            EchoSource::Generated => None,
        }
    }
}

/// An external text generation service able to answer a prompt.
///
/// Implementations report transport and HTTP failures as errors and a
/// successful response without usable text as `Ok(None)`; the caller decides
/// which placeholder each case maps to.
#[async_trait]
pub trait EchoBackend: Send + Sync {
    /// Sends a prompt and returns the generated text, if any.
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;

    /// Model identifier used for requests, for logging.
    fn model(&self) -> &str;
}
