//! Credential and model configuration for the echo service.
//!
//! Sources, first match wins:
//! 1. `API_KEY` or `GEMINI_API_KEY` environment variables
//! 2. `~/.config/treehole/secret.json`
//!
//! A missing credential is not an error: it resolves to `None` and the echo
//! generator answers with its no-credential placeholder.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use treehole_core::error::Result;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];
const MODEL_VAR: &str = "TREEHOLE_MODEL";

/// Root configuration structure for secret.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<SecretGeminiEntry>,
}

/// Gemini entry of secret.json
#[derive(Debug, Clone, Deserialize)]
pub struct SecretGeminiEntry {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Resolved settings for reaching Gemini.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Inputs for credential resolution, captured so lookups are testable without
/// touching the process environment.
#[derive(Debug, Clone, Default)]
pub struct EchoConfig {
    env_api_key: Option<String>,
    env_model: Option<String>,
    secret_path: Option<PathBuf>,
}

impl EchoConfig {
    /// Captures the relevant environment variables and the default secret path.
    pub fn from_env() -> Self {
        let env_api_key = API_KEY_VARS
            .iter()
            .find_map(|name| non_blank(std::env::var(name).ok()));

        Self {
            env_api_key,
            env_model: non_blank(std::env::var(MODEL_VAR).ok()),
            secret_path: default_secret_path(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.env_api_key = non_blank(Some(api_key.into()));
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.env_model = non_blank(Some(model.into()));
        self
    }

    pub fn with_secret_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.secret_path = Some(path.into());
        self
    }

    pub fn without_secret_file(mut self) -> Self {
        self.secret_path = None;
        self
    }

    /// Resolves the Gemini settings.
    ///
    /// Returns `Ok(None)` when no credential is available anywhere.
    ///
    /// # Errors
    ///
    /// Returns an error only if a secret file exists but cannot be read or
    /// parsed.
    pub fn resolve(&self) -> Result<Option<GeminiConfig>> {
        let secret = match &self.secret_path {
            Some(path) => load_secret_config(path)?,
            None => None,
        };
        let secret_entry = secret.and_then(|s| s.gemini);

        let file_key = secret_entry
            .as_ref()
            .and_then(|entry| non_blank(Some(entry.api_key.clone())));
        let Some(api_key) = self.env_api_key.clone().or(file_key) else {
            return Ok(None);
        };

        let model = self
            .env_model
            .clone()
            .or_else(|| secret_entry.and_then(|entry| non_blank(entry.model_name)))
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Some(GeminiConfig { api_key, model }))
    }
}

/// Loads secret.json if it exists.
///
/// # Errors
///
/// `Io` if the file exists but cannot be read, `Serialization` if it is not
/// valid JSON.
pub fn load_secret_config(path: &Path) -> Result<Option<SecretConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    tracing::debug!(path = %path.display(), "Loading secret configuration");
    let content = fs::read_to_string(path)?;
    let config = serde_json::from_str(&content)?;
    Ok(Some(config))
}

/// Returns the path to the secret file: ~/.config/treehole/secret.json
fn default_secret_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("treehole").join("secret.json"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
