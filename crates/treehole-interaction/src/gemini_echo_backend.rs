//! GeminiEchoBackend - Direct REST API implementation for Gemini.
//!
//! Calls the `generateContent` endpoint with a single user text part. No
//! retries and no timeout beyond the HTTP client's defaults.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use treehole_core::error::{Result, TreeholeError};
use treehole_core::EchoBackend;

use crate::config::{DEFAULT_GEMINI_MODEL, GeminiConfig};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Echo backend that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiEchoBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEchoBackend {
    /// Creates a new backend with the provided API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: GeminiConfig) -> Self {
        Self::new(config.api_key).with_model(config.model)
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the backend at another endpoint root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<Option<String>> {
        let url = format!("{}/{model}:generateContent", self.base_url, model = self.model);
        tracing::debug!(model = %self.model, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|err| {
                // Strip the URL: it carries the API key as a query parameter.
                TreeholeError::service(None, format!("Gemini API request failed: {}", err.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        // A body cut off mid-read is a transport failure, not an empty reply.
        let bytes = response.bytes().await.map_err(|err| {
            TreeholeError::service(
                None,
                format!("Failed to read Gemini response body: {}", err.without_url()),
            )
        })?;

        match serde_json::from_slice::<GenerateContentResponse>(&bytes) {
            Ok(parsed) => Ok(extract_text_response(parsed)),
            Err(err) => {
                tracing::warn!("Failed to parse Gemini response: {}", err);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl EchoBackend for GeminiEchoBackend {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        self.send_request(&request).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenates the text parts of the first candidate that has any.
fn extract_text_response(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates?
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .find(|text| !text.trim().is_empty())
}

fn map_http_error(status: StatusCode, body: String) -> TreeholeError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    TreeholeError::service(Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"风会"},{"text":"记得你。"}]}}]}"#,
        );
        assert_eq!(extract_text_response(response).as_deref(), Some("风会记得你。"));
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        assert_eq!(extract_text_response(parse("{}")), None);
        assert_eq!(extract_text_response(parse(r#"{"candidates":[]}"#)), None);
    }

    #[test]
    fn test_extract_text_skips_empty_candidates() {
        let response = parse(
            r#"{"candidates":[{"finishReason":"SAFETY"},{"content":{"parts":[{"text":"抱抱你"}]}}]}"#,
        );
        assert_eq!(extract_text_response(response).as_deref(), Some("抱抱你"));
    }

    #[test]
    fn test_map_http_error_uses_error_envelope() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string());
        assert_eq!(
            err,
            TreeholeError::service(Some(429), "RESOURCE_EXHAUSTED: Quota exceeded")
        );
    }

    #[test]
    fn test_map_http_error_falls_back_to_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert_eq!(err, TreeholeError::service(Some(502), "upstream down"));
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: "hi".to_string(),
                }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents":[{"role":"user","parts":[{"text":"hi"}]}]})
        );
    }
}
