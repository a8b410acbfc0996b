//! Gemini `generateContent` REST backend for the generalist answerer.

use crate::domain::ports::LanguageModel;
use crate::utils::error::UpstreamFailure;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Clone)]
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl GeminiModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Concatenates `candidates[0].content.parts[*].text`.
fn extract_text(body: &Value) -> Result<String, UpstreamFailure> {
    let parts = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| UpstreamFailure::Malformed("missing candidates[0].content.parts".to_string()))?;

    let text: Vec<&str> = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    let text = text.join("");

    if text.trim().is_empty() {
        return Err(UpstreamFailure::Empty);
    }
    Ok(text)
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, system_prompt: &str, user_query: &str) -> Result<String, UpstreamFailure> {
        let user_text = format!("User query: {}", user_query);
        let request = GenerateRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part { text: system_prompt }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &user_text }],
            }],
        };

        tracing::debug!("🚀 Calling Gemini model {}", self.model);
        let mut builder = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| UpstreamFailure::Malformed(e.to_string()))?;
        extract_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const PATH: &str = "/v1beta/models/gemini-test:generateContent";

    fn model(server: &MockServer) -> GeminiModel {
        GeminiModel::new("test-key", "gemini-test").with_base_url(server.base_url())
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_reads_parts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(PATH)
                .query_param("key", "test-key")
                .body_contains("\"system_instruction\"")
                .body_contains("campus persona")
                .body_contains("User query: who is the principal");
            then.status(200).json_body(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "The principal "}, {"text": "is Dr. Singh."}]}}]
            }));
        });

        let text = model(&server)
            .generate("campus persona", "who is the principal")
            .await
            .unwrap();
        mock.assert();
        assert_eq!(text, "The principal is Dr. Singh.");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(429).body("quota exceeded");
        });

        let err = model(&server).generate("p", "q").await.unwrap_err();
        assert_eq!(
            err,
            UpstreamFailure::Status {
                status: 429,
                body: "quota exceeded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).body("not json");
        });

        let err = model(&server).generate("p", "q").await.unwrap_err();
        assert!(matches!(err, UpstreamFailure::Malformed(_)));
    }

    #[tokio::test]
    async fn test_blocked_response_has_no_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(PATH);
            then.status(200)
                .json_body(serde_json::json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}));
        });

        let err = model(&server).generate("p", "q").await.unwrap_err();
        assert_eq!(err, UpstreamFailure::Empty);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let err = GeminiModel::new("k", "m")
            .with_base_url("http://127.0.0.1:1")
            .generate("p", "q")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamFailure::Transport(_)));
    }

    #[test]
    fn test_extract_text_requires_candidates() {
        let err = extract_text(&serde_json::json!({"promptFeedback": {}})).unwrap_err();
        assert!(matches!(err, UpstreamFailure::Malformed(_)));
    }
}
