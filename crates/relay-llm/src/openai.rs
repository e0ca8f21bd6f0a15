//! OpenAI-compatible chat-completions client.
//!
//! Groq, OpenAI and most hosted inference APIs accept the same non-streaming
//! request shape, so one client covers them; only the base URL changes.

use async_trait::async_trait;
use relay_core::Message;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;
use crate::provider::{CompletionClient, CompletionOptions};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Clone)]
pub struct OpenAICompatClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAICompatClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, user agent).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint_chat_completions(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model,
            messages,
            max_tokens: options.max_output_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(self.endpoint_chat_completions())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::Overloaded {
                model: model.to_string(),
            });
        }

        if !status.is_success() {
            let message = response
                .json::<ProviderErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| format!("HTTP {} from model {}", status.as_u16(), model));
            return Err(CompletionError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        parsed.into_answer().ok_or_else(|| CompletionError::EmptyAnswer {
            model: model.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_answer(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    error: Option<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url_without_double_slash() {
        let client = OpenAICompatClient::new("k").with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            client.endpoint_chat_completions(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn answer_is_first_choice_content() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"first"}},{"message":{"content":"second"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.into_answer(), Some("first".to_string()));
    }

    #[test]
    fn blank_or_missing_content_is_no_answer() {
        for body in [
            r#"{}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
        ] {
            let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
            assert_eq!(parsed.into_answer(), None, "body {body}");
        }
    }

    #[test]
    fn request_body_uses_openai_field_names() {
        let messages = vec![Message::user("hi")];
        let body = ChatCompletionRequest {
            model: "m",
            messages: &messages,
            max_tokens: 100,
            temperature: 0.5,
        };

        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "m");
        assert_eq!(value["max_tokens"], 100);
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["messages"][0]["content"], "hi");
    }
}
