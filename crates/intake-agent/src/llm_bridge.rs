//! OpenAI-compatible completion client.
//!
//! The production [`TextGenerator`]: one chat-completion POST per reply,
//! no internal retries (the composer degrades on failure and the caller
//! decides about retrying).

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::collaborators::TextGenerator;
use crate::config::LlmEndpoint;

pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<OutboundMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionClient {
    pub fn new(endpoint: &LlmEndpoint) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: endpoint.url.trim_end_matches('/').to_string(),
            model: endpoint.model.clone(),
            api_key: endpoint.api_key.clone(),
            temperature: endpoint.temperature,
        }
    }
}

#[async_trait]
impl TextGenerator for CompletionClient {
    async fn generate(&self, system_instructions: &str, user_text: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                OutboundMessage {
                    role: "system",
                    content: system_instructions,
                },
                OutboundMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            temperature: self.temperature,
        };

        let mut builder = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.context("completion request failed")?;
        if !response.status().is_success() {
            anyhow::bail!("completion endpoint returned {}", response.status());
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .context("completion response was not valid JSON")?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            anyhow::bail!("completion response had no content");
        }
        Ok(content.trim().to_string())
    }
}

/// Check if a completion endpoint is reachable (GET /models).
pub async fn check_endpoint(url: &str) -> bool {
    let models_url = format!("{}/models", url.trim_end_matches('/'));
    match reqwest::Client::new()
        .get(&models_url)
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await
    {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_openai_shape() {
        let request = ChatCompletionRequest {
            model: "test-model",
            messages: vec![
                OutboundMessage {
                    role: "system",
                    content: "sys",
                },
                OutboundMessage {
                    role: "user",
                    content: "hello",
                },
            ],
            temperature: 0.2,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
    }

    #[test]
    fn response_parses_with_missing_optional_fields() {
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"hi"}}],"usage":null}"#)
                .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hi"));

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(empty.choices.is_empty());
    }
}
