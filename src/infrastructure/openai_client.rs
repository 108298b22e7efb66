// Chat completion client for OpenAI-compatible APIs
use crate::application::capabilities::TextGenerator;
use crate::application::error::CapabilityError;
use crate::infrastructure::config::LlmSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CAPABILITY: &str = "text generator";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f64,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// `None` when no API key is configured
    pub fn from_settings(client: reqwest::Client, settings: &LlmSettings) -> Option<Self> {
        let api_key = settings.api_key.as_deref()?.trim();
        if api_key.is_empty() {
            return None;
        }
        Some(Self {
            client,
            url: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout: settings.timeout(),
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CapabilityError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CapabilityError::Timeout {
                        capability: CAPABILITY,
                        timeout: self.timeout,
                    }
                } else {
                    CapabilityError::failed(CAPABILITY, e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CapabilityError::failed(
                CAPABILITY,
                format!("status {}: {}", status, body),
            ));
        }

        let data = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| CapabilityError::malformed(CAPABILITY, e))?;

        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CapabilityError::malformed(CAPABILITY, "completion has no content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_blank_key_disables_client() {
        let client = reqwest::Client::new();
        let mut settings = LlmSettings::default();
        assert!(OpenAiClient::from_settings(client.clone(), &settings).is_none());

        settings.api_key = Some("  ".into());
        assert!(OpenAiClient::from_settings(client.clone(), &settings).is_none());

        settings.api_key = Some("sk-test".into());
        settings.base_url = "http://localhost:9000/v1/".into();
        let llm = OpenAiClient::from_settings(client, &settings).unwrap();
        assert_eq!(llm.url, "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_reply_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"1. 立即疏散"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("1. 立即疏散")
        );
    }
}
