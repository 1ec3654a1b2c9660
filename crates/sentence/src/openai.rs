use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, SentenceConfig, SentenceError, SentenceGenerator};

const API_KEY_VAR: &str = "OPENAI_API_KEY";
const MODEL_VAR: &str = "OPENAI_MODEL";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Sentence generator backed by an OpenAI-compatible chat completions API.
pub struct OpenAiSentenceGenerator {
    client: reqwest::Client,
    api_key: String,
    config: SentenceConfig,
}

impl OpenAiSentenceGenerator {
    pub fn new(api_key: impl Into<String>, config: SentenceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            config,
        }
    }

    /// Build from `OPENAI_API_KEY`, with `OPENAI_MODEL` overriding the model.
    pub fn from_env(mut config: SentenceConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(SentenceError::MissingApiKey(API_KEY_VAR))?;
        if let Ok(model) = std::env::var(MODEL_VAR) {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        Ok(Self::new(api_key, config))
    }

    pub fn config(&self) -> &SentenceConfig {
        &self.config
    }

    fn request<'a>(&'a self, words: &[String]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.config.system_prompt(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: self.config.user_prompt(words),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

/// Trimmed content of the first choice.
fn first_sentence(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(SentenceError::EmptyResponse)
}

#[async_trait]
impl SentenceGenerator for OpenAiSentenceGenerator {
    fn name(&self) -> &str {
        "openai-chat"
    }

    async fn generate(&self, words: &[String]) -> Result<String> {
        let resp = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(self.config.timeout())
            .json(&self.request(words))
            .send()
            .await
            .map_err(|e| SentenceError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SentenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|e| SentenceError::Request(e.to_string()))?;

        let sentence = first_sentence(body)?;

        tracing::info!(model = %self.config.model, sentence = %sentence, "Generated sentence");
        Ok(sentence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let generator = OpenAiSentenceGenerator::new("sk-test", SentenceConfig::default());
        let words = vec!["eat".to_string(), "fish".to_string()];
        let json = serde_json::to_value(generator.request(&words)).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("eat, fish"));
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": " I want to eat fish. "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.trim(), "I want to eat fish.");
    }

    #[test]
    fn test_parse_response_without_choices() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn test_first_sentence() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": " I want fish. "}}, {"message": {"role": "assistant", "content": "ignored"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(first_sentence(parsed).unwrap(), "I want fish.");
    }

    #[test]
    fn test_first_sentence_empty() {
        let blank = r#"{"choices": [{"message": {"role": "assistant", "content": "   "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(blank).unwrap();
        assert!(matches!(first_sentence(parsed), Err(SentenceError::EmptyResponse)));

        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(first_sentence(parsed), Err(SentenceError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_request_error() {
        // Rejected while building the request, before any connection is made
        let config = SentenceConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        let generator = OpenAiSentenceGenerator::new("sk-test", config);
        let result = generator
            .generate(&["eat".to_string(), "fish".to_string()])
            .await;
        assert!(matches!(result, Err(SentenceError::Request(_))));
    }
}
