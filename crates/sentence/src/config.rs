use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Settings for the chat-completions sentence generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentenceConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Language the sentence is written in.
    pub language: String,
    /// Upper bound on one generation request, in seconds.
    pub timeout_secs: u64,
}

impl Default for SentenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 100,
            temperature: 0.7,
            language: "Traditional Chinese".to_string(),
            timeout_secs: 15,
        }
    }
}

impl SentenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn system_prompt(&self) -> String {
        format!(
            "You are a professional sign language interpreter. Turn sequences of \
             sign language words into a natural, fluent {} sentence with correct \
             grammar and everyday phrasing, written from the signer's point of view.",
            self.language
        )
    }

    pub(crate) fn user_prompt(&self, words: &[String]) -> String {
        format!(
            "Combine these sign language words into one natural, complete sentence: {}. \
             Reply in {} using normal grammar, with the sentence only.",
            words.join(", "),
            self.language
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SentenceConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SentenceConfig =
            serde_json::from_str(r#"{"language": "English", "max_tokens": 60}"#).unwrap();
        assert_eq!(config.language, "English");
        assert_eq!(config.max_tokens, 60);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_user_prompt_lists_words_in_order() {
        let config = SentenceConfig::default();
        let prompt = config.user_prompt(&["want".to_string(), "fish".to_string()]);
        assert!(prompt.contains("want, fish"));
        assert!(prompt.contains("Traditional Chinese"));
    }
}
