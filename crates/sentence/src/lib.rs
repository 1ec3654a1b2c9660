//! Turning recognized sign words into a sentence.
//!
//! Sentence generation is best-effort: [`SentenceAssembler`] always returns
//! a sentence, falling back to the words joined by spaces.

mod assembler;
mod config;
mod openai;

pub use assembler::{fallback_sentence, SentenceAssembler, NOT_RECOGNIZED};
pub use config::SentenceConfig;
pub use openai::OpenAiSentenceGenerator;

use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SentenceError {
    #[error("missing API key (set {0})")]
    MissingApiKey(&'static str),
    #[error("request failed: {0}")]
    Request(String),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("empty response")]
    EmptyResponse,
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, SentenceError>;

/// External text generation for word sequences.
#[async_trait]
pub trait SentenceGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Compose a sentence from words in signing order.
    async fn generate(&self, words: &[String]) -> Result<String>;
}
