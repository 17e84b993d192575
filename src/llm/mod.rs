// src/llm/mod.rs
//! Text-generation client used by the analyzer and the explainer

pub mod gemini;
pub mod prompt;

use anyhow::Result;
use async_trait::async_trait;

pub use gemini::GeminiClient;

/// Single-shot prompt -> text completion
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for logs
    fn model(&self) -> &str;
}

/// Stand-in when no API key is configured. Every call fails, so analyses
/// degrade and explanations report the missing key.
pub struct DisabledClient;

#[async_trait]
impl LlmClient for DisabledClient {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("GEMINI_API_KEY not configured")
    }

    fn model(&self) -> &str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_client_always_fails() {
        let err = DisabledClient.generate("anything").await.unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
