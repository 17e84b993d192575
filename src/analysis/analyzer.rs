// src/analysis/analyzer.rs
// Analyzer contract plus the LLM-backed implementation

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::payload::decode_analysis;
use super::types::AnalysisDraft;
use crate::error::{Result, VersusError};
use crate::llm::{LlmClient, prompt};

/// External, non-deterministic issue detector.
///
/// Implementations return only validated drafts; any failure is an
/// `VersusError::Analyzer` and the caller decides how to degrade.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, source_code: &str) -> Result<AnalysisDraft>;
}

pub struct LlmAnalyzer {
    client: Arc<dyn LlmClient>,
}

impl LlmAnalyzer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Analyzer for LlmAnalyzer {
    async fn analyze(&self, source_code: &str) -> Result<AnalysisDraft> {
        debug!(
            "Analyzing {} characters with {}",
            source_code.len(),
            self.client.model()
        );

        let text = self
            .client
            .generate(&prompt::analysis_prompt(source_code))
            .await
            .map_err(|e| VersusError::Analyzer(e.to_string()))?;

        decode_analysis(&text)
    }
}
