// src/explain/explainer.rs

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::comparison::ComparisonResult;
use crate::error::{Result, VersusError};
use crate::llm::{LlmClient, prompt};

/// External narrator for a comparison's result set. Only the results are
/// handed over; the returned text is opaque.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, results: &[ComparisonResult]) -> Result<String>;
}

pub struct LlmExplainer {
    client: Arc<dyn LlmClient>,
}

impl LlmExplainer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Explainer for LlmExplainer {
    async fn explain(&self, results: &[ComparisonResult]) -> Result<String> {
        debug!(
            "Explaining {} results with {}",
            results.len(),
            self.client.model()
        );

        let text = self
            .client
            .generate(&prompt::explanation_prompt(results))
            .await
            .map_err(|e| VersusError::Explainer(e.to_string()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(VersusError::Explainer("explainer returned no text".to_string()));
        }
        Ok(text.to_string())
    }
}
