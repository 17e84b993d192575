// src/explain/service.rs
// Get-or-create explanations for owned comparisons

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::explainer::Explainer;
use super::store::ExplanationStore;
use super::types::Explanation;
use crate::comparison::ComparisonStore;
use crate::error::{Result, VersusError, require_id};
use crate::identity::Owner;

#[derive(Debug, Clone, Serialize)]
pub struct ExplanationOutcome {
    pub explanation: Explanation,
    pub cached: bool,
}

pub struct ExplanationService {
    explainer: Arc<dyn Explainer>,
    store: ExplanationStore,
    comparisons: ComparisonStore,
    timeout: Duration,
}

impl ExplanationService {
    pub fn new(
        explainer: Arc<dyn Explainer>,
        store: ExplanationStore,
        comparisons: ComparisonStore,
        timeout: Duration,
    ) -> Self {
        Self {
            explainer,
            store,
            comparisons,
            timeout,
        }
    }

    /// Return the stored explanation, or ask the explainer for one.
    ///
    /// A failed or timed-out explainer call stores nothing and surfaces
    /// `VersusError::Explainer`.
    pub async fn get_or_create(
        &self,
        owner: &Owner,
        comparison_id: &str,
    ) -> Result<ExplanationOutcome> {
        let comparison_id = require_id("comparisonId", comparison_id)?;
        let comparison = self
            .comparisons
            .get_owned(owner, comparison_id)
            .await?
            .ok_or_else(|| VersusError::not_found(format!("comparison {comparison_id}")))?;

        if let Some(explanation) = comparison.explanation {
            debug!("Explanation cache hit for comparison {}", comparison.id);
            return Ok(ExplanationOutcome {
                explanation,
                cached: true,
            });
        }

        let text = match tokio::time::timeout(self.timeout, self.explainer.explain(&comparison.results))
            .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Explainer failed for comparison {}: {}", comparison.id, e);
                return Err(match e {
                    VersusError::Explainer(_) => e,
                    other => VersusError::Explainer(other.to_string()),
                });
            }
            Err(_) => {
                warn!("Explainer timed out for comparison {}", comparison.id);
                return Err(VersusError::Explainer(format!(
                    "explainer timed out after {:?}",
                    self.timeout
                )));
            }
        };

        let (explanation, created) = self.store.insert_if_absent(&comparison.id, &text).await?;
        if created {
            info!("Stored explanation for comparison {}", comparison.id);
        }

        Ok(ExplanationOutcome {
            explanation,
            cached: !created,
        })
    }
}
