// src/analysis/service.rs
// Runs the external analyzer and records its (possibly degraded) result

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::analyzer::Analyzer;
use super::store::AnalysisStore;
use super::types::{Analysis, AnalysisDraft, AnalysisReport};
use crate::error::{Result, VersusError, require_id};
use crate::identity::Owner;
use crate::project::{CodeVersion, ProjectStore};

pub struct AnalysisService {
    analyzer: Arc<dyn Analyzer>,
    store: AnalysisStore,
    projects: ProjectStore,
    timeout: Duration,
}

impl AnalysisService {
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        store: AnalysisStore,
        projects: ProjectStore,
        timeout: Duration,
    ) -> Self {
        Self {
            analyzer,
            store,
            projects,
            timeout,
        }
    }

    pub fn store(&self) -> &AnalysisStore {
        &self.store
    }

    /// Analyze a version the owner already has.
    ///
    /// A version with a healthy analysis is rejected with `Conflict`; a
    /// degraded one is replaced.
    pub async fn analyze_version(
        &self,
        owner: &Owner,
        version_id: &str,
        source_code: &str,
    ) -> Result<AnalysisReport> {
        let version_id = require_id("versionId", version_id)?;
        require_source(source_code)?;

        let version = self
            .projects
            .get_version(owner, version_id)
            .await?
            .ok_or_else(|| VersusError::not_found(format!("version {version_id}")))?;

        let existing = self.store.get_by_version(&version.id).await?;
        if let Some(analysis) = &existing {
            if !analysis.degraded {
                return Err(VersusError::Conflict(format!(
                    "version {} is already analyzed; upload a new version instead",
                    version.id
                )));
            }
        }

        let (draft, failure) = self.run_analyzer(source_code).await;
        let degraded = failure.is_some();

        let analysis = match existing {
            Some(old) => {
                self.store
                    .replace_degraded(&old.id, &version.id, &draft, degraded)
                    .await?
            }
            None => self.store.insert(&version.id, &draft, degraded).await?,
        };

        Ok(AnalysisReport { analysis, failure })
    }

    /// Analyze uploaded source, then record the new version together with
    /// its analysis
    pub(crate) async fn analyze_new_version(
        &self,
        project_id: &str,
        version_label: Option<String>,
        source_code: &str,
    ) -> Result<(CodeVersion, AnalysisReport)> {
        let (draft, failure) = self.run_analyzer(source_code).await;
        let (version, analysis) = self
            .store
            .insert_with_version(project_id, version_label, &draft, failure.is_some())
            .await?;

        info!(
            "Analyzed version {}: {} issues{}",
            version.id,
            analysis.issues.len(),
            if analysis.degraded { " (degraded)" } else { "" }
        );
        Ok((version, AnalysisReport { analysis, failure }))
    }

    pub async fn get_for_version(&self, owner: &Owner, version_id: &str) -> Result<Analysis> {
        let version_id = require_id("versionId", version_id)?;
        let version = self
            .projects
            .get_version(owner, version_id)
            .await?
            .ok_or_else(|| VersusError::not_found(format!("version {version_id}")))?;

        self.store
            .get_by_version(&version.id)
            .await?
            .ok_or_else(|| VersusError::not_found(format!("analysis for version {version_id}")))
    }

    /// Call the analyzer under the configured timeout. Never fails: any
    /// problem yields the degraded draft plus the reason.
    async fn run_analyzer(&self, source_code: &str) -> (AnalysisDraft, Option<String>) {
        match tokio::time::timeout(self.timeout, self.analyzer.analyze(source_code)).await {
            Ok(Ok(draft)) => (draft, None),
            Ok(Err(e)) => {
                warn!("Analyzer failed, storing degraded analysis: {}", e);
                (AnalysisDraft::degraded(), Some(e.to_string()))
            }
            Err(_) => {
                let reason = format!("analyzer timed out after {:?}", self.timeout);
                warn!("{}", reason);
                (AnalysisDraft::degraded(), Some(reason))
            }
        }
    }
}

pub(crate) fn require_source(source_code: &str) -> Result<()> {
    if source_code.trim().is_empty() {
        return Err(VersusError::validation("sourceCode", "is required"));
    }
    Ok(())
}
