// src/project/service.rs
// Owner-scoped project and version lifecycle

use std::sync::Arc;
use tracing::info;

use super::store::ProjectStore;
use super::types::{CodeVersion, Project, UploadedVersion, VersionDetails};
use crate::analysis::AnalysisService;
use crate::analysis::service::require_source;
use crate::error::{Result, VersusError, require_id};
use crate::identity::Owner;

pub struct ProjectService {
    store: ProjectStore,
    analyses: Arc<AnalysisService>,
}

impl ProjectService {
    pub fn new(store: ProjectStore, analyses: Arc<AnalysisService>) -> Self {
        Self { store, analyses }
    }

    pub async fn create_project(
        &self,
        owner: &Owner,
        name: &str,
        description: Option<String>,
    ) -> Result<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VersusError::validation("name", "is required"));
        }
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let project = self
            .store
            .create_project(owner, name.to_string(), description)
            .await?;
        info!("Created project {} ({})", project.name, project.id);
        Ok(project)
    }

    pub async fn list_projects(&self, owner: &Owner) -> Result<Vec<Project>> {
        self.store.list_projects(owner).await
    }

    pub async fn get_project(&self, owner: &Owner, project_id: &str) -> Result<Project> {
        let project_id = require_id("projectId", project_id)?;
        self.store
            .get_project(owner, project_id)
            .await?
            .ok_or_else(|| VersusError::not_found(format!("project {project_id}")))
    }

    pub async fn delete_project(&self, owner: &Owner, project_id: &str) -> Result<()> {
        let project_id = require_id("projectId", project_id)?;
        if !self.store.delete_project(owner, project_id).await? {
            return Err(VersusError::not_found(format!("project {project_id}")));
        }
        Ok(())
    }

    /// Analyze uploaded source and record it as a new version. The source
    /// code is handed to the analyzer and then dropped; it is never persisted.
    pub async fn upload_version(
        &self,
        owner: &Owner,
        project_id: &str,
        version_label: Option<String>,
        source_code: &str,
    ) -> Result<UploadedVersion> {
        require_source(source_code)?;
        let project = self.get_project(owner, project_id).await?;

        let label = version_label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        let (version, report) = self
            .analyses
            .analyze_new_version(&project.id, label, source_code)
            .await?;

        Ok(UploadedVersion {
            details: VersionDetails {
                version,
                analysis: Some(report.analysis),
            },
            analysis_error: report.failure,
        })
    }

    /// Versions newest first, each with its analysis when one exists
    pub async fn list_versions(
        &self,
        owner: &Owner,
        project_id: &str,
    ) -> Result<Vec<VersionDetails>> {
        let project = self.get_project(owner, project_id).await?;
        let versions = self.store.list_versions(&project.id).await?;
        let mut analyses = self.analyses.store().list_for_project(&project.id).await?;

        Ok(versions
            .into_iter()
            .map(|version| {
                let analysis = analyses.remove(&version.id);
                VersionDetails { version, analysis }
            })
            .collect())
    }

    pub async fn get_version(&self, owner: &Owner, version_id: &str) -> Result<VersionDetails> {
        let version = self.owned_version(owner, version_id).await?;
        let analysis = self.analyses.store().get_by_version(&version.id).await?;
        Ok(VersionDetails { version, analysis })
    }

    pub async fn rename_version(
        &self,
        owner: &Owner,
        version_id: &str,
        version_label: &str,
    ) -> Result<CodeVersion> {
        let version_id = require_id("versionId", version_id)?;
        let label = version_label.trim();
        if label.is_empty() {
            return Err(VersusError::validation("versionLabel", "is required"));
        }

        self.store
            .rename_version(owner, version_id, label)
            .await?
            .ok_or_else(|| VersusError::not_found(format!("version {version_id}")))
    }

    pub async fn delete_version(&self, owner: &Owner, version_id: &str) -> Result<()> {
        let version_id = require_id("versionId", version_id)?;
        if !self.store.delete_version(owner, version_id).await? {
            return Err(VersusError::not_found(format!("version {version_id}")));
        }
        info!("Deleted version {}", version_id);
        Ok(())
    }

    async fn owned_version(&self, owner: &Owner, version_id: &str) -> Result<CodeVersion> {
        let version_id = require_id("versionId", version_id)?;
        self.store
            .get_version(owner, version_id)
            .await?
            .ok_or_else(|| VersusError::not_found(format!("version {version_id}")))
    }
}
