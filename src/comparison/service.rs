// src/comparison/service.rs
// Cache-or-create orchestration for comparisons

use tracing::{debug, info};

use super::engine::diff_issues;
use super::store::{ComparisonStore, Inserted};
use super::types::{Comparison, ComparisonOutcome};
use crate::analysis::{Analysis, AnalysisStore};
use crate::error::{Result, VersusError, require_id};
use crate::identity::Owner;
use crate::project::{Project, ProjectStore};

pub struct ComparisonService {
    store: ComparisonStore,
    analyses: AnalysisStore,
    projects: ProjectStore,
}

/// Which side of the pair a precondition failure refers to
#[derive(Clone, Copy)]
enum Side {
    From,
    To,
}

impl Side {
    fn analysis_field(self) -> &'static str {
        match self {
            Side::From => "fromAnalysisId",
            Side::To => "toAnalysisId",
        }
    }

    fn version_field(self) -> &'static str {
        match self {
            Side::From => "fromVersionId",
            Side::To => "toVersionId",
        }
    }
}

impl ComparisonService {
    pub fn new(store: ComparisonStore, analyses: AnalysisStore, projects: ProjectStore) -> Self {
        Self {
            store,
            analyses,
            projects,
        }
    }

    /// Resolve two versions of a project to their analyses and compare them
    pub async fn compare_versions(
        &self,
        owner: &Owner,
        project_id: &str,
        from_version_id: &str,
        to_version_id: &str,
    ) -> Result<ComparisonOutcome> {
        let project_id = require_id("projectId", project_id)?;
        let from_version_id = require_id(Side::From.version_field(), from_version_id)?;
        let to_version_id = require_id(Side::To.version_field(), to_version_id)?;

        let project = self.owned_project(owner, project_id).await?;
        let from = self
            .analysis_for_version(&project, from_version_id, Side::From)
            .await?;
        let to = self
            .analysis_for_version(&project, to_version_id, Side::To)
            .await?;

        self.compare_loaded(&project, from, to).await
    }

    /// Compare two analyses of the same project. Returns the stored
    /// comparison unchanged when the ordered pair was already compared.
    pub async fn compare_analyses(
        &self,
        owner: &Owner,
        project_id: &str,
        from_analysis_id: &str,
        to_analysis_id: &str,
    ) -> Result<ComparisonOutcome> {
        let project_id = require_id("projectId", project_id)?;
        let from_analysis_id = require_id(Side::From.analysis_field(), from_analysis_id)?;
        let to_analysis_id = require_id(Side::To.analysis_field(), to_analysis_id)?;

        let project = self.owned_project(owner, project_id).await?;
        let from = self
            .load_side(&project, from_analysis_id, Side::From)
            .await?;
        let to = self.load_side(&project, to_analysis_id, Side::To).await?;

        self.compare_loaded(&project, from, to).await
    }

    pub async fn get(&self, owner: &Owner, comparison_id: &str) -> Result<Comparison> {
        let comparison_id = require_id("comparisonId", comparison_id)?;
        self.store
            .get_owned(owner, comparison_id)
            .await?
            .ok_or_else(|| VersusError::not_found(format!("comparison {comparison_id}")))
    }

    pub async fn list(&self, owner: &Owner, project_id: &str) -> Result<Vec<Comparison>> {
        let project_id = require_id("projectId", project_id)?;
        let project = self.owned_project(owner, project_id).await?;
        self.store.list_for_project(&project.id).await
    }

    async fn compare_loaded(
        &self,
        project: &Project,
        from: Analysis,
        to: Analysis,
    ) -> Result<ComparisonOutcome> {
        if let Some(existing) = self.store.find_by_pair(&from.id, &to.id).await? {
            debug!("Comparison cache hit for {} -> {}", from.id, to.id);
            return Ok(ComparisonOutcome::cached(existing));
        }

        debug!("Comparison cache miss for {} -> {}", from.id, to.id);
        let results = diff_issues(&from.issues, &to.issues);

        match self
            .store
            .insert_with_results(&project.id, &from.id, &to.id, &results)
            .await?
        {
            Inserted::Created(comparison) => {
                info!(
                    "Compared {} -> {} in project {}: {} issue codes",
                    from.id,
                    to.id,
                    project.id,
                    comparison.results.len()
                );
                Ok(ComparisonOutcome::created(comparison))
            }
            Inserted::Existing(comparison) => Ok(ComparisonOutcome::cached(comparison)),
        }
    }

    async fn owned_project(&self, owner: &Owner, project_id: &str) -> Result<Project> {
        self.projects
            .get_project(owner, project_id)
            .await?
            .ok_or_else(|| VersusError::not_found(format!("project {project_id}")))
    }

    async fn analysis_for_version(
        &self,
        project: &Project,
        version_id: &str,
        side: Side,
    ) -> Result<Analysis> {
        let field = side.version_field();

        let version = self
            .projects
            .get_version_in_project(&project.id, version_id)
            .await?
            .ok_or_else(|| {
                VersusError::validation(field, "is not a version of this project")
            })?;

        let analysis = self
            .analyses
            .get_by_version(&version.id)
            .await?
            .ok_or_else(|| VersusError::validation(field, "has not been analyzed"))?;

        ensure_comparable(&analysis, field)?;
        Ok(analysis)
    }

    async fn load_side(&self, project: &Project, analysis_id: &str, side: Side) -> Result<Analysis> {
        let field = side.analysis_field();

        let owning_project = self.analyses.project_of(analysis_id).await?;
        match owning_project {
            None => return Err(VersusError::validation(field, "does not exist")),
            Some(id) if id != project.id => {
                return Err(VersusError::validation(field, "belongs to a different project"));
            }
            Some(_) => {}
        }

        let analysis = self
            .analyses
            .get(analysis_id)
            .await?
            .ok_or_else(|| VersusError::validation(field, "does not exist"))?;

        ensure_comparable(&analysis, field)?;
        Ok(analysis)
    }
}

fn ensure_comparable(analysis: &Analysis, field: &str) -> Result<()> {
    if analysis.degraded {
        return Err(VersusError::validation(
            field,
            "refers to a failed analysis; re-analyze the version first",
        ));
    }
    Ok(())
}
