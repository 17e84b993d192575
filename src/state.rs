// src/state.rs
// Shared application state: one pool, one service per concern

use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::analysis::{AnalysisService, AnalysisStore, Analyzer, LlmAnalyzer};
use crate::comparison::{ComparisonService, ComparisonStore};
use crate::config::llm::LlmConfig;
use crate::explain::{Explainer, ExplanationService, ExplanationStore, LlmExplainer};
use crate::llm::{DisabledClient, GeminiClient, LlmClient};
use crate::project::{ProjectService, ProjectStore};
use crate::stats::StatsService;

/// Timeouts applied to the external analyzer and explainer calls
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub analyzer: Duration,
    pub explainer: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            analyzer: Duration::from_secs(60),
            explainer: Duration::from_secs(60),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub projects: Arc<ProjectService>,
    pub analyses: Arc<AnalysisService>,
    pub comparisons: Arc<ComparisonService>,
    pub explanations: Arc<ExplanationService>,
    pub stats: Arc<StatsService>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        analyzer: Arc<dyn Analyzer>,
        explainer: Arc<dyn Explainer>,
        timeouts: Timeouts,
    ) -> Self {
        let project_store = ProjectStore::new(pool.clone());
        let analysis_store = AnalysisStore::new(pool.clone());
        let comparison_store = ComparisonStore::new(pool.clone());

        let analyses = Arc::new(AnalysisService::new(
            analyzer,
            analysis_store.clone(),
            project_store.clone(),
            timeouts.analyzer,
        ));
        let projects = Arc::new(ProjectService::new(project_store.clone(), analyses.clone()));
        let comparisons = Arc::new(ComparisonService::new(
            comparison_store.clone(),
            analysis_store,
            project_store,
        ));
        let explanations = Arc::new(ExplanationService::new(
            explainer,
            ExplanationStore::new(pool.clone()),
            comparison_store,
            timeouts.explainer,
        ));
        let stats = Arc::new(StatsService::new(pool.clone()));

        Self {
            pool,
            projects,
            analyses,
            comparisons,
            explanations,
            stats,
        }
    }

    /// Wire the Gemini-backed analyzer and explainer from configuration
    pub fn from_config(pool: SqlitePool, config: &LlmConfig) -> Self {
        let client: Arc<dyn LlmClient> = match &config.api_key {
            Some(key) => {
                info!("Using Gemini model {}", config.model);
                Arc::new(
                    GeminiClient::new(
                        key.clone(),
                        config.model.clone(),
                        config.analyzer_timeout().max(config.explainer_timeout()),
                    )
                    .with_base_url(config.base_url.clone()),
                )
            }
            None => {
                warn!("GEMINI_API_KEY not set: analyses will be degraded and explanations unavailable");
                Arc::new(DisabledClient)
            }
        };

        Self::new(
            pool,
            Arc::new(LlmAnalyzer::new(client.clone())),
            Arc::new(LlmExplainer::new(client)),
            Timeouts {
                analyzer: config.analyzer_timeout(),
                explainer: config.explainer_timeout(),
            },
        )
    }
}
