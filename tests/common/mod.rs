// tests/common/mod.rs
// Shared fixtures: in-memory state with scripted analyzer and explainer
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use versus::analysis::{AnalysisDraft, Analyzer};
use versus::comparison::ComparisonResult;
use versus::db::in_memory_pool;
use versus::explain::Explainer;
use versus::issues::IssueDraft;
use versus::project::Project;
use versus::project::types::UploadedVersion;
use versus::state::{AppState, Timeouts};
use versus::{Owner, Result, VersusError};

/// Reads one issue per line, `CODE severity complexity`, e.g.
/// `NESTED_LOOP high O_n2`. Lines starting with `#` are ignored, a line
/// `FAIL` makes the call fail and a line `SLOW` makes it hang for a few seconds.
pub struct LineAnalyzer;

#[async_trait]
impl Analyzer for LineAnalyzer {
    async fn analyze(&self, source_code: &str) -> Result<AnalysisDraft> {
        let mut issues = Vec::new();
        for line in source_code
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
        {
            match line {
                "FAIL" => return Err(VersusError::Analyzer("scripted failure".to_string())),
                "SLOW" => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
                _ => {}
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let [code, severity, complexity] = parts.as_slice() else {
                return Err(VersusError::Analyzer(format!("bad line: {line}")));
            };
            let draft = IssueDraft::new(
                code.parse().map_err(|e| VersusError::Analyzer(format!("{e}")))?,
                severity.parse().map_err(|e| VersusError::Analyzer(format!("{e}")))?,
                complexity.parse().map_err(|e| VersusError::Analyzer(format!("{e}")))?,
            );
            issues.push(draft);
        }

        Ok(AnalysisDraft {
            summary: format!("{} issues", issues.len()),
            issues,
        })
    }
}

/// Counts calls; fails while `failing` is set and hangs while `slow` is set
#[derive(Default)]
pub struct CountingExplainer {
    pub calls: AtomicUsize,
    pub failing: AtomicBool,
    pub slow: AtomicBool,
}

impl CountingExplainer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_slow(&self, slow: bool) {
        self.slow.store(slow, Ordering::SeqCst);
    }
}

#[async_trait]
impl Explainer for CountingExplainer {
    async fn explain(&self, results: &[ComparisonResult]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.slow.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(VersusError::Explainer("explainer unavailable".to_string()));
        }
        Ok(format!("{} issue codes compared", results.len()))
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub explainer: Arc<CountingExplainer>,
}

pub async fn test_app() -> TestApp {
    test_app_with_timeouts(Timeouts::default()).await
}

pub async fn test_app_with_timeouts(timeouts: Timeouts) -> TestApp {
    let pool = in_memory_pool().await.expect("in-memory pool");
    let explainer = Arc::new(CountingExplainer::default());
    let state = Arc::new(AppState::new(
        pool,
        Arc::new(LineAnalyzer),
        explainer.clone(),
        timeouts,
    ));
    TestApp { state, explainer }
}

pub fn owner(id: &str) -> Owner {
    Owner::new(id).expect("owner")
}

pub async fn project(state: &AppState, owner: &Owner, name: &str) -> Project {
    state
        .projects
        .create_project(owner, name, None)
        .await
        .expect("create project")
}

pub async fn upload(
    state: &AppState,
    owner: &Owner,
    project_id: &str,
    label: &str,
    source: &str,
) -> UploadedVersion {
    state
        .projects
        .upload_version(owner, project_id, Some(label.to_string()), source)
        .await
        .expect("upload version")
}

/// Stored analysis id of an uploaded version
pub fn analysis_id(uploaded: &UploadedVersion) -> String {
    uploaded
        .details
        .analysis
        .as_ref()
        .map(|a| a.id.clone())
        .expect("uploaded version has an analysis")
}

pub async fn count(state: &AppState, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&state.pool)
        .await
        .expect("count rows")
}
