// src/analysis/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::issues::{Issue, IssueDraft};

/// Summary shown when the analyzer could not produce a usable result
pub const DEGRADED_SUMMARY: &str = "Analysis failed - unable to parse code at this time.";

/// Structured result for exactly one code version. Never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub id: String,
    pub code_version_id: String,
    pub summary: String,
    /// True when the analyzer failed and `issues` is an empty placeholder
    pub degraded: bool,
    pub created_at: DateTime<Utc>,
    pub issues: Vec<Issue>,
}

/// Validated analyzer output, ready to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDraft {
    pub summary: String,
    pub issues: Vec<IssueDraft>,
}

impl AnalysisDraft {
    pub fn degraded() -> Self {
        Self {
            summary: DEGRADED_SUMMARY.to_string(),
            issues: Vec::new(),
        }
    }
}

/// A stored analysis plus the analyzer failure that degraded it, if any
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis: Analysis,
    pub failure: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeVersionRequest {
    #[serde(default, alias = "sourceCode")]
    pub source_code: String,
}
