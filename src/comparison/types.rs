// src/comparison/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classifier::ChangeType;
use crate::explain::Explanation;
use crate::issues::{Complexity, IssueCode, Severity};

/// Outcome of comparing two analyses, keyed by the ordered analysis pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub id: String,
    pub project_id: String,
    pub from_analysis_id: String,
    pub to_analysis_id: String,
    pub created_at: DateTime<Utc>,
    pub results: Vec<ComparisonResult>,
    pub explanation: Option<Explanation>,
}

/// One row per issue code seen on either side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub id: String,
    pub comparison_id: String,
    pub issue_code: IssueCode,
    pub change_type: ChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_complexity: Option<Complexity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_complexity: Option<Complexity>,
}

/// A computed result row before it is persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultDraft {
    pub issue_code: IssueCode,
    pub change_type: ChangeType,
    pub before_severity: Option<Severity>,
    pub before_complexity: Option<Complexity>,
    pub after_severity: Option<Severity>,
    pub after_complexity: Option<Complexity>,
}

/// What `compare` hands back: the comparison and whether it was already stored
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    pub comparison: Comparison,
    pub cached: bool,
}

impl ComparisonOutcome {
    pub fn created(comparison: Comparison) -> Self {
        Self {
            comparison,
            cached: false,
        }
    }

    pub fn cached(comparison: Comparison) -> Self {
        Self {
            comparison,
            cached: true,
        }
    }
}

// Request types for API

#[derive(Debug, Serialize, Deserialize)]
pub struct CompareVersionsRequest {
    #[serde(default, alias = "fromVersionId")]
    pub from_version_id: String,
    #[serde(default, alias = "toVersionId")]
    pub to_version_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompareAnalysesRequest {
    #[serde(default, alias = "fromAnalysisId")]
    pub from_analysis_id: String,
    #[serde(default, alias = "toAnalysisId")]
    pub to_analysis_id: String,
}
