// src/stats/types.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::issues::{IssueCategory, IssueCode};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBreakdown {
    pub improved: i64,
    pub unchanged: i64,
    pub worsened: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_projects: i64,
    pub total_versions: i64,
    pub total_issues: i64,
    pub total_comparisons: i64,
    pub change_breakdown: ChangeBreakdown,
}

/// Issues produced on one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub issues: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFrequency {
    pub issue_code: IssueCode,
    pub category: IssueCategory,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Analysis,
    Comparison,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_count: Option<i64>,
    pub created_at: DateTime<Utc>,
}
