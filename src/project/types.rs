// src/project/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub version_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One uploaded snapshot of a project's code. The source itself is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeVersion {
    pub id: String,
    pub project_id: String,
    pub version_label: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDetails {
    #[serde(flatten)]
    pub version: CodeVersion,
    pub analysis: Option<Analysis>,
}

/// Upload result; `analysis_error` is set when the analyzer failed and the
/// stored analysis is a degraded placeholder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedVersion {
    #[serde(flatten)]
    pub details: VersionDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
}

// Request/Response types for API

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadVersionRequest {
    #[serde(default, alias = "versionLabel")]
    pub version_label: Option<String>,
    #[serde(default, alias = "sourceCode")]
    pub source_code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenameVersionRequest {
    #[serde(default, alias = "versionLabel")]
    pub version_label: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectsResponse {
    pub projects: Vec<Project>,
    pub total: usize,
}
