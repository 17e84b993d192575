// src/api/http/versions.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::extract::ApiJson;
use crate::identity::Owner;
use crate::project::types::{RenameVersionRequest, UploadVersionRequest, UploadedVersion};
use crate::project::{CodeVersion, VersionDetails};
use crate::state::AppState;

pub fn versions_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/project/{project_id}",
            get(list_versions).post(upload_version),
        )
        .route(
            "/{id}",
            get(get_version).patch(rename_version).delete(delete_version),
        )
}

/// Upload source for a new version. The response carries the analysis,
/// degraded when the analyzer failed.
async fn upload_version(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(project_id): Path<String>,
    ApiJson(req): ApiJson<UploadVersionRequest>,
) -> ApiResult<(StatusCode, Json<UploadedVersion>)> {
    let uploaded = state
        .projects
        .upload_version(&owner, &project_id, req.version_label, &req.source_code)
        .await?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}

async fn list_versions(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<VersionDetails>>> {
    Ok(Json(state.projects.list_versions(&owner, &project_id).await?))
}

async fn get_version(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> ApiResult<Json<VersionDetails>> {
    Ok(Json(state.projects.get_version(&owner, &id).await?))
}

async fn rename_version(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<RenameVersionRequest>,
) -> ApiResult<Json<CodeVersion>> {
    let version = state
        .projects
        .rename_version(&owner, &id, &req.version_label)
        .await?;
    Ok(Json(version))
}

async fn delete_version(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.projects.delete_version(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
