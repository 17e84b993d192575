// src/api/http/projects.rs

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
use crate::project::Project;
use crate::project::types::{CreateProjectRequest, ProjectsResponse};
use crate::state::AppState;

pub fn projects_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/{id}", get(get_project).delete(delete_project))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state
        .projects
        .create_project(&owner, &req.name, req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<ProjectsResponse>> {
    let projects = state.projects.list_projects(&owner).await?;
    let total = projects.len();
    Ok(Json(ProjectsResponse { projects, total }))
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.projects.get_project(&owner, &id).await?))
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.projects.delete_project(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
