// src/api/http/comparisons.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::extract::ApiJson;
use crate::comparison::{
    CompareAnalysesRequest, CompareVersionsRequest, Comparison, ComparisonOutcome,
};
use crate::explain::ExplanationOutcome;
use crate::identity::Owner;
use crate::state::AppState;

pub fn comparisons_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/project/{project_id}",
            get(list_comparisons).post(compare_versions),
        )
        .route("/project/{project_id}/analyses", post(compare_analyses))
        .route("/{id}", get(get_comparison))
        .route("/{id}/explain", post(explain_comparison))
}

/// 201 for a new comparison, 200 when the ordered pair was already compared
fn outcome_status(cached: bool) -> StatusCode {
    if cached {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    }
}

async fn compare_versions(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(project_id): Path<String>,
    ApiJson(req): ApiJson<CompareVersionsRequest>,
) -> ApiResult<(StatusCode, Json<ComparisonOutcome>)> {
    let outcome = state
        .comparisons
        .compare_versions(&owner, &project_id, &req.from_version_id, &req.to_version_id)
        .await?;
    Ok((outcome_status(outcome.cached), Json(outcome)))
}

async fn compare_analyses(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(project_id): Path<String>,
    ApiJson(req): ApiJson<CompareAnalysesRequest>,
) -> ApiResult<(StatusCode, Json<ComparisonOutcome>)> {
    let outcome = state
        .comparisons
        .compare_analyses(&owner, &project_id, &req.from_analysis_id, &req.to_analysis_id)
        .await?;
    Ok((outcome_status(outcome.cached), Json(outcome)))
}

async fn list_comparisons(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<Comparison>>> {
    Ok(Json(state.comparisons.list(&owner, &project_id).await?))
}

async fn get_comparison(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> ApiResult<Json<Comparison>> {
    Ok(Json(state.comparisons.get(&owner, &id).await?))
}

async fn explain_comparison(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<ExplanationOutcome>)> {
    let outcome = state.explanations.get_or_create(&owner, &id).await?;
    Ok((outcome_status(outcome.cached), Json(outcome)))
}
