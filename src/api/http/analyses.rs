// src/api/http/analyses.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;

use crate::analysis::types::AnalyzeVersionRequest;
use crate::analysis::{Analysis, AnalysisReport};
use crate::api::error::ApiResult;
use crate::api::extract::ApiJson;
use crate::identity::Owner;
use crate::state::AppState;

pub fn analyses_router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/version/{version_id}",
        get(get_analysis).post(analyze_version),
    )
}

async fn analyze_version(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(version_id): Path<String>,
    ApiJson(req): ApiJson<AnalyzeVersionRequest>,
) -> ApiResult<(StatusCode, Json<AnalysisReport>)> {
    let report = state
        .analyses
        .analyze_version(&owner, &version_id, &req.source_code)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

async fn get_analysis(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(version_id): Path<String>,
) -> ApiResult<Json<Analysis>> {
    Ok(Json(state.analyses.get_for_version(&owner, &version_id).await?))
}
