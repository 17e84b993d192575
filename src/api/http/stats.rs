// src/api/http/stats.rs

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::extract::ApiQuery;
use crate::identity::Owner;
use crate::state::AppState;
use crate::stats::service::DEFAULT_LIMIT;
use crate::stats::{ActivityEntry, IssueFrequency, OverviewStats, TrendPoint};

pub fn stats_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(overview))
        .route("/trends", get(trends))
        .route("/issues", get(top_issues))
        .route("/activity", get(recent_activity))
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

impl LimitQuery {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

async fn overview(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<OverviewStats>> {
    Ok(Json(state.stats.overview(&owner).await?))
}

async fn trends(
    State(state): State<Arc<AppState>>,
    owner: Owner,
) -> ApiResult<Json<Vec<TrendPoint>>> {
    Ok(Json(state.stats.trends(&owner).await?))
}

async fn top_issues(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<Json<Vec<IssueFrequency>>> {
    Ok(Json(state.stats.top_issues(&owner, query.limit()).await?))
}

async fn recent_activity(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<Json<Vec<ActivityEntry>>> {
    Ok(Json(state.stats.recent_activity(&owner, query.limit()).await?))
}
