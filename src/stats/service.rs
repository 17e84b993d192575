// src/stats/service.rs
// Aggregate queries. Every query joins back to projects.owner_id.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::{Row, SqlitePool};

use super::aggregate::{breakdown, merge_activity, window_start, zero_fill_trend};
use super::types::{
    ActivityEntry, ActivityKind, IssueFrequency, OverviewStats, TrendPoint,
};
use crate::comparison::ChangeType;
use crate::db::{parse_column, to_utc};
use crate::error::{Result, VersusError};
use crate::identity::Owner;
use crate::issues::IssueCode;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

#[derive(Clone)]
pub struct StatsService {
    pool: SqlitePool,
}

impl StatsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn overview(&self, owner: &Owner) -> Result<OverviewStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM projects p WHERE p.owner_id = ?) AS projects,
                (SELECT COUNT(*)
                   FROM code_versions v
                   JOIN projects p ON p.id = v.project_id
                  WHERE p.owner_id = ?) AS versions,
                (SELECT COUNT(*)
                   FROM analysis_issues i
                   JOIN analyses a ON a.id = i.analysis_id
                   JOIN code_versions v ON v.id = a.code_version_id
                   JOIN projects p ON p.id = v.project_id
                  WHERE p.owner_id = ?) AS issues,
                (SELECT COUNT(*)
                   FROM comparisons c
                   JOIN projects p ON p.id = c.project_id
                  WHERE p.owner_id = ?) AS comparisons
            "#,
        )
        .bind(owner.as_str())
        .bind(owner.as_str())
        .bind(owner.as_str())
        .bind(owner.as_str())
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT r.change_type, COUNT(*) AS count
            FROM comparison_results r
            JOIN comparisons c ON c.id = r.comparison_id
            JOIN projects p ON p.id = c.project_id
            WHERE p.owner_id = ?
            GROUP BY r.change_type
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await?;

        let counts = rows
            .into_iter()
            .map(|r| -> Result<(ChangeType, i64)> {
                let change_type: ChangeType =
                    parse_column("change_type", r.try_get::<&str, _>("change_type")?)?;
                Ok((change_type, r.try_get::<i64, _>("count")?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(OverviewStats {
            total_projects: row.try_get("projects")?,
            total_versions: row.try_get("versions")?,
            total_issues: row.try_get("issues")?,
            total_comparisons: row.try_get("comparisons")?,
            change_breakdown: breakdown(&counts),
        })
    }

    /// Issue counts for the last seven days, today (UTC) included
    pub async fn trends(&self, owner: &Owner) -> Result<Vec<TrendPoint>> {
        self.trends_until(owner, Utc::now().date_naive()).await
    }

    pub async fn trends_until(&self, owner: &Owner, today: NaiveDate) -> Result<Vec<TrendPoint>> {
        let since = NaiveDateTime::new(window_start(today), NaiveTime::MIN);

        let rows = sqlx::query(
            r#"
            SELECT date(a.created_at) AS day, COUNT(i.id) AS count
            FROM analysis_issues i
            JOIN analyses a ON a.id = i.analysis_id
            JOIN code_versions v ON v.id = a.code_version_id
            JOIN projects p ON p.id = v.project_id
            WHERE p.owner_id = ? AND a.created_at >= ?
            GROUP BY day
            "#,
        )
        .bind(owner.as_str())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        let counts = rows
            .into_iter()
            .map(|r| -> Result<(NaiveDate, i64)> {
                let day: NaiveDate = parse_column("day", r.try_get::<&str, _>("day")?)?;
                Ok((day, r.try_get::<i64, _>("count")?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(zero_fill_trend(today, &counts))
    }

    /// Most frequent issue codes across the owner's analyses. Ties go to the
    /// code that was recorded first.
    pub async fn top_issues(&self, owner: &Owner, limit: usize) -> Result<Vec<IssueFrequency>> {
        let limit = check_limit(limit)?;
        let rows = sqlx::query(
            r#"
            SELECT i.issue_code, COUNT(*) AS count
            FROM analysis_issues i
            JOIN analyses a ON a.id = i.analysis_id
            JOIN code_versions v ON v.id = a.code_version_id
            JOIN projects p ON p.id = v.project_id
            WHERE p.owner_id = ?
            GROUP BY i.issue_code
            ORDER BY count DESC, MIN(i.rowid) ASC
            LIMIT ?
            "#,
        )
        .bind(owner.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| -> Result<IssueFrequency> {
                let issue_code: IssueCode =
                    parse_column("issue_code", r.try_get::<&str, _>("issue_code")?)?;
                Ok(IssueFrequency {
                    issue_code,
                    category: issue_code.category(),
                    count: r.try_get("count")?,
                })
            })
            .collect()
    }

    /// Analyses and comparisons merged into one feed, newest first
    pub async fn recent_activity(&self, owner: &Owner, limit: usize) -> Result<Vec<ActivityEntry>> {
        let limit = check_limit(limit)?;

        let analysis_rows = sqlx::query(
            r#"
            SELECT a.created_at, p.name AS project_name, v.version_label,
                   (SELECT COUNT(*) FROM analysis_issues i WHERE i.analysis_id = a.id) AS issue_count
            FROM analyses a
            JOIN code_versions v ON v.id = a.code_version_id
            JOIN projects p ON p.id = v.project_id
            WHERE p.owner_id = ?
            ORDER BY a.created_at DESC, a.rowid DESC
            LIMIT ?
            "#,
        )
        .bind(owner.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let comparison_rows = sqlx::query(
            r#"
            SELECT c.created_at, p.name AS project_name,
                   (SELECT COUNT(*) FROM comparison_results r WHERE r.comparison_id = c.id) AS result_count
            FROM comparisons c
            JOIN projects p ON p.id = c.project_id
            WHERE p.owner_id = ?
            ORDER BY c.created_at DESC, c.rowid DESC
            LIMIT ?
            "#,
        )
        .bind(owner.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let analyses = analysis_rows
            .into_iter()
            .map(|r| -> Result<ActivityEntry> {
                Ok(ActivityEntry {
                    kind: ActivityKind::Analysis,
                    project_name: r.try_get("project_name")?,
                    version_label: r.try_get("version_label")?,
                    issue_count: Some(r.try_get("issue_count")?),
                    result_count: None,
                    created_at: to_utc(r.try_get::<NaiveDateTime, _>("created_at")?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let comparisons = comparison_rows
            .into_iter()
            .map(|r| -> Result<ActivityEntry> {
                Ok(ActivityEntry {
                    kind: ActivityKind::Comparison,
                    project_name: r.try_get("project_name")?,
                    version_label: None,
                    issue_count: None,
                    result_count: Some(r.try_get("result_count")?),
                    created_at: to_utc(r.try_get::<NaiveDateTime, _>("created_at")?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(merge_activity(analyses, comparisons, limit))
    }
}

/// Limits are taken as given, zero included; anything above `MAX_LIMIT` is refused
fn check_limit(limit: usize) -> Result<usize> {
    if limit > MAX_LIMIT {
        return Err(VersusError::validation(
            "limit",
            format!("must be at most {MAX_LIMIT}"),
        ));
    }
    Ok(limit)
}
