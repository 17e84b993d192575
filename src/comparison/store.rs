// src/comparison/store.rs

use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tracing::{info, warn};

use super::types::{Comparison, ComparisonResult, ResultDraft};
use crate::db::{new_id, now_naive, parse_column, parse_optional_column, to_utc};
use crate::error::{Result, VersusError};
use crate::explain::Explanation;
use crate::identity::Owner;

const COMPARISON_COLUMNS: &str = r#"
    c.id, c.project_id, c.from_analysis_id, c.to_analysis_id, c.created_at,
    e.id AS explanation_id, e.explanation, e.created_at AS explained_at
"#;

const RESULT_COLUMNS: &str = r#"
    r.id, r.comparison_id, r.issue_code, r.change_type,
    r.before_severity, r.before_complexity, r.after_severity, r.after_complexity
"#;

/// Result of an insert attempt for an ordered analysis pair
#[derive(Debug)]
pub enum Inserted {
    Created(Comparison),
    /// Another writer committed the same pair first
    Existing(Comparison),
}

#[derive(Clone)]
pub struct ComparisonStore {
    pub pool: SqlitePool,
}

impl ComparisonStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up the comparison for an exact ordered pair. (A, B) and (B, A)
    /// are different keys.
    pub async fn find_by_pair(
        &self,
        from_analysis_id: &str,
        to_analysis_id: &str,
    ) -> Result<Option<Comparison>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {COMPARISON_COLUMNS}
            FROM comparisons c
            LEFT JOIN explanations e ON e.comparison_id = c.id
            WHERE c.from_analysis_id = ? AND c.to_analysis_id = ?
            "#
        ))
        .bind(from_analysis_id)
        .bind(to_analysis_id)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    /// Fetch a comparison only if its project belongs to `owner`
    pub async fn get_owned(&self, owner: &Owner, id: &str) -> Result<Option<Comparison>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {COMPARISON_COLUMNS}
            FROM comparisons c
            JOIN projects p ON p.id = c.project_id
            LEFT JOIN explanations e ON e.comparison_id = c.id
            WHERE c.id = ? AND p.owner_id = ?
            "#
        ))
        .bind(id)
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    /// Project comparisons, newest first, each with its full result set
    pub async fn list_for_project(&self, project_id: &str) -> Result<Vec<Comparison>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {COMPARISON_COLUMNS}
            FROM comparisons c
            LEFT JOIN explanations e ON e.comparison_id = c.id
            WHERE c.project_id = ?
            ORDER BY c.created_at DESC, c.rowid DESC
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let mut comparisons = rows
            .into_iter()
            .map(row_to_comparison)
            .collect::<Result<Vec<_>>>()?;

        let result_rows = sqlx::query(&format!(
            r#"
            SELECT {RESULT_COLUMNS}
            FROM comparison_results r
            JOIN comparisons c ON c.id = r.comparison_id
            WHERE c.project_id = ?
            ORDER BY r.rowid
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_comparison: HashMap<String, Vec<ComparisonResult>> = HashMap::new();
        for row in result_rows {
            let result = row_to_result(row)?;
            by_comparison
                .entry(result.comparison_id.clone())
                .or_default()
                .push(result);
        }
        for comparison in &mut comparisons {
            comparison.results = by_comparison.remove(&comparison.id).unwrap_or_default();
        }

        Ok(comparisons)
    }

    pub async fn load_results(&self, comparison_id: &str) -> Result<Vec<ComparisonResult>> {
        let rows = sqlx::query(&format!(
            "SELECT {RESULT_COLUMNS} FROM comparison_results r WHERE r.comparison_id = ? ORDER BY r.rowid"
        ))
        .bind(comparison_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_result).collect()
    }

    /// Insert a comparison and its whole result set in one transaction.
    ///
    /// The `(from_analysis_id, to_analysis_id)` unique key decides races: when
    /// the insert is ignored, the transaction is abandoned and the row that
    /// won is returned as `Inserted::Existing`.
    pub async fn insert_with_results(
        &self,
        project_id: &str,
        from_analysis_id: &str,
        to_analysis_id: &str,
        results: &[ResultDraft],
    ) -> Result<Inserted> {
        let id = new_id();
        let now = now_naive();

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO comparisons (id, project_id, from_analysis_id, to_analysis_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (from_analysis_id, to_analysis_id) DO NOTHING
            "#,
        )
        .bind(&id)
        .bind(project_id)
        .bind(from_analysis_id)
        .bind(to_analysis_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            // Release the connection before reading the winner
            tx.rollback().await?;
            warn!(
                "Comparison {} -> {} was created concurrently, returning the stored one",
                from_analysis_id, to_analysis_id
            );
            return match self.find_by_pair(from_analysis_id, to_analysis_id).await? {
                Some(existing) => Ok(Inserted::Existing(existing)),
                None => Err(VersusError::Conflict(format!(
                    "comparison {from_analysis_id} -> {to_analysis_id} changed while being created"
                ))),
            };
        }

        let mut stored = Vec::with_capacity(results.len());
        for draft in results {
            let result_id = new_id();
            sqlx::query(
                r#"
                INSERT INTO comparison_results
                    (id, comparison_id, issue_code, change_type,
                     before_severity, before_complexity, after_severity, after_complexity)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&result_id)
            .bind(&id)
            .bind(draft.issue_code.as_str())
            .bind(draft.change_type.as_str())
            .bind(draft.before_severity.map(|s| s.as_str()))
            .bind(draft.before_complexity.map(|c| c.as_str()))
            .bind(draft.after_severity.map(|s| s.as_str()))
            .bind(draft.after_complexity.map(|c| c.as_str()))
            .execute(&mut *tx)
            .await?;

            stored.push(ComparisonResult {
                id: result_id,
                comparison_id: id.clone(),
                issue_code: draft.issue_code,
                change_type: draft.change_type,
                before_severity: draft.before_severity,
                before_complexity: draft.before_complexity,
                after_severity: draft.after_severity,
                after_complexity: draft.after_complexity,
            });
        }

        tx.commit().await?;
        info!(
            "Created comparison {} ({} -> {}, {} results)",
            id,
            from_analysis_id,
            to_analysis_id,
            stored.len()
        );

        Ok(Inserted::Created(Comparison {
            id,
            project_id: project_id.to_string(),
            from_analysis_id: from_analysis_id.to_string(),
            to_analysis_id: to_analysis_id.to_string(),
            created_at: to_utc(now),
            results: stored,
            explanation: None,
        }))
    }

    async fn hydrate(&self, row: Option<SqliteRow>) -> Result<Option<Comparison>> {
        match row {
            Some(row) => {
                let mut comparison = row_to_comparison(row)?;
                comparison.results = self.load_results(&comparison.id).await?;
                Ok(Some(comparison))
            }
            None => Ok(None),
        }
    }
}

fn row_to_comparison(row: SqliteRow) -> Result<Comparison> {
    let id: String = row.try_get("id")?;

    let explanation_id: Option<String> = row.try_get("explanation_id")?;
    let explanation = match explanation_id {
        Some(explanation_id) => Some(Explanation {
            id: explanation_id,
            comparison_id: id.clone(),
            explanation: row.try_get("explanation")?,
            created_at: to_utc(row.try_get::<NaiveDateTime, _>("explained_at")?),
        }),
        None => None,
    };

    Ok(Comparison {
        id,
        project_id: row.try_get("project_id")?,
        from_analysis_id: row.try_get("from_analysis_id")?,
        to_analysis_id: row.try_get("to_analysis_id")?,
        created_at: to_utc(row.try_get::<NaiveDateTime, _>("created_at")?),
        results: Vec::new(),
        explanation,
    })
}

fn row_to_result(row: SqliteRow) -> Result<ComparisonResult> {
    Ok(ComparisonResult {
        id: row.try_get("id")?,
        comparison_id: row.try_get("comparison_id")?,
        issue_code: parse_column("issue_code", row.try_get::<&str, _>("issue_code")?)?,
        change_type: parse_column("change_type", row.try_get::<&str, _>("change_type")?)?,
        before_severity: parse_optional_column("before_severity", row.try_get("before_severity")?)?,
        before_complexity: parse_optional_column(
            "before_complexity",
            row.try_get("before_complexity")?,
        )?,
        after_severity: parse_optional_column("after_severity", row.try_get("after_severity")?)?,
        after_complexity: parse_optional_column(
            "after_complexity",
            row.try_get("after_complexity")?,
        )?,
    })
}
