// src/analysis/store.rs

use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::info;

use super::types::{Analysis, AnalysisDraft};
use crate::db::{new_id, now_naive, parse_column, to_utc};
use crate::error::{Result, VersusError};
use crate::issues::Issue;
use crate::project::CodeVersion;
use crate::project::store::insert_version;

const ISSUE_COLUMNS: &str = r#"
    i.id, i.analysis_id, i.issue_code, i.severity, i.complexity, i.function_name,
    i.start_line, i.end_line, i.before_snippet, i.after_snippet
"#;

#[derive(Clone)]
pub struct AnalysisStore {
    pub pool: SqlitePool,
}

impl AnalysisStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a version's first analysis with all its issues, atomically
    pub async fn insert(
        &self,
        code_version_id: &str,
        draft: &AnalysisDraft,
        degraded: bool,
    ) -> Result<Analysis> {
        let mut tx = self.pool.begin().await?;
        let analysis = insert_in_tx(&mut tx, code_version_id, draft, degraded).await?;
        tx.commit().await?;
        Ok(analysis)
    }

    /// Create a version and its first analysis in one transaction; neither
    /// is visible without the other
    pub async fn insert_with_version(
        &self,
        project_id: &str,
        version_label: Option<String>,
        draft: &AnalysisDraft,
        degraded: bool,
    ) -> Result<(CodeVersion, Analysis)> {
        let mut tx = self.pool.begin().await?;
        let version = insert_version(&mut tx, project_id, version_label).await?;
        let analysis = insert_in_tx(&mut tx, &version.id, draft, degraded).await?;
        tx.commit().await?;
        Ok((version, analysis))
    }

    /// Swap a degraded analysis for a fresh one in a single transaction.
    /// Healthy analyses are immutable and are never replaced.
    pub async fn replace_degraded(
        &self,
        existing_id: &str,
        code_version_id: &str,
        draft: &AnalysisDraft,
        degraded: bool,
    ) -> Result<Analysis> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM analyses WHERE id = ? AND degraded = 1")
            .bind(existing_id)
            .execute(&mut *tx)
            .await?;
        if removed.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(VersusError::Conflict(format!(
                "version {code_version_id} already has an analysis"
            )));
        }

        let analysis = insert_in_tx(&mut tx, code_version_id, draft, degraded).await?;
        tx.commit().await?;
        info!("Replaced degraded analysis {} for version {}", existing_id, code_version_id);
        Ok(analysis)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Analysis>> {
        let row = sqlx::query(
            r#"
            SELECT id, code_version_id, summary, degraded, created_at
            FROM analyses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut analysis = row_to_analysis(row)?;
                analysis.issues = self.load_issues(&analysis.id).await?;
                Ok(Some(analysis))
            }
            None => Ok(None),
        }
    }

    pub async fn get_by_version(&self, code_version_id: &str) -> Result<Option<Analysis>> {
        let id: Option<String> =
            sqlx::query_scalar("SELECT id FROM analyses WHERE code_version_id = ?")
                .bind(code_version_id)
                .fetch_optional(&self.pool)
                .await?;

        match id {
            Some(id) => self.get(&id).await,
            None => Ok(None),
        }
    }

    /// Project that owns the analysis, through its code version
    pub async fn project_of(&self, analysis_id: &str) -> Result<Option<String>> {
        let project_id: Option<String> = sqlx::query_scalar(
            r#"
            SELECT v.project_id
            FROM analyses a
            JOIN code_versions v ON v.id = a.code_version_id
            WHERE a.id = ?
            "#,
        )
        .bind(analysis_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project_id)
    }

    /// All analyses of a project keyed by code version id
    pub async fn list_for_project(&self, project_id: &str) -> Result<HashMap<String, Analysis>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.code_version_id, a.summary, a.degraded, a.created_at
            FROM analyses a
            JOIN code_versions v ON v.id = a.code_version_id
            WHERE v.project_id = ?
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<String, Analysis> = rows
            .into_iter()
            .map(|row| row_to_analysis(row).map(|a| (a.id.clone(), a)))
            .collect::<Result<_>>()?;

        let issue_rows = sqlx::query(&format!(
            r#"
            SELECT {ISSUE_COLUMNS}
            FROM analysis_issues i
            JOIN analyses a ON a.id = i.analysis_id
            JOIN code_versions v ON v.id = a.code_version_id
            WHERE v.project_id = ?
            ORDER BY i.rowid
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        for row in issue_rows {
            let issue = row_to_issue(row)?;
            if let Some(analysis) = by_id.get_mut(&issue.analysis_id) {
                analysis.issues.push(issue);
            }
        }

        Ok(by_id
            .into_values()
            .map(|a| (a.code_version_id.clone(), a))
            .collect())
    }

    /// Issues in insertion order, which the reducer's tie-break relies on
    pub async fn load_issues(&self, analysis_id: &str) -> Result<Vec<Issue>> {
        let rows = sqlx::query(&format!(
            "SELECT {ISSUE_COLUMNS} FROM analysis_issues i WHERE i.analysis_id = ? ORDER BY i.rowid"
        ))
        .bind(analysis_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_issue).collect()
    }
}

async fn insert_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    code_version_id: &str,
    draft: &AnalysisDraft,
    degraded: bool,
) -> Result<Analysis> {
    let id = new_id();
    let now = now_naive();

    let inserted = sqlx::query(
        r#"
        INSERT INTO analyses (id, code_version_id, summary, degraded, created_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (code_version_id) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(code_version_id)
    .bind(&draft.summary)
    .bind(degraded)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    if inserted.rows_affected() == 0 {
        return Err(VersusError::Conflict(format!(
            "version {code_version_id} already has an analysis"
        )));
    }

    let mut issues = Vec::with_capacity(draft.issues.len());
    for issue in &draft.issues {
        let issue_id = new_id();
        sqlx::query(
            r#"
            INSERT INTO analysis_issues
                (id, analysis_id, issue_code, severity, complexity, function_name,
                 start_line, end_line, before_snippet, after_snippet)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&issue_id)
        .bind(&id)
        .bind(issue.issue_code.as_str())
        .bind(issue.severity.as_str())
        .bind(issue.complexity.as_str())
        .bind(&issue.function_name)
        .bind(issue.start_line.map(i64::from))
        .bind(issue.end_line.map(i64::from))
        .bind(&issue.before_snippet)
        .bind(&issue.after_snippet)
        .execute(&mut **tx)
        .await?;

        issues.push(Issue {
            id: issue_id,
            analysis_id: id.clone(),
            issue_code: issue.issue_code,
            severity: issue.severity,
            complexity: issue.complexity,
            function_name: issue.function_name.clone(),
            start_line: issue.start_line,
            end_line: issue.end_line,
            before_snippet: issue.before_snippet.clone(),
            after_snippet: issue.after_snippet.clone(),
        });
    }

    Ok(Analysis {
        id,
        code_version_id: code_version_id.to_string(),
        summary: draft.summary.clone(),
        degraded,
        created_at: to_utc(now),
        issues,
    })
}

fn row_to_analysis(row: SqliteRow) -> Result<Analysis> {
    Ok(Analysis {
        id: row.try_get("id")?,
        code_version_id: row.try_get("code_version_id")?,
        summary: row.try_get("summary")?,
        degraded: row.try_get("degraded")?,
        created_at: to_utc(row.try_get::<NaiveDateTime, _>("created_at")?),
        issues: Vec::new(),
    })
}

fn row_to_issue(row: SqliteRow) -> Result<Issue> {
    let line = |column: &str| -> Result<Option<u32>> {
        let value: Option<i64> = row.try_get(column)?;
        value
            .map(|v| {
                u32::try_from(v).map_err(|e| {
                    VersusError::Db(sqlx::Error::ColumnDecode {
                        index: column.to_string(),
                        source: Box::new(e),
                    })
                })
            })
            .transpose()
    };

    Ok(Issue {
        id: row.try_get("id")?,
        analysis_id: row.try_get("analysis_id")?,
        issue_code: parse_column("issue_code", row.try_get::<&str, _>("issue_code")?)?,
        severity: parse_column("severity", row.try_get::<&str, _>("severity")?)?,
        complexity: parse_column("complexity", row.try_get::<&str, _>("complexity")?)?,
        function_name: row.try_get("function_name")?,
        start_line: line("start_line")?,
        end_line: line("end_line")?,
        before_snippet: row.try_get("before_snippet")?,
        after_snippet: row.try_get("after_snippet")?,
    })
}
