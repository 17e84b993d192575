// src/explain/store.rs

use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::types::Explanation;
use crate::db::{new_id, now_naive, to_utc};
use crate::error::{Result, VersusError};

#[derive(Clone)]
pub struct ExplanationStore {
    pub pool: SqlitePool,
}

impl ExplanationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_for_comparison(&self, comparison_id: &str) -> Result<Option<Explanation>> {
        let row = sqlx::query(
            r#"
            SELECT id, comparison_id, explanation, created_at
            FROM explanations
            WHERE comparison_id = ?
            "#,
        )
        .bind(comparison_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_explanation).transpose()
    }

    /// Store the explanation unless one already exists, and return whichever
    /// is stored afterwards. The boolean is true when this call inserted it.
    pub async fn insert_if_absent(
        &self,
        comparison_id: &str,
        text: &str,
    ) -> Result<(Explanation, bool)> {
        let result = sqlx::query(
            r#"
            INSERT INTO explanations (id, comparison_id, explanation, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (comparison_id) DO NOTHING
            "#,
        )
        .bind(new_id())
        .bind(comparison_id)
        .bind(text)
        .bind(now_naive())
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() > 0;
        let stored = self
            .get_for_comparison(comparison_id)
            .await?
            .ok_or_else(|| VersusError::not_found(format!("comparison {comparison_id}")))?;

        Ok((stored, created))
    }
}

fn row_to_explanation(row: SqliteRow) -> Result<Explanation> {
    Ok(Explanation {
        id: row.try_get("id")?,
        comparison_id: row.try_get("comparison_id")?,
        explanation: row.try_get("explanation")?,
        created_at: to_utc(row.try_get::<NaiveDateTime, _>("created_at")?),
    })
}
