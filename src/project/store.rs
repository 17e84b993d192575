// src/project/store.rs

use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::info;

use crate::db::{new_id, now_naive, to_utc};
use crate::error::Result;
use crate::identity::Owner;
use crate::project::types::{CodeVersion, Project};

const PROJECT_COLUMNS: &str = r#"
    p.id, p.owner_id, p.name, p.description, p.created_at,
    (SELECT COUNT(*) FROM code_versions v WHERE v.project_id = p.id) AS version_count
"#;

#[derive(Clone)]
pub struct ProjectStore {
    pub pool: SqlitePool,
}

impl ProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Project operations

    pub async fn create_project(
        &self,
        owner: &Owner,
        name: String,
        description: Option<String>,
    ) -> Result<Project> {
        let id = new_id();
        let now = now_naive();

        sqlx::query(
            r#"
            INSERT INTO projects (id, owner_id, name, description, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner.as_str())
        .bind(&name)
        .bind(&description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Project {
            id,
            owner_id: owner.as_str().to_string(),
            name,
            description,
            version_count: 0,
            created_at: to_utc(now),
        })
    }

    /// Fetch a project only if `owner` owns it
    pub async fn get_project(&self, owner: &Owner, id: &str) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = ? AND p.owner_id = ?"
        ))
        .bind(id)
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_project).transpose()
    }

    pub async fn list_projects(&self, owner: &Owner) -> Result<Vec<Project>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.owner_id = ? ORDER BY p.created_at DESC, p.rowid DESC"
        ))
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_project).collect()
    }

    pub async fn delete_project(&self, owner: &Owner, id: &str) -> Result<bool> {
        // CASCADE removes versions, analyses, comparisons and explanations
        let result = sqlx::query("DELETE FROM projects WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner.as_str())
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted project {}", id);
        }
        Ok(deleted)
    }

    // Version operations

    /// Fetch a version only if its project belongs to `owner`
    pub async fn get_version(&self, owner: &Owner, id: &str) -> Result<Option<CodeVersion>> {
        let row = sqlx::query(
            r#"
            SELECT v.id, v.project_id, v.version_label, v.uploaded_at
            FROM code_versions v
            JOIN projects p ON p.id = v.project_id
            WHERE v.id = ? AND p.owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_version).transpose()
    }

    pub async fn get_version_in_project(
        &self,
        project_id: &str,
        id: &str,
    ) -> Result<Option<CodeVersion>> {
        let row = sqlx::query(
            r#"
            SELECT id, project_id, version_label, uploaded_at
            FROM code_versions
            WHERE id = ? AND project_id = ?
            "#,
        )
        .bind(id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_version).transpose()
    }

    pub async fn list_versions(&self, project_id: &str) -> Result<Vec<CodeVersion>> {
        let rows = sqlx::query(
            r#"
            SELECT id, project_id, version_label, uploaded_at
            FROM code_versions
            WHERE project_id = ?
            ORDER BY uploaded_at DESC, rowid DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_version).collect()
    }

    pub async fn rename_version(
        &self,
        owner: &Owner,
        id: &str,
        version_label: &str,
    ) -> Result<Option<CodeVersion>> {
        let result = sqlx::query(
            r#"
            UPDATE code_versions
            SET version_label = ?
            WHERE id = ?
              AND project_id IN (SELECT id FROM projects WHERE owner_id = ?)
            "#,
        )
        .bind(version_label)
        .bind(id)
        .bind(owner.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_version(owner, id).await
    }

    pub async fn delete_version(&self, owner: &Owner, id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM code_versions
            WHERE id = ?
              AND project_id IN (SELECT id FROM projects WHERE owner_id = ?)
            "#,
        )
        .bind(id)
        .bind(owner.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Insert a version inside the caller's transaction, so it commits together
/// with its first analysis
pub(crate) async fn insert_version(
    tx: &mut Transaction<'_, Sqlite>,
    project_id: &str,
    version_label: Option<String>,
) -> Result<CodeVersion> {
    let id = new_id();
    let now = now_naive();

    sqlx::query(
        r#"
        INSERT INTO code_versions (id, project_id, version_label, uploaded_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(project_id)
    .bind(&version_label)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    Ok(CodeVersion {
        id,
        project_id: project_id.to_string(),
        version_label,
        uploaded_at: to_utc(now),
    })
}

fn row_to_project(row: SqliteRow) -> Result<Project> {
    Ok(Project {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        version_count: row.try_get("version_count")?,
        created_at: to_utc(row.try_get::<NaiveDateTime, _>("created_at")?),
    })
}

fn row_to_version(row: SqliteRow) -> Result<CodeVersion> {
    Ok(CodeVersion {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        version_label: row.try_get("version_label")?,
        uploaded_at: to_utc(row.try_get::<NaiveDateTime, _>("uploaded_at")?),
    })
}
