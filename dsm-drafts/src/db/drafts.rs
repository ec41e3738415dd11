//! Draft table queries
//!
//! Every query is scoped by `user_id`: a draft that belongs to another
//! user behaves exactly like one that does not exist.

use chrono::{DateTime, Utc};
use dsm_common::api::DraftSummary;
use dsm_common::Result;
use sqlx::SqlitePool;

/// Stored draft
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DraftRow {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub method_type: String,
    pub current_route: String,
    /// Page document as JSON text, stored verbatim
    pub form_data: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DraftRow {
    pub fn summary(&self) -> DraftSummary {
        DraftSummary {
            id: self.id,
            title: self.title.clone(),
            method_type: self.method_type.clone(),
            current_route: self.current_route.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Fields for a new draft
#[derive(Debug, Clone)]
pub struct NewDraft<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub method_type: &'a str,
    pub current_route: &'a str,
    pub form_data: &'a str,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct DraftChanges {
    pub title: Option<String>,
    pub current_route: Option<String>,
    pub form_data: Option<String>,
}

/// Insert a draft and return its id
pub async fn insert_draft(pool: &SqlitePool, draft: &NewDraft<'_>) -> Result<i64> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO drafts (user_id, title, method_type, current_route, form_data, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(draft.user_id)
    .bind(draft.title)
    .bind(draft.method_type)
    .bind(draft.current_route)
    .bind(draft.form_data)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All drafts of a user, most recently updated first
pub async fn list_drafts(pool: &SqlitePool, user_id: &str) -> Result<Vec<DraftRow>> {
    let rows = sqlx::query_as::<_, DraftRow>(
        "SELECT * FROM drafts WHERE user_id = ? ORDER BY updated_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_draft(pool: &SqlitePool, user_id: &str, id: i64) -> Result<Option<DraftRow>> {
    let row = sqlx::query_as::<_, DraftRow>("SELECT * FROM drafts WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Apply `changes` and bump `updated_at`. Returns false when no such draft.
pub async fn update_draft(
    pool: &SqlitePool,
    user_id: &str,
    id: i64,
    changes: &DraftChanges,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE drafts SET
            title = COALESCE(?, title),
            current_route = COALESCE(?, current_route),
            form_data = COALESCE(?, form_data),
            updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(changes.title.as_deref())
    .bind(changes.current_route.as_deref())
    .bind(changes.form_data.as_deref())
    .bind(Utc::now())
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns false when no such draft
pub async fn delete_draft(pool: &SqlitePool, user_id: &str, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM drafts WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
