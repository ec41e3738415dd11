//! Draft CRUD endpoints
//!
//! Bodies are taken as raw JSON so the page document is stored exactly
//! as the page sent it. Matrices are inspected, never repaired.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use dsm_common::api::{
    DraftDetail, DraftListResponse, MessageResponse, SaveDraftResponse,
};
use dsm_common::{method::generate_draft_title, rows_are_reciprocal};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::ApiError;
use super::user::UserId;
use crate::db::{self, DraftChanges, DraftRow, NewDraft};
use crate::AppState;

const REQUIRED_FIELDS: [&str; 3] = ["method_type", "current_route", "form_data"];

const SAVE_FAILED: &str = "Помилка збереження чернетки";
const LIST_FAILED: &str = "Помилка отримання чернеток";
const FETCH_FAILED: &str = "Помилка отримання чернетки";
const UPDATE_FAILED: &str = "Помилка оновлення чернетки";
const DELETE_FAILED: &str = "Помилка видалення чернетки";

/// POST /drafts/api
pub async fn save_draft(
    State(state): State<AppState>,
    user: UserId,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SaveDraftResponse>), ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    for field in REQUIRED_FIELDS {
        if body.get(field).is_none() {
            return Err(ApiError::BadRequest(format!(
                "Missing required field: {}",
                field
            )));
        }
    }

    let method_type = text_field(&body, "method_type")?;
    let current_route = text_field(&body, "current_route")?;
    let form_data = &body["form_data"];
    let is_auto_save = body
        .get("is_auto_save")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let title = match body.get("title").and_then(Value::as_str) {
        Some(title) if !title.trim().is_empty() => title.to_string(),
        _ => generate_draft_title(method_type, &Local::now()),
    };

    warn_inconsistent_matrices(form_data, &user.0);

    let id = db::insert_draft(
        &state.db,
        &NewDraft {
            user_id: &user.0,
            title: &title,
            method_type,
            current_route,
            form_data: &form_data.to_string(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(SAVE_FAILED, e))?;

    info!(
        draft_id = id,
        user = %user.0,
        method = method_type,
        auto = is_auto_save,
        "Draft saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(SaveDraftResponse {
            success: true,
            message: "Чернетку збережено".to_string(),
            draft_id: id,
        }),
    ))
}

/// GET /drafts/api
pub async fn list_drafts(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<DraftListResponse>, ApiError> {
    let rows = db::list_drafts(&state.db, &user.0)
        .await
        .map_err(|e| ApiError::internal(LIST_FAILED, e))?;

    debug!(user = %user.0, count = rows.len(), "Listed drafts");

    Ok(Json(DraftListResponse {
        drafts: rows.iter().map(DraftRow::summary).collect(),
    }))
}

/// GET /drafts/api/:id
pub async fn get_draft(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<i64>,
) -> Result<Json<DraftDetail>, ApiError> {
    let row = db::get_draft(&state.db, &user.0, id)
        .await
        .map_err(|e| ApiError::internal(FETCH_FAILED, e))?
        .ok_or(ApiError::NotFound)?;

    let form_data = serde_json::from_str(&row.form_data).map_err(|e| {
        ApiError::internal(FETCH_FAILED, dsm_common::Error::Serialization(e))
    })?;

    Ok(Json(DraftDetail {
        summary: row.summary(),
        form_data,
    }))
}

/// PUT /drafts/api/:id
pub async fn update_draft(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<i64>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let form_data = body.get("form_data").filter(|v| !v.is_null());
    if let Some(form_data) = form_data {
        warn_inconsistent_matrices(form_data, &user.0);
    }

    let changes = DraftChanges {
        title: body.get("title").and_then(Value::as_str).map(str::to_string),
        current_route: body
            .get("current_route")
            .and_then(Value::as_str)
            .map(str::to_string),
        form_data: form_data.map(Value::to_string),
    };

    let updated = db::update_draft(&state.db, &user.0, id, &changes)
        .await
        .map_err(|e| ApiError::internal(UPDATE_FAILED, e))?;
    if !updated {
        return Err(ApiError::NotFound);
    }

    info!(draft_id = id, user = %user.0, "Draft updated");

    Ok(Json(MessageResponse {
        success: true,
        message: "Чернетку оновлено".to_string(),
    }))
}

/// DELETE /drafts/api/:id
pub async fn delete_draft(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = db::delete_draft(&state.db, &user.0, id)
        .await
        .map_err(|e| ApiError::internal(DELETE_FAILED, e))?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!(draft_id = id, user = %user.0, "Draft deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "Чернетку видалено".to_string(),
    }))
}

fn text_field<'a>(body: &'a Value, field: &str) -> Result<&'a str, ApiError> {
    body[field]
        .as_str()
        .ok_or_else(|| ApiError::BadRequest(format!("Field {} must be a string", field)))
}

/// Log, but keep, pairwise matrices that break reciprocity
fn warn_inconsistent_matrices(form_data: &Value, user: &str) {
    let Some(matrices) = form_data.get("matrices") else {
        return;
    };

    if let Some(criteria) = matrices.get("criteria").and_then(as_grid) {
        if !rows_are_reciprocal(&criteria) {
            warn!(user, "Stored criteria matrix is not reciprocal");
        }
    }

    if let Some(alternatives) = matrices.get("alternatives").and_then(Value::as_object) {
        for (criterion, grid) in alternatives {
            if let Some(grid) = as_grid(grid) {
                if !rows_are_reciprocal(&grid) {
                    warn!(user, criterion = %criterion, "Stored alternatives matrix is not reciprocal");
                }
            }
        }
    }
}

/// Rows of strings, or None when the value is not shaped like a grid
fn as_grid(value: &Value) -> Option<Vec<Vec<String>>> {
    value
        .as_array()?
        .iter()
        .map(|row| {
            row.as_array()?
                .iter()
                .map(|cell| cell.as_str().map(str::to_string))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_grid_accepts_string_rows() {
        let grid = as_grid(&json!([["1", "3"], ["1/3", "1"]])).unwrap();
        assert_eq!(grid[1][0], "1/3");
        assert!(rows_are_reciprocal(&grid));
    }

    #[test]
    fn test_as_grid_rejects_other_shapes() {
        assert!(as_grid(&json!("1")).is_none());
        assert!(as_grid(&json!([[1, 2]])).is_none());
        assert!(as_grid(&json!([["1"], "x"])).is_none());
    }
}
