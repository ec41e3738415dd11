//! Draft API request/response types
//!
//! Shared by the draft service (dsm-drafts) and the page-side session
//! (dsm-session) so both ends agree on field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::FormData;

// ========================================
// Requests
// ========================================

/// Body of `POST /drafts/api`
///
/// # Examples
///
/// ```
/// use dsm_common::api::types::SaveDraftRequest;
/// use dsm_common::draft::FormData;
///
/// let request = SaveDraftRequest {
///     method_type: "hierarchy".to_string(),
///     current_route: "/hierarchy/matrix".to_string(),
///     form_data: FormData::default(),
///     title: None,
///     is_auto_save: true,
/// };
/// let json = serde_json::to_value(&request).unwrap();
/// assert_eq!(json["current_route"], "/hierarchy/matrix");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDraftRequest {
    pub method_type: String,
    pub current_route: String,
    pub form_data: FormData,
    #[serde(default)]
    pub title: Option<String>,
    /// Saved by the autosave timer rather than the user
    #[serde(default)]
    pub is_auto_save: bool,
}

/// Body of `PUT /drafts/api/{id}`; absent fields are left as stored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDraftRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<FormData>,
}

// ========================================
// Responses
// ========================================

/// 201 response to a save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDraftResponse {
    pub success: bool,
    pub message: String,
    pub draft_id: i64,
}

/// One row of the draft list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSummary {
    pub id: i64,
    pub title: String,
    pub method_type: String,
    pub current_route: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `GET /drafts/api`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftListResponse {
    pub drafts: Vec<DraftSummary>,
}

/// `GET /drafts/api/{id}`
///
/// `form_data` is returned exactly as it was stored; the service never
/// rewrites page documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftDetail {
    #[serde(flatten)]
    pub summary: DraftSummary,
    pub form_data: Value,
}

impl DraftDetail {
    /// Decode the stored page document
    pub fn form(&self) -> Result<FormData, serde_json::Error> {
        FormData::deserialize(&self.form_data)
    }
}

/// Success acknowledgement for update/delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Error body returned with every non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
