//! HTTP client for the draft service
//!
//! One request per call, no retry. Non-2xx answers surface as
//! [`ClientError::Api`] with the status and raw body.

use std::time::Duration;

use dsm_common::api::{
    DraftDetail, DraftListResponse, DraftSummary, MessageResponse, SaveDraftRequest,
    SaveDraftResponse, UpdateDraftRequest, USER_ID_HEADER,
};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Draft client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Service answered with a non-success status
    #[error("Draft service returned {0}: {1}")]
    Api(u16, String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(status, _) => Some(*status),
            _ => None,
        }
    }
}

/// Client for `/drafts/api`, acting as one user
#[derive(Debug, Clone)]
pub struct DraftClient {
    http_client: reqwest::Client,
    base_url: String,
    user_id: String,
}

impl DraftClient {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:5740`
    pub fn new(base_url: &str, user_id: &str) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/drafts/api{}", self.base_url, path)
    }

    /// Create a draft; returns the new id
    pub async fn save(&self, request: &SaveDraftRequest) -> Result<i64, ClientError> {
        let response: SaveDraftResponse = self
            .send(self.http_client.post(self.url("")).json(request))
            .await?;
        debug!(draft_id = response.draft_id, "Draft created");
        Ok(response.draft_id)
    }

    pub async fn fetch(&self, id: i64) -> Result<DraftDetail, ClientError> {
        self.send(self.http_client.get(self.url(&format!("/{}", id))))
            .await
    }

    /// The user's drafts, most recently updated first
    pub async fn list(&self) -> Result<Vec<DraftSummary>, ClientError> {
        let response: DraftListResponse = self.send(self.http_client.get(self.url(""))).await?;
        Ok(response.drafts)
    }

    pub async fn update(&self, id: i64, request: &UpdateDraftRequest) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .send(
                self.http_client
                    .put(self.url(&format!("/{}", id)))
                    .json(request),
            )
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .send(self.http_client.delete(self.url(&format!("/{}", id))))
            .await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request
            .header(USER_ID_HEADER, &self.user_id)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ClientError::Api(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
    }
}
