//! Blocking client for the legacy memory REST API.
//!
//! # Responsibility
//! - Fetch memory lists and single memories for detail views.
//! - Trigger server-side illustration generation.
//!
//! # Invariants
//! - Non-2xx responses surface as `ApiError::Status` naming the operation.
//! - Requests are not retried.

use super::{ApiError, ApiOperation, ApiResult};
use crate::model::memory::MemoryDetail;
use log::{info, warn};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Response body of `POST /generate-images`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateImagesResponse {
    #[serde(default)]
    pub message: String,
}

/// REST API client.
#[derive(Debug, Clone)]
pub struct MemoryApiClient {
    base_url: String,
    http: Client,
}

impl MemoryApiClient {
    /// Creates a client for `base_url`; `timeout = None` waits indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ApiResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Transport {
                operation: ApiOperation::Connect,
                source: err,
            })?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /memories`: every memory, newest first as ordered by the server.
    pub fn list_memories(&self) -> ApiResult<Vec<MemoryDetail>> {
        let request = self.http.get(format!("{}/memories", self.base_url));
        self.send_json(ApiOperation::ListMemories, request)
    }

    /// `GET /memory/{id}`; a JSON `null` body means the memory does not exist.
    ///
    /// The endpoint returns the stored body without its key, so the requested
    /// id is filled in when the body carries none.
    pub fn get_memory(&self, id: &str) -> ApiResult<Option<MemoryDetail>> {
        let id = id.trim();
        if id.is_empty() || id.contains('/') {
            return Err(ApiError::InvalidId(id.to_string()));
        }
        let request = self.http.get(format!("{}/memory/{id}", self.base_url));
        let detail: Option<MemoryDetail> = self.send_json(ApiOperation::GetMemory, request)?;
        Ok(detail.map(|mut detail| {
            if detail.id.is_empty() {
                detail.id = id.to_string();
            }
            detail
        }))
    }

    /// `POST /generate-images`: asks the server to illustrate pending memories.
    pub fn generate_images(&self) -> ApiResult<GenerateImagesResponse> {
        let request = self.http.post(format!("{}/generate-images", self.base_url));
        self.send_json(ApiOperation::GenerateImages, request)
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        operation: ApiOperation,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let started_at = Instant::now();
        let response = request.send().map_err(|err| {
            warn!(
                "event=api_call module=api status=error operation={} error_code=transport duration_ms={}",
                operation.as_str(),
                started_at.elapsed().as_millis()
            );
            ApiError::Transport {
                operation,
                source: err,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "event=api_call module=api status=error operation={} http_status={} duration_ms={}",
                operation.as_str(),
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(ApiError::Status {
                operation,
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|err| ApiError::Transport {
            operation,
            source: err,
        })?;
        let decoded = serde_json::from_str::<T>(&body).map_err(|err| ApiError::Decode {
            operation,
            source: err,
        })?;
        info!(
            "event=api_call module=api status=ok operation={} duration_ms={}",
            operation.as_str(),
            started_at.elapsed().as_millis()
        );
        Ok(decoded)
    }
}
