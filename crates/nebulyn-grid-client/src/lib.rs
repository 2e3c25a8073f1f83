// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client for the Nebulyn grid HTTP service.
//!
//! Failures are returned, never retried. HTTP status codes are mapped onto
//! the error classes callers act on: 404 is [`ClientError::NotFound`]; a
//! service without storage, or one that cannot be reached, is
//! [`ClientError::Unavailable`].

use nebulyn_app_core::remote::{
    ErrorBody, GridListing, SaveResponse, StoredGrid, LIST_PATH, LOAD_PATH, SAVE_PATH,
    STORAGE_NOT_AVAILABLE,
};
use nebulyn_grid::GridSnapshot;
use reqwest::{Response, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

/// Errors returned by [`RemoteGridClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// No grid with this id.
    #[error("grid not found: {0}")]
    NotFound(String),
    /// Service has no storage configured, or could not be reached.
    #[error("grid service unavailable: {0}")]
    Unavailable(String),
    /// Any other non-success response.
    #[error("grid service returned {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// `error` from the response body, or the raw body.
        message: String,
    },
    /// Transport or decoding failure.
    #[error("http error: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

/// Talks to one grid service instance.
#[derive(Debug, Clone)]
pub struct RemoteGridClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteGridClient {
    /// Client for the service mounted at `base_url` (e.g.
    /// `http://127.0.0.1:8788/api`). A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Client reusing an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Store `snapshot`; returns the assigned id in the response.
    pub async fn save(&self, snapshot: &GridSnapshot) -> Result<SaveResponse, ClientError> {
        let url = self.url(SAVE_PATH);
        debug!(%url, ports = snapshot.port_count(), "saving grid");
        let response = self.http.post(&url).json(snapshot).send().await?;
        let saved: SaveResponse = check(response, None).await?.json().await?;
        info!(id = %saved.grid_id, "grid saved remotely");
        Ok(saved)
    }

    /// Fetch a stored grid by id.
    pub async fn load(&self, id: &str) -> Result<StoredGrid, ClientError> {
        let url = self.url(&format!("{LOAD_PATH}/{id}"));
        debug!(%url, "loading grid");
        let response = self.http.get(&url).send().await?;
        Ok(check(response, Some(id)).await?.json().await?)
    }

    /// Every stored grid.
    pub async fn list(&self) -> Result<Vec<GridListing>, ClientError> {
        let url = self.url(LIST_PATH);
        let response = self.http.get(&url).send().await?;
        Ok(check(response, None).await?.json().await?)
    }
}

/// Pass successful responses through; turn the rest into a [`ClientError`].
async fn check(response: Response, id: Option<&str>) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text).map_or(text, |b| b.error);
    Err(match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(id.unwrap_or(&message).to_owned()),
        _ if message == STORAGE_NOT_AVAILABLE => ClientError::Unavailable(message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    })
}
