//! Request/response calls: room history, room directory, username
//! registration.
//!
//! Thin layer over [`reqwest`]: every method is a single request with no
//! internal retry. Retry and backoff policy, if any, belongs to the caller.

use parlor_core::Message;
use parlor_proto::{HistoryMessage, RoomInfo, UserInfo};
use serde_json::json;

use crate::{config::ServerConfig, error::ApiError};

/// HTTP client for one chat server deployment.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ServerConfig,
}

impl ApiClient {
    /// Create a client with default HTTP settings.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// Create a client reusing an existing [`reqwest::Client`], e.g. one
    /// carrying timeout or proxy settings.
    #[must_use]
    pub fn with_http(config: ServerConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    /// Endpoint configuration this client talks to.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Fetch the stored transcript for a room, sorted by timestamp.
    ///
    /// A failure here is never fatal to a session: callers proceed to the
    /// live stream and treat the result as "no history available yet".
    pub async fn room_history(&self, room_id: &str) -> Result<Vec<Message>, ApiError> {
        let body = self.get_text(&self.config.history_url(room_id)).await?;
        let records: Vec<HistoryMessage> = serde_json::from_str(&body)?;

        let mut messages: Vec<Message> = records
            .into_iter()
            .map(|r| Message::confirmed(r.id, r.sender, r.content, r.timestamp))
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    /// List the rooms known to the server.
    pub async fn rooms(&self) -> Result<Vec<RoomInfo>, ApiError> {
        let body = self.get_text(&self.config.rooms_url()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create a room.
    pub async fn create_room(&self, name: &str, created_by: &str) -> Result<RoomInfo, ApiError> {
        let response = self
            .http
            .post(self.config.rooms_url())
            .json(&json!({ "name": name, "created_by": created_by }))
            .send()
            .await?
            .error_for_status()?;
        Ok(serde_json::from_str(&response.text().await?)?)
    }

    /// Register a username with the server.
    pub async fn register_username(&self, username: &str) -> Result<UserInfo, ApiError> {
        let response = self
            .http
            .post(self.config.username_url())
            .json(&json!({ "username": username }))
            .send()
            .await?
            .error_for_status()?;
        Ok(serde_json::from_str(&response.text().await?)?)
    }

    async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
