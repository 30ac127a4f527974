//! Reqwest-backed `MatchNotifier`.
//!
//! Posts the guild id as a form field to the bot's webhook once a round has
//! been recorded. Only transport and status mapping live here; whether a
//! failure matters is decided by the run service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::domain::GuildId;
use crate::domain::ports::{MatchNotifier, MatchNotifierError};

const USER_AGENT: &str = concat!("guild-matcher/", env!("CARGO_PKG_VERSION"));

/// Notifier that POSTs `id=<guild>` to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpMatchNotifier {
    client: Client,
    endpoint: Url,
}

impl HttpMatchNotifier {
    /// Build a notifier whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl MatchNotifier for HttpMatchNotifier {
    async fn notify_completed(&self, guild_id: &GuildId) -> Result<u16, MatchNotifierError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("id", guild_id.as_ref())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(status = status.as_u16(), endpoint = %self.endpoint, "notification accepted");
        Ok(status.as_u16())
    }
}

fn map_transport_error(error: reqwest::Error) -> MatchNotifierError {
    if error.is_timeout() {
        MatchNotifierError::timeout(error.to_string())
    } else {
        MatchNotifierError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MatchNotifierError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    } else {
        preview
    };
    MatchNotifierError::rejected(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{preview}...")
    } else {
        compact
    }
}
