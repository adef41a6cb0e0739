//! Slack Web API client.
//!
//! # Responsibilities
//! - Fetch team metadata (`team.info`)
//! - Fetch the member list with presence (`users.list?presence=1`)
//! - Submit invites (`users.admin.invite`)
//! - Check the `ok` flag before trusting any payload
//!
//! # Design Decisions
//! - One outbound call per operation, no retries here
//! - Every call carries the client-level timeout
//! - The token never appears in logs

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::SlackConfig;
use crate::upstream::types::{
    FetchError, InviteError, InviteResponse, Member, Team, TeamInfoResponse, UsersListResponse,
};

/// Operations the rest of the service needs from Slack.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// Fetch team metadata.
    async fn fetch_team(&self) -> Result<Team, FetchError>;

    /// Fetch every member of the workspace, including bots and deleted users.
    async fn fetch_members(&self) -> Result<Vec<Member>, FetchError>;

    /// Send an invite email. `channels` is a comma-separated channel list.
    async fn invite(&self, email: &str, channels: Option<&str>) -> Result<(), InviteError>;
}

/// HTTP implementation of [`SlackApi`].
#[derive(Clone)]
pub struct HttpSlackClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
    timeout: Duration,
}

impl HttpSlackClient {
    /// Build a client from the Slack section of the configuration.
    pub fn new(config: &SlackConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("slackin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            timeout,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        method: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let mut query = vec![("token", self.token.expose_secret())];
        query.extend_from_slice(extra);

        let response = self
            .http
            .get(self.endpoint(method))
            .query(&query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(method = method, status = %status, "Slack API returned error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err)
        }
    }
}

#[async_trait]
impl SlackApi for HttpSlackClient {
    async fn fetch_team(&self) -> Result<Team, FetchError> {
        let response: TeamInfoResponse = self.get_json("team.info", &[]).await?;
        response.into_team()
    }

    async fn fetch_members(&self) -> Result<Vec<Member>, FetchError> {
        let response: UsersListResponse = self.get_json("users.list", &[("presence", "1")]).await?;
        response.into_members()
    }

    async fn invite(&self, email: &str, channels: Option<&str>) -> Result<(), InviteError> {
        let mut form = vec![("token", self.token.expose_secret()), ("email", email)];
        if let Some(channels) = channels {
            form.push(("channels", channels));
        }

        let response = self
            .http
            .post(self.endpoint("users.admin.invite"))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(InviteError::from_code("ratelimited"));
        }
        if !status.is_success() {
            return Err(InviteError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: InviteResponse =
            serde_json::from_slice(&body).map_err(|e| InviteError::Malformed(e.to_string()))?;
        parsed.into_result()
    }
}

impl std::fmt::Debug for HttpSlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSlackClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
