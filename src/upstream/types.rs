//! Slack API payloads and error definitions.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Team metadata shown on the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Workspace subdomain (e.g. "rust-lang" for rust-lang.slack.com).
    pub domain: String,
    /// Display name, empty if upstream omits it.
    pub name: String,
    /// 132px team icon.
    pub icon_url: String,
}

/// Presence as reported by `users.list?presence=1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    Active,
    Away,
    #[default]
    Unknown,
}

impl Presence {
    fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("active") => Presence::Active,
            Some("away") => Presence::Away,
            _ => Presence::Unknown,
        }
    }
}

/// A raw member record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub is_bot: bool,
    pub deleted: bool,
    pub presence: Presence,
}

impl Member {
    /// A member that counts towards the workspace size.
    pub fn is_human(&self) -> bool {
        !self.is_bot && !self.deleted
    }

    pub fn is_active(&self) -> bool {
        self.presence == Presence::Active
    }
}

/// Errors from the two read calls.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS or body read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The call did not finish within its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-2xx HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Payload carried `ok: false`.
    #[error("upstream reported failure: {0}")]
    Api(String),

    /// Payload could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Errors from `users.admin.invite`.
#[derive(Debug, Error)]
pub enum InviteError {
    /// Upstream refused the invite; the message is safe to show to the visitor.
    #[error("{0}")]
    Rejected(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl InviteError {
    /// Translate a Slack error code into a message for the visitor.
    pub fn from_code(code: &str) -> Self {
        let msg = match code {
            "already_invited" => "You have already been invited. Check your email!",
            "already_in_team" => "You are already a member of this team.",
            "invalid_email" => "That email address is not valid.",
            "invite_limit_reached" => "The invite limit was reached, try again later.",
            "ratelimited" => "Too many invites right now, try again later.",
            "channel_not_found" | "invalid_channel" => "That channel does not exist.",
            "not_allowed_token_type" | "invalid_auth" | "not_authed" | "missing_scope" => {
                "The server is not allowed to send invites."
            }
            other => return InviteError::Rejected(format!("Slack error: {}", other)),
        };
        InviteError::Rejected(msg.to_string())
    }
}

// Wire formats. Every field beyond `ok` is optional so that a failure payload
// still deserialises and the flag can be checked first.

#[derive(Debug, Deserialize)]
pub(crate) struct TeamInfoResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub team: Option<WireTeam>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTeam {
    pub domain: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<WireIcon>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireIcon {
    #[serde(default)]
    pub image_132: Option<String>,
}

impl From<WireTeam> for Team {
    fn from(wire: WireTeam) -> Self {
        Team {
            domain: wire.domain,
            name: wire.name.unwrap_or_default(),
            icon_url: wire.icon.and_then(|i| i.image_132).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersListResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub members: Option<Vec<WireMember>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMember {
    pub id: String,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub presence: Option<String>,
}

impl From<WireMember> for Member {
    fn from(wire: WireMember) -> Self {
        Member {
            presence: Presence::from_wire(wire.presence.as_deref()),
            id: wire.id,
            is_bot: wire.is_bot,
            deleted: wire.deleted,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct InviteResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl TeamInfoResponse {
    pub fn into_team(self) -> Result<Team, FetchError> {
        if !self.ok {
            return Err(FetchError::Api(
                self.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }
        self.team
            .map(Team::from)
            .ok_or_else(|| FetchError::Malformed("missing `team` object".to_string()))
    }
}

impl UsersListResponse {
    pub fn into_members(self) -> Result<Vec<Member>, FetchError> {
        if !self.ok {
            return Err(FetchError::Api(
                self.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }
        self.members
            .map(|m| m.into_iter().map(Member::from).collect())
            .ok_or_else(|| FetchError::Malformed("missing `members` array".to_string()))
    }
}

impl InviteResponse {
    pub fn into_result(self) -> Result<(), InviteError> {
        if self.ok {
            Ok(())
        } else {
            Err(InviteError::from_code(
                self.error.as_deref().unwrap_or("unknown_error"),
            ))
        }
    }
}
