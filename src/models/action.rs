//! This module defines the notification action owned by a rule.

use url::Url;

/// The kind of notification an action delivers.
///
/// Only Discord webhooks are supported today; any other kind stored in the
/// database is carried through so the dispatch loop can skip it with a
/// warning instead of failing the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Deliver the alert as a Discord webhook POST.
    DiscordWebhook,
    /// Any kind this build does not know how to dispatch.
    Unsupported(String),
}

impl ActionKind {
    /// The stored representation of the Discord webhook kind.
    pub const DISCORD_WEBHOOK: &'static str = "DISCORD_WEBHOOK";

    /// Parses the stored kind string.
    pub fn parse(kind: &str) -> Self {
        match kind {
            Self::DISCORD_WEBHOOK => ActionKind::DiscordWebhook,
            other => ActionKind::Unsupported(other.to_string()),
        }
    }

    /// Returns the stored representation of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::DiscordWebhook => Self::DISCORD_WEBHOOK,
            ActionKind::Unsupported(kind) => kind,
        }
    }
}

/// The notification target bound to exactly one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// What kind of notification to deliver
    pub kind: ActionKind,
    /// Destination URL for the notification
    pub target_url: Url,
    /// Per-rule shared secret used to verify Svix-style webhook signatures.
    /// Absent for rules that only receive globally-signed events.
    pub webhook_secret: Option<String>,
}
