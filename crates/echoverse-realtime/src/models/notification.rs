use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::UserId;

/// Kinds of notification records delivered by the notification channel.
///
/// `Message` marks per-message chat notifications: those surface as
/// transient alert bubbles through the watcher registry and are filtered
/// out of the aggregated feed entirely. Unknown wire values map to
/// `Other` so a new server-side kind never breaks deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    FriendRequest,
    FriendRequestAccepted,
    Invite,
    InviteAccepted,
    InviteRejected,
    Share,
    Message,
    #[serde(other)]
    Other,
}

impl Default for NotificationKind {
    fn default() -> Self {
        Self::Other
    }
}

/// What interacting with a notification means at the UI boundary.
/// Presentational metadata, not control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// A button that resolves the request (accept / decline).
    Actionable,
    /// A static outcome badge; nothing left to do.
    StatusBadge,
    /// A button that navigates to the referenced content.
    Navigational,
    None,
}

/// A notification as delivered by the notification channel. Immutable from
/// the client's perspective except for `read`, which the server may set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub body: Option<String>,
    pub sender_id: Option<UserId>,
    pub sender_name: Option<String>,
    pub sender_avatar: Option<String>,
    /// Raw wire timestamp: epoch seconds, epoch milliseconds, a numeric
    /// string, or an RFC 3339 string. See [`parse_timestamp`].
    pub created_at: Option<Value>,
    pub read: bool,
    pub metadata: Option<Value>,
}

impl NotificationRecord {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_ref().and_then(parse_timestamp)
    }

    /// Timestamp used for ordering and bucketing. Malformed or missing
    /// values are coerced to `now`, never excluded.
    pub fn resolved_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.timestamp().unwrap_or(now)
    }

    pub fn action(&self) -> NotificationAction {
        match self.kind {
            NotificationKind::FriendRequest => NotificationAction::Actionable,
            NotificationKind::FriendRequestAccepted
            | NotificationKind::InviteAccepted
            | NotificationKind::InviteRejected => NotificationAction::StatusBadge,
            NotificationKind::Invite | NotificationKind::Share => NotificationAction::Navigational,
            NotificationKind::Message | NotificationKind::Other => NotificationAction::None,
        }
    }

    fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key)?.as_str()
    }

    /// One-line description shown next to the sender name.
    pub fn description(&self) -> String {
        match self.kind {
            NotificationKind::FriendRequest => "sent you a friend request".to_string(),
            NotificationKind::FriendRequestAccepted => {
                "accepted your friend request".to_string()
            }
            NotificationKind::Invite => {
                let name = self.meta_str("playlistName").unwrap_or("a playlist");
                format!("invited you to collaborate on \"{name}\"")
            }
            NotificationKind::InviteAccepted => {
                let name = self.meta_str("playlistName").unwrap_or("a playlist");
                format!("accepted the collaboration invite on \"{name}\"")
            }
            NotificationKind::InviteRejected => {
                let name = self.meta_str("playlistName").unwrap_or("a playlist");
                format!("declined the collaboration invite on \"{name}\"")
            }
            NotificationKind::Share => {
                let title = self
                    .meta_str("playlistName")
                    .or_else(|| self.meta_str("songName"))
                    .or_else(|| self.meta_str("albumName"))
                    .or(self.title.as_deref())
                    .filter(|t| !t.is_empty())
                    .unwrap_or("a shared item");
                format!("shared \"{title}\"")
            }
            NotificationKind::Message | NotificationKind::Other => {
                let fallback = self
                    .body
                    .as_deref()
                    .or(self.title.as_deref())
                    .map(str::trim)
                    .filter(|t| !t.is_empty());
                fallback.unwrap_or("sent a notification").to_string()
            }
        }
    }
}

/// Parse the tolerant wire timestamp format. Numeric values below 1e12 are
/// epoch seconds, larger ones epoch milliseconds; numeric strings get the
/// same treatment; other strings are tried as RFC 3339.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => from_epoch(n.as_f64()?),
        Value::String(s) => {
            if let Ok(n) = s.parse::<f64>() {
                if n > 0.0 {
                    return from_epoch(n);
                }
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        _ => None,
    }
}

fn from_epoch(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() || n <= 0.0 {
        return None;
    }
    let millis = if n < 1e12 { n * 1000.0 } else { n };
    Utc.timestamp_millis_opt(millis as i64).single()
}
