use serde::Serialize;

use crate::models::UserId;

/// Payload for the transient alert bubble emitted when a watcher sees a
/// genuinely new inbound message. Consumed by an unrelated UI layer.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    /// Display name of the peer the message came from.
    pub from: String,
    /// Body text derived from the message content.
    pub message: String,
    pub avatar: Option<String>,
    pub meta: AlertMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertMeta {
    pub peer_id: String,
    pub peer_numeric_id: Option<UserId>,
    /// Running unread count for this peer since the watcher initialized.
    pub unread_count: u32,
}
