//! Shared in-memory channel fakes for unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::channel::{
    AlertSink, FriendsApi, FriendsFuture, MessageChannel, MessageHandler, NotificationChannel,
    NotificationHandler, PresenceChannel, Subscription,
};
use crate::events::Alert;
use crate::models::{ChatMessage, FriendDto, NotificationKind, NotificationRecord, PeerSummary, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceCall {
    Online(UserId),
    Offline(UserId),
    Ping(UserId),
}

/// Records every presence call in order.
#[derive(Default)]
pub struct RecordingPresenceChannel {
    calls: Mutex<Vec<PresenceCall>>,
}

impl RecordingPresenceChannel {
    pub fn calls(&self) -> Vec<PresenceCall> {
        self.calls.lock().clone()
    }

    pub fn count_online(&self) -> usize {
        self.count(|c| matches!(c, PresenceCall::Online(_)))
    }

    pub fn count_offline(&self) -> usize {
        self.count(|c| matches!(c, PresenceCall::Offline(_)))
    }

    pub fn count_pings(&self) -> usize {
        self.count(|c| matches!(c, PresenceCall::Ping(_)))
    }

    fn count(&self, predicate: impl Fn(&PresenceCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| predicate(c)).count()
    }
}

impl PresenceChannel for RecordingPresenceChannel {
    fn set_online(&self, user_id: UserId) {
        self.calls.lock().push(PresenceCall::Online(user_id));
    }

    fn set_offline(&self, user_id: UserId) {
        self.calls.lock().push(PresenceCall::Offline(user_id));
    }

    fn ping(&self, user_id: UserId) {
        self.calls.lock().push(PresenceCall::Ping(user_id));
    }
}

/// Scriptable message channel: tests push full message lists per peer.
#[derive(Default)]
pub struct FakeMessageChannel {
    handlers: Mutex<HashMap<String, MessageHandler>>,
    watch_count: Mutex<usize>,
    cancelled: Arc<Mutex<Vec<String>>>,
}

impl FakeMessageChannel {
    pub fn push(&self, peer_id: &str, messages: &[ChatMessage]) {
        let handler = self.handlers.lock().get(peer_id).cloned();
        if let Some(handler) = handler {
            handler(messages);
        }
    }

    pub fn watch_count(&self) -> usize {
        *self.watch_count.lock()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().clone()
    }
}

impl MessageChannel for FakeMessageChannel {
    fn watch(&self, _self_id: UserId, peer_id: &str, on_update: MessageHandler) -> Subscription {
        *self.watch_count.lock() += 1;
        self.handlers.lock().insert(peer_id.to_string(), on_update);
        let cancelled = Arc::clone(&self.cancelled);
        let peer_id = peer_id.to_string();
        Subscription::new(move || cancelled.lock().push(peer_id))
    }
}

/// Scriptable notification channel with a single live handler.
#[derive(Default)]
pub struct FakeNotificationChannel {
    handler: Mutex<Option<NotificationHandler>>,
    watch_count: Mutex<usize>,
    cancelled: Arc<Mutex<usize>>,
}

impl FakeNotificationChannel {
    pub fn push(&self, records: &[NotificationRecord]) {
        let handler = self.handler.lock().clone();
        if let Some(handler) = handler {
            handler(records);
        }
    }

    pub fn watch_count(&self) -> usize {
        *self.watch_count.lock()
    }

    pub fn cancel_count(&self) -> usize {
        *self.cancelled.lock()
    }
}

impl NotificationChannel for FakeNotificationChannel {
    fn watch(&self, _user_id: UserId, on_update: NotificationHandler) -> Subscription {
        *self.watch_count.lock() += 1;
        *self.handler.lock() = Some(on_update);
        let cancelled = Arc::clone(&self.cancelled);
        Subscription::new(move || *cancelled.lock() += 1)
    }
}

/// Friends API returning a scripted response, optionally gated so tests
/// can resolve the fetch after a teardown.
#[derive(Default)]
pub struct ScriptedFriendsApi {
    pub friends: Mutex<Vec<FriendDto>>,
    gate: Mutex<Option<Arc<tokio::sync::Notify>>>,
}

impl ScriptedFriendsApi {
    pub fn set_friends(&self, friends: Vec<FriendDto>) {
        *self.friends.lock() = friends;
    }

    /// Hold every subsequent fetch until the returned notify fires.
    pub fn gate(&self) -> Arc<tokio::sync::Notify> {
        let notify = Arc::new(tokio::sync::Notify::new());
        *self.gate.lock() = Some(Arc::clone(&notify));
        notify
    }
}

impl FriendsApi for ScriptedFriendsApi {
    fn get_friends(&self, _user_id: UserId) -> FriendsFuture {
        let friends = self.friends.lock().clone();
        let gate = self.gate.lock().clone();
        Box::pin(async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            Ok(friends)
        })
    }
}

#[derive(Default)]
pub struct RecordingAlertSink {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingAlertSink {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }
}

impl AlertSink for RecordingAlertSink {
    fn emit(&self, alert: Alert) {
        self.alerts.lock().push(alert);
    }
}

// ===== Fixture builders =====

pub fn msg(id: &str, sender_id: UserId) -> ChatMessage {
    ChatMessage {
        id: Some(id.to_string()),
        sender_id: Some(sender_id),
        content: Some(format!("message {id}")),
        ..Default::default()
    }
}

pub fn peer(id: &str, name: &str) -> PeerSummary {
    let username = if name.is_empty() {
        String::new()
    } else {
        format!("@{}", name.to_lowercase().replace(' ', "."))
    };
    PeerSummary {
        id: id.to_string(),
        numeric_id: id.parse().ok(),
        name: name.to_string(),
        username,
        avatar: None,
    }
}

pub fn notif(id: &str, kind: NotificationKind, created_at_secs: i64) -> NotificationRecord {
    NotificationRecord {
        id: id.to_string(),
        kind,
        created_at: Some(serde_json::json!(created_at_secs)),
        ..Default::default()
    }
}

pub fn friend(friend_id: UserId, name: &str) -> FriendDto {
    FriendDto {
        id: Some(friend_id + 1000),
        friend_id: Some(friend_id),
        friend_name: Some(name.to_string()),
        friend_email: Some(format!("{}@example.com", name.to_lowercase())),
        friend_avatar: None,
    }
}
