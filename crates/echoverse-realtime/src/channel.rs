//! External interfaces consumed, never implemented, by this core.
//!
//! The push transport behind these traits is expected to handle its own
//! reconnection; this core imposes no timeouts and treats every call as
//! best-effort.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use crate::events::Alert;
use crate::models::{ChatMessage, FriendDto, NotificationRecord, UserId};

pub type MessageHandler = Arc<dyn Fn(&[ChatMessage]) + Send + Sync>;
pub type NotificationHandler = Arc<dyn Fn(&[NotificationRecord]) + Send + Sync>;
pub type FriendsFuture = Pin<Box<dyn Future<Output = Result<Vec<FriendDto>>> + Send>>;

/// Broadcasts the local user's online state to other clients.
/// Fire-and-forget: failures are not surfaced to the caller.
pub trait PresenceChannel: Send + Sync {
    fn set_online(&self, user_id: UserId);
    fn set_offline(&self, user_id: UserId);
    fn ping(&self, user_id: UserId);
}

/// Live message feed for one (self, peer) pair. The handler receives the
/// full ordered message list currently known for the pair, not a delta.
pub trait MessageChannel: Send + Sync {
    fn watch(&self, self_id: UserId, peer_id: &str, on_update: MessageHandler) -> Subscription;
}

/// Live notification feed for one user. The handler receives the full
/// current record list on every emission.
pub trait NotificationChannel: Send + Sync {
    fn watch(&self, user_id: UserId, on_update: NotificationHandler) -> Subscription;
}

/// One-shot friend-list fetch.
pub trait FriendsApi: Send + Sync {
    fn get_friends(&self, user_id: UserId) -> FriendsFuture;
}

/// Sink for transient alert bubbles.
pub trait AlertSink: Send + Sync {
    fn emit(&self, alert: Alert);
}

/// Handle for a live channel subscription.
///
/// `cancel` runs the underlying release closure at most once, however many
/// times it is called; dropping an un-cancelled handle cancels it.
pub struct Subscription {
    cancel: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// A handle with nothing to release, for inert channels and tests.
    pub fn noop() -> Self {
        Self {
            cancel: Mutex::new(None),
        }
    }

    pub fn cancel(&self) {
        if let Some(release) = self.cancel.lock().take() {
            release();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.lock().is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
