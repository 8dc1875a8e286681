//! Process-wide realtime session.
//!
//! Owns the presence controller, the watcher registry, and the
//! notification feed, all gated on the same two signals: a resolved
//! identity and channel readiness. Whenever either flips, the session
//! tears down and (when possible) rebuilds from scratch, so subscriptions
//! never leak across identity changes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::channel::{
    AlertSink, FriendsApi, MessageChannel, NotificationChannel, NotificationHandler,
    PresenceChannel, Subscription,
};
use crate::config::RealtimeConfig;
use crate::error::RealtimeError;
use crate::models::{PeerSummary, UserId};
use crate::presence::{PresenceController, Visibility};
use crate::store::{build_feed_view, FeedView, NotificationFeed};
use crate::watcher::WatcherRegistry;

/// The external collaborators a session is wired to.
#[derive(Clone)]
pub struct RealtimeChannels {
    pub presence: Arc<dyn PresenceChannel>,
    pub messages: Arc<dyn MessageChannel>,
    pub notifications: Arc<dyn NotificationChannel>,
    pub friends: Arc<dyn FriendsApi>,
    pub alerts: Arc<dyn AlertSink>,
}

/// Capability token handed to in-flight async work. Invalidated on
/// teardown, so a result that arrives late is provably inert.
#[derive(Clone, Debug)]
pub struct SessionToken {
    active: Arc<AtomicBool>,
}

impl SessionToken {
    fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn invalidate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

struct ActiveState {
    user_id: UserId,
    token: SessionToken,
    presence: PresenceController,
    watchers: WatcherRegistry,
    notification_sub: Subscription,
}

pub struct RealtimeSession {
    config: RealtimeConfig,
    channels: RealtimeChannels,
    identity: Option<UserId>,
    channel_ready: bool,
    state: Option<ActiveState>,
    /// Outlives init/teardown cycles so a remounting view rehydrates from
    /// the cache tier instead of flashing empty. Cleared only when the
    /// identity itself changes.
    feed: Arc<Mutex<NotificationFeed>>,
    last_identity: Option<UserId>,
}

impl RealtimeSession {
    pub fn new(config: RealtimeConfig, channels: RealtimeChannels) -> Self {
        let feed = Arc::new(Mutex::new(NotificationFeed::new(config.page_size)));
        Self {
            config,
            channels,
            identity: None,
            channel_ready: false,
            state: None,
            feed,
            last_identity: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.state.as_ref().map(|s| s.user_id)
    }

    /// Identity resolution result. `None` tears the session down.
    pub fn set_identity(&mut self, user_id: Option<UserId>) {
        self.identity = user_id;
        self.sync_lifecycle();
    }

    /// Readiness of the underlying push channels. Flipping to not-ready
    /// releases every subscription; flipping back rebuilds from scratch.
    pub fn set_channel_ready(&mut self, ready: bool) {
        self.channel_ready = ready;
        self.sync_lifecycle();
    }

    /// Forwarded page-visibility signal.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        if let Some(state) = self.state.as_mut() {
            state.presence.set_visibility(visibility);
        }
    }

    /// Idempotent teardown: stops the heartbeat, releases every
    /// subscription, and invalidates the capability token. The feed (and
    /// its cache tier) survives for rehydration.
    pub fn teardown(&mut self) {
        if let Some(mut state) = self.state.take() {
            tracing::info!(user_id = state.user_id, "realtime session tearing down");
            state.token.invalidate();
            state.presence.shutdown();
            state.watchers.teardown();
            state.notification_sub.cancel();
        }
    }

    /// Fetch the friend list and reconcile the watcher set against it.
    /// The result is discarded if the session was torn down (or rebuilt
    /// for another identity) while the fetch was in flight.
    pub fn refresh_friends(&self) -> Result<tokio::task::JoinHandle<()>, RealtimeError> {
        let state = self.state.as_ref().ok_or(RealtimeError::NotStarted)?;
        let token = state.token.clone();
        let watchers = state.watchers.clone();
        let future = self.channels.friends.get_friends(state.user_id);
        let base_url = self.config.api_base_url.clone();
        Ok(tokio::spawn(async move {
            match future.await {
                Ok(friends) => {
                    if !token.is_active() {
                        tracing::debug!("friend list arrived after teardown, discarding");
                        return;
                    }
                    let peers: Vec<PeerSummary> = friends
                        .iter()
                        .map(|dto| PeerSummary::from_dto(dto, &base_url))
                        .collect();
                    tracing::debug!(count = peers.len(), "friend roster refreshed");
                    watchers.set_roster(peers);
                }
                Err(error) => {
                    tracing::warn!(%error, "friend list fetch failed");
                }
            }
        }))
    }

    pub fn watched_peers(&self) -> usize {
        self.state
            .as_ref()
            .map(|s| s.watchers.watched_peers())
            .unwrap_or(0)
    }

    // ===== Notification feed =====

    pub fn feed_view(&self, now: DateTime<Utc>) -> FeedView {
        build_feed_view(&self.feed.lock(), now)
    }

    pub fn mark_read(&self, id: &str) {
        self.feed.lock().mark_read(id);
    }

    pub fn show_more(&self) {
        self.feed.lock().show_more();
    }

    pub fn collapse(&self) {
        self.feed.lock().collapse();
    }

    // ===== Lifecycle =====

    fn sync_lifecycle(&mut self) {
        let desired = match (self.channel_ready, self.identity) {
            (true, Some(id)) => Some(id),
            _ => None,
        };
        let Some(user_id) = desired else {
            self.teardown();
            return;
        };
        if self.state.as_ref().is_some_and(|s| s.user_id == user_id) {
            return;
        }
        self.teardown();
        if self.last_identity != Some(user_id) {
            // one user's cached notifications must never rehydrate another's
            self.feed.lock().clear();
        }
        self.last_identity = Some(user_id);
        self.start(user_id);
    }

    fn start(&mut self, user_id: UserId) {
        tracing::info!(user_id, "realtime session starting");

        let mut presence = PresenceController::new(
            Arc::clone(&self.channels.presence),
            user_id,
            self.config.heartbeat_interval,
        );
        presence.start();

        let watchers = WatcherRegistry::new(
            user_id,
            Arc::clone(&self.channels.messages),
            Arc::clone(&self.channels.alerts),
        );

        let feed = Arc::clone(&self.feed);
        let handler: NotificationHandler = Arc::new(move |records| {
            feed.lock().replace(records.to_vec());
        });
        let notification_sub = self.channels.notifications.watch(user_id, handler);

        self.state = Some(ActiveState {
            user_id,
            token: SessionToken::new(),
            presence,
            watchers,
            notification_sub,
        });
    }
}

impl Drop for RealtimeSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
