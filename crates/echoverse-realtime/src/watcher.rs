//! Per-peer message watchers.
//!
//! One live subscription per known peer. The first delivery for a peer is
//! the baseline snapshot: it seeds the cursor and announces nothing.
//! After that, every genuinely new inbound message authored by someone
//! else produces exactly one alert.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::channel::{AlertSink, MessageChannel, MessageHandler, Subscription};
use crate::events::{Alert, AlertMeta};
use crate::models::{ChatMessage, PeerDirectory, PeerSummary, UserId};

struct WatcherEntry {
    peer_id: String,
    peer_numeric_id: Option<UserId>,
    subscription: Subscription,
    last_seen_message_id: Option<String>,
    initialized: bool,
    unread_count: u32,
}

impl WatcherEntry {
    fn new(peer: &PeerSummary) -> Self {
        Self {
            peer_id: peer.id.clone(),
            peer_numeric_id: peer.numeric_id,
            subscription: Subscription::noop(),
            last_seen_message_id: None,
            initialized: false,
            unread_count: 0,
        }
    }
}

struct WatcherInner {
    self_id: UserId,
    sink: Arc<dyn AlertSink>,
    directory: RwLock<PeerDirectory>,
    entries: Mutex<HashMap<String, WatcherEntry>>,
}

/// Owns one watcher per peer and the peer directory they read display
/// metadata from. Cheap to clone; clones share the same state.
pub struct WatcherRegistry {
    inner: Arc<WatcherInner>,
    channel: Arc<dyn MessageChannel>,
}

impl Clone for WatcherRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            channel: Arc::clone(&self.channel),
        }
    }
}

impl WatcherRegistry {
    pub fn new(
        self_id: UserId,
        channel: Arc<dyn MessageChannel>,
        sink: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            inner: Arc::new(WatcherInner {
                self_id,
                sink,
                directory: RwLock::new(PeerDirectory::default()),
                entries: Mutex::new(HashMap::new()),
            }),
            channel,
        }
    }

    /// Replace the peer directory wholesale and reconcile the watcher set
    /// against the new roster.
    pub fn set_roster(&self, peers: Vec<PeerSummary>) {
        {
            let mut directory = self.inner.directory.write();
            directory.replace_all(peers.clone());
        }
        self.reconcile(&peers);
    }

    /// Diff the desired peer set against the live entries: subscribe
    /// additions, release removals. A peer with a live entry is never
    /// re-subscribed.
    pub fn reconcile(&self, desired: &[PeerSummary]) {
        let desired_ids: HashSet<&str> = desired
            .iter()
            .filter(|p| !p.id.is_empty())
            .map(|p| p.id.as_str())
            .collect();

        let removed: Vec<WatcherEntry> = {
            let mut entries = self.inner.entries.lock();
            let gone: Vec<String> = entries
                .keys()
                .filter(|id| !desired_ids.contains(id.as_str()))
                .cloned()
                .collect();
            gone.into_iter()
                .filter_map(|id| entries.remove(&id))
                .collect()
        };
        for entry in &removed {
            tracing::debug!(peer_id = %entry.peer_id, "watcher: peer left roster, releasing");
            entry.subscription.cancel();
        }

        for peer in desired {
            if peer.id.is_empty() {
                continue;
            }
            let inserted = {
                let mut entries = self.inner.entries.lock();
                if entries.contains_key(&peer.id) {
                    false
                } else {
                    entries.insert(peer.id.clone(), WatcherEntry::new(peer));
                    true
                }
            };
            if !inserted {
                continue;
            }
            // subscribe outside the entries lock: the channel may deliver
            // the baseline snapshot synchronously from within watch()
            let handler = self.handler_for(&peer.id);
            let subscription = self.channel.watch(self.inner.self_id, &peer.id, handler);
            let mut entries = self.inner.entries.lock();
            match entries.get_mut(&peer.id) {
                Some(entry) => entry.subscription = subscription,
                // torn down while subscribing: release immediately
                None => subscription.cancel(),
            }
        }
    }

    /// Release every live subscription exactly once and clear all entries.
    /// Idempotent; invoked on identity loss, channel not-ready, and
    /// unmount alike.
    pub fn teardown(&self) {
        let drained: Vec<WatcherEntry> = {
            let mut entries = self.inner.entries.lock();
            entries.drain().map(|(_, entry)| entry).collect()
        };
        for entry in &drained {
            entry.subscription.cancel();
        }
    }

    pub fn watched_peers(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn unread_count(&self, peer_id: &str) -> u32 {
        self.inner
            .entries
            .lock()
            .get(peer_id)
            .map(|e| e.unread_count)
            .unwrap_or(0)
    }

    fn handler_for(&self, peer_id: &str) -> MessageHandler {
        let inner = Arc::downgrade(&self.inner);
        let peer_id = peer_id.to_string();
        Arc::new(move |messages| {
            if let Some(inner) = inner.upgrade() {
                inner.on_messages(&peer_id, messages);
            }
        })
    }
}

impl WatcherInner {
    fn on_messages(&self, peer_id: &str, messages: &[ChatMessage]) {
        let Some(last) = messages.last() else {
            return;
        };
        let Some(last_id) = last.id.as_deref().filter(|id| !id.is_empty()) else {
            return;
        };

        let alert = {
            let mut entries = self.entries.lock();
            let Some(entry) = entries.get_mut(peer_id) else {
                return;
            };

            if !entry.initialized {
                // baseline snapshot: seed the cursor, announce nothing
                entry.initialized = true;
                entry.last_seen_message_id = Some(last_id.to_owned());
                return;
            }
            if entry.last_seen_message_id.as_deref() == Some(last_id) {
                return;
            }

            let foreign = last.sender_id.is_some() && last.sender_id != Some(self.self_id);
            entry.last_seen_message_id = Some(last_id.to_owned());
            if !foreign {
                return;
            }
            entry.unread_count += 1;

            // display metadata is resolved at emission time, so a stale
            // directory entry never blocks a live alert
            let directory = self.directory.read();
            Alert {
                from: directory.display_name(peer_id),
                message: last.display_body(),
                avatar: directory.avatar(peer_id),
                meta: AlertMeta {
                    peer_id: entry.peer_id.clone(),
                    peer_numeric_id: entry.peer_numeric_id,
                    unread_count: entry.unread_count,
                },
            }
        };
        self.sink.emit(alert);
    }
}
