//! Two-tier notification store.
//!
//! The `live` list mirrors the channel's last emission and may be empty
//! transiently while a view remounts; the `cache` keeps the last non-empty
//! list so readers rehydrate instead of flashing an empty state. Reads go
//! through [`NotificationFeed::records`], which picks the live tier when it
//! has data and the cache otherwise.

use std::collections::HashSet;

use crate::models::{NotificationKind, NotificationRecord};

pub struct NotificationFeed {
    live: Vec<NotificationRecord>,
    cache: Vec<NotificationRecord>,
    /// Ids marked read locally, ahead of (or independent of) server
    /// confirmation. Pruned against the effective record set on every
    /// replacement so it cannot grow without bound.
    locally_read: HashSet<String>,
    visible_count: usize,
    page_size: usize,
    /// Set on the first 0→nonzero total transition; the reveal to a full
    /// page happens only once per fresh load, not on every push.
    initialized: bool,
}

impl NotificationFeed {
    pub fn new(page_size: usize) -> Self {
        Self {
            live: Vec::new(),
            cache: Vec::new(),
            locally_read: HashSet::new(),
            visible_count: page_size,
            page_size,
            initialized: false,
        }
    }

    /// Effective record set: the live tier when non-empty, else the cache.
    pub fn records(&self) -> &[NotificationRecord] {
        if self.live.is_empty() {
            &self.cache
        } else {
            &self.live
        }
    }

    pub fn total(&self) -> usize {
        self.records().len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the raw list wholesale (last-write-wins). Chat-message
    /// notifications are dropped here, before storage, so they can never
    /// occupy the cache tier either.
    pub fn replace(&mut self, records: Vec<NotificationRecord>) {
        let previous_total = self.total();
        let filtered: Vec<NotificationRecord> = records
            .into_iter()
            .filter(|r| r.kind != NotificationKind::Message)
            .collect();
        if !filtered.is_empty() {
            self.cache = filtered.clone();
        }
        self.live = filtered;
        self.prune_overlay();
        self.adjust_window(previous_total);
    }

    /// Mark a record read locally. Never forwarded to the server by this
    /// store.
    pub fn mark_read(&mut self, id: &str) {
        self.locally_read.insert(id.to_string());
    }

    /// Effective read state: the local overlay wins over the server flag.
    pub fn is_read(&self, record: &NotificationRecord) -> bool {
        record.read || self.locally_read.contains(&record.id)
    }

    pub fn unread_count(&self) -> usize {
        self.records()
            .iter()
            .filter(|r| !(r.read || self.locally_read.contains(&r.id)))
            .count()
    }

    pub fn show_more(&mut self) {
        let total = self.total();
        self.visible_count = (self.visible_count + self.page_size).min(total.max(self.page_size));
    }

    pub fn collapse(&mut self) {
        self.visible_count = self.page_size;
    }

    /// Reset to a fresh feed. Used when the identity changes: one user's
    /// cached notifications must never rehydrate another's view.
    pub fn clear(&mut self) {
        self.live.clear();
        self.cache.clear();
        self.locally_read.clear();
        self.visible_count = self.page_size;
        self.initialized = false;
    }

    fn prune_overlay(&mut self) {
        let present: HashSet<String> = self.records().iter().map(|r| r.id.clone()).collect();
        self.locally_read.retain(|id| present.contains(id));
    }

    fn adjust_window(&mut self, previous_total: usize) {
        let total = self.total();
        if !self.initialized && total > 0 {
            self.visible_count = self.page_size;
            self.initialized = true;
        }
        // only genuine shrinkage clamps the window; growth past the window
        // waits for an explicit "show more"
        if total < previous_total && total < self.visible_count {
            self.visible_count = self.page_size.min(total);
        }
    }
}
