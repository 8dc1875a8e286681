//! Online/offline lifecycle for the local user.
//!
//! Page visibility is the decisive trust signal: a hidden tab emits no
//! heartbeat and is pushed offline eagerly; a visible tab is online and
//! heartbeats. Channel calls are best-effort and never retried.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

use crate::channel::PresenceChannel;
use crate::models::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresencePhase {
    Offline,
    Active,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Owns the heartbeat timer and the presence channel's view of "am I
/// online". At most one heartbeat task is ever armed; arming a new one
/// always cancels the previous one first.
pub struct PresenceController {
    channel: Arc<dyn PresenceChannel>,
    user_id: UserId,
    heartbeat_interval: Duration,
    phase: PresencePhase,
    visible: Arc<AtomicBool>,
    heartbeat_cancel: Option<watch::Sender<bool>>,
}

impl PresenceController {
    pub fn new(
        channel: Arc<dyn PresenceChannel>,
        user_id: UserId,
        heartbeat_interval: Duration,
    ) -> Self {
        Self {
            channel,
            user_id,
            heartbeat_interval,
            phase: PresencePhase::Offline,
            visible: Arc::new(AtomicBool::new(true)),
            heartbeat_cancel: None,
        }
    }

    pub fn phase(&self) -> PresencePhase {
        self.phase
    }

    /// Entry transition: announce online and arm the heartbeat.
    /// Requires a running tokio runtime.
    pub fn start(&mut self) {
        if self.phase != PresencePhase::Offline {
            return;
        }
        tracing::debug!(user_id = self.user_id, "presence: going online");
        self.channel.set_online(self.user_id);
        self.arm_heartbeat();
        self.phase = PresencePhase::Active;
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => {
                self.visible.store(false, Ordering::SeqCst);
                if self.phase == PresencePhase::Active {
                    tracing::debug!(user_id = self.user_id, "presence: tab hidden, going offline");
                    self.cancel_heartbeat();
                    self.channel.set_offline(self.user_id);
                    self.phase = PresencePhase::Hidden;
                }
            }
            Visibility::Visible => {
                self.visible.store(true, Ordering::SeqCst);
                if self.phase == PresencePhase::Hidden {
                    tracing::debug!(user_id = self.user_id, "presence: tab visible, going online");
                    self.channel.set_online(self.user_id);
                    self.arm_heartbeat();
                    // one immediate ping rather than waiting a full interval
                    self.channel.ping(self.user_id);
                    self.phase = PresencePhase::Active;
                }
            }
        }
    }

    /// Terminal transition: cancel the timer if armed, push offline.
    /// Idempotent and safe on a controller that never started.
    pub fn shutdown(&mut self) {
        if self.phase == PresencePhase::Offline {
            return;
        }
        tracing::debug!(user_id = self.user_id, "presence: shutting down");
        self.cancel_heartbeat();
        self.channel.set_offline(self.user_id);
        self.phase = PresencePhase::Offline;
    }

    fn arm_heartbeat(&mut self) {
        // Invariant: at most one heartbeat timer armed per identity.
        self.cancel_heartbeat();
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let channel = Arc::clone(&self.channel);
        let visible = Arc::clone(&self.visible);
        let user_id = self.user_id;
        let interval = self.heartbeat_interval;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = sleep(interval) => {
                        // visibility is re-checked at tick time, not at arm time
                        if visible.load(Ordering::SeqCst) {
                            channel.ping(user_id);
                        }
                    }
                    // fires on explicit cancel and when the sender is dropped
                    _ = cancel_rx.changed() => return,
                }
            }
        });
        self.heartbeat_cancel = Some(cancel_tx);
    }

    fn cancel_heartbeat(&mut self) {
        if let Some(cancel) = self.heartbeat_cancel.take() {
            let _ = cancel.send(true);
        }
    }
}

impl Drop for PresenceController {
    fn drop(&mut self) {
        // dropping the watch sender stops a still-armed heartbeat task
        self.heartbeat_cancel.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PresenceCall, RecordingPresenceChannel};

    const USER: UserId = 42;
    const INTERVAL: Duration = Duration::from_secs(15);

    fn controller(channel: &Arc<RecordingPresenceChannel>) -> PresenceController {
        PresenceController::new(
            Arc::clone(channel) as Arc<dyn PresenceChannel>,
            USER,
            INTERVAL,
        )
    }

    async fn run_pending_tasks() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    async fn advance(duration: Duration) {
        // let any freshly-spawned task register its timer against the
        // current (paused) clock before we step it forward
        run_pending_tasks().await;
        tokio::time::advance(duration).await;
        run_pending_tasks().await;
    }

    #[tokio::test(start_paused = true)]
    async fn start_announces_online_and_heartbeats() {
        let channel = Arc::new(RecordingPresenceChannel::default());
        let mut presence = controller(&channel);

        presence.start();
        assert_eq!(presence.phase(), PresencePhase::Active);
        assert_eq!(channel.calls(), vec![PresenceCall::Online(USER)]);

        advance(INTERVAL).await;
        advance(INTERVAL).await;
        assert_eq!(channel.count_pings(), 2);

        presence.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_tab_goes_offline_and_stops_heartbeating() {
        let channel = Arc::new(RecordingPresenceChannel::default());
        let mut presence = controller(&channel);

        presence.start();
        presence.set_visibility(Visibility::Hidden);
        assert_eq!(presence.phase(), PresencePhase::Hidden);
        assert_eq!(channel.count_offline(), 1);

        // a hidden hour produces zero pings
        advance(Duration::from_secs(3600)).await;
        assert_eq!(channel.count_pings(), 0);

        presence.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn visible_again_pings_immediately() {
        let channel = Arc::new(RecordingPresenceChannel::default());
        let mut presence = controller(&channel);

        presence.start();
        presence.set_visibility(Visibility::Hidden);
        presence.set_visibility(Visibility::Visible);

        assert_eq!(presence.phase(), PresencePhase::Active);
        // out-of-band ping fired without waiting for the next tick
        assert_eq!(channel.count_pings(), 1);
        assert_eq!(channel.count_online(), 2);

        advance(INTERVAL).await;
        assert_eq!(channel.count_pings(), 2);

        presence.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn flapping_visibility_never_stacks_timers() {
        let channel = Arc::new(RecordingPresenceChannel::default());
        let mut presence = controller(&channel);

        presence.start();
        for _ in 0..3 {
            presence.set_visibility(Visibility::Hidden);
            presence.set_visibility(Visibility::Visible);
        }
        run_pending_tasks().await;
        let immediate_pings = channel.count_pings();
        assert_eq!(immediate_pings, 3);

        // were timers stacked, one interval would yield several ticks
        advance(INTERVAL).await;
        assert_eq!(channel.count_pings(), immediate_pings + 1);

        presence.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_is_idempotent_and_safe_when_never_started() {
        let channel = Arc::new(RecordingPresenceChannel::default());
        let mut presence = controller(&channel);

        presence.shutdown();
        assert!(channel.calls().is_empty());

        presence.start();
        presence.shutdown();
        presence.shutdown();
        assert_eq!(channel.count_offline(), 1);
        assert_eq!(presence.phase(), PresencePhase::Offline);

        // no timer survives shutdown
        advance(Duration::from_secs(3600)).await;
        assert_eq!(channel.count_pings(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_a_no_op_while_running() {
        let channel = Arc::new(RecordingPresenceChannel::default());
        let mut presence = controller(&channel);

        presence.start();
        presence.start();
        assert_eq!(channel.count_online(), 1);

        advance(INTERVAL).await;
        assert_eq!(channel.count_pings(), 1);

        presence.shutdown();
    }
}
