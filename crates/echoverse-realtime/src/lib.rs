pub mod channel;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod models;
pub mod presence;
pub mod routes;
pub mod session;
pub mod store;
pub mod tracing_setup;
pub mod urls;
pub mod watcher;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the types a host application wires together.
pub use channel::{
    AlertSink, FriendsApi, MessageChannel, NotificationChannel, PresenceChannel, Subscription,
};
pub use config::RealtimeConfig;
pub use error::RealtimeError;
pub use events::{Alert, AlertMeta};
pub use models::{
    ChatMessage, FriendDto, NotificationAction, NotificationKind, NotificationRecord,
    PeerDirectory, PeerSummary, TimeBucket, UserId,
};
pub use presence::{PresenceController, PresencePhase, Visibility};
pub use routes::{route_for, RouteTarget};
pub use session::{RealtimeChannels, RealtimeSession};
pub use store::{build_feed_view, FeedSection, FeedView, NotificationFeed};
pub use watcher::WatcherRegistry;
