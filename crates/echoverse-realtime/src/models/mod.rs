pub mod message;
pub mod notification;
pub mod peer;
pub mod time_bucket;

pub use message::ChatMessage;
pub use notification::{
    parse_timestamp, NotificationAction, NotificationKind, NotificationRecord,
};
pub use peer::{FriendDto, PeerDirectory, PeerSummary};
pub use time_bucket::TimeBucket;

/// Numeric user identifier shared by the presence, message, and
/// notification channels.
pub type UserId = i64;
