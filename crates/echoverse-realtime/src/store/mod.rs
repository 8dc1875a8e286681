pub mod notification_feed;
pub mod views;

pub use notification_feed::NotificationFeed;
pub use views::{build_feed_view, bucketed, FeedSection, FeedView};
