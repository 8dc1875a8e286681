//! Application-wide constants
//!
//! Centralized location for magic values used across multiple modules.

/// Default heartbeat interval while the page is visible.
/// Must stay below the backend's ~30s heartbeat window.
pub const HEARTBEAT_INTERVAL_MS: u64 = 15_000;

/// Lower bound for the heartbeat interval; environment overrides below
/// this are clamped so clients cannot spam the presence channel.
pub const MIN_HEARTBEAT_INTERVAL_MS: u64 = 10_000;

/// Page size of the aggregated notification feed.
pub const FEED_PAGE_SIZE: usize = 6;

/// Default base URL that relative avatar paths resolve against.
pub const DEFAULT_API_BASE_URL: &str = "https://api.echoverse.app/api";

// Display fallbacks
pub const DEFAULT_PEER_NAME: &str = "Someone";
pub const DEFAULT_MESSAGE_BODY: &str = "New message";
pub const DEFAULT_SENDER_NAME: &str = "EchoVerse";

// Environment variables
pub const ENV_HEARTBEAT_INTERVAL_MS: &str = "ECHOVERSE_PRESENCE_PING_INTERVAL_MS";
pub const ENV_API_BASE_URL: &str = "ECHOVERSE_API_BASE_URL";
