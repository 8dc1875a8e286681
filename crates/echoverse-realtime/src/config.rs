use std::time::Duration;

use crate::constants::{
    DEFAULT_API_BASE_URL, ENV_API_BASE_URL, ENV_HEARTBEAT_INTERVAL_MS, FEED_PAGE_SIZE,
    HEARTBEAT_INTERVAL_MS, MIN_HEARTBEAT_INTERVAL_MS,
};

#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Interval between presence heartbeat pings while the page is visible.
    pub heartbeat_interval: Duration,
    /// Page size of the notification feed window.
    pub page_size: usize,
    /// Base URL relative avatar paths are resolved against.
    pub api_base_url: String,
}

impl RealtimeConfig {
    /// Build a config from the environment, falling back to the defaults.
    /// Heartbeat overrides are clamped to [`MIN_HEARTBEAT_INTERVAL_MS`].
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(ENV_HEARTBEAT_INTERVAL_MS) {
            if let Ok(ms) = raw.parse::<u64>() {
                config.heartbeat_interval =
                    Duration::from_millis(ms.max(MIN_HEARTBEAT_INTERVAL_MS));
            }
        }
        if let Ok(base) = std::env::var(ENV_API_BASE_URL) {
            if !base.is_empty() {
                config.api_base_url = base;
            }
        }
        config
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_millis(HEARTBEAT_INTERVAL_MS),
            page_size: FEED_PAGE_SIZE,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = RealtimeConfig::default();
        assert_eq!(config.heartbeat_interval, Duration::from_secs(15));
        assert_eq!(config.page_size, 6);
    }
}
