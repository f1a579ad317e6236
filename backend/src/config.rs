//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::state::AgentLifecycleState;
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Status feed configuration
    pub feed: FeedConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Status feed configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Broadcast buffer size per websocket subscriber
    pub channel_capacity: usize,
    /// Interval between keepalive pings (in seconds)
    pub ping_interval_secs: u64,
    /// Lifecycle state reported before the first update
    pub initial_agent_state: AgentLifecycleState,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            feed: FeedConfig {
                channel_capacity: env::var("FEED_CHANNEL_CAPACITY")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .filter(|c| *c > 0)
                    .unwrap_or(64),
                ping_interval_secs: env::var("FEED_PING_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|s| *s > 0)
                    .unwrap_or(30),
                initial_agent_state: env::var("INITIAL_AGENT_STATE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(AgentLifecycleState::Loading),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Keepalive ping interval
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.feed.ping_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "PORT",
        "HOST",
        "FEED_CHANNEL_CAPACITY",
        "FEED_PING_INTERVAL_SECS",
        "INITIAL_AGENT_STATE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.feed.channel_capacity, 64);
        assert_eq!(config.ping_interval(), Duration::from_secs(30));
        assert_eq!(config.feed.initial_agent_state, AgentLifecycleState::Loading);
    }

    #[test]
    #[serial]
    fn test_overrides_and_invalid_values() {
        clear_env();
        env::set_var("PORT", "9000");
        env::set_var("FEED_CHANNEL_CAPACITY", "0");
        env::set_var("INITIAL_AGENT_STATE", "running");
        let config = Config::from_env();
        clear_env();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.feed.channel_capacity, 64);
        assert_eq!(config.feed.initial_agent_state, AgentLifecycleState::Running);
    }
}
