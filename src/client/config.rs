//! Client configuration

use std::time::Duration;

/// Soundboard client configuration options
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the soundboard server, without trailing slash
    pub base_url: String,

    /// Timeout for snapshot and command requests
    ///
    /// Does not apply to the event stream, which stays open indefinitely.
    pub request_timeout: Duration,

    /// Delay before re-opening a failed event stream connection
    pub reconnect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // The server's default bind address.
            base_url: "http://127.0.0.1:14181".to_string(),
            request_timeout: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(3),
        }
    }
}

impl ClientConfig {
    /// Create a config for a server at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize(base_url.into());
        self
    }

    /// Set the snapshot/command request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the stream reconnect delay
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

fn normalize(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
