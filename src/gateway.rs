//! Fire-and-forget command issuance
//!
//! Commands flow in the opposite direction from the event path and are
//! fully decoupled from it: the server's acknowledgment that a command
//! took effect arrives later, asynchronously, through the event stream —
//! or never, if the command failed. This layer never awaits a command's
//! completion and never surfaces its failure beyond a log line.

use crate::bus::{ClipKey, CollectionId};

/// Command capability consumed by clip machines
///
/// Implementations issue one-way commands with no result observable by the
/// caller. `CommandGateway` is the HTTP implementation; tests substitute a
/// recording fake.
pub trait Commands: Send + Sync {
    /// Start playing a clip
    fn play(&self, key: &ClipKey);

    /// Stop a playing clip
    fn stop(&self, key: &ClipKey);

    /// Stop all playback globally
    fn stop_all(&self);

    /// Set a collection's playback gain
    fn set_gain(&self, coll: &CollectionId, gain: f64);
}

/// HTTP command gateway
///
/// Each command spawns a detached request task; failures are logged and
/// otherwise invisible. A lost command leaves the issuing clip `Pending`
/// until the next authoritative event for its key.
pub struct CommandGateway {
    http: reqwest::Client,
    base_url: String,
}

impl CommandGateway {
    /// Create a gateway issuing commands against `base_url`
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn dispatch(&self, request: reqwest::RequestBuilder, url: String) {
        tokio::spawn(async move {
            match request.send().await {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!(url = %url, status = %response.status(), "Command rejected");
                }
                Ok(_) => {
                    tracing::trace!(url = %url, "Command accepted");
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Command failed to send");
                }
            }
        });
    }

    fn post(&self, url: String) {
        let request = self.http.post(&url);
        self.dispatch(request, url);
    }
}

impl Commands for CommandGateway {
    fn play(&self, key: &ClipKey) {
        tracing::debug!(key = %key, "Play command");
        self.post(format!(
            "{}/collection/{}/clip/{}/play",
            self.base_url, key.coll, key.clip
        ));
    }

    fn stop(&self, key: &ClipKey) {
        tracing::debug!(key = %key, "Stop command");
        self.post(format!(
            "{}/collection/{}/clip/{}/stop",
            self.base_url, key.coll, key.clip
        ));
    }

    fn stop_all(&self) {
        tracing::debug!("Stop-all command");
        self.post(format!("{}/stop_all", self.base_url));
    }

    fn set_gain(&self, coll: &CollectionId, gain: f64) {
        tracing::debug!(coll = %coll, gain = gain, "Gain command");
        let url = format!("{}/collection/{}/playback", self.base_url, coll);
        let body = serde_json::json!({ "gain": gain }).to_string();
        let request = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.dispatch(request, url);
    }
}
