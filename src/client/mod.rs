//! Soundboard client assembly
//!
//! Wires the pieces into one handle: snapshot load, bus construction,
//! stream consumer spawn, command gateway. The order mirrors the load
//! sequence the protocol expects — catalog first (fatal on failure), then
//! the event stream, then the best-effort playing snapshot.

pub mod config;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::bus::{ClipBus, ClipKey, CollectionId};
use crate::catalog::{Catalog, Snapshot, SnapshotLoader};
use crate::clip::ClipMachine;
use crate::error::Result;
use crate::gateway::{CommandGateway, Commands};
use crate::stream::{EventStream, StreamCounters, StreamStats};

pub use config::ClientConfig;

/// Connected soundboard client
///
/// Owns the stream consumer task; dropping the client closes the stream,
/// which is the whole-stream cancellation primitive.
pub struct Soundboard {
    snapshot: Snapshot,
    bus: Arc<ClipBus>,
    gateway: Arc<CommandGateway>,
    counters: Arc<StreamCounters>,
    stream_task: JoinHandle<()>,
}

impl Soundboard {
    /// Connect to the server described by `config`
    ///
    /// Fetches the catalog (fatal on failure), opens the event stream,
    /// and loads the playing snapshot (degrades to all-stopped on
    /// failure). Must be called within a tokio runtime.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        // The stream connection stays open indefinitely; only bound the
        // connect phase.
        let stream_http = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .build()?;

        let bus = Arc::new(ClipBus::new());
        let gateway = Arc::new(CommandGateway::new(http.clone(), config.base_url.clone()));

        let stream = EventStream::new(
            stream_http,
            &config.base_url,
            Arc::clone(&bus),
            config.reconnect_delay,
        );
        let counters = stream.counters();
        let stream_task = tokio::spawn(stream.run());

        let loader = SnapshotLoader::new(http, config.base_url.clone());
        let snapshot = match loader.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // Without a catalog there is nothing to control.
                stream_task.abort();
                return Err(e);
            }
        };

        // Handlers registered from here on read the snapshot directly;
        // this publish covers any registered earlier. Both paths race the
        // stream, and idempotent apply absorbs the overlap.
        snapshot.publish_playing(&bus);

        tracing::info!(base_url = %config.base_url, "Soundboard connected");

        Ok(Self {
            snapshot,
            bus,
            gateway,
            counters,
            stream_task,
        })
    }

    /// The loaded catalog
    pub fn catalog(&self) -> &Catalog {
        &self.snapshot.catalog
    }

    /// The startup snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The bus, for registering custom handlers
    pub fn bus(&self) -> &Arc<ClipBus> {
        &self.bus
    }

    /// Attach a state machine for one clip
    ///
    /// The machine starts from the snapshot's view of the clip and detaches
    /// from the bus when dropped.
    pub fn clip(&self, key: ClipKey) -> ClipMachine {
        let initial = self.snapshot.initial_state(&key);
        ClipMachine::attach(
            &self.bus,
            Arc::clone(&self.gateway) as Arc<dyn Commands>,
            key,
            initial,
        )
    }

    /// Stop all playback globally (fire-and-forget)
    pub fn stop_all(&self) {
        self.gateway.stop_all();
    }

    /// Set a collection's playback gain (fire-and-forget)
    pub fn set_gain(&self, coll: &CollectionId, gain: f64) {
        self.gateway.set_gain(coll, gain);
    }

    /// Current stream consumer statistics
    pub fn stream_stats(&self) -> StreamStats {
        self.counters.snapshot()
    }

    /// Tear the client down, closing the event stream
    ///
    /// Equivalent to dropping the client; clip machines detach themselves
    /// separately when they are dropped.
    pub fn shutdown(self) {}
}

impl Drop for Soundboard {
    fn drop(&mut self) {
        self.stream_task.abort();
        tracing::debug!("Soundboard shut down");
    }
}
