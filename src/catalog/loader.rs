//! Initial snapshot loading
//!
//! Two ordered one-shot reads at startup: the catalog, then the set of
//! clips playing at that moment. The catalog is load-bearing — without it
//! there is nothing to show, so its failure is fatal. The playing set is
//! best-effort: some protocol revisions do not serve it at all, and a miss
//! only means every clip starts out `Stopped` until the stream corrects it.

use std::collections::HashSet;

use crate::bus::{ClipBus, ClipId, ClipKey, ClipUpdate, CollectionId};
use crate::clip::PlaybackState;
use crate::error::Result;

use super::model::{Catalog, Collection};

/// One-time view of server state at load
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// The full catalog
    pub catalog: Catalog,
    /// Clips playing at snapshot time
    pub playing: HashSet<ClipKey>,
}

impl Snapshot {
    /// Initial state for a clip created from this snapshot
    pub fn initial_state(&self, key: &ClipKey) -> PlaybackState {
        if self.playing.contains(key) {
            PlaybackState::Started
        } else {
            PlaybackState::Stopped
        }
    }

    /// Publish a `Started` update for every playing clip
    ///
    /// For handlers registered before this snapshot was applied. The
    /// stream may independently report the same transitions; applying
    /// `Started` to an already-started clip is a no-op state-wise.
    pub fn publish_playing(&self, bus: &ClipBus) {
        for key in &self.playing {
            bus.publish(key, ClipUpdate::started(None));
        }
    }
}

/// Fetches the startup snapshot
pub struct SnapshotLoader {
    http: reqwest::Client,
    base_url: String,
}

impl SnapshotLoader {
    /// Create a loader reading from `base_url`
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Perform both reads and build the snapshot
    ///
    /// Catalog failure is fatal; playing-set failure degrades to an empty
    /// set. Never re-polls — every later change arrives via the stream.
    pub async fn load(&self) -> Result<Snapshot> {
        let catalog = self.fetch_catalog().await?;
        tracing::info!(
            collections = catalog.collections.len(),
            clips = catalog.clip_count(),
            "Catalog loaded"
        );

        let playing = match self.fetch_playing().await {
            Ok(playing) => playing,
            Err(e) => {
                tracing::warn!(error = %e, "Playing snapshot unavailable, assuming all stopped");
                HashSet::new()
            }
        };
        tracing::info!(playing = playing.len(), "Playing snapshot loaded");

        Ok(Snapshot { catalog, playing })
    }

    async fn fetch_catalog(&self) -> Result<Catalog> {
        let url = format!("{}/collection", self.base_url);
        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(parse_catalog(&body)?)
    }

    async fn fetch_playing(&self) -> Result<HashSet<ClipKey>> {
        let url = format!("{}/playing", self.base_url);
        let response = self.http.get(&url).send().await?;

        // The endpoint is optional; a revision without it is not an error.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!("Server has no /playing endpoint");
            return Ok(HashSet::new());
        }

        let body = response.error_for_status()?.bytes().await?;
        Ok(parse_playing(&body)?)
    }
}

fn parse_catalog(body: &[u8]) -> serde_json::Result<Catalog> {
    let collections: Vec<Collection> = serde_json::from_slice(body)?;
    Ok(Catalog { collections })
}

fn parse_playing(body: &[u8]) -> serde_json::Result<HashSet<ClipKey>> {
    let pairs: Vec<(CollectionId, ClipId)> = serde_json::from_slice(body)?;
    Ok(pairs
        .into_iter()
        .map(|(coll, clip)| ClipKey { coll, clip })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_playing_pairs() {
        let playing = parse_playing(br#"[["0", "1"], ["2", "0"]]"#).unwrap();

        assert_eq!(playing.len(), 2);
        assert!(playing.contains(&ClipKey::new("0", "1")));
        assert!(playing.contains(&ClipKey::new("2", "0")));
    }

    #[test]
    fn test_parse_playing_numeric_ids() {
        // Older revisions serialize the pair as integers.
        let playing = parse_playing(br#"[[0, 1]]"#).unwrap();
        assert!(playing.contains(&ClipKey::new("0", "1")));
    }

    #[test]
    fn test_parse_playing_rejects_garbage() {
        assert!(parse_playing(br#"{"playing": true}"#).is_err());
    }

    #[test]
    fn test_initial_state_from_snapshot() {
        let snapshot = Snapshot {
            catalog: Catalog::default(),
            playing: parse_playing(br#"[["c1", "a"]]"#).unwrap(),
        };

        assert_eq!(
            snapshot.initial_state(&ClipKey::new("c1", "a")),
            PlaybackState::Started
        );
        assert_eq!(
            snapshot.initial_state(&ClipKey::new("c1", "b")),
            PlaybackState::Stopped
        );
    }

    #[test]
    fn test_publish_playing_reaches_registered_handler() {
        let bus = ClipBus::new();
        let key = ClipKey::new("c1", "a");

        let (tx, rx) = std::sync::mpsc::channel();
        bus.register(
            key.clone(),
            Box::new(move |update| tx.send(update).unwrap()),
        );

        let snapshot = Snapshot {
            catalog: Catalog::default(),
            playing: [key].into_iter().collect(),
        };
        snapshot.publish_playing(&bus);

        assert_eq!(rx.try_recv().unwrap(), ClipUpdate::started(None));
    }
}
