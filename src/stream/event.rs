//! Playback event wire format
//!
//! Events arrive externally tagged, exactly as the server serializes its
//! own enum: `{"Started": {...}}` / `{"Stopped": {...}}`. A message body
//! is either one event object or an array of them — the protocol moved
//! from single-event messages to batched arrays, and this client accepts
//! both shapes.

use serde::Deserialize;

use crate::bus::{ClipId, ClipKey, ClipUpdate, CollectionId};

/// A playback transition reported by the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum PlaybackEvent {
    /// A clip started playing
    Started {
        /// Owning collection
        coll_id: CollectionId,
        /// Clip within the collection
        clip_id: ClipId,
        /// Clip length in seconds; optional metadata, never required
        #[serde(default)]
        duration: Option<f64>,
    },
    /// A clip stopped playing
    Stopped {
        /// Owning collection
        coll_id: CollectionId,
        /// Clip within the collection
        clip_id: ClipId,
    },
}

impl PlaybackEvent {
    /// The key this event routes to
    pub fn key(&self) -> ClipKey {
        match self {
            PlaybackEvent::Started {
                coll_id, clip_id, ..
            }
            | PlaybackEvent::Stopped { coll_id, clip_id } => ClipKey {
                coll: coll_id.clone(),
                clip: clip_id.clone(),
            },
        }
    }

    /// The bus payload for this event
    pub fn update(&self) -> ClipUpdate {
        match self {
            PlaybackEvent::Started { duration, .. } => ClipUpdate::started(*duration),
            PlaybackEvent::Stopped { .. } => ClipUpdate::stopped(),
        }
    }
}

/// Either shape of a message body
#[derive(Deserialize)]
#[serde(untagged)]
enum EventPayload {
    Batch(Vec<PlaybackEvent>),
    Single(PlaybackEvent),
}

/// Decode one stream message body into its events, in message order
pub fn decode(data: &str) -> serde_json::Result<Vec<PlaybackEvent>> {
    let payload: EventPayload = serde_json::from_str(data)?;

    Ok(match payload {
        EventPayload::Batch(events) => events,
        EventPayload::Single(event) => vec![event],
    })
}
