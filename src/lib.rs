//! Soundboard remote-control client
//!
//! A control surface for a multi-collection audio soundboard server. The
//! server is the sole authority over playback; this crate follows it:
//!
//! - [`catalog`] loads the one-shot startup snapshot (what exists, what is
//!   playing right now)
//! - [`stream`] consumes the persistent server-push event stream
//! - [`bus`] routes each event to the single interested element by
//!   compound key
//! - [`clip`] reconciles snapshot, stream, and optimistic local actions
//!   into a per-clip state machine
//! - [`gateway`] issues fire-and-forget commands, whose effects come back
//!   through the stream, not as responses
//!
//! # Example
//! ```no_run
//! use soundboard_remote::{ClientConfig, Soundboard};
//!
//! # async fn example() -> soundboard_remote::Result<()> {
//! let board = Soundboard::connect(ClientConfig::new("http://127.0.0.1:14181")).await?;
//!
//! // One machine per on-screen clip; state changes arrive via watch().
//! let clips: Vec<_> = board.catalog().keys().map(|key| board.clip(key)).collect();
//!
//! clips[0].play();
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod catalog;
pub mod client;
pub mod clip;
pub mod error;
pub mod gateway;
pub mod stream;

pub use bus::{ClipBus, ClipId, ClipKey, ClipUpdate, CollectionId, Subscription, Transition};
pub use catalog::{Catalog, Clip, Collection, CollectionKind, Snapshot, SnapshotLoader};
pub use client::{ClientConfig, Soundboard};
pub use clip::{Affordance, ClipMachine, PlaybackState};
pub use error::{Error, Result};
pub use gateway::{CommandGateway, Commands};
pub use stream::{EventStream, PlaybackEvent, StreamStats};
