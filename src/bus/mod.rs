//! Keyed update routing
//!
//! The bus routes playback updates to the single interested element by
//! compound key (collection id + clip id). It is a directory, not a pub/sub
//! fan-out: each key holds at most one handler, registering replaces, and
//! publishing to an empty key drops the update.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<ClipBus>
//!                 ┌──────────────────────────┐
//!                 │ slots: HashMap<ClipKey,  │
//!                 │   Slot {                 │
//!                 │     token,               │
//!                 │     handler,             │
//!                 │   }                      │
//!                 │ >                        │
//!                 └───────────┬──────────────┘
//!                             │
//!        ┌────────────────────┼────────────────────┐
//!        │                    │                    │
//!   [EventStream]        [Snapshot]          [ClipMachine]
//!   publish(key, ..)     publish_playing()   subscribe(key, ..)
//!        │                    │                    │
//!        └──────── one handler per key ───────────►│
//! ```
//!
//! Delivery is synchronous and strictly ordered per key. A `Subscription`
//! guard ties each registration to the lifetime of the element that owns
//! it, releasing on every exit path.

pub mod directory;
pub mod key;
pub mod update;

pub use directory::{ClipBus, Handler, Subscription};
pub use key::{ClipId, ClipKey, CollectionId};
pub use update::{ClipUpdate, Transition};
