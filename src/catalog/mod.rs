//! Catalog and startup snapshot
//!
//! The static side of the protocol: what exists (collections and clips)
//! and what was playing at the moment of initial load. Everything after
//! that moment arrives through the event stream.

pub mod loader;
pub mod model;

pub use loader::{Snapshot, SnapshotLoader};
pub use model::{Catalog, Clip, Collection, CollectionKind};
