//! Per-clip state machines
//!
//! State transitions are pure functions in `state`; `machine` binds them
//! to a bus subscription and a command gateway for the lifetime of one
//! on-screen clip element.

pub mod machine;
pub mod state;

pub use machine::ClipMachine;
pub use state::{Affordance, PlaybackState};
