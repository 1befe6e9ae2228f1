//! Bus payload types
//!
//! The payload delivered to a clip's registered handler. The clip ids are
//! not part of the payload; routing already happened on the key.

/// Playback transition reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The clip started playing
    Started,
    /// The clip stopped playing
    Stopped,
}

/// Payload delivered to the handler registered for a clip key
#[derive(Debug, Clone, PartialEq)]
pub struct ClipUpdate {
    /// The transition that occurred
    pub transition: Transition,
    /// Clip length in seconds, when the server includes it
    ///
    /// Advisory metadata only; not all protocol revisions send it and no
    /// state transition depends on it.
    pub duration: Option<f64>,
}

impl ClipUpdate {
    /// A started transition, optionally carrying the clip duration
    pub fn started(duration: Option<f64>) -> Self {
        Self {
            transition: Transition::Started,
            duration,
        }
    }

    /// A stopped transition
    pub fn stopped() -> Self {
        Self {
            transition: Transition::Stopped,
            duration: None,
        }
    }
}
