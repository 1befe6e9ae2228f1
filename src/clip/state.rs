//! Per-clip playback state
//!
//! Three states, with one purely local one: `Pending` is entered
//! optimistically when the user issues a command and left only when the
//! server confirms a transition through the event stream. The server is
//! authoritative; a delivered transition always wins, whatever the prior
//! state.

use crate::bus::Transition;

/// Playback state of a single clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not playing
    #[default]
    Stopped,
    /// Command issued, awaiting server confirmation
    Pending,
    /// Playing
    Started,
}

/// What a frontend should offer for a clip in a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Clickable "play"
    Play,
    /// Clickable "stop"
    Stop,
    /// Non-interactive transitional indicator
    Busy,
}

impl PlaybackState {
    /// Apply a server-reported transition
    ///
    /// Idempotent: re-applying the current transition is a no-op. A
    /// transition supersedes `Pending` regardless of which command caused
    /// it; snapshot and stream carry no ordering token, so whichever
    /// arrives last wins.
    pub fn apply(self, transition: Transition) -> PlaybackState {
        match transition {
            Transition::Started => PlaybackState::Started,
            Transition::Stopped => PlaybackState::Stopped,
        }
    }

    /// Local user intent: play
    pub fn on_play(self) -> PlaybackState {
        PlaybackState::Pending
    }

    /// Local user intent: stop
    ///
    /// Only meaningful while started or pending; a stopped clip has
    /// nothing to stop.
    pub fn on_stop(self) -> PlaybackState {
        match self {
            PlaybackState::Started | PlaybackState::Pending => PlaybackState::Pending,
            PlaybackState::Stopped => PlaybackState::Stopped,
        }
    }

    /// The affordance for this state, recomputed on every change
    pub fn affordance(self) -> Affordance {
        match self {
            PlaybackState::Stopped => Affordance::Play,
            PlaybackState::Started => Affordance::Stop,
            PlaybackState::Pending => Affordance::Busy,
        }
    }

    /// Whether the clip is confirmed playing
    pub fn is_started(self) -> bool {
        self == PlaybackState::Started
    }

    /// Whether a command is awaiting confirmation
    pub fn is_pending(self) -> bool {
        self == PlaybackState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_is_idempotent() {
        let started = PlaybackState::Stopped.apply(Transition::Started);
        assert_eq!(started, PlaybackState::Started);
        assert_eq!(started.apply(Transition::Started), started);

        let stopped = started.apply(Transition::Stopped);
        assert_eq!(stopped, PlaybackState::Stopped);
        assert_eq!(stopped.apply(Transition::Stopped), stopped);
    }

    #[test]
    fn test_transition_supersedes_pending() {
        assert_eq!(
            PlaybackState::Pending.apply(Transition::Started),
            PlaybackState::Started
        );
        assert_eq!(
            PlaybackState::Pending.apply(Transition::Stopped),
            PlaybackState::Stopped
        );
    }

    #[test]
    fn test_user_intents() {
        assert_eq!(PlaybackState::Stopped.on_play(), PlaybackState::Pending);
        assert_eq!(PlaybackState::Started.on_play(), PlaybackState::Pending);
        assert_eq!(PlaybackState::Pending.on_play(), PlaybackState::Pending);

        assert_eq!(PlaybackState::Started.on_stop(), PlaybackState::Pending);
        assert_eq!(PlaybackState::Pending.on_stop(), PlaybackState::Pending);
        assert_eq!(PlaybackState::Stopped.on_stop(), PlaybackState::Stopped);
    }

    #[test]
    fn test_affordance_mapping() {
        assert_eq!(PlaybackState::Stopped.affordance(), Affordance::Play);
        assert_eq!(PlaybackState::Started.affordance(), Affordance::Stop);
        assert_eq!(PlaybackState::Pending.affordance(), Affordance::Busy);
    }
}
