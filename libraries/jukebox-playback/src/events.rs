//! Player Events
//!
//! Notifications for UI synchronization, queued by the controller and
//! drained by the host with `PlaybackController::drain_events`:
//! - State changes (paused/loading/playing)
//! - Track changes
//! - Volume changes
//! - Timeline updates (elapsed time, duration)
//! - Rejected play requests

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// Current track changed
    TrackChanged {
        /// Index of the new track
        index: usize,
        /// Index of the track that was current before
        previous_index: usize,
    },

    /// Volume changed (slider or mute toggle)
    VolumeChanged {
        /// New volume (0.0-1.0)
        volume: f64,
        /// Whether the volume is zero
        is_muted: bool,
    },

    /// Elapsed time changed (tick, seek or skip)
    TimeUpdated {
        /// Elapsed seconds
        current_time: f64,
    },

    /// Duration became known (or unknown again)
    DurationChanged {
        /// Total seconds, 0.0 when unknown
        duration: f64,
    },

    /// The platform refused to start playback; the player stays paused
    PlayRejected {
        /// Track the request was issued for
        index: usize,
        /// Reason given by the platform
        reason: String,
    },
}

impl PlayerEvent {
    /// Short stable name, used by bindings that dispatch on strings
    pub fn kind(&self) -> &'static str {
        match self {
            PlayerEvent::StateChanged { .. } => "state",
            PlayerEvent::TrackChanged { .. } => "track",
            PlayerEvent::VolumeChanged { .. } => "volume",
            PlayerEvent::TimeUpdated { .. } => "time",
            PlayerEvent::DurationChanged { .. } => "duration",
            PlayerEvent::PlayRejected { .. } => "rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kinds_are_distinct() {
        let events = [
            PlayerEvent::StateChanged {
                state: PlaybackState::Playing,
            },
            PlayerEvent::TrackChanged {
                index: 1,
                previous_index: 0,
            },
            PlayerEvent::VolumeChanged {
                volume: 0.5,
                is_muted: false,
            },
            PlayerEvent::TimeUpdated { current_time: 1.0 },
            PlayerEvent::DurationChanged { duration: 2.0 },
            PlayerEvent::PlayRejected {
                index: 0,
                reason: "NotAllowedError".to_string(),
            },
        ];

        let mut kinds: Vec<_> = events.iter().map(PlayerEvent::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), events.len());
    }

    #[test]
    fn events_serialize() {
        let event = PlayerEvent::StateChanged {
            state: PlaybackState::Loading,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"StateChanged":{"state":"Loading"}}"#);
    }
}
