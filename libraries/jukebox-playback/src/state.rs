//! Observable player state and its transitions
//!
//! `PlayerState` is a plain `Copy` value. Every transition consumes the
//! current state and returns the next one, so the state machine can be
//! exercised without a media element or a view.

use crate::format::format_time;
use crate::types::{PlaybackState, PlayerConfig};
use serde::{Deserialize, Serialize};

/// Snapshot of everything a view needs to render the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    current_index: usize,
    playback: PlaybackState,
    volume: f64,
    previous_volume: f64,
    current_time: f64,
    /// 0.0 while unknown
    duration: f64,
}

impl PlayerState {
    /// State at mount: paused at the configured track, nothing loaded yet
    pub fn new(config: &PlayerConfig) -> Self {
        let volume = config.initial_volume.clamp(0.0, 1.0);
        Self {
            current_index: config.start_index,
            playback: PlaybackState::Paused,
            volume,
            previous_volume: if volume > 0.0 {
                volume
            } else {
                config.fallback_volume
            },
            current_time: 0.0,
            duration: 0.0,
        }
    }

    // ===== Transitions =====

    /// Switch to another track: timeline reset, waiting for the element
    #[must_use]
    pub fn with_track(self, index: usize) -> Self {
        Self {
            current_index: index,
            playback: PlaybackState::Loading,
            current_time: 0.0,
            duration: 0.0,
            ..self
        }
    }

    #[must_use]
    pub fn with_playback(self, playback: PlaybackState) -> Self {
        Self { playback, ..self }
    }

    /// Set the volume, remembering it for unmute when nonzero
    ///
    /// Values are clamped to `0.0..=1.0`; NaN leaves the state unchanged.
    #[must_use]
    pub fn with_volume(self, volume: f64) -> Self {
        if volume.is_nan() {
            return self;
        }

        let volume = volume.clamp(0.0, 1.0);
        Self {
            volume,
            previous_volume: if volume > 0.0 {
                volume
            } else {
                self.previous_volume
            },
            ..self
        }
    }

    /// Mute, or restore the last nonzero volume (`fallback` if there is none)
    #[must_use]
    pub fn toggled_mute(self, fallback: f64) -> Self {
        if self.volume > 0.0 {
            Self {
                previous_volume: self.volume,
                volume: 0.0,
                ..self
            }
        } else {
            let restored = if self.previous_volume > 0.0 {
                self.previous_volume
            } else {
                fallback
            };
            Self {
                volume: restored,
                previous_volume: restored,
                ..self
            }
        }
    }

    /// Record the total duration reported by the element
    ///
    /// Anything that is not a finite, non-negative number means "unknown".
    #[must_use]
    pub fn with_duration(self, duration: f64) -> Self {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        Self {
            duration,
            current_time: clamp_time(self.current_time, duration),
            ..self
        }
    }

    /// Record the elapsed time, never past a known duration
    #[must_use]
    pub fn with_time(self, time: f64) -> Self {
        Self {
            current_time: clamp_time(time, self.duration),
            ..self
        }
    }

    // ===== Queries =====

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn previous_volume(&self) -> f64 {
        self.previous_volume
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Total duration in seconds, 0.0 while unknown
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_muted(&self) -> bool {
        self.volume == 0.0
    }

    /// Volume as a rounded percentage (0-100)
    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round() as u8
    }

    /// Seeking is meaningful only once the duration is known
    pub fn can_seek(&self) -> bool {
        self.duration > 0.0
    }

    pub fn elapsed_label(&self) -> String {
        format_time(self.current_time)
    }

    pub fn duration_label(&self) -> String {
        format_time(self.duration)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(&PlayerConfig::default())
    }
}

fn clamp_time(time: f64, duration: f64) -> f64 {
    if !time.is_finite() || time < 0.0 {
        return 0.0;
    }
    if duration > 0.0 {
        time.min(duration)
    } else {
        time
    }
}
