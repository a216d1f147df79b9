//! Core types for playback control

use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};

/// A playlist entry
///
/// Immutable; the playlist is fixed when the player is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Audio resource handed to the media element
    pub source_uri: String,

    /// Cover image shown while the track is current
    pub cover_uri: String,
}

impl Track {
    pub fn new(source_uri: impl Into<String>, cover_uri: impl Into<String>) -> Self {
        Self {
            source_uri: source_uri.into(),
            cover_uri: cover_uri.into(),
        }
    }

    /// Human readable name: the file name of the source without its extension
    ///
    /// `/audio/Band - Song.mp3` → `Band - Song`
    pub fn display_name(&self) -> &str {
        let file_name = self
            .source_uri
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.source_uri);

        match file_name.rfind('.') {
            Some(dot) if dot > 0 => &file_name[..dot],
            _ => file_name,
        }
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Not playing (initial state, after pause, or after a rejected play)
    Paused,

    /// A track switch is pending: source assigned, play not yet resolved
    Loading,

    /// Media element confirmed playback
    Playing,
}

/// When a play request is issued after switching tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartPolicy {
    /// Wait for the element's one-shot can-play signal for the new source
    #[default]
    AwaitReady,

    /// Issue play right after the source is loaded
    Immediate,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Volume at mount (0.0-1.0, default: 0.5)
    pub initial_volume: f64,

    /// Volume restored by unmute when no nonzero volume was seen (default: 0.5)
    pub fallback_volume: f64,

    /// Step used by skip forward/backward, in seconds (default: 10)
    pub skip_step_secs: f64,

    /// Start policy after a track switch (default: AwaitReady)
    pub start_policy: StartPolicy,

    /// Track selected at mount (default: 0)
    pub start_index: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: 0.5,
            fallback_volume: 0.5,
            skip_step_secs: 10.0,
            start_policy: StartPolicy::AwaitReady,
            start_index: 0,
        }
    }
}

impl PlayerConfig {
    /// Parse a JSON document (camelCase keys); missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(PlayerError::Config(format!(
                "initial_volume must be within 0.0..=1.0, got {}",
                self.initial_volume
            )));
        }
        if !(self.fallback_volume > 0.0 && self.fallback_volume <= 1.0) {
            return Err(PlayerError::Config(format!(
                "fallback_volume must be within (0.0, 1.0], got {}",
                self.fallback_volume
            )));
        }
        if !(self.skip_step_secs.is_finite() && self.skip_step_secs > 0.0) {
            return Err(PlayerError::Config(format!(
                "skip_step_secs must be positive, got {}",
                self.skip_step_secs
            )));
        }
        Ok(())
    }
}
