//! Error types for the playback controller

use thiserror::Error;

/// Player errors
///
/// A rejected play request is not an error: it is reported through
/// [`crate::PlaybackState`] staying paused and a `PlayRejected` event.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Track index outside the playlist
    #[error("Track index {index} out of range (playlist has {len} tracks)")]
    TrackOutOfRange { index: usize, len: usize },

    /// Playlist has no tracks
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Volume is not a number
    #[error("Invalid volume: {0}")]
    InvalidVolume(f64),

    /// Seek position is not a number
    #[error("Invalid seek position: {0}")]
    InvalidSeekPosition(f64),

    /// Media element refused a source
    #[error("Media element error: {0}")]
    Media(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        PlayerError::Config(err.to_string())
    }
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
