//! Desktop audio errors
use thiserror::Error;

/// Result type for audio operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// No default output device
    #[error("Audio device not found")]
    DeviceNotFound,

    /// Failed to build output stream
    #[error("Failed to build output stream: {0}")]
    StreamBuildError(String),

    /// Failed to start stream
    #[error("Failed to play stream: {0}")]
    PlayError(String),

    /// Probe or decode failure
    #[error("Decode error: {0}")]
    Decode(String),

    /// Sample rate conversion error
    #[error("Sample rate conversion error: {0}")]
    Resample(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cpal::BuildStreamError> for AudioError {
    fn from(err: cpal::BuildStreamError) -> Self {
        AudioError::StreamBuildError(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for AudioError {
    fn from(err: cpal::PlayStreamError) -> Self {
        AudioError::PlayError(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        AudioError::StreamBuildError(err.to_string())
    }
}

impl From<symphonia::core::errors::Error> for AudioError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        AudioError::Decode(err.to_string())
    }
}

impl From<rubato::ResamplerConstructionError> for AudioError {
    fn from(err: rubato::ResamplerConstructionError) -> Self {
        AudioError::Resample(err.to_string())
    }
}

impl From<rubato::ResampleError> for AudioError {
    fn from(err: rubato::ResampleError) -> Self {
        AudioError::Resample(err.to_string())
    }
}

impl From<AudioError> for jukebox_playback::PlayerError {
    fn from(err: AudioError) -> Self {
        jukebox_playback::PlayerError::Media(err.to_string())
    }
}
