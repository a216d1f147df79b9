//! Fixed circular playlist

use crate::error::{PlayerError, Result};
use crate::types::Track;

/// Ordered, non-empty, immutable list of tracks
///
/// Navigation wraps in both directions; there is no end of playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Create a playlist
    ///
    /// # Errors
    /// `EmptyPlaylist` if `tracks` is empty
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }
        Ok(Self { tracks })
    }

    /// Parse a JSON array of `{ "sourceUri", "coverUri" }` objects
    pub fn from_json(json: &str) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_str(json)?;
        Self::new(tracks)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Check that `index` names a track
    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.tracks.len() {
            Ok(())
        } else {
            Err(PlayerError::TrackOutOfRange {
                index,
                len: self.tracks.len(),
            })
        }
    }

    /// Index after `index`, wrapping to the first track
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.tracks.len()
    }

    /// Index before `index`, wrapping to the last track
    pub fn previous_index(&self, index: usize) -> usize {
        let len = self.tracks.len();
        (index % len + len - 1) % len
    }
}
