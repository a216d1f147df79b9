//! Desktop media element for the Jukebox playback controller
//!
//! This crate provides [`DesktopAudioElement`], the desktop implementation of
//! `jukebox_playback::MediaElement`.
//!
//! # Features
//!
//! - Decoding of local files with Symphonia (MP3, FLAC, OGG, WAV, AAC, ...)
//! - Sample rate conversion to the output device with rubato
//! - Cross-platform output through CPAL on a dedicated audio thread
//! - Background loading with superseded loads discarded
//! - Lifecycle signals (metadata, time updates, end, readiness)
//!
//! # Example
//!
//! ```no_run
//! use jukebox_audio_desktop::DesktopAudioElement;
//! use jukebox_playback::{PlaybackController, PlayerConfig, Playlist, Track};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let element = DesktopAudioElement::new()?;
//! let playlist = Playlist::new(vec![
//!     Track::new("/music/one.flac", ""),
//!     Track::new("/music/two.mp3", ""),
//! ])?;
//!
//! let mut player = PlaybackController::new(element, playlist, PlayerConfig::default())?;
//! player.toggle_playback();
//!
//! loop {
//!     player.pump();
//!     for event in player.drain_events() {
//!         println!("{:?}", event);
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//! # }
//! ```

#![deny(unsafe_code)]

mod decoder;
mod element;
mod error;
mod loader;
mod output;
mod playhead;
mod resample;

pub use decoder::{decode_file, DecodedTrack};
pub use element::DesktopAudioElement;
pub use error::{AudioError, Result};
pub use loader::{LoadRequest, LoadResult, TrackLoader};
pub use output::{OutputFormat, OutputStream};
pub use playhead::{Playhead, RenderSignals, TICK_INTERVAL_SECS};
pub use resample::{adapt_channels, resample};
