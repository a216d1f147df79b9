//! Jukebox - Playback Control
//!
//! Platform-agnostic playback controller for a fixed, circular playlist.
//!
//! This crate provides:
//! - Play/pause with asynchronous play confirmation
//! - Track selection with circular next/previous
//! - Volume control with mute/unmute memory
//! - Seek and relative skip
//! - Elapsed/total time tracking and `MM:SS` formatting
//! - UI events for view synchronization
//!
//! # Architecture
//!
//! `jukebox-playback` never decodes audio. The native playback primitive is
//! abstracted by [`MediaElement`]:
//! - Browser: `HTMLAudioElement` (feature `wasm`)
//! - Desktop: `jukebox-audio-desktop` (symphonia + cpal)
//!
//! The element reports lifecycle signals through an [`EventSink`]; the
//! controller processes them in [`PlaybackController::pump`]. All state lives
//! in the `Copy` value [`PlayerState`], whose transitions are pure functions.
//!
//! # Example: State transitions
//!
//! ```rust
//! use jukebox_playback::{format_time, PlayerState};
//!
//! let state = PlayerState::default().with_volume(0.8).toggled_mute(0.5);
//! assert!(state.is_muted());
//! assert_eq!(state.toggled_mute(0.5).volume(), 0.8);
//!
//! assert_eq!(format_time(65.0), "01:05");
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use jukebox_playback::{
//!     EventSink, MediaElement, PlayRequest, PlaybackController, PlayerConfig, Playlist, Result,
//!     SubscriptionId, Track,
//! };
//!
//! // Implement MediaElement for your platform
//! struct MyElement {
//!     // ... platform-specific player
//! }
//!
//! impl MediaElement for MyElement {
//!     fn load(&mut self, source_uri: &str) -> Result<()> { /* emit SourceChanged */ Ok(()) }
//!     fn play(&mut self, request: PlayRequest) { /* resolve later via the sink */ }
//!     fn pause(&mut self) {}
//!     fn volume(&self) -> f64 { 1.0 }
//!     fn set_volume(&mut self, volume: f64) {}
//!     fn current_time(&self) -> f64 { 0.0 }
//!     fn set_current_time(&mut self, seconds: f64) {}
//!     fn duration(&self) -> f64 { f64::NAN }
//!     fn subscribe(&mut self, sink: EventSink) -> SubscriptionId { SubscriptionId(0) }
//!     fn unsubscribe(&mut self, id: SubscriptionId) {}
//! }
//!
//! # fn main() -> Result<()> {
//! let playlist = Playlist::new(vec![
//!     Track::new("/audio/one.mp3", "/covers/one.jpg"),
//!     Track::new("/audio/two.mp3", "/covers/two.jpg"),
//! ])?;
//! let mut player = PlaybackController::new(MyElement {}, playlist, PlayerConfig::default())?;
//!
//! player.toggle_playback();
//! player.next()?;
//!
//! // On each platform callback
//! player.pump();
//! for event in player.drain_events() {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

mod controller;
mod element;
mod error;
mod events;
mod format;
mod playlist;
mod state;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use controller::PlaybackController;
pub use element::{EventSink, MediaElement, MediaEvent, PlayOutcome, PlayRequest, SubscriptionId};
pub use error::{PlayerError, Result};
pub use events::PlayerEvent;
pub use format::{format_time, UNKNOWN_TIME};
pub use playlist::Playlist;
pub use state::PlayerState;
pub use types::{PlaybackState, PlayerConfig, StartPolicy, Track};
