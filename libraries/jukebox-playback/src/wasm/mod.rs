//! WASM bindings for jukebox-playback
//!
//! This module provides the browser implementation of [`crate::MediaElement`]
//! on top of `HTMLAudioElement`, and a JavaScript-facing player wrapping the
//! controller.

pub mod element;
pub mod player;
pub mod types;

pub use element::WebAudioElement;
pub use player::WasmPlayer;
pub use types::WasmTrack;
