//! WASM-compatible player wrapper

use super::element::WebAudioElement;
use super::types::WasmTrack;
use crate::{
    format_time, PlaybackController, PlaybackState, PlayerConfig, PlayerError, Playlist, Track,
};
use js_sys::Function;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

type ControllerCell = RefCell<PlaybackController<WebAudioElement>>;
type SharedController = Rc<ControllerCell>;
type ChangeCallback = Rc<RefCell<Option<Function>>>;

/// WASM-compatible player
///
/// Wraps the playback controller with a JavaScript-friendly API. Media
/// signals are processed on a microtask after they fire; every resulting
/// player event is passed to the `onChange` callback as a plain object.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: SharedController,
    on_change: ChangeCallback,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player with its own `<audio>` element
    ///
    /// `tracks`: array of `{ sourceUri, coverUri }`.
    /// `config`: optional partial `PlayerConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(tracks: JsValue, config: JsValue) -> Result<WasmPlayer, JsValue> {
        let element = WebAudioElement::new()?;
        Self::build(element, tracks, config)
    }

    /// Create a player driving an existing `<audio>` element
    #[wasm_bindgen(js_name = withElement)]
    pub fn with_element(
        audio: HtmlAudioElement,
        tracks: JsValue,
        config: JsValue,
    ) -> Result<WasmPlayer, JsValue> {
        Self::build(WebAudioElement::from_element(audio), tracks, config)
    }

    // ===== Playback Control =====

    /// Play when paused, pause when playing
    #[wasm_bindgen(js_name = togglePlayback)]
    pub fn toggle_playback(&self) {
        self.inner.borrow_mut().toggle_playback();
        self.flush();
    }

    /// Switch to the track at `index`
    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&self, index: usize) -> Result<(), JsValue> {
        let result = self.inner.borrow_mut().select_track(index);
        self.flush();
        result.map_err(to_js_error)
    }

    /// Skip to next track (wraps)
    pub fn next(&self) -> Result<(), JsValue> {
        let result = self.inner.borrow_mut().next();
        self.flush();
        result.map_err(to_js_error)
    }

    /// Go to previous track (wraps)
    pub fn previous(&self) -> Result<(), JsValue> {
        let result = self.inner.borrow_mut().previous();
        self.flush();
        result.map_err(to_js_error)
    }

    // ===== Volume Control =====

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) -> Result<(), JsValue> {
        let result = self.inner.borrow_mut().set_volume(volume);
        self.flush();
        result.map_err(to_js_error)
    }

    /// Toggle mute
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) {
        self.inner.borrow_mut().toggle_mute();
        self.flush();
    }

    // ===== Seeking =====

    /// Seek to position in seconds
    pub fn seek(&self, seconds: f64) -> Result<(), JsValue> {
        let result = self.inner.borrow_mut().seek(seconds);
        self.flush();
        result.map_err(to_js_error)
    }

    /// Move the position by `delta` seconds
    #[wasm_bindgen(js_name = skipBy)]
    pub fn skip_by(&self, delta: f64) -> Result<(), JsValue> {
        let result = self.inner.borrow_mut().skip_by(delta);
        self.flush();
        result.map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = skipForward)]
    pub fn skip_forward(&self) -> Result<(), JsValue> {
        let result = self.inner.borrow_mut().skip_forward();
        self.flush();
        result.map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = skipBackward)]
    pub fn skip_backward(&self) -> Result<(), JsValue> {
        let result = self.inner.borrow_mut().skip_backward();
        self.flush();
        result.map_err(to_js_error)
    }

    // ===== State Queries =====

    /// Current state as "paused" | "loading" | "playing"
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        match self.inner.borrow().state().playback() {
            PlaybackState::Paused => "paused".to_string(),
            PlaybackState::Loading => "loading".to_string(),
            PlaybackState::Playing => "playing".to_string(),
        }
    }

    #[wasm_bindgen(getter, js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.borrow().state().is_playing()
    }

    #[wasm_bindgen(getter, js_name = currentIndex)]
    pub fn current_index(&self) -> usize {
        self.inner.borrow().state().current_index()
    }

    #[wasm_bindgen(getter)]
    pub fn volume(&self) -> f64 {
        self.inner.borrow().state().volume()
    }

    #[wasm_bindgen(getter, js_name = volumePercent)]
    pub fn volume_percent(&self) -> u8 {
        self.inner.borrow().state().volume_percent()
    }

    #[wasm_bindgen(getter, js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.inner.borrow().state().is_muted()
    }

    #[wasm_bindgen(getter, js_name = currentTime)]
    pub fn current_time(&self) -> f64 {
        self.inner.borrow().state().current_time()
    }

    /// Duration in seconds, 0 while unknown
    #[wasm_bindgen(getter)]
    pub fn duration(&self) -> f64 {
        self.inner.borrow().state().duration()
    }

    /// Whether the seek bar should be enabled
    #[wasm_bindgen(getter, js_name = canSeek)]
    pub fn can_seek(&self) -> bool {
        self.inner.borrow().state().can_seek()
    }

    #[wasm_bindgen(getter, js_name = elapsedLabel)]
    pub fn elapsed_label(&self) -> String {
        self.inner.borrow().state().elapsed_label()
    }

    #[wasm_bindgen(getter, js_name = durationLabel)]
    pub fn duration_label(&self) -> String {
        self.inner.borrow().state().duration_label()
    }

    #[wasm_bindgen(getter, js_name = currentTrack)]
    pub fn current_track(&self) -> WasmTrack {
        WasmTrack::from(self.inner.borrow().current_track())
    }

    /// All playlist entries as plain objects
    #[wasm_bindgen(getter)]
    pub fn tracks(&self) -> JsValue {
        let tracks: Vec<WasmTrack> = self
            .inner
            .borrow()
            .playlist()
            .tracks()
            .iter()
            .map(WasmTrack::from)
            .collect();

        serde_wasm_bindgen::to_value(&tracks).unwrap_or(JsValue::NULL)
    }

    /// Format seconds as `MM:SS`
    #[wasm_bindgen(js_name = formatTime)]
    pub fn format_time(seconds: f64) -> String {
        format_time(seconds)
    }

    // ===== Event Listeners =====

    /// Register the change callback, called once per player event
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) {
        *self.on_change.borrow_mut() = Some(callback);
    }
}

impl WasmPlayer {
    fn build(element: WebAudioElement, tracks: JsValue, config: JsValue) -> Result<Self, JsValue> {
        console_error_panic_hook::set_once();

        let tracks: Vec<Track> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;
        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };

        let playlist = Playlist::new(tracks).map_err(to_js_error)?;
        let controller = PlaybackController::new(element, playlist, config).map_err(to_js_error)?;

        let inner: SharedController = Rc::new(RefCell::new(controller));
        let on_change: ChangeCallback = Rc::new(RefCell::new(None));

        let weak = Rc::downgrade(&inner);
        let callback = on_change.clone();
        inner.borrow().element().set_signal_hook(move || {
            schedule_flush(weak.clone(), callback.clone());
        });

        Ok(Self { inner, on_change })
    }

    fn flush(&self) {
        flush(&self.inner, &self.on_change);
    }
}

/// Pump on a microtask, outside any borrow held by the caller
fn schedule_flush(inner: Weak<ControllerCell>, on_change: ChangeCallback) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Some(inner) = inner.upgrade() {
            flush(&inner, &on_change);
        }
    });
}

fn flush(inner: &SharedController, on_change: &ChangeCallback) {
    let events = {
        let mut controller = inner.borrow_mut();
        controller.pump();
        controller.drain_events()
    };

    // Callback may call back into the player, so no borrow is held here
    let callback = on_change.borrow().clone();
    if let Some(callback) = callback {
        for event in events {
            if let Ok(value) = serde_wasm_bindgen::to_value(&event) {
                callback.call1(&JsValue::NULL, &value).ok();
            }
        }
    }
}

fn to_js_error(error: PlayerError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
