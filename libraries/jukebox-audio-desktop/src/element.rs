//! Desktop implementation of the media element

use crate::error::Result;
use crate::loader::{LoadRequest, LoadResult, TrackLoader};
use crate::output::OutputStream;
use crate::playhead::Playhead;
use jukebox_playback::{
    EventSink, MediaElement, MediaEvent, PlayOutcome, PlayRequest, PlayerError, SubscriptionId,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// State shared by the host thread, the loader thread and the audio callback
#[derive(Default)]
struct Shared {
    playhead: Playhead,
    /// Bumped by every `load`; results of older loads are discarded
    generation: u64,
    loading: bool,
    /// Failure of the most recent load
    load_error: Option<String>,
    /// Play requests issued while the source was still loading
    waiting: Vec<PlayRequest>,
    sinks: Vec<(SubscriptionId, EventSink)>,
}

impl Shared {
    fn broadcast(&self, event: &MediaEvent) {
        for (_, sink) in &self.sinks {
            sink.emit(event.clone());
        }
    }

    fn resolve(&self, request: PlayRequest, outcome: PlayOutcome) {
        self.broadcast(&MediaEvent::PlayResolved { request, outcome });
    }

    fn reject_waiting(&mut self, reason: &str) {
        for request in std::mem::take(&mut self.waiting) {
            self.resolve(request, PlayOutcome::Rejected(reason.to_string()));
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Media element backed by symphonia decoding and a cpal output stream
///
/// `load` hands the source to a background [`TrackLoader`]; once decoded,
/// the track is installed and `MetadataLoaded` + `CanPlay` are emitted.
/// `play` resolves `Started` immediately when a track is loaded, waits for
/// a pending load, and is `Rejected` when there is no playable source.
///
/// Sources are file paths, optionally prefixed with `file://`.
pub struct DesktopAudioElement {
    shared: Arc<Mutex<Shared>>,
    loader: TrackLoader,
    output: Option<OutputStream>,
    sample_rate: u32,
    channels: u16,
    next_subscription: u64,
}

impl DesktopAudioElement {
    /// Create an element playing through the default output device
    ///
    /// # Errors
    /// Fails if no output device is available or the stream cannot start.
    pub fn new() -> Result<Self> {
        let shared = Arc::new(Mutex::new(Shared::default()));

        let callback_shared = Arc::clone(&shared);
        let output = OutputStream::open(move |data| render_into(&callback_shared, data))?;
        let format = output.format();

        Self::build(shared, Some(output), format.sample_rate, format.channels)
    }

    /// Create an element without an audio device
    ///
    /// Nothing pulls audio on its own; the host drives rendering through
    /// [`DesktopAudioElement::render`] (offline rendering, tests).
    pub fn headless(sample_rate: u32, channels: u16) -> Result<Self> {
        let shared = Arc::new(Mutex::new(Shared::default()));
        Self::build(shared, None, sample_rate, channels)
    }

    fn build(
        shared: Arc<Mutex<Shared>>,
        output: Option<OutputStream>,
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self> {
        let loader_shared = Arc::clone(&shared);
        let loader = TrackLoader::spawn(move |result| on_loaded(&loader_shared, result))?;

        Ok(Self {
            shared,
            loader,
            output,
            sample_rate,
            channels,
            next_subscription: 0,
        })
    }

    /// Pull the next block of interleaved output audio
    ///
    /// Called by the output stream; also usable directly on a headless
    /// element.
    pub fn render(&self, out: &mut [f32]) {
        render_into(&self.shared, out);
    }

    /// Output sample rate tracks are converted to
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output channel count tracks are converted to
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Whether a decoded track is installed
    pub fn is_loaded(&self) -> bool {
        lock(&self.shared).playhead.is_loaded()
    }

    /// Whether a load is in progress
    pub fn is_loading(&self) -> bool {
        lock(&self.shared).loading
    }

    /// Whether audio is being rendered
    pub fn is_playing(&self) -> bool {
        lock(&self.shared).playhead.is_playing()
    }

    /// Whether a device stream is attached
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }
}

fn source_path(source_uri: &str) -> PathBuf {
    PathBuf::from(source_uri.strip_prefix("file://").unwrap_or(source_uri))
}

/// Render callback body; emits time and end signals
fn render_into(shared: &Mutex<Shared>, out: &mut [f32]) {
    let mut shared = lock(shared);
    let signals = shared.playhead.render(out);
    if signals.time_update {
        shared.broadcast(&MediaEvent::TimeUpdate);
    }
    if signals.ended {
        shared.broadcast(&MediaEvent::Ended);
    }
}

/// Loader completion, runs on the loader thread
fn on_loaded(shared: &Mutex<Shared>, result: LoadResult) {
    let mut shared = lock(shared);
    if result.generation != shared.generation {
        debug!(
            generation = result.generation,
            current = shared.generation,
            "Discarding superseded load"
        );
        return;
    }
    shared.loading = false;

    match result.track {
        Ok(track) => {
            shared.playhead.install(track);
            shared.load_error = None;
            shared.broadcast(&MediaEvent::MetadataLoaded);
            shared.broadcast(&MediaEvent::CanPlay);

            let waiting = std::mem::take(&mut shared.waiting);
            if !waiting.is_empty() {
                shared.playhead.play();
            }
            for request in waiting {
                shared.resolve(request, PlayOutcome::Started);
            }
        }
        Err(e) => {
            let reason = format!("{}: {}", result.path.display(), e);
            shared.reject_waiting(&reason);
            shared.load_error = Some(reason);
        }
    }
}

impl MediaElement for DesktopAudioElement {
    fn load(&mut self, source_uri: &str) -> jukebox_playback::Result<()> {
        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            shared.loading = true;
            shared.load_error = None;
            shared.playhead.clear();
            shared.reject_waiting("Load superseded by a new source");
            // Under the same lock as the render callback, so no signal of
            // the old track can follow it
            shared.broadcast(&MediaEvent::SourceChanged);
            shared.generation
        };

        let path = source_path(source_uri);
        info!(path = %path.display(), generation, "Loading source");

        let queued = self.loader.request_load(LoadRequest {
            generation,
            path,
            target_sample_rate: self.sample_rate,
            target_channels: self.channels,
        });
        if !queued {
            lock(&self.shared).loading = false;
            return Err(PlayerError::Media("Track loader is not running".into()));
        }
        Ok(())
    }

    fn play(&mut self, request: PlayRequest) {
        let mut shared = lock(&self.shared);
        if shared.playhead.play() {
            shared.resolve(request, PlayOutcome::Started);
        } else if shared.loading {
            debug!(request_id = request.id, "Source loading, deferring play");
            shared.waiting.push(request);
        } else {
            let reason = shared
                .load_error
                .clone()
                .unwrap_or_else(|| "No source loaded".to_string());
            warn!(request_id = request.id, %reason, "Cannot play");
            shared.resolve(request, PlayOutcome::Rejected(reason));
        }
    }

    fn pause(&mut self) {
        let mut shared = lock(&self.shared);
        shared.playhead.pause();
        shared.reject_waiting("Play interrupted by pause");
    }

    fn volume(&self) -> f64 {
        lock(&self.shared).playhead.volume() as f64
    }

    fn set_volume(&mut self, volume: f64) {
        lock(&self.shared).playhead.set_volume(volume as f32);
    }

    fn current_time(&self) -> f64 {
        lock(&self.shared).playhead.position_secs()
    }

    fn set_current_time(&mut self, seconds: f64) {
        lock(&self.shared).playhead.seek(seconds);
    }

    fn duration(&self) -> f64 {
        lock(&self.shared)
            .playhead
            .duration_secs()
            .unwrap_or(f64::NAN)
    }

    fn subscribe(&mut self, sink: EventSink) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        lock(&self.shared).sinks.push((id, sink));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        lock(&self.shared).sinks.retain(|(sub, _)| *sub != id);
    }
}
