//! Playback controller - core orchestration
//!
//! Mediates user intents into calls on the media element and mirrors the
//! element's asynchronous outcomes back into [`PlayerState`].

use crate::{
    element::{EventSink, MediaElement, MediaEvent, PlayOutcome, PlayRequest, SubscriptionId},
    error::{PlayerError, Result},
    events::PlayerEvent,
    playlist::Playlist,
    state::PlayerState,
    types::{PlaybackState, PlayerConfig, StartPolicy, Track},
};
use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

/// Central playback control
///
/// Owns the media element exclusively. Single-threaded: every operation runs
/// on the owner's thread and none of them block. Media signals queue up in
/// the subscription channel until [`PlaybackController::pump`] (or
/// [`PlaybackController::handle_event`]) processes them.
pub struct PlaybackController<M: MediaElement> {
    element: M,
    playlist: Playlist,
    config: PlayerConfig,
    state: PlayerState,

    // Media signal subscription, released on drop
    media_events: Receiver<MediaEvent>,
    subscription: Option<SubscriptionId>,
    /// Loads whose `SourceChanged` has not been received yet
    stale_sources: usize,

    // Play request bookkeeping
    next_request_id: u64,
    pending_play: Option<PlayRequest>,
    awaiting_ready: Option<usize>,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl<M: MediaElement> PlaybackController<M> {
    /// Create a controller around `element`
    ///
    /// Subscribes to the element's signals, applies the initial volume and
    /// assigns the start track's source without playing it.
    pub fn new(mut element: M, playlist: Playlist, config: PlayerConfig) -> Result<Self> {
        config.validate()?;
        playlist.check_index(config.start_index)?;

        let (sink, media_events) = EventSink::channel();
        let subscription = element.subscribe(sink);

        let state = PlayerState::new(&config);
        element.set_volume(state.volume());
        let mut stale_sources = 0;
        if let Some(track) = playlist.get(state.current_index()) {
            stale_sources += 1;
            element.load(&track.source_uri)?;
        }

        info!(
            tracks = playlist.len(),
            start_index = config.start_index,
            policy = ?config.start_policy,
            "Playback controller ready"
        );

        Ok(Self {
            element,
            playlist,
            config,
            state,
            media_events,
            subscription: Some(subscription),
            stale_sources,
            next_request_id: 0,
            pending_play: None,
            awaiting_ready: None,
            pending_events: Vec::new(),
        })
    }

    // ===== Playback Control =====

    /// Pause when playing, otherwise request playback
    ///
    /// Pausing is synchronous. Playing is confirmed later by the element; a
    /// rejection leaves the player paused and can be retried by calling this
    /// again.
    pub fn toggle_playback(&mut self) {
        if self.state.is_playing() {
            self.element.pause();
            self.pending_play = None;
            self.awaiting_ready = None;
            self.set_playback(PlaybackState::Paused);
        } else {
            self.awaiting_ready = None;
            self.request_play();
        }
    }

    /// Switch to the track at `index` and start it
    ///
    /// Selecting the track that is already playing does nothing.
    ///
    /// # Errors
    /// `TrackOutOfRange` for an index outside the playlist (state untouched).
    /// `Media` if the element refuses the source: the current index and
    /// timeline are kept, and the player is paused since the element has
    /// dropped the old source.
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        self.playlist.check_index(index)?;

        let previous_index = self.state.current_index();
        if index == previous_index && self.state.is_playing() {
            debug!(index, "Track already playing, ignoring selection");
            return Ok(());
        }

        let source_uri = self.track_source(index)?;

        // Any in-flight request belongs to the old source
        self.pending_play = None;
        self.awaiting_ready = None;

        info!(index, source = %source_uri, "Switching track");

        self.stale_sources += 1;
        if let Err(e) = self.element.load(&source_uri) {
            warn!(index, error = %e, "Media element refused source");
            self.set_playback(PlaybackState::Paused);
            return Err(e);
        }

        self.state = self.state.with_track(index);
        self.emit(PlayerEvent::TrackChanged {
            index,
            previous_index,
        });
        self.emit(PlayerEvent::TimeUpdated { current_time: 0.0 });
        self.emit(PlayerEvent::DurationChanged { duration: 0.0 });
        self.emit_state_changed();

        self.element.set_volume(self.state.volume());

        match self.config.start_policy {
            StartPolicy::AwaitReady => self.awaiting_ready = Some(index),
            StartPolicy::Immediate => self.request_play(),
        }

        Ok(())
    }

    /// Skip to the next track, wrapping to the first
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        let index = self.playlist.next_index(self.state.current_index());
        self.select_track(index)
    }

    /// Go back to the previous track, wrapping to the last
    pub fn previous(&mut self) -> Result<()> {
        let index = self.playlist.previous_index(self.state.current_index());
        self.select_track(index)
    }

    // ===== Volume =====

    /// Set volume (0.0-1.0, clamped)
    ///
    /// A nonzero volume is also remembered for unmute.
    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        if volume.is_nan() {
            return Err(PlayerError::InvalidVolume(volume));
        }

        self.state = self.state.with_volume(volume);
        self.apply_volume();
        Ok(())
    }

    /// Mute, or restore the last nonzero volume
    pub fn toggle_mute(&mut self) {
        self.state = self.state.toggled_mute(self.config.fallback_volume);
        self.apply_volume();
    }

    // ===== Seek =====

    /// Jump to `seconds` (optimistic: mirrored before the element confirms)
    ///
    /// Clamped to zero, and to the duration once it is known.
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        if seconds.is_nan() {
            return Err(PlayerError::InvalidSeekPosition(seconds));
        }

        self.state = self.state.with_time(seconds);
        let target = self.state.current_time();
        self.element.set_current_time(target);
        self.emit(PlayerEvent::TimeUpdated {
            current_time: target,
        });
        Ok(())
    }

    /// Move the element's position by `delta_seconds`, never below zero
    ///
    /// There is no upper clamp: seeking past the end is left to the element,
    /// which then signals the end of the track.
    pub fn skip_by(&mut self, delta_seconds: f64) -> Result<()> {
        if delta_seconds.is_nan() {
            return Err(PlayerError::InvalidSeekPosition(delta_seconds));
        }

        // f64::max ignores a NaN position from an element without a source
        let target = (self.element.current_time() + delta_seconds).max(0.0);
        self.element.set_current_time(target);

        self.state = self.state.with_time(target);
        self.emit(PlayerEvent::TimeUpdated {
            current_time: self.state.current_time(),
        });
        Ok(())
    }

    /// Skip ahead by the configured step
    pub fn skip_forward(&mut self) -> Result<()> {
        self.skip_by(self.config.skip_step_secs)
    }

    /// Skip back by the configured step
    pub fn skip_backward(&mut self) -> Result<()> {
        self.skip_by(-self.config.skip_step_secs)
    }

    // ===== Media Signals =====

    /// Process every queued media signal
    ///
    /// Returns the number of signals handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.media_events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Dispatch one media signal
    ///
    /// Source signals queued before the latest load's `SourceChanged` are
    /// dropped.
    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::SourceChanged => {
                self.stale_sources = self.stale_sources.saturating_sub(1);
            }
            MediaEvent::PlayResolved { request, outcome } => {
                self.on_play_resolved(request, outcome);
            }
            _ if self.stale_sources > 0 => {
                debug!(?event, "Ignoring signal from a replaced source");
            }
            MediaEvent::MetadataLoaded => self.on_metadata_loaded(),
            MediaEvent::TimeUpdate => self.on_time_tick(),
            MediaEvent::Ended => self.on_track_ended(),
            MediaEvent::CanPlay => self.on_can_play(),
        }
    }

    /// Store the element's duration; unknown durations become 0
    pub fn on_metadata_loaded(&mut self) {
        self.state = self.state.with_duration(self.element.duration());
        self.emit(PlayerEvent::DurationChanged {
            duration: self.state.duration(),
        });
    }

    /// Mirror the element's elapsed time
    pub fn on_time_tick(&mut self) {
        self.state = self.state.with_time(self.element.current_time());
        self.emit(PlayerEvent::TimeUpdated {
            current_time: self.state.current_time(),
        });
    }

    /// Continue with the next track (circular)
    pub fn on_track_ended(&mut self) {
        // The element stopped by itself; without this a one-track playlist
        // would hit the already-playing guard and never restart.
        self.pending_play = None;
        self.state = self.state.with_playback(PlaybackState::Paused);

        if let Err(e) = self.next() {
            warn!(error = %e, "Failed to advance after track ended");
        }
    }

    fn on_can_play(&mut self) {
        match self.awaiting_ready {
            Some(index) if index == self.state.current_index() => {
                self.awaiting_ready = None;
                debug!(index, "Source ready, requesting playback");
                self.request_play();
            }
            _ => debug!("Readiness signal with no pending start, ignoring"),
        }
    }

    fn on_play_resolved(&mut self, request: PlayRequest, outcome: PlayOutcome) {
        let is_current = self.pending_play == Some(request)
            && request.track_index == self.state.current_index();
        if !is_current {
            debug!(
                request_id = request.id,
                track_index = request.track_index,
                "Ignoring stale play resolution"
            );
            return;
        }
        self.pending_play = None;

        match outcome {
            PlayOutcome::Started => self.set_playback(PlaybackState::Playing),
            PlayOutcome::Rejected(reason) => {
                warn!(index = request.track_index, %reason, "Play request rejected");
                self.set_playback(PlaybackState::Paused);
                self.emit(PlayerEvent::PlayRejected {
                    index: request.track_index,
                    reason,
                });
            }
        }
    }

    // ===== State Queries =====

    /// Current state snapshot
    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Track at the current index
    pub fn current_track(&self) -> &Track {
        &self.playlist.tracks()[self.state.current_index()]
    }

    /// Read-only access to the owned element
    pub fn element(&self) -> &M {
        &self.element
    }

    /// Play request awaiting resolution, if any
    pub fn pending_play(&self) -> Option<PlayRequest> {
        self.pending_play
    }

    /// Whether a track switch is waiting for the element's readiness signal
    pub fn is_awaiting_ready(&self) -> bool {
        self.awaiting_ready.is_some()
    }

    // ===== Events =====

    /// Drain all pending player events
    ///
    /// Returns all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending player events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn request_play(&mut self) {
        let request = PlayRequest {
            id: self.next_request_id,
            track_index: self.state.current_index(),
        };
        self.next_request_id += 1;
        self.pending_play = Some(request);

        debug!(request_id = request.id, track_index = request.track_index, "Requesting playback");
        self.element.play(request);
    }

    fn track_source(&self, index: usize) -> Result<String> {
        self.playlist
            .get(index)
            .map(|track| track.source_uri.clone())
            .ok_or(PlayerError::TrackOutOfRange {
                index,
                len: self.playlist.len(),
            })
    }

    fn apply_volume(&mut self) {
        self.element.set_volume(self.state.volume());
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.state.volume(),
            is_muted: self.state.is_muted(),
        });
    }

    fn set_playback(&mut self, playback: PlaybackState) {
        if self.state.playback() != playback {
            self.state = self.state.with_playback(playback);
            self.emit_state_changed();
        }
    }

    fn emit_state_changed(&mut self) {
        self.emit(PlayerEvent::StateChanged {
            state: self.state.playback(),
        });
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }
}

impl<M: MediaElement> Drop for PlaybackController<M> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.element.unsubscribe(id);
        }
    }
}
