//! Shared test infrastructure
//!
//! `ScriptedElement` is a media element whose clock and signals are driven
//! by the test through a `ElementHandle` that stays valid after the element
//! has been moved into the controller.

#![allow(dead_code)]

use jukebox_playback::{
    EventSink, MediaElement, MediaEvent, PlayOutcome, PlayRequest, PlaybackController,
    PlayerConfig, PlayerError, Playlist, Result, SubscriptionId, Track,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct ElementLog {
    pub loads: Vec<String>,
    pub plays: Vec<PlayRequest>,
    pub pauses: usize,
    pub volume: f64,
    pub position: f64,
    /// NaN until the test reports metadata
    pub duration: f64,
    pub sinks: Vec<(SubscriptionId, EventSink)>,
    pub unsubscribed: Vec<SubscriptionId>,
    pub fail_next_load: bool,
    next_subscription: u64,
}

/// Media element driven entirely by the test
pub struct ScriptedElement {
    log: Rc<RefCell<ElementLog>>,
}

/// Test-side view of a `ScriptedElement`
#[derive(Clone)]
pub struct ElementHandle {
    log: Rc<RefCell<ElementLog>>,
}

impl ScriptedElement {
    pub fn new() -> (Self, ElementHandle) {
        let log = Rc::new(RefCell::new(ElementLog {
            duration: f64::NAN,
            ..Default::default()
        }));
        (Self { log: log.clone() }, ElementHandle { log })
    }
}

impl MediaElement for ScriptedElement {
    fn load(&mut self, source_uri: &str) -> Result<()> {
        let mut log = self.log.borrow_mut();
        for (_, sink) in &log.sinks {
            sink.emit(MediaEvent::SourceChanged);
        }
        if log.fail_next_load {
            log.fail_next_load = false;
            return Err(PlayerError::Media(format!("cannot load {}", source_uri)));
        }
        log.loads.push(source_uri.to_string());
        log.position = 0.0;
        log.duration = f64::NAN;
        Ok(())
    }

    fn play(&mut self, request: PlayRequest) {
        self.log.borrow_mut().plays.push(request);
    }

    fn pause(&mut self) {
        self.log.borrow_mut().pauses += 1;
    }

    fn volume(&self) -> f64 {
        self.log.borrow().volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.log.borrow_mut().volume = volume;
    }

    fn current_time(&self) -> f64 {
        self.log.borrow().position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.log.borrow_mut().position = seconds;
    }

    fn duration(&self) -> f64 {
        self.log.borrow().duration
    }

    fn subscribe(&mut self, sink: EventSink) -> SubscriptionId {
        let mut log = self.log.borrow_mut();
        let id = SubscriptionId(log.next_subscription);
        log.next_subscription += 1;
        log.sinks.push((id, sink));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        let mut log = self.log.borrow_mut();
        log.sinks.retain(|(sub, _)| *sub != id);
        log.unsubscribed.push(id);
    }
}

impl ElementHandle {
    pub fn loads(&self) -> Vec<String> {
        self.log.borrow().loads.clone()
    }

    pub fn plays(&self) -> Vec<PlayRequest> {
        self.log.borrow().plays.clone()
    }

    pub fn last_play(&self) -> PlayRequest {
        *self.log.borrow().plays.last().expect("no play request issued")
    }

    pub fn pauses(&self) -> usize {
        self.log.borrow().pauses
    }

    pub fn volume(&self) -> f64 {
        self.log.borrow().volume
    }

    pub fn position(&self) -> f64 {
        self.log.borrow().position
    }

    pub fn subscriber_count(&self) -> usize {
        self.log.borrow().sinks.len()
    }

    pub fn unsubscribed(&self) -> Vec<SubscriptionId> {
        self.log.borrow().unsubscribed.clone()
    }

    pub fn fail_next_load(&self) {
        self.log.borrow_mut().fail_next_load = true;
    }

    /// Deliver a signal to every subscriber
    pub fn emit(&self, event: MediaEvent) {
        for (_, sink) in &self.log.borrow().sinks {
            sink.emit(event.clone());
        }
    }

    /// Report the source's duration and signal it
    pub fn load_metadata(&self, duration: f64) {
        self.log.borrow_mut().duration = duration;
        self.emit(MediaEvent::MetadataLoaded);
    }

    /// Advance the clock and signal a time update
    pub fn tick_to(&self, seconds: f64) {
        self.log.borrow_mut().position = seconds;
        self.emit(MediaEvent::TimeUpdate);
    }

    pub fn resolve(&self, request: PlayRequest, outcome: PlayOutcome) {
        self.emit(MediaEvent::PlayResolved { request, outcome });
    }

    /// Confirm the most recent play request
    pub fn start_last(&self) {
        self.resolve(self.last_play(), PlayOutcome::Started);
    }

    pub fn reject_last(&self, reason: &str) {
        self.resolve(self.last_play(), PlayOutcome::Rejected(reason.to_string()));
    }
}

pub fn tracks(count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| Track::new(format!("/audio/track{}.mp3", i), format!("/icons/cover{}.jpg", i)))
        .collect()
}

pub fn playlist(count: usize) -> Playlist {
    Playlist::new(tracks(count)).unwrap()
}

pub fn controller_with(
    count: usize,
    config: PlayerConfig,
) -> (PlaybackController<ScriptedElement>, ElementHandle) {
    let (element, handle) = ScriptedElement::new();
    let mut controller = PlaybackController::new(element, playlist(count), config).unwrap();
    // Consume the mount load's SourceChanged
    controller.pump();
    (controller, handle)
}

pub fn controller(count: usize) -> (PlaybackController<ScriptedElement>, ElementHandle) {
    controller_with(count, PlayerConfig::default())
}

/// Bring the player to Playing on the current track
pub fn start_playing(controller: &mut PlaybackController<ScriptedElement>, handle: &ElementHandle) {
    controller.toggle_playback();
    handle.start_last();
    controller.pump();
    assert!(controller.state().is_playing());
}
