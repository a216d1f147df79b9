//! Platform-agnostic media element trait
//!
//! Abstracts the native playback primitive (an `HTMLAudioElement` in the
//! browser, a decoder + audio device on desktop). The controller drives it
//! through four capabilities:
//!
//! 1. assign a source and trigger loading ([`MediaElement::load`])
//! 2. play (asynchronous outcome) and pause (synchronous)
//! 3. read/write volume and playback position
//! 4. lifecycle signals, delivered as [`MediaEvent`]s through an [`EventSink`]

use crate::error::Result;
use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Ticket attached to a play call
///
/// The element hands it back unchanged in [`MediaEvent::PlayResolved`], which
/// lets the controller discard resolutions that were overtaken by a newer
/// request or a track switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayRequest {
    /// Monotonic per controller
    pub id: u64,

    /// Track that was current when the request was issued
    pub track_index: usize,
}

/// Outcome of a play request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayOutcome {
    /// Playback started
    Started,

    /// The platform refused to play (autoplay policy, unloadable source, ...)
    Rejected(String),
}

/// Lifecycle signals emitted by a media element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// The previous source was dropped by [`MediaElement::load`]
    ///
    /// Every other signal queued before it belongs to the old source.
    SourceChanged,

    /// Total duration became available
    MetadataLoaded,

    /// Playback position advanced (platform cadence)
    TimeUpdate,

    /// Playback reached the end of the source
    Ended,

    /// Enough of the current source is buffered to start playing
    CanPlay,

    /// A play request settled
    PlayResolved {
        request: PlayRequest,
        outcome: PlayOutcome,
    },
}

/// Identifies one subscription on an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Sending half of a media event subscription
///
/// Cheap to clone; elements hand clones to whatever thread or callback
/// observes the underlying primitive.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<MediaEvent>,
}

impl EventSink {
    /// Create a connected sink/receiver pair
    pub fn channel() -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }

    /// Deliver an event
    ///
    /// Returns false once the subscriber is gone.
    pub fn emit(&self, event: MediaEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Native playback primitive
///
/// Implementors must never call back into the controller synchronously:
/// every signal, including play resolution, goes through the subscribed
/// [`EventSink`].
pub trait MediaElement {
    /// Assign a new source and start loading it
    ///
    /// Stops whatever was playing. Duration becomes unknown until the next
    /// [`MediaEvent::MetadataLoaded`].
    ///
    /// Must emit [`MediaEvent::SourceChanged`] before returning, even when
    /// the source is refused, and after the last signal of the old source.
    fn load(&mut self, source_uri: &str) -> Result<()>;

    /// Request playback
    ///
    /// The outcome is reported later as [`MediaEvent::PlayResolved`] carrying
    /// `request`. Playing a source that is still loading waits for it.
    fn play(&mut self, request: PlayRequest);

    /// Pause playback (takes effect immediately)
    fn pause(&mut self);

    /// Output volume, 0.0-1.0
    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);

    /// Elapsed time of the current source, in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position, in seconds
    fn set_current_time(&mut self, seconds: f64);

    /// Total duration in seconds; NaN while unknown
    fn duration(&self) -> f64;

    /// Start delivering lifecycle signals to `sink`
    fn subscribe(&mut self, sink: EventSink) -> SubscriptionId;

    /// Stop delivering signals for `id`
    fn unsubscribe(&mut self, id: SubscriptionId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_reports_disconnect() {
        let (sink, rx) = EventSink::channel();
        assert!(sink.emit(MediaEvent::CanPlay));
        assert_eq!(rx.try_recv().unwrap(), MediaEvent::CanPlay);

        drop(rx);
        assert!(!sink.emit(MediaEvent::Ended));
    }

    #[test]
    fn cloned_sinks_share_receiver() {
        let (sink, rx) = EventSink::channel();
        let other = sink.clone();
        sink.emit(MediaEvent::MetadataLoaded);
        other.emit(MediaEvent::TimeUpdate);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![MediaEvent::MetadataLoaded, MediaEvent::TimeUpdate]);
    }
}
