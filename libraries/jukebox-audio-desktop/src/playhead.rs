//! Render state shared by the output callback and the element
//!
//! `Playhead::render` is pure bookkeeping over an already converted track:
//! it copies frames, applies volume, advances the cursor and reports which
//! lifecycle signals the caller should emit. It never blocks and never
//! allocates, so it is safe to call from the real-time audio callback.

use crate::decoder::DecodedTrack;

/// Rendered audio between two time updates, in seconds
pub const TICK_INTERVAL_SECS: f64 = 0.25;

/// Signals produced by one render call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSignals {
    pub time_update: bool,
    pub ended: bool,
}

/// Playback position over a decoded track
#[derive(Debug)]
pub struct Playhead {
    track: Option<DecodedTrack>,
    /// Frame index of the next frame to render
    cursor: usize,
    playing: bool,
    ended: bool,
    volume: f32,
    frames_since_tick: usize,
}

impl Default for Playhead {
    fn default() -> Self {
        Self::new()
    }
}

impl Playhead {
    pub fn new() -> Self {
        Self {
            track: None,
            cursor: 0,
            playing: false,
            ended: false,
            volume: 1.0,
            frames_since_tick: 0,
        }
    }

    // ===== Source =====

    /// Replace the current track, paused at the start
    pub fn install(&mut self, track: DecodedTrack) {
        self.track = Some(track);
        self.rewind();
    }

    /// Drop the current track; duration becomes unknown
    pub fn clear(&mut self) {
        self.track = None;
        self.rewind();
    }

    pub fn is_loaded(&self) -> bool {
        self.track.is_some()
    }

    // ===== Transport =====

    /// Start rendering; a finished track restarts from the beginning
    ///
    /// Returns false when nothing is loaded.
    pub fn play(&mut self) -> bool {
        let Some(track) = &self.track else {
            return false;
        };
        if self.cursor >= track.frames() {
            self.cursor = 0;
        }
        self.ended = false;
        self.playing = true;
        true
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Move to `seconds`, clamped to the track
    pub fn seek(&mut self, seconds: f64) {
        let Some(track) = &self.track else {
            return;
        };
        let target = if seconds.is_finite() {
            (seconds.max(0.0) * track.sample_rate as f64).round() as usize
        } else {
            0
        };
        self.cursor = target.min(track.frames());
        self.ended = false;
    }

    /// Elapsed seconds; 0 without a track
    pub fn position_secs(&self) -> f64 {
        match &self.track {
            Some(track) if track.sample_rate > 0 => self.cursor as f64 / track.sample_rate as f64,
            _ => 0.0,
        }
    }

    /// Total seconds, `None` without a track
    pub fn duration_secs(&self) -> Option<f64> {
        self.track.as_ref().map(DecodedTrack::duration_secs)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    // ===== Rendering =====

    /// Fill `out` (interleaved, track channel layout) and advance
    ///
    /// Outputs silence while paused or unloaded.
    pub fn render(&mut self, out: &mut [f32]) -> RenderSignals {
        let mut signals = RenderSignals::default();

        let Some(track) = self.track.as_ref().filter(|_| self.playing) else {
            out.fill(0.0);
            return signals;
        };

        let channels = (track.channels as usize).max(1);
        let total = track.frames();
        let frames = (out.len() / channels).min(total.saturating_sub(self.cursor));

        let start = self.cursor * channels;
        let len = frames * channels;
        for (dst, src) in out[..len].iter_mut().zip(&track.samples[start..start + len]) {
            *dst = src * self.volume;
        }
        out[len..].fill(0.0);

        self.cursor += frames;
        self.frames_since_tick += frames;

        let tick_frames = ((track.sample_rate as f64 * TICK_INTERVAL_SECS) as usize).max(1);
        if self.frames_since_tick >= tick_frames {
            self.frames_since_tick %= tick_frames;
            signals.time_update = true;
        }

        if self.cursor >= total {
            self.playing = false;
            if !self.ended {
                self.ended = true;
                signals.time_update = true;
                signals.ended = true;
            }
        }

        signals
    }

    fn rewind(&mut self) {
        self.cursor = 0;
        self.playing = false;
        self.ended = false;
        self.frames_since_tick = 0;
    }
}
