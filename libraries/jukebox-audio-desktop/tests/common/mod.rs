//! Shared test infrastructure: WAV fixtures and polling helpers

#![allow(dead_code)]

use hound::{WavSpec, WavWriter};
use jukebox_audio_desktop::DesktopAudioElement;
use jukebox_playback::{PlaybackController, PlayerEvent};
use std::path::Path;
use std::time::{Duration, Instant};

/// Write a 16-bit sine WAV file at half amplitude
pub fn generate_test_wav(
    path: &Path,
    sample_rate: u32,
    channels: u16,
    duration_secs: f32,
    frequency: f32,
) -> hound::Result<()> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;

    let num_frames = (sample_rate as f32 * duration_secs) as usize;
    for i in 0..num_frames {
        let t = i as f32 / sample_rate as f32;
        let sample = (t * frequency * 2.0 * std::f32::consts::PI).sin();
        let amplitude = (i16::MAX as f32 * 0.5 * sample) as i16;
        for _ in 0..channels {
            writer.write_sample(amplitude)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Pump the controller until `done` holds or `timeout` elapses
///
/// Every drained player event is appended to `events`.
pub fn pump_until<F>(
    controller: &mut PlaybackController<DesktopAudioElement>,
    events: &mut Vec<PlayerEvent>,
    timeout: Duration,
    done: F,
) -> bool
where
    F: Fn(&PlaybackController<DesktopAudioElement>, &[PlayerEvent]) -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        controller.pump();
        events.extend(controller.drain_events());
        if done(controller, events) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

/// Render `seconds` of audio in callback-sized blocks
pub fn render_secs(element: &DesktopAudioElement, seconds: f64) {
    let channels = element.channels() as usize;
    let total_frames = (seconds * element.sample_rate() as f64).round() as usize;
    let block_frames = 256;

    let mut buffer = vec![0.0f32; block_frames * channels];
    let mut rendered = 0;
    while rendered < total_frames {
        let frames = block_frames.min(total_frames - rendered);
        element.render(&mut buffer[..frames * channels]);
        rendered += frames;
    }
}

pub const TIMEOUT: Duration = Duration::from_secs(10);
