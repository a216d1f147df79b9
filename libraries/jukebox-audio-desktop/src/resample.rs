//! Sample rate and channel layout conversion
//!
//! Decoded tracks are converted once, on the loader thread, to the output
//! device's rate and channel count so the render callback only copies.

use crate::decoder::DecodedTrack;
use crate::error::{AudioError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Convert `track` to `target_rate`, identity when the rates already match
pub fn resample(track: DecodedTrack, target_rate: u32) -> Result<DecodedTrack> {
    if target_rate == 0 {
        return Err(AudioError::Resample("Target sample rate is zero".into()));
    }
    if track.sample_rate == target_rate || track.frames() == 0 {
        return Ok(DecodedTrack {
            sample_rate: target_rate,
            ..track
        });
    }

    let channels = track.channels as usize;
    let frames = track.frames();
    let ratio = target_rate as f64 / track.sample_rate as f64;

    let params = SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Cubic,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, frames, channels)?;

    // Deinterleave
    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in track.samples.chunks_exact(channels) {
        for (ch, sample) in frame.iter().enumerate() {
            planar[ch].push(*sample);
        }
    }

    let mut output = resampler.process(&planar, None)?;
    let tail = resampler.process_partial(None::<&[Vec<f32>]>, None)?;
    for (channel, rest) in output.iter_mut().zip(tail) {
        channel.extend(rest);
    }

    // Drop the filter delay and the padding of the flushed tail
    let delay = resampler.output_delay();
    let expected = (frames as f64 * ratio).round() as usize;

    let mut samples = Vec::with_capacity(expected * channels);
    for frame in delay..(delay + expected) {
        for channel in &output {
            samples.push(channel.get(frame).copied().unwrap_or(0.0));
        }
    }

    Ok(DecodedTrack::new(samples, target_rate, track.channels))
}

/// Adapt interleaved samples from `from` to `to` channels
///
/// Mono is duplicated to every output channel; a mono output averages all
/// inputs. Otherwise channels are mapped by position, repeating the input
/// layout when the output is wider.
pub fn adapt_channels(track: DecodedTrack, to: u16) -> DecodedTrack {
    let from = track.channels as usize;
    let to_count = to as usize;
    if from == to_count || from == 0 || to_count == 0 {
        return track;
    }

    let mut samples = Vec::with_capacity(track.frames() * to_count);
    for frame in track.samples.chunks_exact(from) {
        if to_count == 1 {
            samples.push(frame.iter().sum::<f32>() / from as f32);
        } else {
            samples.extend((0..to_count).map(|ch| frame[ch % from]));
        }
    }

    DecodedTrack::new(samples, track.sample_rate, to)
}
