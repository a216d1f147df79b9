//! Integration tests for decoding and track preparation
//!
//! These tests verify real behavior with WAV files written by hound.

mod common;

use common::generate_test_wav;
use jukebox_audio_desktop::{decode_file, AudioError, LoadRequest, TrackLoader};
use tempfile::TempDir;

#[test]
fn decodes_stereo_wav() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stereo.wav");
    generate_test_wav(&path, 44100, 2, 1.0, 440.0).unwrap();

    let track = decode_file(&path).expect("Failed to decode test file");

    assert_eq!(track.sample_rate, 44100);
    assert_eq!(track.channels, 2);
    assert_eq!(track.frames(), 44100);
    assert!((track.duration_secs() - 1.0).abs() < 1e-6);

    let peak = track.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    assert!(
        (0.45..=0.55).contains(&peak),
        "Peak should be ~0.5, got {}",
        peak
    );
}

#[test]
fn decodes_mono_wav() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mono.wav");
    generate_test_wav(&path, 22050, 1, 0.5, 220.0).unwrap();

    let track = decode_file(&path).unwrap();
    assert_eq!(track.channels, 1);
    assert_eq!(track.sample_rate, 22050);
    assert_eq!(track.frames(), 11025);
}

#[test]
fn garbage_file_is_decode_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("not_audio.wav");
    std::fs::write(&path, b"this is not a wav file at all").unwrap();

    assert!(matches!(decode_file(&path), Err(AudioError::Decode(_))));
}

#[test]
fn prepare_converts_to_output_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mono.wav");
    generate_test_wav(&path, 44100, 1, 0.5, 440.0).unwrap();

    let track = TrackLoader::prepare(&LoadRequest {
        generation: 1,
        path,
        target_sample_rate: 48000,
        target_channels: 2,
    })
    .unwrap();

    assert_eq!(track.sample_rate, 48000);
    assert_eq!(track.channels, 2);
    assert_eq!(track.frames(), 24000);

    // Mono source duplicated to both channels
    assert!(track
        .samples
        .chunks_exact(2)
        .all(|frame| frame[0] == frame[1]));
}

#[test]
fn error_converts_to_media_error() {
    let err: jukebox_playback::PlayerError = AudioError::DeviceNotFound.into();
    assert!(matches!(err, jukebox_playback::PlayerError::Media(msg) if msg.contains("not found")));
}
