//! End-to-end tests: playback controller driving a headless desktop element
//!
//! Rendering is pulled by the test instead of an audio device, so these run
//! in headless CI. The last test uses the real default device when present.

mod common;

use common::*;
use jukebox_audio_desktop::DesktopAudioElement;
use jukebox_playback::{
    MediaElement, PlaybackController, PlaybackState, PlayerConfig, PlayerEvent, Playlist,
    StartPolicy, Track,
};
use std::path::PathBuf;
use tempfile::TempDir;

const RATE: u32 = 8000;

/// Track `i` lasts `(i + 1) * 0.25` seconds
fn fixture_tracks(dir: &TempDir, count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| {
            let path = dir.path().join(format!("track{}.wav", i));
            generate_test_wav(&path, RATE, 2, (i + 1) as f32 * 0.25, 440.0).unwrap();
            Track::new(path.to_string_lossy(), "")
        })
        .collect()
}

fn headless_controller(
    tracks: Vec<Track>,
    config: PlayerConfig,
) -> PlaybackController<DesktopAudioElement> {
    let element = DesktopAudioElement::headless(RATE, 2).unwrap();
    PlaybackController::new(element, Playlist::new(tracks).unwrap(), config).unwrap()
}

fn is_playing_track(
    index: usize,
) -> impl Fn(&PlaybackController<DesktopAudioElement>, &[PlayerEvent]) -> bool {
    move |controller, _| {
        controller.state().is_playing() && controller.state().current_index() == index
    }
}

#[test]
fn play_during_initial_load_starts_when_ready() {
    let dir = TempDir::new().unwrap();
    let mut controller = headless_controller(fixture_tracks(&dir, 2), PlayerConfig::default());
    let mut events = Vec::new();

    // The start track may still be decoding
    controller.toggle_playback();
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(0)));

    assert!(controller.element().is_playing());
    assert!((controller.element().duration() - 0.25).abs() < 1e-6);
}

#[test]
fn select_track_reports_metadata_then_plays() {
    let dir = TempDir::new().unwrap();
    let mut controller = headless_controller(fixture_tracks(&dir, 3), PlayerConfig::default());
    let mut events = Vec::new();

    controller.select_track(2).unwrap();
    assert_eq!(controller.state().playback(), PlaybackState::Loading);
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(2)));

    assert!((controller.state().duration() - 0.75).abs() < 1e-6);
    assert!(controller.state().can_seek());
    assert!(events.contains(&PlayerEvent::StateChanged {
        state: PlaybackState::Playing
    }));
}

#[test]
fn immediate_policy_waits_for_pending_load() {
    let dir = TempDir::new().unwrap();
    let config = PlayerConfig {
        start_policy: StartPolicy::Immediate,
        ..Default::default()
    };
    let mut controller = headless_controller(fixture_tracks(&dir, 2), config);
    let mut events = Vec::new();

    controller.next().unwrap();
    assert!(controller.pending_play().is_some());
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(1)));
}

#[test]
fn rendering_drives_time_updates() {
    let dir = TempDir::new().unwrap();
    let mut controller = headless_controller(fixture_tracks(&dir, 3), PlayerConfig::default());
    let mut events = Vec::new();

    controller.select_track(2).unwrap();
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(2)));
    events.clear();

    render_secs(controller.element(), 0.3);
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, |c, _| {
        c.state().current_time() > 0.0
    }));
    assert!((controller.state().current_time() - 0.3).abs() < 1e-6);
    assert_eq!(controller.state().elapsed_label(), "00:00");
}

#[test]
fn skip_moves_rendering_position() {
    let dir = TempDir::new().unwrap();
    let mut controller = headless_controller(fixture_tracks(&dir, 3), PlayerConfig::default());
    let mut events = Vec::new();

    controller.select_track(2).unwrap();
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(2)));

    controller.seek(0.5).unwrap();
    assert!((controller.element().current_time() - 0.5).abs() < 1e-6);

    controller.skip_by(-10.0).unwrap();
    assert_eq!(controller.element().current_time(), 0.0);
    assert_eq!(controller.state().current_time(), 0.0);
}

#[test]
fn end_of_track_advances_playlist() {
    let dir = TempDir::new().unwrap();
    let mut controller = headless_controller(fixture_tracks(&dir, 2), PlayerConfig::default());
    let mut events = Vec::new();

    controller.toggle_playback();
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(0)));

    // Track 0 is 0.25 s long
    render_secs(controller.element(), 0.5);
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(1)));
    assert!(events.contains(&PlayerEvent::TrackChanged {
        index: 1,
        previous_index: 0
    }));

    // And wraps around after the last one
    render_secs(controller.element(), 1.0);
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(0)));
}

#[test]
fn missing_file_rejects_play() {
    let dir = TempDir::new().unwrap();
    let mut tracks = fixture_tracks(&dir, 1);
    tracks.insert(0, Track::new("/nonexistent/missing.wav", ""));
    let mut controller = headless_controller(tracks, PlayerConfig::default());
    let mut events = Vec::new();

    controller.toggle_playback();
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, |_, events| {
        events
            .iter()
            .any(|e| matches!(e, PlayerEvent::PlayRejected { index: 0, .. }))
    }));
    assert_eq!(controller.state().playback(), PlaybackState::Paused);

    // The next track still plays
    controller.next().unwrap();
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(1)));
}

#[test]
fn superseded_load_is_discarded() {
    let dir = TempDir::new().unwrap();
    let mut controller = headless_controller(fixture_tracks(&dir, 3), PlayerConfig::default());
    let mut events = Vec::new();

    controller.select_track(1).unwrap();
    controller.select_track(2).unwrap();
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(2)));

    // Give a late result for track 1 the chance to arrive
    std::thread::sleep(std::time::Duration::from_millis(50));
    controller.pump();
    assert!((controller.element().duration() - 0.75).abs() < 1e-6);
    assert!(controller.state().is_playing());
}

#[test]
fn file_uri_sources_are_accepted() {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("uri.wav");
    generate_test_wav(&path, RATE, 1, 0.25, 440.0).unwrap();

    let tracks = vec![Track::new(format!("file://{}", path.display()), "")];
    let mut controller = headless_controller(tracks, PlayerConfig::default());
    let mut events = Vec::new();

    controller.toggle_playback();
    assert!(pump_until(&mut controller, &mut events, TIMEOUT, is_playing_track(0)));
    // Mono source adapted to the stereo output
    assert_eq!(controller.element().channels(), 2);
}

#[test]
fn default_device_element() {
    // Skipped gracefully in headless environments
    let Ok(element) = DesktopAudioElement::new() else {
        return;
    };

    assert!(element.has_output());
    assert!(element.sample_rate() > 0);
    assert!(element.channels() > 0);
    assert!(element.duration().is_nan());
}
