//! Play every audio file in a directory through the default output device
//!
//! ```text
//! cargo run -p jukebox-audio-desktop --example play_directory -- <dir> [config.json]
//! ```
//!
//! Logging follows `RUST_LOG` (default `jukebox_playback=info,jukebox_audio_desktop=info`).

use jukebox_audio_desktop::DesktopAudioElement;
use jukebox_playback::{format_time, PlaybackController, PlayerConfig, PlayerEvent, Playlist, Track};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "flac", "ogg", "wav", "m4a", "aac"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jukebox_playback=info,jukebox_audio_desktop=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let dir = args.next().ok_or("usage: play_directory <dir> [config.json]")?;
    let config = match args.next() {
        Some(path) => PlayerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => PlayerConfig::default(),
    };

    let playlist = Playlist::new(scan(Path::new(&dir))?)?;
    println!("{} tracks in {}", playlist.len(), dir);

    let element = DesktopAudioElement::new()?;
    let mut player = PlaybackController::new(element, playlist, config)?;
    println!("> {}", player.current_track().display_name());
    player.toggle_playback();

    loop {
        player.pump();
        for event in player.drain_events() {
            match event {
                PlayerEvent::TrackChanged { .. } => {
                    println!("> {}", player.current_track().display_name());
                }
                PlayerEvent::DurationChanged { duration } if duration > 0.0 => {
                    println!("  duration {}", format_time(duration));
                }
                PlayerEvent::PlayRejected { reason, .. } => {
                    println!("  cannot play: {}", reason);
                    player.next()?;
                }
                _ => {}
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn scan(dir: &Path) -> std::io::Result<Vec<Track>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| Track::new(path.to_string_lossy(), ""))
        .collect())
}
