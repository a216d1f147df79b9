//! Background Track Loader
//!
//! Decoding and resampling a whole track takes tens to hundreds of
//! milliseconds, so it runs on a dedicated thread instead of the caller's.
//!
//! ## Architecture
//!
//! ```text
//! Element (host thread)            Loader thread
//!        │                              │
//!        │  request_load(request)       │
//!        │─────────────────────────────>│
//!        │                              │ decode_file()
//!        │                              │ resample() + adapt_channels()
//!        │                              │
//!        │      on_loaded(LoadResult)   │
//!        │<─────────────────────────────│
//! ```
//!
//! Every request carries a generation number. When several requests are
//! queued only the newest is decoded; the handler compares generations to
//! discard results that were superseded while decoding.

use crate::decoder::{decode_file, DecodedTrack};
use crate::error::Result;
use crate::resample::{adapt_channels, resample};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Request to load a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Identifies the `load` call this request belongs to
    pub generation: u64,
    pub path: PathBuf,
    /// Output sample rate the track is converted to
    pub target_sample_rate: u32,
    /// Output channel count the track is converted to
    pub target_channels: u16,
}

/// Result of loading a track
#[derive(Debug)]
pub struct LoadResult {
    pub generation: u64,
    pub path: PathBuf,
    pub track: Result<DecodedTrack>,
}

/// Background track loader
pub struct TrackLoader {
    request_tx: Sender<LoadRequest>,
    _thread_handle: JoinHandle<()>,
}

impl TrackLoader {
    /// Spawn the loader thread
    ///
    /// `on_loaded` runs on the loader thread once per decoded request. The
    /// thread exits when the loader is dropped.
    pub fn spawn<F>(on_loaded: F) -> Result<Self>
    where
        F: FnMut(LoadResult) + Send + 'static,
    {
        let (request_tx, request_rx) = unbounded::<LoadRequest>();

        let thread_handle = thread::Builder::new()
            .name("track-loader".to_string())
            .spawn(move || Self::loader_thread(request_rx, on_loaded))?;

        Ok(Self {
            request_tx,
            _thread_handle: thread_handle,
        })
    }

    /// Queue a load (non-blocking)
    ///
    /// Returns false if the loader thread is gone.
    pub fn request_load(&self, request: LoadRequest) -> bool {
        if self.request_tx.send(request).is_err() {
            warn!("Track loader channel disconnected");
            return false;
        }
        true
    }

    /// Decode, resample and adapt one request
    pub fn prepare(request: &LoadRequest) -> Result<DecodedTrack> {
        let track = decode_file(&request.path)?;
        let track = resample(track, request.target_sample_rate)?;
        Ok(adapt_channels(track, request.target_channels))
    }

    fn loader_thread<F>(request_rx: Receiver<LoadRequest>, mut on_loaded: F)
    where
        F: FnMut(LoadResult),
    {
        debug!("Track loader started");

        while let Ok(mut request) = request_rx.recv() {
            // Only the newest queued request matters
            while let Ok(newer) = request_rx.try_recv() {
                debug!(generation = request.generation, "Skipping superseded load");
                request = newer;
            }

            let start = Instant::now();
            let track = Self::prepare(&request);
            match &track {
                Ok(decoded) => info!(
                    path = %request.path.display(),
                    duration = decoded.duration_secs(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Track loaded"
                ),
                Err(e) => warn!(path = %request.path.display(), error = %e, "Failed to load track"),
            }

            on_loaded(LoadResult {
                generation: request.generation,
                path: request.path,
                track,
            });
        }

        debug!("Track loader exiting");
    }
}
