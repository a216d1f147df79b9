//! CPAL output stream running on a dedicated audio thread
use crate::error::{AudioError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Commands sent to the audio thread
enum OutputCommand {
    /// Drop the stream and exit
    Shutdown,
}

/// Negotiated output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Running output stream on the default device
///
/// **Architecture**: the CPAL `Stream` is created and owned by a dedicated
/// thread and never crosses threads, which avoids `Send`/`Sync` issues on
/// platforms where the stream type is neither. The stream runs continuously
/// and pulls audio from the render closure; pausing is done by the closure
/// outputting silence.
pub struct OutputStream {
    command_tx: Sender<OutputCommand>,
    format: OutputFormat,
    _audio_thread: Option<JoinHandle<()>>,
}

impl OutputStream {
    /// Open the default output device and start pulling from `render`
    ///
    /// # Errors
    /// `DeviceNotFound` without an output device, `StreamBuildError` or
    /// `PlayError` when the stream cannot be created or started.
    pub fn open<F>(render: F) -> Result<Self>
    where
        F: FnMut(&mut [f32]) + Send + 'static,
    {
        let (command_tx, command_rx) = bounded::<OutputCommand>(4);
        let (ready_tx, ready_rx) = bounded::<Result<OutputFormat>>(1);

        let audio_thread = thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || Self::audio_thread_run(render, ready_tx, command_rx))?;

        let format = ready_rx
            .recv()
            .map_err(|_| AudioError::StreamBuildError("Audio thread exited".into()))??;

        info!(
            sample_rate = format.sample_rate,
            channels = format.channels,
            "Audio output started"
        );

        Ok(Self {
            command_tx,
            format,
            _audio_thread: Some(audio_thread),
        })
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Audio thread main loop
    ///
    /// Builds the stream, reports the negotiated format, then parks until
    /// shutdown.
    fn audio_thread_run<F>(
        render: F,
        ready_tx: Sender<Result<OutputFormat>>,
        command_rx: Receiver<OutputCommand>,
    ) where
        F: FnMut(&mut [f32]) + Send + 'static,
    {
        let stream = match Self::build_stream(render) {
            Ok((stream, format)) => {
                ready_tx.send(Ok(format)).ok();
                stream
            }
            Err(e) => {
                ready_tx.send(Err(e)).ok();
                return;
            }
        };

        // Sender dropped counts as shutdown
        while let Ok(cmd) = command_rx.recv() {
            match cmd {
                OutputCommand::Shutdown => break,
            }
        }

        drop(stream);
        debug!("Audio output thread exiting");
    }

    fn build_stream<F>(mut render: F) -> Result<(cpal::Stream, OutputFormat)>
    where
        F: FnMut(&mut [f32]) + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::DeviceNotFound)?;

        let supported = device.default_output_config()?;
        let format = OutputFormat {
            sample_rate: supported.sample_rate(),
            channels: supported.channels(),
        };
        let config = supported.config();

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| render(data),
            |err| error!(error = %err, "Audio stream error"),
            None,
        )?;
        stream.play()?;

        Ok((stream, format))
    }
}

impl Drop for OutputStream {
    fn drop(&mut self) {
        self.command_tx.send(OutputCommand::Shutdown).ok();
    }
}
