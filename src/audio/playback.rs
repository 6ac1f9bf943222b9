//! The audio-output port and its rodio implementation.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

/// All errors that can arise while playing an artifact.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The artifact file could not be opened.
    #[error("could not open audio file: {0}")]
    Open(#[from] std::io::Error),

    /// The file's contents could not be decoded as audio.
    #[error("could not decode audio file: {0}")]
    Decode(String),

    /// No usable output device, or the device rejected the stream.
    #[error("audio device unavailable: {0}")]
    Device(String),
}

/// Object-safe, thread-safe interface to the audio output device.
///
/// # Contract
///
/// `play` blocks until the device reports the end of playback (the
/// implementation polls device progress internally), so callers must run
/// it off the interactive thread.  There is no cancellation; requests are
/// serialized by the caller and the device is safe to reload.
pub trait AudioOutput: Send + Sync {
    /// Play the file at `path` to completion.
    fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}

/// Production output: decodes the file with rodio and plays it on the
/// default device.
///
/// The output stream is opened per call.  Opening is cheap next to the
/// length of a spoken word, and it keeps the type free of the `!Send`
/// stream handle so the trait stays usable from `spawn_blocking`.
#[derive(Debug, Default)]
pub struct RodioOutput;

impl RodioOutput {
    pub fn new() -> Self {
        Self
    }
}

impl AudioOutput for RodioOutput {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        let file = BufReader::new(File::open(path)?);

        let (_stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| PlaybackError::Device(e.to_string()))?;
        let sink =
            rodio::Sink::try_new(&handle).map_err(|e| PlaybackError::Device(e.to_string()))?;

        let source =
            rodio::Decoder::new(file).map_err(|e| PlaybackError::Decode(e.to_string()))?;

        sink.append(source);
        // Polls the device until the queue is empty.
        sink.sleep_until_end();
        Ok(())
    }
}

/// Test output: records played paths, optionally failing every call.
#[cfg(test)]
#[derive(Default)]
pub struct MockOutput {
    played: std::sync::Mutex<Vec<std::path::PathBuf>>,
    fail: bool,
}

#[cfg(test)]
impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// An output whose every `play` fails with a device error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// The paths played so far, in order.
    pub fn played(&self) -> Vec<std::path::PathBuf> {
        self.played.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl AudioOutput for MockOutput {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        if self.fail {
            return Err(PlaybackError::Device("simulated device failure".into()));
        }
        self.played.lock().unwrap().push(path.to_owned());
        Ok(())
    }
}
