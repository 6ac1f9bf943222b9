//! The speech-synthesis port and the Google Translate TTS implementation.
//!
//! [`SpeechSynthesizer`] is the async interface the cache calls on a miss.
//! It is object-safe and `Send + Sync` so it can live behind an
//! `Arc<dyn SpeechSynthesizer>` shared with the background worker.
//!
//! [`GoogleSynthesizer`] fetches an MP3 from the public Google Translate
//! TTS endpoint.  [`MockSynthesizer`] (test builds only) writes a stub
//! file and counts calls.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// All errors that can arise while producing an audio artifact.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// HTTP transport or connection error.
    #[error("speech request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("speech provider returned HTTP {0}")]
    Status(u16),

    /// The audio bytes could not be written to the cache.
    #[error("could not write audio file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SynthesisError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SynthesisError::Status(status.as_u16()),
            None => SynthesisError::Request(e.to_string()),
        }
    }
}

/// Object-safe, thread-safe interface for text-to-speech providers.
///
/// # Contract
///
/// On `Ok(())` the file at `dest` is a complete, playable artifact.  On
/// error nothing may be left at `dest` — a partial download must never
/// land under a cache key.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and write the audio to `dest`.
    async fn synthesize(&self, text: &str, dest: &Path) -> Result<(), SynthesisError>;
}

/// Fetches MP3 speech from the Google Translate TTS endpoint.
///
/// An unauthenticated GET against `translate.google.com/translate_tts`,
/// the same backend the gTTS library wraps.
pub struct GoogleSynthesizer {
    client: reqwest::Client,
    /// BCP-47 language tag sent as `tl` (e.g. `"ru"`).
    lang: String,
}

impl GoogleSynthesizer {
    const ENDPOINT: &'static str = "https://translate.google.com/translate_tts";

    /// A synthesizer speaking `lang` (e.g. `"ru"`).
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSynthesizer {
    async fn synthesize(&self, text: &str, dest: &Path) -> Result<(), SynthesisError> {
        let response = self
            .client
            .get(Self::ENDPOINT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.lang.as_str()),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;

        // Download to a sibling temp name and rename, so a failure mid-write
        // never leaves a truncated file under the cache key.
        let mut tmp = dest.as_os_str().to_owned();
        tmp.push(".part");
        let tmp = std::path::PathBuf::from(tmp);

        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, dest)?;
        Ok(())
    }
}

/// Test synthesizer: writes a stub file and counts invocations.
#[cfg(test)]
pub struct MockSynthesizer {
    calls: std::sync::atomic::AtomicUsize,
    /// Words for which `synthesize` fails instead of writing.
    fail_for: Vec<String>,
}

#[cfg(test)]
impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            calls: std::sync::atomic::AtomicUsize::new(0),
            fail_for: Vec::new(),
        }
    }

    /// A synthesizer that fails for the given words.
    pub fn failing_for(words: &[&str]) -> Self {
        Self {
            calls: std::sync::atomic::AtomicUsize::new(0),
            fail_for: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Number of `synthesize` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, dest: &Path) -> Result<(), SynthesisError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.fail_for.iter().any(|w| w == text) {
            return Err(SynthesisError::Request(format!(
                "simulated failure for {text}"
            )));
        }
        std::fs::write(dest, format!("audio:{text}"))?;
        Ok(())
    }
}
