//! The on-disk speech cache.
//!
//! Maps each word to `<cache_key>.mp3` inside the configured audio folder,
//! synthesizing the artifact on first use and never regenerating one that
//! already exists.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::key::cache_key;
use super::synth::{SpeechSynthesizer, SynthesisError};

/// Extension of cached audio artifacts.
pub const AUDIO_EXT: &str = "mp3";

/// Word → audio-file cache over a [`SpeechSynthesizer`].
pub struct SpeechCache {
    dir: PathBuf,
    synth: Arc<dyn SpeechSynthesizer>,
}

impl SpeechCache {
    /// Open a cache rooted at `dir`, creating the directory as needed.
    pub fn new(dir: PathBuf, synth: Arc<dyn SpeechSynthesizer>) -> std::io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, synth })
    }

    /// Point the cache at a different folder, creating it as needed.
    /// Existing artifacts in the old folder are left behind.
    pub fn set_dir(&mut self, dir: PathBuf) -> std::io::Result<()> {
        std::fs::create_dir_all(&dir)?;
        self.dir = dir;
        Ok(())
    }

    /// The folder artifacts are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The artifact path `word` maps to (whether or not it exists yet).
    pub fn path_for(&self, word: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{AUDIO_EXT}", cache_key(word)))
    }

    /// Return the artifact path for `word`, synthesizing it on a miss.
    ///
    /// A word whose file already exists is returned without contacting the
    /// provider.
    pub async fn ensure(&self, word: &str) -> Result<PathBuf, SynthesisError> {
        let path = self.path_for(word);
        if path.exists() {
            log::debug!("speech: cache hit for {word:?}");
            return Ok(path);
        }

        log::debug!("speech: synthesizing {word:?}");
        self.synth.synthesize(word, &path).await?;
        Ok(path)
    }

    /// Ensure artifacts for every word in `words`, reporting per-word
    /// progress as `(fraction ∈ (0, 1], word)`.
    ///
    /// Individual failures are logged and collected; the batch always runs
    /// to the end.  Returns the words that could not be synthesized.
    pub async fn ensure_all(
        &self,
        words: &[String],
        mut on_progress: impl FnMut(f32, &str),
    ) -> Vec<String> {
        let total = words.len();
        let mut failed = Vec::new();

        for (i, word) in words.iter().enumerate() {
            if let Err(e) = self.ensure(word).await {
                log::warn!("speech: could not synthesize {word:?}: {e}");
                failed.push(word.clone());
            }
            on_progress((i + 1) as f32 / total as f32, word);
        }

        failed
    }
}
