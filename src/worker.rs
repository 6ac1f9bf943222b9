//! Background audio worker — batch synthesis and word playback off the
//! interactive thread.
//!
//! The UI sends [`WorkerCommand`]s over a `tokio::sync::mpsc` channel;
//! the worker drives the [`SpeechCache`] and [`AudioOutput`] and reports
//! [`WorkerEvent`]s back over a second channel, which the UI drains
//! non-blockingly every frame.  No engine state is ever touched from this
//! task.
//!
//! ```text
//! UI ──WorkerCommand──▶ AudioWorker::run()  ← tokio task
//!                          ├─ SetAudioFolder → SpeechCache::set_dir
//!                          ├─ Prepare        → ensure_all (progress events)
//!                          └─ Play           → ensure + spawn_blocking(play)
//! UI ◀──WorkerEvent──── (progress, completion, per-occurrence errors)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::audio::AudioOutput;
use crate::speech::SpeechCache;

/// Commands sent from the UI thread to the audio worker.
#[derive(Debug, Clone)]
pub enum WorkerCommand {
    /// Re-root the speech cache (the user picked a different folder).
    SetAudioFolder(PathBuf),
    /// Synthesize artifacts for every word, reporting progress.
    Prepare { words: Vec<String> },
    /// Play one word, synthesizing its artifact first if missing.
    Play { word: String },
}

/// Events delivered from the audio worker back to the UI.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// One word of a batch has been processed.  `fraction` is in `(0, 1]`.
    PrepareProgress { fraction: f32, word: String },
    /// The batch finished; `failed` lists words without artifacts.
    PrepareFinished { failed: Vec<String> },
    /// A `Play` command ran to the end of the audio.
    PlaybackFinished,
    /// A command failed; `message` is ready for display.
    Error { message: String },
}

/// Owns the collaborators the background task drives.
pub struct AudioWorker {
    cache: SpeechCache,
    output: Arc<dyn AudioOutput>,
}

impl AudioWorker {
    pub fn new(cache: SpeechCache, output: Arc<dyn AudioOutput>) -> Self {
        Self { cache, output }
    }

    /// Run the worker until the command channel is closed.
    ///
    /// Spawn as a tokio task from `main()`.  Send failures are ignored —
    /// they only occur when the UI is already gone.
    pub async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<WorkerCommand>,
        event_tx: mpsc::Sender<WorkerEvent>,
    ) {
        while let Some(cmd) = command_rx.recv().await {
            match cmd {
                WorkerCommand::SetAudioFolder(dir) => {
                    if let Err(e) = self.cache.set_dir(dir.clone()) {
                        log::warn!("worker: could not use audio folder {}: {e}", dir.display());
                        let _ = event_tx
                            .send(WorkerEvent::Error {
                                message: format!(
                                    "Папка аудиофайлов недоступна: {e}"
                                ),
                            })
                            .await;
                    }
                }

                WorkerCommand::Prepare { words } => {
                    self.handle_prepare(words, &event_tx).await;
                }

                WorkerCommand::Play { word } => {
                    self.handle_play(word, &event_tx).await;
                }
            }
        }

        log::info!("worker: command channel closed, shutting down");
    }

    /// Batch-synthesize `words`, forwarding per-word progress.
    async fn handle_prepare(&self, words: Vec<String>, event_tx: &mpsc::Sender<WorkerEvent>) {
        log::info!("worker: preparing audio for {} words", words.len());

        let failed = self
            .cache
            .ensure_all(&words, |fraction, word| {
                // try_send: a full UI queue only drops a progress tick.
                let _ = event_tx.try_send(WorkerEvent::PrepareProgress {
                    fraction,
                    word: word.to_owned(),
                });
            })
            .await;

        let _ = event_tx.send(WorkerEvent::PrepareFinished { failed }).await;
    }

    /// Ensure one artifact and play it to the end on the blocking pool.
    async fn handle_play(&self, word: String, event_tx: &mpsc::Sender<WorkerEvent>) {
        let path = match self.cache.ensure(&word).await {
            Ok(path) => path,
            Err(e) => {
                log::warn!("worker: could not synthesize {word:?}: {e}");
                let _ = event_tx
                    .send(WorkerEvent::Error {
                        message: format!("Не удалось озвучить слово: {e}"),
                    })
                    .await;
                return;
            }
        };

        let output = Arc::clone(&self.output);
        let play_result =
            tokio::task::spawn_blocking(move || output.play(&path)).await;

        match play_result {
            Ok(Ok(())) => {
                let _ = event_tx.send(WorkerEvent::PlaybackFinished).await;
            }
            Ok(Err(e)) => {
                log::warn!("worker: playback failed for {word:?}: {e}");
                let _ = event_tx
                    .send(WorkerEvent::Error {
                        message: format!("Не удалось воспроизвести слово: {e}"),
                    })
                    .await;
            }
            Err(e) => {
                log::error!("worker: playback task panicked: {e}");
                let _ = event_tx
                    .send(WorkerEvent::Error {
                        message: format!("Внутренняя ошибка воспроизведения: {e}"),
                    })
                    .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MockOutput;
    use crate::speech::{MockSynthesizer, SpeechSynthesizer};
    use tempfile::tempdir;

    fn worker_with(
        dir: &std::path::Path,
        synth: MockSynthesizer,
        output: Arc<MockOutput>,
    ) -> AudioWorker {
        let synth: Arc<dyn SpeechSynthesizer> = Arc::new(synth);
        let cache = SpeechCache::new(dir.to_owned(), synth).expect("cache");
        AudioWorker::new(cache, output)
    }

    async fn drain(mut rx: mpsc::Receiver<WorkerEvent>) -> Vec<WorkerEvent> {
        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        events
    }

    #[tokio::test]
    async fn prepare_reports_progress_then_finished() {
        let dir = tempdir().expect("temp dir");
        let output = Arc::new(MockOutput::new());
        let worker = worker_with(dir.path(), MockSynthesizer::new(), Arc::clone(&output));

        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(32);

        cmd_tx
            .send(WorkerCommand::Prepare {
                words: vec!["вокзал".into(), "парашют".into()],
            })
            .await
            .unwrap();
        drop(cmd_tx);

        worker.run(cmd_rx, event_tx).await;
        let events = drain(event_rx).await;

        let progress: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, WorkerEvent::PrepareProgress { .. }))
            .collect();
        assert_eq!(progress.len(), 2);
        assert!(matches!(
            events.last(),
            Some(WorkerEvent::PrepareFinished { failed }) if failed.is_empty()
        ));
    }

    #[tokio::test]
    async fn prepare_collects_failed_words_without_aborting() {
        let dir = tempdir().expect("temp dir");
        let output = Arc::new(MockOutput::new());
        let worker = worker_with(
            dir.path(),
            MockSynthesizer::failing_for(&["парашют"]),
            Arc::clone(&output),
        );

        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(32);

        cmd_tx
            .send(WorkerCommand::Prepare {
                words: vec!["вокзал".into(), "парашют".into(), "деревня".into()],
            })
            .await
            .unwrap();
        drop(cmd_tx);

        worker.run(cmd_rx, event_tx).await;
        let events = drain(event_rx).await;

        let failed = events.iter().find_map(|e| match e {
            WorkerEvent::PrepareFinished { failed } => Some(failed.clone()),
            _ => None,
        });
        assert_eq!(failed, Some(vec!["парашют".to_owned()]));
    }

    #[tokio::test]
    async fn play_synthesizes_missing_artifact_then_plays_it() {
        let dir = tempdir().expect("temp dir");
        let output = Arc::new(MockOutput::new());
        let worker = worker_with(dir.path(), MockSynthesizer::new(), Arc::clone(&output));

        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(32);

        cmd_tx
            .send(WorkerCommand::Play {
                word: "вокзал".into(),
            })
            .await
            .unwrap();
        drop(cmd_tx);

        worker.run(cmd_rx, event_tx).await;
        let events = drain(event_rx).await;

        assert!(matches!(events.last(), Some(WorkerEvent::PlaybackFinished)));
        let played = output.played();
        assert_eq!(played.len(), 1);
        assert!(played[0].ends_with("вокзал.mp3"));
    }

    #[tokio::test]
    async fn playback_failure_becomes_an_error_event() {
        let dir = tempdir().expect("temp dir");
        let output = Arc::new(MockOutput::failing());
        let worker = worker_with(dir.path(), MockSynthesizer::new(), Arc::clone(&output));

        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(32);

        cmd_tx
            .send(WorkerCommand::Play {
                word: "вокзал".into(),
            })
            .await
            .unwrap();
        drop(cmd_tx);

        worker.run(cmd_rx, event_tx).await;
        let events = drain(event_rx).await;

        assert!(matches!(events.last(), Some(WorkerEvent::Error { .. })));
    }

    #[tokio::test]
    async fn set_audio_folder_redirects_new_artifacts() {
        let dir = tempdir().expect("temp dir");
        let output = Arc::new(MockOutput::new());
        let worker = worker_with(dir.path(), MockSynthesizer::new(), Arc::clone(&output));

        let new_dir = dir.path().join("chosen");
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(32);

        cmd_tx
            .send(WorkerCommand::SetAudioFolder(new_dir.clone()))
            .await
            .unwrap();
        cmd_tx
            .send(WorkerCommand::Play {
                word: "вокзал".into(),
            })
            .await
            .unwrap();
        drop(cmd_tx);

        worker.run(cmd_rx, event_tx).await;
        let _ = drain(event_rx).await;

        assert!(output.played()[0].starts_with(&new_dir));
    }
}
