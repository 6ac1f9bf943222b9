//! Application entry point — spelling trainer.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Open the statistics store over its JSON file.
//! 5. Build the speech cache (Google Translate synthesizer, Russian voice)
//!    and the rodio output device.
//! 6. Create worker channels (`command`, `event`) and spawn the audio
//!    worker on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use spelling_trainer::{
    app::SpellingApp,
    audio::{AudioOutput, RodioOutput},
    config::{AppConfig, AppPaths},
    session::Trainer,
    speech::{GoogleSynthesizer, SpeechCache, SpeechSynthesizer},
    stats::{JsonStatsFile, StatsStore},
    worker::{AudioWorker, WorkerCommand, WorkerEvent},
};

use eframe::egui;

fn native_options() -> eframe::NativeOptions {
    let vp = egui::ViewportBuilder::default()
        .with_inner_size([900.0, 650.0])
        .with_min_inner_size([600.0, 450.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Spelling trainer starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    let paths = AppPaths::new();

    // 3. Tokio runtime (2 worker threads — synthesis + playback each take one)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Statistics store over its JSON file
    let stats = StatsStore::open(Box::new(JsonStatsFile::new(paths.stats_file.clone())));
    let trainer = Trainer::new(stats);

    // 5. Speech cache + audio output
    let audio_dir = if config.audio_folder.trim().is_empty() {
        paths.audio_dir.clone()
    } else {
        PathBuf::from(config.audio_folder.trim())
    };

    let synth: Arc<dyn SpeechSynthesizer> = Arc::new(GoogleSynthesizer::new("ru"));
    let cache = match SpeechCache::new(audio_dir.clone(), synth) {
        Ok(cache) => cache,
        Err(e) => {
            log::warn!(
                "Could not open audio folder {} ({e}); falling back to {}",
                audio_dir.display(),
                paths.audio_dir.display()
            );
            SpeechCache::new(
                paths.audio_dir.clone(),
                Arc::new(GoogleSynthesizer::new("ru")),
            )
            .expect("failed to create audio folder in the app data directory")
        }
    };
    let output: Arc<dyn AudioOutput> = Arc::new(RodioOutput::new());

    // 6. Channel setup + audio worker
    let (command_tx, command_rx) = mpsc::channel::<WorkerCommand>(16);
    let (event_tx, event_rx) = mpsc::channel::<WorkerEvent>(32);

    rt.spawn(AudioWorker::new(cache, output).run(command_rx, event_tx));

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = SpellingApp::new(trainer, config, paths, command_tx, event_rx);

    eframe::run_native(
        "Тренажер правописания",
        native_options(),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
