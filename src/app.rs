//! Spelling trainer window — egui/eframe application.
//!
//! # Architecture
//!
//! [`SpellingApp`] is the top-level [`eframe::App`].  It owns the
//! [`Trainer`] (session engine + statistics store) and two channel
//! endpoints:
//!
//! * `command_tx` — sends [`WorkerCommand`] to the background audio worker.
//! * `event_rx`   — receives [`WorkerEvent`] (progress, completion,
//!   per-occurrence errors), drained non-blockingly every frame.
//!
//! # Screens
//!
//! | Screen | Contents |
//! |--------|----------|
//! | `Setup` | audio folder, word list editor, file load/save, prepare-and-start |
//! | `Training` | play / answer / check, outcome with per-letter diff, next word |
//! | `Results` | grade, totals, error words, per-result log, retry |
//!
//! The engine and store are only ever touched from this thread; the worker
//! communicates exclusively through the channels.

use std::path::{Path, PathBuf};

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::{AppConfig, AppPaths};
use crate::session::{self, AnswerOutcome, SessionError, SessionSummary, Trainer};
use crate::worker::{WorkerCommand, WorkerEvent};

/// Which of the three screens is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Setup,
    Training,
    Results,
}

/// Per-character comparison of `answer` against `correct`, for the diff
/// highlighting in the outcome line and the results log.
///
/// Returns the trimmed answer's characters, each flagged `true` when it
/// matches the correct word at the same position (case-insensitively).
fn diff_marks(correct: &str, answer: &str) -> Vec<(char, bool)> {
    let want: Vec<char> = correct.trim().to_lowercase().chars().collect();
    answer
        .trim()
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let matches = c
                .to_lowercase()
                .next()
                .zip(want.get(i))
                .is_some_and(|(lc, wc)| lc == *wc);
            (c, matches)
        })
        .collect()
}

/// The main application window.
pub struct SpellingApp {
    // ── Core ─────────────────────────────────────────────────────────────
    trainer: Trainer,
    screen: Screen,

    // ── Setup screen ─────────────────────────────────────────────────────
    /// Word list editor contents, one word per line.
    words_text: String,
    /// Audio folder path field.
    audio_folder: String,
    /// Word-list file path field.
    words_file: String,
    /// Words waiting for batch synthesis to finish before the session starts.
    pending_words: Option<Vec<String>>,
    /// Latest batch progress `(fraction, word)` while preparing.
    progress: Option<(f32, String)>,
    preparing: bool,

    // ── Training screen ──────────────────────────────────────────────────
    answer_input: String,
    /// Outcome of the last submitted answer, shown until "next word".
    last_outcome: Option<AnswerOutcome>,
    /// The answer as submitted, kept for the diff display.
    last_answer: String,
    /// True while the worker is between a `Play` command and its event.
    playing: bool,

    // ── Results screen ───────────────────────────────────────────────────
    summary: Option<SessionSummary>,

    // ── Shared ───────────────────────────────────────────────────────────
    error_banner: Option<String>,
    config: AppConfig,
    paths: AppPaths,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<WorkerCommand>,
    event_rx: mpsc::Receiver<WorkerEvent>,
}

impl SpellingApp {
    /// Build the app, restoring the previous word list and folder from
    /// `config`.
    pub fn new(
        trainer: Trainer,
        config: AppConfig,
        paths: AppPaths,
        command_tx: mpsc::Sender<WorkerCommand>,
        event_rx: mpsc::Receiver<WorkerEvent>,
    ) -> Self {
        let words_text = Self::restore_words(&config);

        Self {
            trainer,
            screen: Screen::Setup,
            words_text,
            audio_folder: config.audio_folder.clone(),
            words_file: config.last_words_file.clone(),
            pending_words: None,
            progress: None,
            preparing: false,
            answer_input: String::new(),
            last_outcome: None,
            last_answer: String::new(),
            playing: false,
            summary: None,
            error_banner: None,
            config,
            paths,
            command_tx,
            event_rx,
        }
    }

    /// The previous word list when it still exists, the default starter
    /// list otherwise.
    fn restore_words(config: &AppConfig) -> String {
        if !config.last_words_file.is_empty() {
            let path = Path::new(&config.last_words_file);
            if let Ok(words) = session::load_words(path) {
                if !words.is_empty() {
                    return words.join("\n");
                }
            }
        }
        session::DEFAULT_WORDS.join("\n")
    }

    /// The folder artifacts go to: the configured one, or the platform
    /// data directory while none is configured.
    fn effective_audio_dir(&self) -> PathBuf {
        if self.audio_folder.trim().is_empty() {
            self.paths.audio_dir.clone()
        } else {
            PathBuf::from(self.audio_folder.trim())
        }
    }

    fn save_config(&mut self) {
        self.config.audio_folder = self.audio_folder.trim().to_owned();
        self.config.last_words_file = self.words_file.trim().to_owned();
        if let Err(e) = self.config.save() {
            log::warn!("settings not saved: {e}");
        }
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending worker events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                WorkerEvent::PrepareProgress { fraction, word } => {
                    self.progress = Some((fraction, word));
                }
                WorkerEvent::PrepareFinished { failed } => {
                    self.preparing = false;
                    self.progress = None;
                    if !failed.is_empty() {
                        self.error_banner = Some(format!(
                            "Не удалось озвучить: {}",
                            failed.join(", ")
                        ));
                    }
                    if let Some(words) = self.pending_words.take() {
                        self.begin_session(&words);
                    }
                }
                WorkerEvent::PlaybackFinished => {
                    self.playing = false;
                }
                WorkerEvent::Error { message } => {
                    self.playing = false;
                    self.error_banner = Some(message);
                }
            }
        }
    }

    // ── Intents ──────────────────────────────────────────────────────────

    /// Setup-screen "prepare and start": validate the list, then hand the
    /// batch to the worker.  The session starts when `PrepareFinished`
    /// arrives.
    fn prepare_and_start(&mut self) {
        let words = session::parse_words(&self.words_text);
        if words.len() < session::MIN_WORDS {
            self.error_banner =
                Some("Добавьте хотя бы 2 слова для тренировки".into());
            return;
        }

        self.save_config();
        self.error_banner = None;
        self.preparing = true;
        self.progress = Some((0.0, String::new()));

        let dir = self.effective_audio_dir();
        let _ = self.command_tx.try_send(WorkerCommand::SetAudioFolder(dir));
        let _ = self.command_tx.try_send(WorkerCommand::Prepare {
            words: words.clone(),
        });
        self.pending_words = Some(words);
    }

    /// Start the engine over `words` and play the first word.
    fn begin_session(&mut self, words: &[String]) {
        match self.trainer.start(words) {
            Ok(()) => {
                self.screen = Screen::Training;
                self.answer_input.clear();
                self.last_outcome = None;
                self.summary = None;
                self.play_current();
            }
            Err(e) => {
                self.error_banner = Some(e.to_string());
            }
        }
    }

    /// Ask the worker to play the word at the current position.
    fn play_current(&mut self) {
        match self.trainer.current_word() {
            Ok(word) => {
                self.playing = true;
                let _ = self.command_tx.try_send(WorkerCommand::Play {
                    word: word.to_owned(),
                });
            }
            Err(e) => {
                // Unreachable through the screen flow; a bug, not a user error.
                log::error!("play requested outside a session: {e}");
            }
        }
    }

    /// Check the typed answer against the current word.
    fn submit_answer(&mut self) {
        let answer = self.answer_input.clone();
        match self.trainer.submit_answer(&answer) {
            Ok(outcome) => {
                self.last_answer = answer.trim().to_owned();
                self.last_outcome = Some(outcome);
                self.error_banner = None;
            }
            Err(SessionError::BlankAnswer) => {
                self.error_banner = Some("Введите услышанное слово".into());
            }
            Err(e) => {
                log::error!("submit outside a session: {e}");
            }
        }
    }

    /// Explicit advance: clear the outcome and play the next word.
    fn next_word(&mut self) {
        self.last_outcome = None;
        self.answer_input.clear();
        self.play_current();
    }

    /// Move to the results screen (summary is only available when the
    /// session ran to completion; an early finish shows store totals only).
    fn finish(&mut self) {
        self.summary = self.trainer.summary().ok();
        self.screen = Screen::Results;
    }

    /// Re-shuffle the same list and run again.
    fn retry(&mut self) {
        match self.trainer.retry() {
            Ok(()) => {
                self.screen = Screen::Training;
                self.answer_input.clear();
                self.last_outcome = None;
                self.summary = None;
                self.play_current();
            }
            Err(e) => {
                self.error_banner = Some(e.to_string());
            }
        }
    }

    fn load_words_file(&mut self) {
        let path = PathBuf::from(self.words_file.trim());
        match session::load_words(&path) {
            Ok(words) => {
                self.words_text = words.join("\n");
                self.error_banner = None;
                self.save_config();
            }
            Err(e) => {
                self.error_banner = Some(format!("Не удалось загрузить файл: {e}"));
            }
        }
    }

    fn save_words_file(&mut self) {
        let path = PathBuf::from(self.words_file.trim());
        let words = session::parse_words(&self.words_text);
        match session::save_words(&path, &words) {
            Ok(()) => {
                self.error_banner = None;
                self.save_config();
            }
            Err(e) => {
                self.error_banner = Some(format!("Не удалось сохранить файл: {e}"));
            }
        }
    }

    // ── Screen renderers ─────────────────────────────────────────────────

    fn draw_error_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(message) = self.error_banner.clone() {
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::from_rgb(255, 136, 68), &message);
                if ui.small_button("✕").clicked() {
                    self.error_banner = None;
                }
            });
            ui.separator();
        }
    }

    fn draw_setup(&mut self, ui: &mut egui::Ui) {
        ui.heading("Тренажер правописания");
        ui.add_space(8.0);

        ui.label("Папка для аудиофайлов (пусто — папка приложения):");
        ui.text_edit_singleline(&mut self.audio_folder);
        ui.add_space(8.0);

        ui.label("Файл со словами:");
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.words_file);
            let has_path = !self.words_file.trim().is_empty();
            if ui
                .add_enabled(has_path, egui::Button::new("Загрузить"))
                .clicked()
            {
                self.load_words_file();
            }
            if ui
                .add_enabled(has_path, egui::Button::new("Сохранить"))
                .clicked()
            {
                self.save_words_file();
            }
        });
        ui.add_space(8.0);

        ui.label("Слова для изучения (по одному на строку):");
        egui::ScrollArea::vertical()
            .max_height(260.0)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.words_text)
                        .desired_rows(12)
                        .desired_width(f32::INFINITY),
                );
            });
        ui.add_space(8.0);

        if self.preparing {
            let (fraction, word) = self.progress.clone().unwrap_or((0.0, String::new()));
            ui.add(egui::ProgressBar::new(fraction).show_percentage());
            if !word.is_empty() {
                ui.label(format!("Генерация: {word}"));
            }
        } else if ui
            .button("Подготовить аудиофайлы и начать тренировку")
            .clicked()
        {
            self.prepare_and_start();
        }
    }

    fn draw_training(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("← Назад к настройкам").clicked() {
                self.screen = Screen::Setup;
                return;
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🏁 Завершить").clicked() {
                    self.finish();
                }
            });
        });
        if self.screen != Screen::Training {
            return;
        }
        ui.separator();

        let position = self.trainer.position();
        let total = self.trainer.total_words();
        ui.label(format!(
            "Слово {} из {total} (порядок случайный)",
            (position + usize::from(!self.trainer.is_complete())).min(total)
        ));
        ui.add_space(6.0);

        match &self.last_outcome {
            None => self.draw_question(ui),
            Some(_) => self.draw_outcome(ui),
        }

        ui.add_space(12.0);
        ui.separator();
        let stats = self.trainer.stats();
        ui.label(format!(
            "Сессия: попыток {}, правильных {} ({:.1}%)",
            stats.record().total_attempts,
            stats.record().correct_attempts,
            stats.percentage()
        ));
    }

    /// Question half of the training screen: hidden word, play, answer.
    fn draw_question(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("???").size(28.0).strong());
        });
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.playing, egui::Button::new("🔊 Прослушать слово"))
                .clicked()
            {
                self.play_current();
            }
            if self.playing {
                ui.spinner();
            }
        });
        ui.add_space(6.0);

        ui.label("Напишите услышанное слово:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.answer_input)
                .font(egui::TextStyle::Heading),
        );
        let submitted =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("✔ Проверить").clicked() || submitted {
            self.submit_answer();
        }
    }

    /// Outcome half: correct word, per-letter diff, explicit advance.
    fn draw_outcome(&mut self, ui: &mut egui::Ui) {
        let Some(outcome) = self.last_outcome.clone() else {
            return;
        };

        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(&outcome.word).size(28.0).strong());
        });
        ui.add_space(6.0);

        if outcome.correct {
            ui.colored_label(egui::Color32::from_rgb(80, 200, 120), "Правильно ✔");
        } else {
            ui.colored_label(egui::Color32::from_rgb(255, 80, 80), "Неправильно ✘");
            ui.horizontal(|ui| {
                ui.label("Ваш ответ:");
                Self::draw_diff(ui, &outcome.word, &self.last_answer);
            });
        }
        ui.add_space(10.0);

        if self.trainer.is_complete() {
            if ui.button("Показать результаты").clicked() {
                self.finish();
            }
        } else if ui.button("Следующее слово →").clicked() {
            self.next_word();
        }
    }

    fn draw_results(&mut self, ui: &mut egui::Ui) {
        let stats = self.trainer.stats();
        let grade = self.summary.as_ref().map_or_else(|| stats.grade(), |s| s.grade);
        let grade_color = match grade {
            4 | 5 => egui::Color32::from_rgb(80, 200, 120),
            3 => egui::Color32::from_rgb(255, 180, 60),
            _ => egui::Color32::from_rgb(255, 80, 80),
        };

        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(format!("Оценка: {grade}"))
                    .size(32.0)
                    .strong()
                    .color(grade_color),
            );
        });
        ui.add_space(8.0);

        if let Some(summary) = self.summary.clone() {
            ui.label(format!("Всего слов: {}", summary.total_words));
            ui.label(format!("Правильно: {}", summary.correct_count));
            ui.label(format!("Ошибок: {}", summary.error_count));
            ui.label(format!("Процент: {:.1}%", stats.percentage()));

            ui.add_space(8.0);
            ui.separator();
            ui.label(egui::RichText::new("Ответы:").strong());
            egui::ScrollArea::vertical()
                .max_height(200.0)
                .show(ui, |ui| {
                    for record in &summary.results {
                        ui.horizontal(|ui| {
                            ui.label(if record.correct { "✔" } else { "✘" });
                            ui.label(&record.word);
                            if !record.correct {
                                ui.label("—");
                                Self::draw_diff(ui, &record.word, &record.answer);
                            }
                        });
                    }
                });
        } else {
            // Finished early: the store still has the totals.
            ui.label(format!(
                "Попыток: {}",
                stats.record().total_attempts
            ));
            ui.label(format!("Процент: {:.1}%", stats.percentage()));
        }

        let errors = stats.errors_by_word();
        ui.add_space(8.0);
        if errors.is_empty() {
            ui.colored_label(
                egui::Color32::from_rgb(80, 200, 120),
                "Все слова написаны правильно! 🎉",
            );
        } else {
            ui.separator();
            ui.label(egui::RichText::new("Слова с ошибками:").strong());
            for (word, count) in &errors {
                ui.label(format!("• {word}: {count}"));
            }
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("🔄 Повторить тестирование").clicked() {
                self.retry();
            }
            if ui.button("← К настройкам").clicked() {
                self.screen = Screen::Setup;
            }
        });
    }

    /// Render `answer` with matching letters green and mismatches red.
    fn draw_diff(ui: &mut egui::Ui, correct: &str, answer: &str) {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            for (c, matches) in diff_marks(correct, answer) {
                let color = if matches {
                    egui::Color32::from_rgb(80, 200, 120)
                } else {
                    egui::Color32::from_rgb(255, 80, 80)
                };
                ui.label(egui::RichText::new(c.to_string()).color(color).strong());
            }
        });
    }
}

impl eframe::App for SpellingApp {
    /// Called every frame: drain worker events, then render the current
    /// screen.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        // Keep polling while background work is in flight, even without
        // user input.
        if self.preparing || self.playing {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_error_banner(ui);
            match self.screen {
                Screen::Setup => self.draw_setup(ui),
                Screen::Training => self.draw_training(ui),
                Screen::Results => self.draw_results(ui),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks_to_string(marks: &[(char, bool)]) -> String {
        marks
            .iter()
            .map(|(c, ok)| if *ok { *c } else { '!' })
            .collect()
    }

    #[test]
    fn diff_marks_flags_the_wrong_letter() {
        let marks = diff_marks("парашют", "парашут");
        assert_eq!(marks.len(), 7);
        assert_eq!(marks_to_string(&marks), "параш!т");
    }

    #[test]
    fn diff_marks_is_case_insensitive() {
        let marks = diff_marks("вокзал", "Вокзал");
        assert!(marks.iter().all(|(_, ok)| *ok));
    }

    #[test]
    fn diff_marks_flags_extra_letters() {
        let marks = diff_marks("кот", "котик");
        assert_eq!(marks_to_string(&marks), "кот!!");
    }

    #[test]
    fn diff_marks_trims_both_sides() {
        let marks = diff_marks(" кот ", "кот  ");
        assert_eq!(marks.len(), 3);
        assert!(marks.iter().all(|(_, ok)| *ok));
    }
}
