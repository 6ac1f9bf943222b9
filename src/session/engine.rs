//! The training-session state machine.
//!
//! [`SessionEngine`] owns the shuffled word order, the current position and
//! the per-session results log.  It is deliberately pure — no I/O, no
//! persistence, no audio — so every transition can be unit-tested; the
//! [`Trainer`](super::Trainer) layer wires it to the statistics store.
//!
//! # State machine
//!
//! ```text
//! Idle ──start──▶ InProgress ──submit_answer──▶ InProgress   (not last word)
//!                            ──submit_answer──▶ Complete     (last word)
//! Complete ──retry──▶ InProgress                              (fresh shuffle)
//! ```
//!
//! `current_word` / `submit_answer` outside `InProgress` fail with
//! [`SessionError::NotStarted`] or [`SessionError::AlreadyComplete`];
//! through the intended UI flows those are unreachable and indicate a
//! caller bug, not a user condition.

use rand::rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::stats::grade_for_percentage;

/// All errors that can arise from the session engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Fewer than two non-blank words were supplied to `start`.
    #[error("word list must contain at least two non-blank words")]
    TooFewWords,

    /// The submitted answer was blank after trimming.
    #[error("answer must not be blank")]
    BlankAnswer,

    /// `current_word`, `submit_answer` or `retry` was called before `start`.
    #[error("no session in progress")]
    NotStarted,

    /// `current_word` or `submit_answer` was called after the last word.
    #[error("session already complete")]
    AlreadyComplete,

    /// `summary` was called before the last word was answered.
    #[error("session is not complete yet")]
    NotComplete,
}

/// One entry in the per-session results log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// The word that was played.
    pub word: String,
    /// What the user typed (original casing, trimmed).
    pub answer: String,
    /// Whether the answer matched after normalization.
    pub correct: bool,
}

/// Returned by [`SessionEngine::submit_answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Whether the answer matched the word.
    pub correct: bool,
    /// The correct spelling, for display.
    pub word: String,
}

/// End-of-session report, available once every word has been answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// 1–5 grade derived from the session's percentage correct.
    pub grade: u8,
    /// Number of words in the session.
    pub total_words: usize,
    /// Number of correct answers.
    pub correct_count: usize,
    /// Number of incorrect answers.
    pub error_count: usize,
    /// The full ordered results log.
    pub results: Vec<AttemptRecord>,
}

/// Case- and whitespace-insensitive comparison form of a word.
///
/// `str::to_lowercase` is Unicode-aware, so Cyrillic compares correctly
/// ("Вокзал" == "вокзал").
fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// The session state machine.  See the module docs for the transition
/// diagram.
#[derive(Debug, Default)]
pub struct SessionEngine {
    /// The word list as supplied to `start`, in original order.  `retry`
    /// re-shuffles this, not the consumed shuffled order.
    words: Vec<String>,
    /// Current permutation of `words`.
    shuffled: Vec<String>,
    /// Index of the next word to present; equals `shuffled.len()` once the
    /// session is complete.
    position: usize,
    /// One record per answered word, in answer order.
    results: Vec<AttemptRecord>,
    /// False until the first successful `start`.
    started: bool,
}

impl SessionEngine {
    /// A new engine in the `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session over `words`: keeps the non-blank entries (trimmed),
    /// shuffles them uniformly, and resets position and results.
    ///
    /// Any previous session is discarded.
    ///
    /// # Errors
    ///
    /// [`SessionError::TooFewWords`] when fewer than [`super::MIN_WORDS`]
    /// non-blank words remain after trimming; the engine state is unchanged.
    pub fn start(&mut self, words: &[String]) -> Result<(), SessionError> {
        let cleaned: Vec<String> = words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(str::to_owned)
            .collect();

        if cleaned.len() < super::MIN_WORDS {
            return Err(SessionError::TooFewWords);
        }

        self.words = cleaned;
        self.started = true;
        self.reshuffle();
        Ok(())
    }

    /// Start over with the *original* word list in a fresh random order.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotStarted`] when no session was ever started.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        self.reshuffle();
        Ok(())
    }

    fn reshuffle(&mut self) {
        self.shuffled = self.words.clone();
        self.shuffled.shuffle(&mut rng());
        self.position = 0;
        self.results.clear();
    }

    /// The word at the current position.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotStarted`] before `start`,
    /// [`SessionError::AlreadyComplete`] once every word is answered.
    pub fn current_word(&self) -> Result<&str, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        self.shuffled
            .get(self.position)
            .map(String::as_str)
            .ok_or(SessionError::AlreadyComplete)
    }

    /// Score `answer` against the current word, log the result and advance
    /// to the next position.
    ///
    /// # Errors
    ///
    /// [`SessionError::BlankAnswer`] when `answer` trims to nothing (no
    /// state change); the state errors of [`current_word`](Self::current_word)
    /// otherwise.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, SessionError> {
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return Err(SessionError::BlankAnswer);
        }

        let word = self.current_word()?.to_owned();
        let correct = normalize(trimmed) == normalize(&word);

        self.results.push(AttemptRecord {
            word: word.clone(),
            answer: trimmed.to_owned(),
            correct,
        });
        self.position += 1;

        Ok(AnswerOutcome { correct, word })
    }

    /// True once every word in the shuffled order has been answered.
    pub fn is_complete(&self) -> bool {
        self.started && self.position == self.shuffled.len()
    }

    /// True until the first successful `start`.
    pub fn is_idle(&self) -> bool {
        !self.started
    }

    /// Zero-based index of the current word (equals the number of words
    /// answered so far).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of words in the current session (0 while idle).
    pub fn total_words(&self) -> usize {
        self.shuffled.len()
    }

    /// The results log so far.
    pub fn results(&self) -> &[AttemptRecord] {
        &self.results
    }

    /// End-of-session report.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotComplete`] while words remain unanswered (or
    /// before `start`).
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::NotComplete);
        }

        let total_words = self.shuffled.len();
        let correct_count = self.results.iter().filter(|r| r.correct).count();
        let error_count = total_words - correct_count;
        let percentage = if total_words == 0 {
            0.0
        } else {
            correct_count as f64 / total_words as f64 * 100.0
        };

        Ok(SessionSummary {
            grade: grade_for_percentage(percentage),
            total_words,
            correct_count,
            error_count,
            results: self.results.clone(),
        })
    }
}
