//! Training-session core — word lists, the session state machine, and the
//! coordinator that ties the engine to the statistics store.
//!
//! # Architecture
//!
//! ```text
//! words.rs    parse / load / save word lists (one word per line)
//!     │
//!     ▼
//! engine.rs   SessionEngine — shuffled order, position, results log
//!     │                       (pure; no I/O, no persistence)
//!     ▼
//! trainer.rs  Trainer — SessionEngine + StatsStore, called by the UI
//! ```
//!
//! # Quick start
//!
//! ```
//! use spelling_trainer::session::SessionEngine;
//!
//! let mut engine = SessionEngine::new();
//! engine.start(&["вокзал".into(), "парашют".into()]).unwrap();
//!
//! while !engine.is_complete() {
//!     let word = engine.current_word().unwrap().to_owned();
//!     let outcome = engine.submit_answer(&word).unwrap();
//!     assert!(outcome.correct);
//! }
//!
//! let summary = engine.summary().unwrap();
//! assert_eq!(summary.grade, 5);
//! ```

pub mod engine;
pub mod trainer;
pub mod words;

pub use engine::{AnswerOutcome, AttemptRecord, SessionEngine, SessionError, SessionSummary};
pub use trainer::Trainer;
pub use words::{load_words, parse_words, save_words, WordFileError, DEFAULT_WORDS, MIN_WORDS};
