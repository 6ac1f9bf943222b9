//! The statistics persistence port and its implementations.
//!
//! [`StatsRepository`] abstracts where the statistics record lives so the
//! store never touches a filesystem path directly.  [`JsonStatsFile`] is
//! the production implementation: one pretty-printed JSON document,
//! overwritten in full on every save.  [`MemoryStats`] (test builds only)
//! keeps the record in memory.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from statistics persistence.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("statistics file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("statistics file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// Lifetime attempt counters for one word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStat {
    /// How many times the word was presented and answered.
    pub attempts: u32,
    /// How many of those answers were correct.
    pub correct: u32,
}

impl WordStat {
    /// `attempts - correct`.
    pub fn errors(&self) -> u32 {
        self.attempts - self.correct
    }
}

/// The full persisted statistics document.
///
/// Serialised as:
///
/// ```json
/// {
///   "total_attempts": 3,
///   "correct_attempts": 2,
///   "word_stats": { "вокзал": { "attempts": 2, "correct": 2 } },
///   "session_start": "2024-05-01T10:00:00+03:00"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    /// Total answers recorded since the last reset.
    pub total_attempts: u64,
    /// Correct answers recorded since the last reset.
    pub correct_attempts: u64,
    /// Per-word counters, keyed by word text.  `BTreeMap` keeps the JSON
    /// output and the UI listing in a stable order.
    pub word_stats: BTreeMap<String, WordStat>,
    /// When the current session's counters were last reset (ISO-8601).
    pub session_start: DateTime<Local>,
}

impl Default for StatsRecord {
    fn default() -> Self {
        Self {
            total_attempts: 0,
            correct_attempts: 0,
            word_stats: BTreeMap::new(),
            session_start: Local::now(),
        }
    }
}

/// Where the statistics record is loaded from and saved to.
///
/// Implementations must persist the *whole* record on `save` — there is no
/// incremental append log.
pub trait StatsRepository: Send {
    /// Load the stored record; `Ok(None)` when nothing was stored yet.
    fn load(&self) -> Result<Option<StatsRecord>, PersistenceError>;

    /// Persist the record, replacing whatever was stored before.
    fn save(&self, record: &StatsRecord) -> Result<(), PersistenceError>;
}

/// Production repository: `stats.json` on disk.
#[derive(Debug, Clone)]
pub struct JsonStatsFile {
    path: PathBuf,
}

impl JsonStatsFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl StatsRepository for JsonStatsFile {
    fn load(&self) -> Result<Option<StatsRecord>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, record: &StatsRecord) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-memory repository for tests — records the last saved document.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStats {
    saved: std::sync::Mutex<Option<StatsRecord>>,
    /// When true, every `save` fails with an I/O error.
    fail_saves: bool,
}

#[cfg(test)]
impl MemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every `save` fails — for durability tests.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// The most recently saved record, if any.
    pub fn saved(&self) -> Option<StatsRecord> {
        self.saved.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl StatsRepository for MemoryStats {
    fn load(&self) -> Result<Option<StatsRecord>, PersistenceError> {
        Ok(self.saved.lock().unwrap().clone())
    }

    fn save(&self, record: &StatsRecord) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::Io(std::io::Error::other(
                "simulated save failure",
            )));
        }
        *self.saved.lock().unwrap() = Some(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn json_file_round_trip() {
        let dir = tempdir().expect("temp dir");
        let repo = JsonStatsFile::new(dir.path().join("stats.json"));

        let mut record = StatsRecord::default();
        record.total_attempts = 3;
        record.correct_attempts = 2;
        record.word_stats.insert(
            "вокзал".into(),
            WordStat {
                attempts: 2,
                correct: 2,
            },
        );

        repo.save(&record).expect("save");
        let loaded = repo.load().expect("load").expect("record present");
        assert_eq!(loaded, record);
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().expect("temp dir");
        let repo = JsonStatsFile::new(dir.path().join("stats.json"));
        assert!(repo.load().expect("load").is_none());
    }

    #[test]
    fn corrupt_file_is_a_format_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("stats.json");
        std::fs::write(&path, "{ not json").expect("write");

        let repo = JsonStatsFile::new(path);
        assert!(matches!(repo.load(), Err(PersistenceError::Format(_))));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().expect("temp dir");
        let repo = JsonStatsFile::new(dir.path().join("nested/deeper/stats.json"));
        repo.save(&StatsRecord::default()).expect("save");
        assert!(repo.load().expect("load").is_some());
    }

    #[test]
    fn save_overwrites_in_full() {
        let dir = tempdir().expect("temp dir");
        let repo = JsonStatsFile::new(dir.path().join("stats.json"));

        let mut first = StatsRecord::default();
        first
            .word_stats
            .insert("старое".into(), WordStat { attempts: 5, correct: 1 });
        repo.save(&first).expect("save first");

        let second = StatsRecord::default();
        repo.save(&second).expect("save second");

        let loaded = repo.load().expect("load").expect("record");
        assert!(loaded.word_stats.is_empty());
    }

    #[test]
    fn session_start_serialises_as_iso_8601() {
        let record = StatsRecord::default();
        let json = serde_json::to_string(&record).expect("serialize");
        // RFC 3339 / ISO-8601 shape: "YYYY-MM-DDTHH:MM:SS…"
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        let ts = value["session_start"].as_str().expect("string timestamp");
        assert!(ts.contains('T'), "timestamp {ts} is not ISO-8601");
    }
}
