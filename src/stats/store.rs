//! The statistics store: attempt counters, percentage and grading.

use std::collections::BTreeMap;

use chrono::Local;

use super::repo::{PersistenceError, StatsRecord, StatsRepository, WordStat};

/// Map a percentage-correct to the 1–5 grade scale.
///
/// Band lower bounds are inclusive: `≥95 → 5`, `≥85 → 4`, `≥75 → 3`,
/// `≥60 → 2`, everything else `1`.
pub fn grade_for_percentage(percentage: f64) -> u8 {
    if percentage >= 95.0 {
        5
    } else if percentage >= 85.0 {
        4
    } else if percentage >= 75.0 {
        3
    } else if percentage >= 60.0 {
        2
    } else {
        1
    }
}

/// Durable record of attempts, keyed by word, with aggregate counters.
///
/// All mutations update the in-memory record first and then persist the
/// full record through the injected [`StatsRepository`].  A failed save is
/// returned to the caller (who logs it); the in-memory state always
/// reflects the attempt.
pub struct StatsStore {
    record: StatsRecord,
    repo: Box<dyn StatsRepository>,
}

impl StatsStore {
    /// Open the store over `repo`, loading the previously stored record.
    ///
    /// An unreadable or corrupt record is logged and replaced with a fresh
    /// one — statistics are best-effort, never a startup failure.
    pub fn open(repo: Box<dyn StatsRepository>) -> Self {
        let record = match repo.load() {
            Ok(Some(record)) => record,
            Ok(None) => StatsRecord::default(),
            Err(e) => {
                log::warn!("stats: could not load stored record ({e}); starting fresh");
                StatsRecord::default()
            }
        };
        Self { record, repo }
    }

    /// Count one answer for `word` and persist.
    pub fn record_attempt(&mut self, word: &str, correct: bool) -> Result<(), PersistenceError> {
        self.record.total_attempts += 1;
        if correct {
            self.record.correct_attempts += 1;
        }

        let stat = self
            .record
            .word_stats
            .entry(word.to_owned())
            .or_default();
        stat.attempts += 1;
        if correct {
            stat.correct += 1;
        }

        self.repo.save(&self.record)
    }

    /// Zero all counters, clear the per-word map, stamp a new session start
    /// and persist.
    pub fn reset_session(&mut self) -> Result<(), PersistenceError> {
        self.record = StatsRecord {
            session_start: Local::now(),
            ..StatsRecord::default()
        };
        self.repo.save(&self.record)
    }

    /// Percentage of correct answers, `0.0` when nothing was attempted.
    pub fn percentage(&self) -> f64 {
        if self.record.total_attempts == 0 {
            return 0.0;
        }
        self.record.correct_attempts as f64 / self.record.total_attempts as f64 * 100.0
    }

    /// Current 1–5 grade (see [`grade_for_percentage`]).
    pub fn grade(&self) -> u8 {
        grade_for_percentage(self.percentage())
    }

    /// Words with at least one error, mapped to their error count.
    pub fn errors_by_word(&self) -> BTreeMap<String, u32> {
        self.record
            .word_stats
            .iter()
            .filter(|(_, stat)| stat.errors() > 0)
            .map(|(word, stat)| (word.clone(), stat.errors()))
            .collect()
    }

    /// Per-word counters for one word, if it was ever attempted.
    pub fn word_stat(&self, word: &str) -> Option<&WordStat> {
        self.record.word_stats.get(word)
    }

    /// The full in-memory record (for display).
    pub fn record(&self) -> &StatsRecord {
        &self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MemoryStats;

    fn store() -> StatsStore {
        StatsStore::open(Box::new(MemoryStats::new()))
    }

    // ---- grade_for_percentage ----

    #[test]
    fn grade_band_boundaries_are_inclusive() {
        assert_eq!(grade_for_percentage(100.0), 5);
        assert_eq!(grade_for_percentage(95.0), 5);
        assert_eq!(grade_for_percentage(94.9), 4);
        assert_eq!(grade_for_percentage(85.0), 4);
        assert_eq!(grade_for_percentage(84.9), 3);
        assert_eq!(grade_for_percentage(75.0), 3);
        assert_eq!(grade_for_percentage(74.9), 2);
        assert_eq!(grade_for_percentage(60.0), 2);
        assert_eq!(grade_for_percentage(59.9), 1);
        assert_eq!(grade_for_percentage(0.0), 1);
    }

    // ---- record_attempt ----

    #[test]
    fn attempts_update_totals_and_word_counters() {
        let mut store = store();
        store.record_attempt("вокзал", true).unwrap();
        store.record_attempt("вокзал", false).unwrap();
        store.record_attempt("парашют", false).unwrap();

        let record = store.record();
        assert_eq!(record.total_attempts, 3);
        assert_eq!(record.correct_attempts, 1);
        assert_eq!(
            record.word_stats["вокзал"],
            WordStat {
                attempts: 2,
                correct: 1
            }
        );
        assert_eq!(
            record.word_stats["парашют"],
            WordStat {
                attempts: 1,
                correct: 0
            }
        );
    }

    /// The aggregate counters must always equal the per-word sums.
    #[test]
    fn totals_equal_per_word_sums() {
        let mut store = store();
        for (word, ok) in [("а-слово", true), ("б-слово", false), ("а-слово", true)] {
            store.record_attempt(word, ok).unwrap();
        }
        let record = store.record();
        let attempts: u64 = record.word_stats.values().map(|s| s.attempts as u64).sum();
        let correct: u64 = record.word_stats.values().map(|s| s.correct as u64).sum();
        assert_eq!(record.total_attempts, attempts);
        assert_eq!(record.correct_attempts, correct);
    }

    /// Best-effort durability: a failed save still counts the attempt in
    /// memory.
    #[test]
    fn failed_save_keeps_the_in_memory_attempt() {
        let mut store = StatsStore::open(Box::new(MemoryStats::failing()));
        assert!(store.record_attempt("парашют", false).is_err());
        assert_eq!(store.record().total_attempts, 1);
        assert_eq!(store.word_stat("парашют").unwrap().attempts, 1);
    }

    #[test]
    fn reopening_restores_the_saved_record() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("stats.json");

        let mut store =
            StatsStore::open(Box::new(crate::stats::JsonStatsFile::new(path.clone())));
        store.record_attempt("вокзал", true).unwrap();
        store.record_attempt("парашют", false).unwrap();
        drop(store);

        let reopened = StatsStore::open(Box::new(crate::stats::JsonStatsFile::new(path)));
        assert_eq!(reopened.record().total_attempts, 2);
        assert_eq!(reopened.record().correct_attempts, 1);
    }

    // ---- percentage / grade ----

    #[test]
    fn percentage_is_zero_when_empty() {
        assert_eq!(store().percentage(), 0.0);
    }

    /// Reset followed by a single correct attempt must be exactly 100.0.
    #[test]
    fn percentage_after_reset_and_one_correct_is_exactly_100() {
        let mut store = store();
        store.record_attempt("вокзал", false).unwrap();
        store.reset_session().unwrap();
        store.record_attempt("деревня", true).unwrap();
        assert_eq!(store.percentage(), 100.0);
        assert_eq!(store.grade(), 5);
    }

    // ---- reset_session ----

    #[test]
    fn reset_clears_counters_map_and_restamps_session_start() {
        let mut store = store();
        store.record_attempt("вокзал", true).unwrap();
        let before = store.record().session_start;

        store.reset_session().unwrap();
        let record = store.record();
        assert_eq!(record.total_attempts, 0);
        assert_eq!(record.correct_attempts, 0);
        assert!(record.word_stats.is_empty());
        assert!(record.session_start >= before);
    }

    // ---- errors_by_word ----

    #[test]
    fn errors_by_word_lists_only_words_with_errors() {
        let mut store = store();
        store.record_attempt("вокзал", true).unwrap();
        store.record_attempt("парашют", false).unwrap();
        store.record_attempt("парашют", false).unwrap();
        store.record_attempt("деревня", true).unwrap();

        let errors = store.errors_by_word();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["парашют"], 2);
    }

    /// The scenario from the word-list drill: "Вокзал" (correct, case
    /// folded) then "парашут" (misspelled).
    #[test]
    fn two_word_session_scenario() {
        let mut store = store();
        store.reset_session().unwrap();
        store.record_attempt("вокзал", true).unwrap();
        store.record_attempt("парашют", false).unwrap();

        assert_eq!(store.percentage(), 50.0);
        assert_eq!(store.grade(), 1);
        let errors = store.errors_by_word();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["парашют"], 1);
    }
}
