//! [`Trainer`] — the object the presentation layer drives.
//!
//! It couples the pure [`SessionEngine`] to the [`StatsStore`]: starting
//! (or retrying) a session resets the store's counters, and every
//! submitted answer is logged in the session results *and* counted in the
//! store before the next word can be asked for.  Persistence failures are
//! logged and never fail the user's action.

use crate::stats::StatsStore;

use super::engine::{AnswerOutcome, SessionEngine, SessionError, SessionSummary};

/// Session engine + statistics store, serialized behind one owner.
pub struct Trainer {
    engine: SessionEngine,
    stats: StatsStore,
}

impl Trainer {
    pub fn new(stats: StatsStore) -> Self {
        Self {
            engine: SessionEngine::new(),
            stats,
        }
    }

    /// Start a fresh session over `words` and reset the session counters.
    pub fn start(&mut self, words: &[String]) -> Result<(), SessionError> {
        self.engine.start(words)?;
        if let Err(e) = self.stats.reset_session() {
            log::warn!("stats: reset not persisted: {e}");
        }
        Ok(())
    }

    /// Re-shuffle the original word list and reset the session counters.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        self.engine.retry()?;
        if let Err(e) = self.stats.reset_session() {
            log::warn!("stats: reset not persisted: {e}");
        }
        Ok(())
    }

    /// Score an answer, record it in the statistics store, and advance.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, SessionError> {
        let outcome = self.engine.submit_answer(answer)?;
        if let Err(e) = self.stats.record_attempt(&outcome.word, outcome.correct) {
            log::warn!("stats: attempt not persisted: {e}");
        }
        Ok(outcome)
    }

    pub fn current_word(&self) -> Result<&str, SessionError> {
        self.engine.current_word()
    }

    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    pub fn is_idle(&self) -> bool {
        self.engine.is_idle()
    }

    pub fn position(&self) -> usize {
        self.engine.position()
    }

    pub fn total_words(&self) -> usize {
        self.engine.total_words()
    }

    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        self.engine.summary()
    }

    /// The statistics store, for the stats panels.
    pub fn stats(&self) -> &StatsStore {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MemoryStats;

    fn trainer() -> Trainer {
        Trainer::new(StatsStore::open(Box::new(MemoryStats::new())))
    }

    fn list(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn start_resets_the_statistics_store() {
        let mut trainer = trainer();
        trainer.start(&list(&["вокзал", "парашют"])).unwrap();
        let first = trainer.current_word().unwrap().to_owned();
        trainer.submit_answer(&first).unwrap();
        assert_eq!(trainer.stats().record().total_attempts, 1);

        trainer.start(&list(&["вокзал", "парашют"])).unwrap();
        assert_eq!(trainer.stats().record().total_attempts, 0);
    }

    #[test]
    fn every_answer_is_counted_in_the_store() {
        let mut trainer = trainer();
        trainer.start(&list(&["вокзал", "парашют"])).unwrap();

        while !trainer.is_complete() {
            let word = trainer.current_word().unwrap().to_owned();
            trainer.submit_answer(&word).unwrap();
        }

        let record = trainer.stats().record();
        assert_eq!(record.total_attempts, 2);
        assert_eq!(record.correct_attempts, 2);
        assert_eq!(trainer.stats().percentage(), 100.0);
    }

    /// "вокзал"/"парашют" answered "Вокзал" and "парашут": one
    /// case-insensitive hit, one miss, grade 1.
    #[test]
    fn mixed_session_scenario() {
        let mut trainer = trainer();
        trainer.start(&list(&["вокзал", "парашют"])).unwrap();

        while !trainer.is_complete() {
            let word = trainer.current_word().unwrap().to_owned();
            let answer = match word.as_str() {
                "вокзал" => "Вокзал".to_owned(),
                _ => "парашут".to_owned(),
            };
            let outcome = trainer.submit_answer(&answer).unwrap();
            assert_eq!(outcome.correct, word == "вокзал");
        }

        let summary = trainer.summary().unwrap();
        assert_eq!(summary.grade, 1);
        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.error_count, 1);

        let errors = trainer.stats().errors_by_word();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["парашют"], 1);
        assert_eq!(trainer.stats().grade(), 1);
    }

    #[test]
    fn retry_resets_store_and_session() {
        let mut trainer = trainer();
        trainer.start(&list(&["вокзал", "парашют"])).unwrap();
        while !trainer.is_complete() {
            trainer.submit_answer("мимо").unwrap();
        }
        assert_eq!(trainer.stats().record().total_attempts, 2);

        trainer.retry().unwrap();
        assert!(!trainer.is_complete());
        assert_eq!(trainer.position(), 0);
        assert_eq!(trainer.stats().record().total_attempts, 0);
    }

    /// Persistence failures must not surface as user errors.
    #[test]
    fn persistence_failure_does_not_fail_the_submission() {
        let mut trainer = Trainer::new(StatsStore::open(Box::new(MemoryStats::failing())));
        trainer.start(&list(&["вокзал", "парашют"])).unwrap();

        let word = trainer.current_word().unwrap().to_owned();
        let outcome = trainer.submit_answer(&word).unwrap();
        assert!(outcome.correct);
        // The in-memory counters still moved.
        assert_eq!(trainer.stats().record().total_attempts, 1);
    }
}
