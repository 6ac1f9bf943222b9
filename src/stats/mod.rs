//! Statistics store — durable per-word attempt counters and grading.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │  StatsStore                                    │
//! │    record: StatsRecord (in memory)             │
//! │    repo:   Box<dyn StatsRepository>            │
//! │                  │                             │
//! │                  ▼                             │
//! │    JsonStatsFile — stats.json, full rewrite    │
//! │    MemoryStats   — in-memory fake (tests)      │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation updates the in-memory record first and then saves the
//! whole record through the repository (best-effort durability: a failed
//! save is reported but the in-memory state keeps the attempt).

pub mod repo;
pub mod store;

pub use repo::{JsonStatsFile, PersistenceError, StatsRecord, StatsRepository, WordStat};
pub use store::{grade_for_percentage, StatsStore};

#[cfg(test)]
pub use repo::MemoryStats;
