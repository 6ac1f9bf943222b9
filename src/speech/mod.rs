//! Speech synthesis and the on-disk audio cache.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              SpeechSynthesizer (trait)              │
//! │                                                     │
//! │   GoogleSynthesizer ── reqwest ──▶ MP3 bytes        │
//! │                                                     │
//! │   SpeechCache                                       │
//! │     path_for(word)  = <cache_key(word)>.mp3         │
//! │     ensure(word)    — hit: return path              │
//! │                       miss: synthesize, then return │
//! │     ensure_all(..)  — batch with per-word progress  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! An artifact is generated at most once per word; re-running a session
//! reuses everything already on disk.

pub mod cache;
pub mod key;
pub mod synth;

pub use cache::{SpeechCache, AUDIO_EXT};
pub use key::cache_key;
pub use synth::{GoogleSynthesizer, SpeechSynthesizer, SynthesisError};

#[cfg(test)]
pub use synth::MockSynthesizer;
