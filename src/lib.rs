//! Spelling trainer — listen-and-type drills for Russian spelling.
//!
//! The app plays a word out loud, the learner types what they heard, and
//! the session ends with a school grade (1–5) plus a per-word error log.
//!
//! # Module map
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`config`] | settings file + platform paths |
//! | [`session`] | session engine, word lists, the [`session::Trainer`] facade |
//! | [`stats`] | attempt counters, grading, JSON persistence |
//! | [`speech`] | word → audio-file cache over a TTS provider |
//! | [`audio`] | playing cached artifacts through the output device |
//! | [`worker`] | background task driving speech + audio off the UI thread |
//! | [`app`] | the egui window |

pub mod app;
pub mod audio;
pub mod config;
pub mod session;
pub mod speech;
pub mod stats;
pub mod worker;
