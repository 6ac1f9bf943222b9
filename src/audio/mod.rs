//! Audio output — playing cached word artifacts through the default
//! device.
//!
//! The trainer only needs one operation: load a file, play it, and know
//! when the device is done.  [`AudioOutput`] captures exactly that;
//! [`RodioOutput`] is the production device and the worker runs it under
//! `tokio::task::spawn_blocking` so the UI never stalls.

pub mod playback;

pub use playback::{AudioOutput, PlaybackError, RodioOutput};

#[cfg(test)]
pub use playback::MockOutput;
