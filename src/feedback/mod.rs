//! Feedback channel adapters
//!
//! Audio cues standing in for the haptic pulse a physical panel would give.

mod audio;
mod cue;

pub use audio::{AudioAdapter, TracingToneBackend};
pub use cue::Cue;

#[cfg(test)]
pub use audio::ToneBackend;
#[cfg(test)]
pub use cue::Sound;
