//! Accessibility module: simulated screen reader
//!
//! Provides the announcement service shared by all pages, the action
//! phrase table and the speech synthesis backends it drives.

mod phrases;
mod service;
mod speech;

pub use service::{AccessibilitySettings, AnnouncementService};
pub use speech::{ProcessSpeechBackend, SimulatedSpeechBackend, SpeechBackend};

#[cfg(test)]
pub use speech::{SpeechDone, SpeechError, Utterance, Voice};
