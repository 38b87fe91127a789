//! Speech synthesis backends
//!
//! A backend receives one utterance at a time and reports completion (or
//! failure) through a oneshot channel, mirroring the end/error callbacks of
//! platform synthesizers.

use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Voices tried in order before falling back to the platform default
pub const PREFERRED_VOICES: &[&str] = &["Google US English", "Microsoft Zira", "Microsoft David"];

/// Completion signal handed to a backend with each utterance
pub type SpeechDone = oneshot::Sender<Result<(), SpeechError>>;

/// Errors reported by a speech backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("failed to start synthesizer: {0}")]
    Spawn(String),

    #[error("synthesizer exited with status {0}")]
    Exited(i32),

    #[error("synthesizer was interrupted")]
    Interrupted,
}

/// Whether an utterance is a primary announcement or a hover hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtteranceKind {
    Primary,
    Hover,
}

/// A voice offered by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

/// Text plus prosody settings for a single announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub kind: UtteranceKind,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Selected voice name; `None` means platform default
    pub voice: Option<String>,
}

impl Utterance {
    /// Primary announcement: slightly faster than normal speech
    pub fn primary(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: UtteranceKind::Primary,
            rate: 1.1,
            pitch: 1.0,
            volume: 1.0,
            voice: None,
        }
    }

    /// Hover hint: faster and quieter so it stays unobtrusive
    pub fn hover(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: UtteranceKind::Hover,
            rate: 1.2,
            pitch: 1.0,
            volume: 0.7,
            voice: None,
        }
    }
}

/// Pick the first available voice matching the preferred candidates
pub fn select_voice(voices: &[Voice]) -> Option<&Voice> {
    voices
        .iter()
        .find(|voice| PREFERRED_VOICES.iter().any(|name| voice.name.contains(name)))
}

/// A text-to-speech engine
pub trait SpeechBackend: Send + Sync {
    /// Voices the engine can use
    fn voices(&self) -> Vec<Voice>;

    /// Start speaking. The backend must eventually complete `done`;
    /// dropping it is treated as an interruption.
    fn speak(&self, utterance: Utterance, done: SpeechDone);
}

/// Backend that logs utterances and completes after a simulated duration
#[derive(Debug, Clone)]
pub struct SimulatedSpeechBackend {
    voices: Vec<Voice>,
    per_word: Duration,
}

impl SimulatedSpeechBackend {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            per_word: Duration::from_millis(300),
        }
    }

    /// Simulated speaking time for an utterance
    pub fn duration_for(&self, utterance: &Utterance) -> Duration {
        let words = utterance.text.split_whitespace().count().max(1) as f32;
        let rate = if utterance.rate > 0.0 { utterance.rate } else { 1.0 };
        let millis = self.per_word.as_millis() as f32 * words / rate;
        Duration::from_millis(millis.round() as u64)
    }
}

impl Default for SimulatedSpeechBackend {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SpeechBackend for SimulatedSpeechBackend {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&self, utterance: Utterance, done: SpeechDone) {
        let duration = self.duration_for(&utterance);
        info!(
            text = %utterance.text,
            voice = utterance.voice.as_deref().unwrap_or("default"),
            rate = utterance.rate,
            volume = utterance.volume,
            "speaking"
        );
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = done.send(Ok(()));
        });
    }
}

/// Backend driving an espeak-compatible command line synthesizer
#[derive(Debug, Clone)]
pub struct ProcessSpeechBackend {
    program: String,
}

impl ProcessSpeechBackend {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command line arguments for an utterance (`-s` words per minute,
    /// `-p` pitch 0-99, `-a` amplitude 0-200, `-v` voice). The text always
    /// follows `--` so it is never parsed as an option.
    pub fn args_for(utterance: &Utterance) -> Vec<String> {
        let mut args = vec![
            "-s".to_string(),
            ((175.0 * utterance.rate).round() as u32).to_string(),
            "-p".to_string(),
            ((50.0 * utterance.pitch).round().clamp(0.0, 99.0) as u32).to_string(),
            "-a".to_string(),
            ((100.0 * utterance.volume).round().clamp(0.0, 200.0) as u32).to_string(),
        ];
        if let Some(voice) = &utterance.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push("--".to_string());
        args.push(utterance.text.clone());
        args
    }
}

impl SpeechBackend for ProcessSpeechBackend {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&self, utterance: Utterance, done: SpeechDone) {
        let mut command = Command::new(&self.program);
        command
            .args(Self::args_for(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        debug!(program = %self.program, text = %utterance.text, "spawning synthesizer");

        tokio::spawn(async move {
            let result = match command.status().await {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => match status.code() {
                    Some(code) => Err(SpeechError::Exited(code)),
                    None => Err(SpeechError::Interrupted),
                },
                Err(e) => Err(SpeechError::Spawn(e.to_string())),
            };
            let _ = done.send(result);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str) -> Voice {
        Voice {
            name: name.to_string(),
            lang: "en-US".to_string(),
        }
    }

    #[test]
    fn test_preferred_voice_selection() {
        let voices = vec![
            voice("Alex"),
            voice("Microsoft David Desktop"),
            voice("Google US English"),
        ];
        assert_eq!(select_voice(&voices).unwrap().name, "Microsoft David Desktop");
        assert!(select_voice(&[voice("Alex")]).is_none());
    }

    #[test]
    fn test_hover_prosody_is_faster_and_quieter() {
        let primary = Utterance::primary("Volume increased");
        let hover = Utterance::hover("Volume slider");
        assert!(hover.rate > primary.rate);
        assert!(hover.volume < primary.volume);
    }

    #[test]
    fn test_process_args() {
        let mut utterance = Utterance::primary("Door locked");
        utterance.voice = Some("en-us".to_string());
        let args = ProcessSpeechBackend::args_for(&utterance);
        assert_eq!(
            args,
            ["-s", "193", "-p", "50", "-a", "100", "-v", "en-us", "--", "Door locked"]
        );
    }

    #[test]
    fn test_option_like_text_stays_an_operand() {
        let args = ProcessSpeechBackend::args_for(&Utterance::hover("-w/tmp/overwritten.wav"));
        let text_at = args.len() - 1;
        assert_eq!(args[text_at], "-w/tmp/overwritten.wav");
        assert_eq!(args[text_at - 1], "--");
        assert_eq!(args.iter().filter(|a| a.starts_with("-w")).count(), 1);
    }

    #[test]
    fn test_simulated_duration_scales_with_rate() {
        let backend = SimulatedSpeechBackend::default();
        let slow = Utterance {
            rate: 1.0,
            ..Utterance::primary("one two three")
        };
        assert_eq!(backend.duration_for(&slow), Duration::from_millis(900));
        let faster = backend.duration_for(&Utterance::primary("one two three"));
        assert!(faster < Duration::from_millis(900));
    }

    #[tokio::test]
    async fn test_missing_program_reports_error() {
        let backend = ProcessSpeechBackend::new("/nonexistent/touchpanel-speech");
        let (tx, rx) = oneshot::channel();
        backend.speak(Utterance::primary("hello"), tx);
        assert!(matches!(rx.await.unwrap(), Err(SpeechError::Spawn(_))));
    }
}
