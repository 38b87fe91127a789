//! Audio feedback channel
//!
//! Plays the tone sequence of a cue through a shared tone backend. The
//! backend is unlocked lazily on the first cue and reused for every sound.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use super::cue::{Cue, Sound};
use crate::events::{publish, EventSender, FeedbackEvent};

/// Output device able to render a single sound
pub trait ToneBackend: Send + Sync {
    /// Unlock / warm up the output. Called once before the first sound.
    fn start(&self);

    /// Render one sound immediately
    fn trigger(&self, sound: &Sound);
}

/// Tone backend that only logs what it would play
#[derive(Debug, Default)]
pub struct TracingToneBackend;

impl ToneBackend for TracingToneBackend {
    fn start(&self) {
        info!("audio output started");
    }

    fn trigger(&self, sound: &Sound) {
        match sound {
            Sound::Tone {
                note,
                duration,
                velocity,
            } => {
                debug!(note, duration_ms = duration.as_millis() as u64, velocity, "tone");
            }
            Sound::Noise { duration } => {
                debug!(duration_ms = duration.as_millis() as u64, "noise click");
            }
        }
    }
}

/// Audio channel adapter
pub struct AudioAdapter {
    backend: Arc<dyn ToneBackend>,
    started: AtomicBool,
    enabled: AtomicBool,
    events: EventSender,
}

impl AudioAdapter {
    /// Create an adapter around a shared backend
    pub fn new(backend: Arc<dyn ToneBackend>, events: EventSender) -> Self {
        Self {
            backend,
            started: AtomicBool::new(false),
            enabled: AtomicBool::new(true),
            events,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Enable or disable the channel. Sounds already scheduled still play.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        info!(enabled, "audio feedback toggled");
    }

    /// Start the backend if it has not been started yet
    pub fn ensure_started(&self) {
        if !self.started.swap(true, Ordering::SeqCst) {
            self.backend.start();
        }
    }

    /// Play the cue bound to a raw action label
    pub fn play(&self, label: &str) {
        self.play_cue(Cue::from_label(label));
    }

    /// Play a cue. Each delayed step runs on its own timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn play_cue(&self, cue: Cue) {
        if !self.is_enabled() {
            debug!(%cue, "audio disabled, cue skipped");
            return;
        }

        self.ensure_started();

        for step in cue.steps() {
            if step.delay.is_zero() {
                self.backend.trigger(&step.sound);
                continue;
            }

            let backend = Arc::clone(&self.backend);
            let step = *step;
            tokio::spawn(async move {
                tokio::time::sleep(step.delay).await;
                backend.trigger(&step.sound);
            });
        }

        publish(&self.events, FeedbackEvent::CuePlayed { cue: cue.to_string() });
    }
}
