//! Test doubles for the feedback backends

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::accessibility::{
    AnnouncementService, SpeechBackend, SpeechDone, SpeechError, Utterance, Voice,
};
use crate::events::FeedbackEvent;
use crate::feedback::{AudioAdapter, Sound, ToneBackend};
use crate::interaction::FeedbackContext;

/// Let spawned tasks on the current-thread runtime make progress
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Tone backend that records every sound
#[derive(Default)]
pub struct RecordingToneBackend {
    starts: AtomicUsize,
    sounds: Mutex<Vec<Sound>>,
}

impl RecordingToneBackend {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Note names in play order; noise clicks show up as "noise"
    pub fn notes(&self) -> Vec<&'static str> {
        self.sounds
            .lock()
            .unwrap()
            .iter()
            .map(|sound| match sound {
                Sound::Tone { note, .. } => *note,
                Sound::Noise { .. } => "noise",
            })
            .collect()
    }
}

impl ToneBackend for RecordingToneBackend {
    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn trigger(&self, sound: &Sound) {
        self.sounds.lock().unwrap().push(*sound);
    }
}

/// Speech backend whose utterances finish only when the test says so
#[derive(Default)]
pub struct ScriptedSpeechBackend {
    voices: Vec<Voice>,
    started: Mutex<Vec<Utterance>>,
    pending: Mutex<VecDeque<SpeechDone>>,
}

impl ScriptedSpeechBackend {
    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    pub fn utterances(&self) -> Vec<Utterance> {
        self.started.lock().unwrap().clone()
    }

    /// Texts handed to the backend, in order
    pub fn spoken(&self) -> Vec<String> {
        self.utterances().into_iter().map(|u| u.text).collect()
    }

    /// Utterances started but not yet completed
    pub fn in_flight(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Complete the oldest in-flight utterance successfully
    pub fn finish(&self) -> bool {
        self.complete(Ok(()))
    }

    /// Complete the oldest in-flight utterance with an error
    pub fn fail(&self, error: SpeechError) -> bool {
        self.complete(Err(error))
    }

    fn complete(&self, result: Result<(), SpeechError>) -> bool {
        match self.pending.lock().unwrap().pop_front() {
            Some(done) => done.send(result).is_ok(),
            None => false,
        }
    }
}

impl SpeechBackend for ScriptedSpeechBackend {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&self, utterance: Utterance, done: SpeechDone) {
        self.started.lock().unwrap().push(utterance);
        self.pending.lock().unwrap().push_back(done);
    }
}

/// Feedback context wired to recording backends
pub struct TestHarness {
    pub context: FeedbackContext,
    pub tones: Arc<RecordingToneBackend>,
    pub speech: Arc<ScriptedSpeechBackend>,
    pub events: broadcast::Receiver<FeedbackEvent>,
}

impl TestHarness {
    pub fn new() -> Self {
        let (tx, events) = broadcast::channel(256);
        let tones = Arc::new(RecordingToneBackend::default());
        let speech = Arc::new(ScriptedSpeechBackend::default());
        let announcer = Arc::new(AnnouncementService::new(
            speech.clone(),
            std::time::Duration::from_millis(1500),
            tx.clone(),
        ));
        let audio = Arc::new(AudioAdapter::new(tones.clone(), tx.clone()));
        Self {
            context: FeedbackContext {
                announcer,
                audio,
                events: tx,
            },
            tones,
            speech,
            events,
        }
    }

    /// Texts currently waiting in the announcement queue
    pub fn queued(&self) -> Vec<String> {
        self.context.announcer.queued_texts()
    }

    /// Drain every event published so far
    pub fn drain_events(&mut self) -> Vec<FeedbackEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
