//! Accessibility broadcast service
//!
//! Holds the screen reader settings and a FIFO announcement queue shared by
//! every page. A single drain task hands the head of the queue to the speech
//! backend and waits for it to finish before starting the next one.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::phrases::describe_action;
use super::speech::{select_voice, SpeechBackend, Utterance};
use crate::events::{publish, EventSender, FeedbackEvent};

pub const SCREEN_READER_ENABLED_TEXT: &str =
    "Screen reader mode enabled. All actions will be spoken aloud.";

/// Snapshot of the accessibility toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilitySettings {
    pub screen_reader: bool,
    pub hover_announcements: bool,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            screen_reader: false,
            hover_announcements: true,
        }
    }
}

struct Inner {
    settings: AccessibilitySettings,
    /// Pending utterances; while speaking, the head is the one in flight
    queue: VecDeque<Utterance>,
    speaking: bool,
    recent_hovers: HashMap<String, Instant>,
}

/// Screen reader announcements shared across pages
pub struct AnnouncementService {
    inner: Mutex<Inner>,
    wake: Notify,
    backend: Arc<dyn SpeechBackend>,
    hover_window: Duration,
    events: EventSender,
}

impl AnnouncementService {
    /// Create the service with default settings (screen reader off,
    /// hover announcements on)
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        hover_window: Duration,
        events: EventSender,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                settings: AccessibilitySettings::default(),
                queue: VecDeque::new(),
                speaking: false,
                recent_hovers: HashMap::new(),
            }),
            wake: Notify::new(),
            backend,
            hover_window,
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn settings(&self) -> AccessibilitySettings {
        self.lock().settings
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().settings.screen_reader
    }

    pub fn is_speaking(&self) -> bool {
        self.lock().speaking
    }

    /// Number of queued utterances, including the one in flight
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Texts waiting to be spoken, head first
    #[cfg(test)]
    pub fn queued_texts(&self) -> Vec<String> {
        self.lock().queue.iter().map(|u| u.text.clone()).collect()
    }

    /// Turn the screen reader on, announcing the change
    pub fn enable(&self) {
        let was_enabled = {
            let mut inner = self.lock();
            std::mem::replace(&mut inner.settings.screen_reader, true)
        };
        if !was_enabled {
            info!("screen reader enabled");
            self.announce(SCREEN_READER_ENABLED_TEXT);
            // Anything queued before the channel was disabled resumes
            self.wake.notify_one();
        }
    }

    /// Turn the screen reader off. An utterance already in flight is not
    /// recalled; new announcements are rejected.
    pub fn disable(&self) {
        let mut inner = self.lock();
        if inner.settings.screen_reader {
            inner.settings.screen_reader = false;
            info!(pending = inner.queue.len(), "screen reader disabled");
        }
    }

    /// Flip the screen reader toggle, returning the new value
    pub fn toggle_screen_reader(&self) -> bool {
        if self.is_enabled() {
            self.disable();
            false
        } else {
            self.enable();
            true
        }
    }

    /// Flip the hover announcement toggle, returning the new value
    pub fn toggle_hover_announcements(&self) -> bool {
        let enabled = {
            let mut inner = self.lock();
            inner.settings.hover_announcements = !inner.settings.hover_announcements;
            inner.settings.hover_announcements
        };
        info!(enabled, "hover announcements toggled");
        self.announce(if enabled {
            "Hover announcements enabled."
        } else {
            "Hover announcements disabled."
        });
        enabled
    }

    /// Queue text for speaking. Returns whether it was queued.
    pub fn announce(&self, text: &str) -> bool {
        self.enqueue(Utterance::primary(text))
    }

    /// Queue the spoken description of an action label
    pub fn announce_action(&self, label: &str) -> bool {
        self.announce(&describe_action(label))
    }

    /// Announce the element under the pointer or focus.
    ///
    /// The same description is not repeated within the hover window.
    pub fn announce_hover(&self, description: &str) -> bool {
        {
            let mut inner = self.lock();
            if !inner.settings.screen_reader
                || !inner.settings.hover_announcements
                || description.is_empty()
            {
                return false;
            }

            let now = Instant::now();
            let window = self.hover_window;
            inner
                .recent_hovers
                .retain(|_, announced_at| now.duration_since(*announced_at) < window);

            if inner.recent_hovers.contains_key(description) {
                debug!(description, "hover announcement suppressed");
                return false;
            }

            inner.recent_hovers.insert(description.to_owned(), now);
            inner.queue.push_back(Utterance::hover(description));
        }
        self.wake.notify_one();
        true
    }

    fn enqueue(&self, utterance: Utterance) -> bool {
        {
            let mut inner = self.lock();
            if !inner.settings.screen_reader || utterance.text.is_empty() {
                return false;
            }
            debug!(text = %utterance.text, queued = inner.queue.len(), "announcement queued");
            inner.queue.push_back(utterance);
        }
        self.wake.notify_one();
        true
    }

    /// Take the head of the queue if the channel may speak now
    fn next_utterance(&self) -> Option<Utterance> {
        let mut inner = self.lock();
        if !inner.settings.screen_reader || inner.speaking {
            return None;
        }
        let head = inner.queue.front().cloned()?;
        inner.speaking = true;
        Some(head)
    }

    fn finish_utterance(&self) {
        let mut inner = self.lock();
        inner.queue.pop_front();
        inner.speaking = false;
    }

    /// Spawn the drain loop. Runs until the returned handle is aborted.
    pub fn spawn_drain(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            info!("announcement drain started");
            loop {
                let Some(mut utterance) = service.next_utterance() else {
                    service.wake.notified().await;
                    continue;
                };

                utterance.voice = select_voice(&service.backend.voices()).map(|v| v.name.clone());
                let text = utterance.text.clone();
                publish(&service.events, FeedbackEvent::Spoken { text: text.clone() });

                let (done_tx, done_rx) = oneshot::channel();
                service.backend.speak(utterance, done_tx);

                match done_rx.await {
                    Ok(Ok(())) => debug!(%text, "announcement finished"),
                    Ok(Err(e)) => {
                        warn!(error = %e, %text, "speech synthesis error, announcement dropped")
                    }
                    Err(_) => warn!(%text, "speech backend dropped announcement"),
                }

                service.finish_utterance();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast;

    use super::*;
    use crate::accessibility::speech::{SpeechError, Voice};
    use crate::testing::{settle, ScriptedSpeechBackend};

    fn create_service() -> (Arc<AnnouncementService>, Arc<ScriptedSpeechBackend>) {
        create_service_with(ScriptedSpeechBackend::default())
    }

    fn create_service_with(
        backend: ScriptedSpeechBackend,
    ) -> (Arc<AnnouncementService>, Arc<ScriptedSpeechBackend>) {
        let backend = Arc::new(backend);
        let (tx, _) = broadcast::channel(64);
        let service = AnnouncementService::new(backend.clone(), Duration::from_millis(1500), tx);
        (Arc::new(service), backend)
    }

    #[test]
    fn test_defaults() {
        let (service, _) = create_service();
        assert_eq!(
            service.settings(),
            AccessibilitySettings {
                screen_reader: false,
                hover_announcements: true,
            }
        );
        assert!(!service.announce("Volume up"));
        assert_eq!(service.pending(), 0);
    }

    #[test]
    fn test_enable_announces_mode_change() {
        let (service, _) = create_service();
        service.enable();
        service.enable();
        assert_eq!(service.pending(), 1);
    }

    #[test]
    fn test_empty_text_is_not_queued() {
        let (service, _) = create_service();
        service.enable();
        assert!(!service.announce(""));
        assert_eq!(service.pending(), 1);
    }

    #[tokio::test]
    async fn test_fifo_with_single_speaker() {
        let (service, backend) = create_service();
        service.enable();
        service.announce_action("Volume up");
        service.announce("Door locked");

        let drain = service.spawn_drain();
        settle().await;

        let expected = [SCREEN_READER_ENABLED_TEXT, "Volume increased", "Door locked"];
        for (i, text) in expected.iter().enumerate() {
            assert_eq!(backend.in_flight(), 1);
            assert!(service.is_speaking());
            assert_eq!(backend.spoken()[i], *text);
            assert_eq!(backend.spoken().len(), i + 1);
            backend.finish();
            settle().await;
        }

        assert!(!service.is_speaking());
        assert_eq!(service.pending(), 0);
        drain.abort();
    }

    #[tokio::test]
    async fn test_error_drops_item_and_continues() {
        let (service, backend) = create_service();
        service.enable();
        service.announce("second");

        let drain = service.spawn_drain();
        settle().await;
        backend.fail(SpeechError::Exited(1));
        settle().await;

        assert_eq!(backend.spoken(), [SCREEN_READER_ENABLED_TEXT, "second"]);
        backend.finish();
        settle().await;
        assert_eq!(service.pending(), 0);
        assert_eq!(backend.spoken().len(), 2);
        drain.abort();
    }

    #[tokio::test]
    async fn test_disable_keeps_in_flight_but_rejects_new() {
        let (service, backend) = create_service();
        service.enable();
        let drain = service.spawn_drain();
        settle().await;
        assert_eq!(backend.in_flight(), 1);

        service.disable();
        assert!(!service.announce("Door unlocked"));
        assert_eq!(backend.in_flight(), 1);

        backend.finish();
        settle().await;
        assert_eq!(backend.spoken(), [SCREEN_READER_ENABLED_TEXT]);
        assert!(!service.is_speaking());
        drain.abort();
    }

    #[tokio::test]
    async fn test_preferred_voice_is_applied() {
        let (service, backend) = create_service_with(ScriptedSpeechBackend::with_voices(vec![
            Voice {
                name: "Samantha".into(),
                lang: "en-US".into(),
            },
            Voice {
                name: "Microsoft Zira Desktop".into(),
                lang: "en-US".into(),
            },
        ]));
        service.enable();
        let drain = service.spawn_drain();
        settle().await;

        let utterances = backend.utterances();
        assert_eq!(utterances[0].voice.as_deref(), Some("Microsoft Zira Desktop"));
        drain.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_suppression_window() {
        let (service, _) = create_service();
        service.enable();

        assert!(service.announce_hover("Play button"));
        tokio::time::advance(Duration::from_millis(1000)).await;
        assert!(!service.announce_hover("Play button"));
        assert!(service.announce_hover("Volume slider"));

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(service.announce_hover("Play button"));
        assert_eq!(service.pending(), 4);
    }

    #[test]
    fn test_hover_requires_both_toggles() {
        let (service, _) = create_service();
        assert!(!service.announce_hover("Play button"));

        service.enable();
        service.toggle_hover_announcements();
        assert!(!service.announce_hover("Play button"));

        service.toggle_hover_announcements();
        assert!(service.announce_hover("Play button"));
    }

    #[test]
    fn test_hover_toggle_speaks_only_with_screen_reader() {
        let (service, _) = create_service();
        assert!(!service.toggle_hover_announcements());
        assert_eq!(service.pending(), 0);

        service.enable();
        assert!(service.toggle_hover_announcements());
        assert_eq!(service.pending(), 2);
    }

    #[tokio::test]
    async fn test_hover_uses_hover_prosody() {
        let (service, backend) = create_service();
        service.enable();
        service.announce_hover("Play button");
        let drain = service.spawn_drain();
        settle().await;
        backend.finish();
        settle().await;

        let hover = &backend.utterances()[1];
        assert_eq!(hover.text, "Play button");
        assert_eq!(hover.volume, 0.7);
        drain.abort();
    }

    #[tokio::test]
    async fn test_queued_items_resume_after_reenable() {
        let (service, backend) = create_service();
        service.enable();
        service.announce("queued");
        service.disable();

        let drain = service.spawn_drain();
        settle().await;
        assert_eq!(backend.in_flight(), 0);

        service.enable();
        settle().await;
        assert_eq!(backend.spoken(), [SCREEN_READER_ENABLED_TEXT]);
        assert_eq!(service.pending(), 3);
        drain.abort();
    }
}
