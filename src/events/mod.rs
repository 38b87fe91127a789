//! Events module for feedback fan-out
//!
//! Provides structured event types published on every state transition,
//! action, spoken announcement and indicator change. Subscribed IPC clients
//! receive these as push notifications.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::concepts::{ConceptKind, Control};
use crate::interaction::{Intensity, InteractionState};

/// Sender half of the feedback bus
pub type EventSender = broadcast::Sender<FeedbackEvent>;

/// Events emitted while handling panel interactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedbackEvent {
    /// A concept page was mounted by navigation
    PageMounted { concept: ConceptKind },

    /// Lifecycle state changed
    StateChanged {
        concept: ConceptKind,
        from: InteractionState,
        to: InteractionState,
    },

    /// An action fanned out to the feedback channels
    ActionTriggered {
        concept: ConceptKind,
        label: String,
        intensity: Intensity,
    },

    /// Pre-activation pressure: visual feedback only
    Highlighted { concept: ConceptKind, control: Control },

    /// The transient last-action indicator was hidden
    IndicatorCleared { label: String },

    /// An utterance was handed to the speech backend
    Spoken { text: String },

    /// An audio cue was scheduled
    CuePlayed { cue: String },
}

impl std::fmt::Display for FeedbackEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackEvent::PageMounted { concept } => write!(f, "PAGE_MOUNTED ({})", concept),
            FeedbackEvent::StateChanged { concept, from, to } => {
                write!(f, "STATE_CHANGED ({}: {} -> {})", concept, from, to)
            }
            FeedbackEvent::ActionTriggered { label, .. } => {
                write!(f, "ACTION_TRIGGERED ({})", label)
            }
            FeedbackEvent::Highlighted { control, .. } => write!(f, "HIGHLIGHTED ({})", control),
            FeedbackEvent::IndicatorCleared { label } => {
                write!(f, "INDICATOR_CLEARED ({})", label)
            }
            FeedbackEvent::Spoken { text } => write!(f, "SPOKEN ({})", text),
            FeedbackEvent::CuePlayed { cue } => write!(f, "CUE_PLAYED ({})", cue),
        }
    }
}

/// Publish an event, ignoring the case where nobody is listening
pub fn publish(tx: &EventSender, event: FeedbackEvent) {
    tracing::trace!(%event, "publishing feedback event");
    let _ = tx.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = FeedbackEvent::StateChanged {
            concept: ConceptKind::SofaArm,
            from: InteractionState::Inactive,
            to: InteractionState::Proximity,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("state_changed"));
        assert!(json.contains("sofa_arm"));
        assert!(json.contains("proximity"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"spoken","text":"Volume increased"}"#;
        let event: FeedbackEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            FeedbackEvent::Spoken {
                text: "Volume increased".to_string()
            }
        );
    }

    #[test]
    fn test_publish_without_receivers() {
        let (tx, rx) = broadcast::channel(4);
        drop(rx);
        publish(&tx, FeedbackEvent::CuePlayed { cue: "tap".into() });
    }
}
