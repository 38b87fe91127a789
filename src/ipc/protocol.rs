//! IPC message protocol definitions
//!
//! All messages are JSON-encoded, prefixed with a 4-byte little-endian length.

use serde::{Deserialize, Serialize};

use crate::accessibility::AccessibilitySettings;
use crate::app::PageSnapshot;
use crate::events::FeedbackEvent;
use crate::interaction::{Outcome, PanelEvent};
use crate::router::Route;

/// Largest frame accepted from a client
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Requests from the presentation layer to the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Ping to check connectivity
    Ping,

    /// Request current daemon status
    GetStatus,

    /// Mount the page at a route path
    Navigate { path: String },

    /// Forward an interaction to the mounted page
    Dispatch { event: PanelEvent },

    /// Pointer or focus entered an element
    Hover { description: String },

    ToggleScreenReader,

    ToggleHoverAnnouncements,

    /// Turn the audio cue channel on or off
    ToggleAudio,

    /// Subscribe to feedback notifications
    Subscribe,
}

/// Responses from the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Pong,

    /// Current daemon status
    Status(DaemonStatus),

    Navigated { route: Route, page: PageSnapshot },

    /// Result of a dispatched event plus the page afterwards
    Snapshot { outcome: Outcome, page: PageSnapshot },

    Accessibility {
        settings: AccessibilitySettings,
        spoken: bool,
    },

    Audio { enabled: bool },

    /// Subscription confirmed
    Subscribed,

    /// Error response
    Error { code: String, message: String },
}

impl Response {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Push notification from daemon to subscribed clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "event", rename_all = "snake_case")]
pub enum Notification {
    Feedback(FeedbackEvent),
}

/// Full daemon status snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonStatus {
    /// Daemon version
    pub version: String,

    /// Uptime in seconds
    pub uptime_secs: u64,

    pub page: PageSnapshot,

    /// Announcements waiting to be spoken
    pub pending_announcements: usize,

    /// Whether an utterance is being spoken right now
    pub speaking: bool,

    pub audio_enabled: bool,
}
