//! Transient "last action" indicator
//!
//! Shows the most recent action for a fixed window. Each new action
//! replaces the pending hide task, so only the latest action is guaranteed
//! its full window.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::trace;

use crate::events::{publish, EventSender, FeedbackEvent};

/// What the indicator currently displays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorView {
    pub last_action: Option<String>,
    pub visible: bool,
}

/// Indicator with a cancellable hide timer
pub struct FeedbackIndicator {
    view: Arc<Mutex<IndicatorView>>,
    window: Duration,
    hide_task: Option<JoinHandle<()>>,
    events: EventSender,
}

impl FeedbackIndicator {
    pub fn new(window: Duration, events: EventSender) -> Self {
        Self {
            view: Arc::new(Mutex::new(IndicatorView::default())),
            window,
            hide_task: None,
            events,
        }
    }

    pub fn view(&self) -> IndicatorView {
        self.view.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Display `label` and (re)schedule hiding it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&mut self, label: &str) {
        {
            let mut view = self.view.lock().unwrap_or_else(|p| p.into_inner());
            view.last_action = Some(label.to_owned());
            view.visible = true;
        }

        if let Some(task) = self.hide_task.take() {
            task.abort();
        }

        let view = Arc::clone(&self.view);
        let window = self.window;
        let events = self.events.clone();
        let label = label.to_owned();
        self.hide_task = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            view.lock().unwrap_or_else(|p| p.into_inner()).visible = false;
            trace!(%label, "indicator hidden");
            publish(&events, FeedbackEvent::IndicatorCleared { label });
        }));
    }

    /// Cancel the pending hide task
    pub fn dispose(&mut self) {
        if let Some(task) = self.hide_task.take() {
            task.abort();
        }
    }
}

impl Drop for FeedbackIndicator {
    fn drop(&mut self) {
        self.dispose();
    }
}
