//! Page lifecycle: routes, the mounted concept page and its timers

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::accessibility::AccessibilitySettings;
use crate::events::{publish, FeedbackEvent};
use crate::interaction::{
    spawn_ambient_sensor, FeedbackContext, InteractionMachine, MachineSettings, Outcome, PanelEvent,
    PanelSnapshot,
};
use crate::router::{Route, RouteError};
use crate::scene::{SceneSnapshot, SceneView};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("{0} has no interactive panel")]
    NoPage(Route),
}

impl AppError {
    /// Stable code for IPC error responses
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Route(RouteError::NotFound(_)) => "not_found",
            AppError::NoPage(_) => "no_page",
        }
    }
}

/// Settings applied to every mounted page
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub machine: MachineSettings,
    pub ambient_interval: Duration,
    pub model_path: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            machine: MachineSettings::default(),
            ambient_interval: Duration::from_secs(8),
            model_path: None,
        }
    }
}

/// Everything the presentation layer needs to render the current page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub route: Route,
    pub panel: Option<PanelSnapshot>,
    pub scene: Option<SceneView>,
    pub scene_state: Option<SceneSnapshot>,
    pub accessibility: AccessibilitySettings,
}

/// A concept page with its machine and background timers
struct MountedPage {
    machine: Arc<Mutex<InteractionMachine>>,
    ambient: Option<JoinHandle<()>>,
    scene: Option<SceneView>,
}

impl MountedPage {
    fn machine(&self) -> MutexGuard<'_, InteractionMachine> {
        self.machine.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Drop for MountedPage {
    fn drop(&mut self) {
        if let Some(task) = self.ambient.take() {
            task.abort();
        }
        self.machine().dispose();
    }
}

/// Navigation and dispatch over the shared feedback channels
pub struct App {
    feedback: FeedbackContext,
    settings: AppSettings,
    route: Route,
    page: Option<MountedPage>,
}

impl App {
    /// Start on the landing page
    pub fn new(feedback: FeedbackContext, settings: AppSettings) -> Self {
        Self {
            feedback,
            settings,
            route: Route::Landing,
            page: None,
        }
    }

    #[cfg(test)]
    pub fn route(&self) -> Route {
        self.route
    }

    pub fn feedback(&self) -> &FeedbackContext {
        &self.feedback
    }

    /// Unmount the current page and mount the one at `path`.
    ///
    /// An unknown path leaves the current page mounted.
    pub fn navigate(&mut self, path: &str) -> Result<Route, AppError> {
        let route = Route::resolve(path)?;

        // Old timers must be gone before the new page starts its own
        self.page = None;
        self.route = route;

        if let Some(kind) = route.concept() {
            let machine = InteractionMachine::new(
                kind.create(),
                self.feedback.clone(),
                self.settings.machine,
            );
            let senses_light = machine.senses_ambient_light();
            let machine = Arc::new(Mutex::new(machine));

            let interval = self.settings.ambient_interval;
            let ambient =
                senses_light.then(|| spawn_ambient_sensor(Arc::clone(&machine), interval));
            let scene = (route == Route::SteeringWheel)
                .then(|| SceneView::load(self.settings.model_path.as_deref()));

            self.page = Some(MountedPage {
                machine,
                ambient,
                scene,
            });
            publish(&self.feedback.events, FeedbackEvent::PageMounted { concept: kind });
        }

        info!(%route, "navigated");
        Ok(route)
    }

    /// Route a panel event to the mounted machine
    pub fn dispatch(&mut self, event: PanelEvent) -> Result<Outcome, AppError> {
        let page = self.page.as_ref().ok_or(AppError::NoPage(self.route))?;
        let outcome = page.machine().transition(event);
        debug!(?outcome, "event dispatched");
        Ok(outcome)
    }

    /// Hover or focus on an element; spoken only when enabled
    pub fn hover(&self, description: &str) -> bool {
        self.feedback.announcer.announce_hover(description)
    }

    pub fn toggle_screen_reader(&self) -> AccessibilitySettings {
        self.feedback.announcer.toggle_screen_reader();
        self.feedback.announcer.settings()
    }

    pub fn toggle_hover_announcements(&self) -> AccessibilitySettings {
        self.feedback.announcer.toggle_hover_announcements();
        self.feedback.announcer.settings()
    }

    /// Flip the audio cue channel, returning the new value
    pub fn toggle_audio(&self) -> bool {
        let enabled = !self.feedback.audio.is_enabled();
        self.feedback.audio.set_enabled(enabled);
        enabled
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let panel = self.page.as_ref().map(|page| page.machine().snapshot());
        let scene_state = panel.as_ref().and_then(SceneSnapshot::from_panel);
        PageSnapshot {
            route: self.route,
            panel,
            scene: self.page.as_ref().and_then(|page| page.scene.clone()),
            scene_state,
            accessibility: self.feedback.announcer.settings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::{ConceptKind, Control, Mode};
    use crate::interaction::InteractionState;
    use crate::testing::TestHarness;

    fn create_app() -> (App, TestHarness) {
        let harness = TestHarness::new();
        let app = App::new(harness.context.clone(), AppSettings::default());
        (app, harness)
    }

    #[tokio::test]
    async fn test_starts_on_landing_without_panel() {
        let (mut app, _) = create_app();
        assert_eq!(app.route(), Route::Landing);
        assert!(app.snapshot().panel.is_none());
        assert_eq!(
            app.dispatch(PanelEvent::Approach),
            Err(AppError::NoPage(Route::Landing))
        );
    }

    #[tokio::test]
    async fn test_navigate_mounts_inactive_machine() {
        let (mut app, mut harness) = create_app();
        app.navigate("/examples/steering-wheel").unwrap();

        let snapshot = app.snapshot();
        let panel = snapshot.panel.unwrap();
        assert_eq!(panel.concept, ConceptKind::SteeringWheel);
        assert_eq!(panel.state, InteractionState::Inactive);
        assert!(snapshot.scene.unwrap().is_fallback());
        assert!(snapshot.scene_state.is_some());

        assert_eq!(
            harness.drain_events(),
            [FeedbackEvent::PageMounted {
                concept: ConceptKind::SteeringWheel
            }]
        );
    }

    #[tokio::test]
    async fn test_unknown_route_keeps_page() {
        let (mut app, _) = create_app();
        app.navigate("/examples/sofa-arm").unwrap();

        let err = app.navigate("/examples/toaster").unwrap_err();
        assert_eq!(err.code(), "not_found");
        assert_eq!(app.route(), Route::SofaArm);
        assert!(app.dispatch(PanelEvent::Approach).is_ok());
    }

    #[tokio::test]
    async fn test_cruise_press_scenario() {
        let (mut app, harness) = create_app();
        harness.context.announcer.enable();
        app.navigate("/examples/steering-wheel").unwrap();
        app.dispatch(PanelEvent::Approach).unwrap();
        app.dispatch(PanelEvent::Touch).unwrap();
        app.dispatch(PanelEvent::ChangeMode { mode: Mode::Cruise }).unwrap();

        let outcome = app
            .dispatch(PanelEvent::Press {
                control: Control::SpeedUp,
                pressure: 80.0,
            })
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Activated {
                control: Control::SpeedUp
            }
        );

        let panel = app.snapshot().panel.unwrap();
        assert_eq!(panel.active_control, Some(Control::SpeedUp));
        assert_eq!(panel.last_action.as_deref(), Some("Speed+ pressed"));
        assert_eq!(harness.queued().last().map(String::as_str), Some("Speed+ pressed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_cancels_pending_timers() {
        let (mut app, mut harness) = create_app();
        app.navigate("/examples/sofa-arm").unwrap();
        app.dispatch(PanelEvent::Approach).unwrap();
        app.dispatch(PanelEvent::Touch).unwrap();

        app.navigate("/user-guidance").unwrap();
        harness.drain_events();

        tokio::time::sleep(Duration::from_secs(10)).await;
        let late: Vec<_> = harness
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, FeedbackEvent::IndicatorCleared { .. }))
            .collect();
        assert!(late.is_empty());
        assert!(app.snapshot().panel.is_none());
    }

    #[tokio::test]
    async fn test_renavigating_resets_state() {
        let (mut app, _) = create_app();
        app.navigate("/examples/vehicle-door").unwrap();
        app.dispatch(PanelEvent::Approach).unwrap();

        app.navigate("/examples/vehicle-door/").unwrap();
        assert_eq!(app.snapshot().panel.unwrap().state, InteractionState::Inactive);
    }

    #[tokio::test]
    async fn test_toggle_audio_silences_cues() {
        let (mut app, harness) = create_app();
        app.navigate("/examples/sofa-arm").unwrap();

        assert!(!app.toggle_audio());
        app.dispatch(PanelEvent::Approach).unwrap();
        assert!(harness.tones.notes().is_empty());

        assert!(app.toggle_audio());
        app.dispatch(PanelEvent::Touch).unwrap();
        assert_eq!(harness.tones.notes(), ["C4"]);
    }

    #[tokio::test]
    async fn test_hover_requires_screen_reader() {
        let (app, harness) = create_app();
        assert!(!app.hover("Volume slider"));

        let settings = app.toggle_screen_reader();
        assert!(settings.screen_reader);
        assert!(app.hover("Volume slider"));
        assert_eq!(harness.queued().last().map(String::as_str), Some("Volume slider"));
    }
}
