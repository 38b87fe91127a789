//! Core interaction state machine
//!
//! Handles lifecycle transitions (Inactive, Proximity, Active), pressure
//! classified presses, mode changes and adjustments for one mounted page,
//! and fans every resulting action out to speech, audio, the transient
//! indicator and the event bus.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::indicator::FeedbackIndicator;
use super::state::{
    clamp_percent, Intensity, InteractionState, Lifecycle, PressureThresholds, PressureTier,
};
use crate::accessibility::AnnouncementService;
use crate::concepts::{
    Action, Adjustment, Concept, ConceptDetail, ConceptKind, Control, LightLevel, Mode,
};
use crate::events::{publish, EventSender, FeedbackEvent};
use crate::feedback::AudioAdapter;

/// Process-wide feedback channels shared by every page
#[derive(Clone)]
pub struct FeedbackContext {
    pub announcer: Arc<AnnouncementService>,
    pub audio: Arc<AudioAdapter>,
    pub events: EventSender,
}

/// Tunable constants of the interaction policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineSettings {
    pub thresholds: PressureThresholds,
    /// How long the last action stays visible
    pub feedback_window: Duration,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            thresholds: PressureThresholds::default(),
            feedback_window: Duration::from_millis(1500),
        }
    }
}

/// Everything a presentation layer can ask the machine to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelEvent {
    /// Simulated hand approach
    Approach,
    /// Simulated touch on the panel
    Touch,
    /// Explicit deactivation
    Deactivate,
    /// Button press with a simulated pressure in [0, 100]
    Press { control: Control, pressure: f32 },
    ChangeMode { mode: Mode },
    Adjust { adjustment: Adjustment },
}

/// What a transition did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Transitioned {
        from: InteractionState,
        to: InteractionState,
    },
    /// Light touch: guidance only
    Guided { control: Control },
    /// Medium pressure: visual feedback only
    Highlighted { control: Control },
    /// Firm press: the control fired
    Activated { control: Control },
    /// Firm press on the selected control: deselected, nothing fired
    Deselected { control: Control },
    ModeChanged { mode: Mode },
    Adjusted,
    Ignored { reason: String },
}

impl Outcome {
    fn ignored(reason: &str) -> Self {
        Outcome::Ignored {
            reason: reason.to_string(),
        }
    }
}

/// Read-only view of the machine for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSnapshot {
    pub concept: ConceptKind,
    pub state: InteractionState,
    pub mode: Option<Mode>,
    pub available_controls: Vec<Control>,
    pub pressure_level: f32,
    pub active_control: Option<Control>,
    pub highlighted_control: Option<Control>,
    pub last_action: Option<String>,
    pub show_feedback: bool,
    pub detail: ConceptDetail,
}

/// Interaction state machine for one mounted concept page
pub struct InteractionMachine {
    concept: Box<dyn Concept>,
    state: InteractionState,
    pressure_level: f32,
    active_control: Option<Control>,
    highlighted_control: Option<Control>,
    indicator: FeedbackIndicator,
    feedback: FeedbackContext,
    settings: MachineSettings,
}

impl InteractionMachine {
    /// Create a machine in the Inactive state
    pub fn new(
        concept: Box<dyn Concept>,
        feedback: FeedbackContext,
        settings: MachineSettings,
    ) -> Self {
        let indicator = FeedbackIndicator::new(settings.feedback_window, feedback.events.clone());
        Self {
            concept,
            state: InteractionState::Inactive,
            pressure_level: 0.0,
            active_control: None,
            highlighted_control: None,
            indicator,
            feedback,
            settings,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    #[cfg(test)]
    pub fn active_control(&self) -> Option<Control> {
        self.active_control
    }

    /// Controls that can be pressed right now
    pub fn available_controls(&self) -> Vec<Control> {
        if self.state == InteractionState::Inactive {
            return Vec::new();
        }
        self.concept.available_controls(self.state)
    }

    /// Single entry point for every user-driven change.
    ///
    /// Must be called from within a tokio runtime.
    pub fn transition(&mut self, event: PanelEvent) -> Outcome {
        debug!(concept = %self.concept.kind(), ?event, "handling panel event");
        match event {
            PanelEvent::Approach => self.lifecycle(Lifecycle::Approach),
            PanelEvent::Touch => self.lifecycle(Lifecycle::Touch),
            PanelEvent::Deactivate => self.lifecycle(Lifecycle::Deactivate),
            PanelEvent::Press { control, pressure } => self.press(control, pressure),
            PanelEvent::ChangeMode { mode } => self.change_mode(mode),
            PanelEvent::Adjust { adjustment } => self.adjust(adjustment),
        }
    }

    pub fn senses_ambient_light(&self) -> bool {
        self.concept.senses_ambient_light()
    }

    /// Feed an ambient light reading. Never changes the lifecycle state.
    pub fn sense_ambient(&mut self, light: LightLevel) {
        if self.concept.senses_ambient_light() {
            debug!(?light, "ambient light changed");
            self.concept.ambient(light);
        }
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        let indicator = self.indicator.view();
        PanelSnapshot {
            concept: self.concept.kind(),
            state: self.state,
            mode: self.concept.mode(),
            available_controls: self.available_controls(),
            pressure_level: self.pressure_level,
            active_control: self.active_control,
            highlighted_control: self.highlighted_control,
            last_action: indicator.last_action,
            show_feedback: indicator.visible,
            detail: self.concept.detail(),
        }
    }

    /// Cancel pending timers; called when the page unmounts
    pub fn dispose(&mut self) {
        self.indicator.dispose();
    }

    fn lifecycle(&mut self, trigger: Lifecycle) -> Outcome {
        let from = self.state;
        let Some(to) = from.next(trigger) else {
            debug!(state = %from, ?trigger, "lifecycle trigger does not apply");
            return Outcome::ignored("lifecycle trigger does not apply");
        };

        info!(concept = %self.concept.kind(), from = %from, to = %to, "state transition");

        self.state = to;
        self.concept.on_lifecycle(to);
        if to == InteractionState::Inactive {
            self.active_control = None;
            self.highlighted_control = None;
        }

        publish(
            &self.feedback.events,
            FeedbackEvent::StateChanged {
                concept: self.concept.kind(),
                from,
                to,
            },
        );

        let phrases = self.concept.phrases();
        match to {
            InteractionState::Active => {
                self.fan_out(Action {
                    label: phrases.activated.to_string(),
                    intensity: Intensity::Strong,
                    cue: self.concept.activation_cue(),
                });
            }
            InteractionState::Proximity => {
                self.feedback.audio.play("proximity");
                self.feedback.announcer.announce_action(phrases.proximity);
            }
            InteractionState::Inactive => {
                self.feedback.announcer.announce_action(phrases.deactivated);
            }
        }

        Outcome::Transitioned { from, to }
    }

    fn press(&mut self, control: Control, pressure: f32) -> Outcome {
        if self.state == InteractionState::Inactive {
            return Outcome::ignored("panel is inactive");
        }
        if !self.available_controls().contains(&control) {
            debug!(%control, mode = ?self.concept.mode(), "control not available");
            return Outcome::ignored("control not available in this mode");
        }

        self.pressure_level = clamp_percent(pressure);

        match PressureTier::classify(self.pressure_level, &self.settings.thresholds) {
            PressureTier::LightTouch => {
                if self.active_control.is_none() {
                    self.fan_out(Action::new(format!("{} detected", control), Intensity::Light));
                }
                Outcome::Guided { control }
            }
            PressureTier::PreActivation => {
                self.highlighted_control = Some(control);
                publish(
                    &self.feedback.events,
                    FeedbackEvent::Highlighted {
                        concept: self.concept.kind(),
                        control,
                    },
                );
                Outcome::Highlighted { control }
            }
            PressureTier::Activation => {
                let previous = self.active_control;
                self.active_control = self.concept.select(previous, control);
                self.highlighted_control = None;
                match self.concept.operate(control, previous) {
                    Some(action) => {
                        self.fan_out(action);
                        Outcome::Activated { control }
                    }
                    None => {
                        debug!(%control, "control deselected");
                        Outcome::Deselected { control }
                    }
                }
            }
        }
    }

    fn change_mode(&mut self, mode: Mode) -> Outcome {
        if !self.concept.set_mode(mode) {
            debug!(%mode, concept = %self.concept.kind(), "mode not supported");
            return Outcome::ignored("mode not supported by this concept");
        }

        let controls = self.concept.available_controls(InteractionState::Active);
        if let Some(active) = self.active_control {
            if !controls.contains(&active) {
                self.active_control = None;
            }
        }

        info!(concept = %self.concept.kind(), %mode, "mode changed");
        self.fan_out(Action::new(format!("{} mode activated", mode), Intensity::Medium));

        let list = controls.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ");
        self.feedback
            .announcer
            .announce_action(&format!("Available controls: {}", list));

        Outcome::ModeChanged { mode }
    }

    fn adjust(&mut self, adjustment: Adjustment) -> Outcome {
        let Some(reaction) = self.concept.adjust(&adjustment) else {
            return Outcome::ignored("adjustment not supported by this concept");
        };
        if let Some(action) = reaction.action {
            self.fan_out(action);
        }
        if let Some(speech) = reaction.speech {
            self.feedback.announcer.announce_action(&speech);
        }
        Outcome::Adjusted
    }

    /// Deliver an action to every feedback channel
    fn fan_out(&mut self, action: Action) {
        info!(
            concept = %self.concept.kind(),
            label = %action.label,
            intensity = ?action.intensity,
            "action"
        );

        self.indicator.show(&action.label);
        self.feedback.audio.play_cue(action.cue);
        self.feedback.announcer.announce_action(&action.label);

        publish(
            &self.feedback.events,
            FeedbackEvent::ActionTriggered {
                concept: self.concept.kind(),
                label: action.label,
                intensity: action.intensity,
            },
        );
    }
}
