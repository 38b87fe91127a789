//! Lifecycle states and the pressure classification policy

use serde::{Deserialize, Serialize};

/// The three lifecycle states of a touch panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    /// Panel invisible, nothing detected
    #[default]
    Inactive,
    /// A hand is near: basic controls illuminate
    Proximity,
    /// Panel touched: full controls available
    Active,
}

impl std::fmt::Display for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionState::Inactive => write!(f, "Inactive"),
            InteractionState::Proximity => write!(f, "Proximity"),
            InteractionState::Active => write!(f, "Active"),
        }
    }
}

/// User-driven lifecycle triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Hand approaches the panel
    Approach,
    /// Hand touches the panel
    Touch,
    /// Explicit deactivation
    Deactivate,
}

impl InteractionState {
    /// Next state for a lifecycle trigger, or `None` if the trigger does
    /// not apply in this state
    pub fn next(self, trigger: Lifecycle) -> Option<InteractionState> {
        match (self, trigger) {
            (InteractionState::Inactive, Lifecycle::Approach) => Some(InteractionState::Proximity),
            (InteractionState::Proximity, Lifecycle::Touch) => Some(InteractionState::Active),
            (InteractionState::Proximity | InteractionState::Active, Lifecycle::Deactivate) => {
                Some(InteractionState::Inactive)
            }
            _ => None,
        }
    }
}

/// Strength of the feedback for an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    Medium,
    Strong,
}

/// Pressure bands separating accidental touches from intentional presses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureThresholds {
    /// Below this a touch only shows guidance
    pub light_below: f32,
    /// At or above this a press activates the control
    pub activate_at: f32,
}

impl Default for PressureThresholds {
    fn default() -> Self {
        Self {
            light_below: 30.0,
            activate_at: 60.0,
        }
    }
}

/// Classification of a single press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureTier {
    /// Guidance only, no activation
    LightTouch,
    /// Visual feedback only, no activation
    PreActivation,
    /// Fires the control
    Activation,
}

impl PressureTier {
    pub fn classify(pressure: f32, thresholds: &PressureThresholds) -> Self {
        let pressure = clamp_percent(pressure);
        if pressure < thresholds.light_below {
            PressureTier::LightTouch
        } else if pressure < thresholds.activate_at {
            PressureTier::PreActivation
        } else {
            PressureTier::Activation
        }
    }
}

/// Clamp a percentage into [0, 100]; NaN counts as 0
pub fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
