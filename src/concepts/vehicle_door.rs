//! Vehicle door panel with mode-dependent controls

use serde::{Deserialize, Serialize};

use super::{
    Action, Adjustment, Concept, ConceptDetail, ConceptKind, Control, LifecyclePhrases, Mode,
    Reaction,
};
use crate::interaction::{clamp_percent, Intensity, InteractionState};

const RADIO_STATIONS: u8 = 5;
const DEFAULT_LED_COLOR: &str = "#3b82f6";

/// Which door the panel is mounted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorSide {
    Driver,
    Passenger,
}

impl std::fmt::Display for DoorSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DoorSide::Driver => write!(f, "driver"),
            DoorSide::Passenger => write!(f, "passenger"),
        }
    }
}

/// Controls offered for a vehicle mode and door side
pub fn contextual_controls(mode: Mode, side: DoorSide) -> &'static [Control] {
    use Control::*;

    match (mode, side) {
        (Mode::Parked, DoorSide::Driver) => &[Window, Lock, Trunk, Led],
        (Mode::Parked, DoorSide::Passenger) => &[Window, Lock, Radio],
        (Mode::Driving, DoorSide::Driver) => &[Window, Led],
        (Mode::Driving, DoorSide::Passenger) => &[Window, Radio],
        (Mode::Valet, _) => &[Lock],
        _ => &[],
    }
}

/// LED brightness that accompanies each lifecycle state
fn lifecycle_led_intensity(state: InteractionState) -> f32 {
    match state {
        InteractionState::Active => 1.0,
        InteractionState::Proximity => 0.5,
        InteractionState::Inactive => 0.0,
    }
}

#[derive(Debug, Clone)]
pub struct VehicleDoor {
    mode: Mode,
    side: DoorSide,
    /// 100 = closed, 0 = fully open
    window_position: f32,
    locked: bool,
    radio_station: u8,
    led_intensity: f32,
    led_color: String,
    proximity_detected: bool,
    trunk_open: bool,
}

impl Default for VehicleDoor {
    fn default() -> Self {
        Self {
            mode: Mode::Parked,
            side: DoorSide::Driver,
            window_position: 100.0,
            locked: true,
            radio_station: 1,
            led_intensity: 0.0,
            led_color: DEFAULT_LED_COLOR.to_string(),
            proximity_detected: false,
            trunk_open: false,
        }
    }
}

/// Snapshot of the vehicle door state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDoorDetail {
    pub side: DoorSide,
    pub window_position: f32,
    pub locked: bool,
    pub radio_station: u8,
    pub led_intensity: f32,
    pub led_color: String,
    pub proximity_detected: bool,
    pub trunk_open: bool,
}

fn control_list(controls: &[Control]) -> String {
    controls
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Concept for VehicleDoor {
    fn kind(&self) -> ConceptKind {
        ConceptKind::VehicleDoor
    }

    fn phrases(&self) -> LifecyclePhrases {
        LifecyclePhrases {
            activated: "Door controls activated",
            proximity: "Proximity detected near door",
            deactivated: "Door controls deactivated",
        }
    }

    fn mode(&self) -> Option<Mode> {
        Some(self.mode)
    }

    fn set_mode(&mut self, mode: Mode) -> bool {
        if !matches!(mode, Mode::Parked | Mode::Driving | Mode::Valet) {
            return false;
        }
        self.mode = mode;
        true
    }

    fn available_controls(&self, _state: InteractionState) -> Vec<Control> {
        contextual_controls(self.mode, self.side).to_vec()
    }

    /// Pressing the selected control again deselects it
    fn select(&self, previous: Option<Control>, pressed: Control) -> Option<Control> {
        if previous == Some(pressed) {
            None
        } else {
            Some(pressed)
        }
    }

    fn operate(&mut self, control: Control, previous: Option<Control>) -> Option<Action> {
        let reselected = previous == Some(control);
        match control {
            Control::Window if !reselected => {
                Some(Action::new("Window control activated", Intensity::Medium))
            }
            Control::Led if !reselected => {
                Some(Action::new("LED control activated", Intensity::Medium))
            }
            Control::Window | Control::Led => None,
            Control::Lock => {
                self.locked = !self.locked;
                let label = if self.locked { "Door locked" } else { "Door unlocked" };
                Some(Action::new(label, Intensity::Strong))
            }
            Control::Radio => {
                self.radio_station = if self.radio_station >= RADIO_STATIONS {
                    1
                } else {
                    self.radio_station + 1
                };
                Some(Action::new(
                    format!("Radio station {}", self.radio_station),
                    Intensity::Light,
                ))
            }
            Control::Trunk => {
                self.trunk_open = !self.trunk_open;
                let label = if self.trunk_open { "Trunk opened" } else { "Trunk closed" };
                Some(Action::new(label, Intensity::Strong))
            }
            _ => None,
        }
    }

    fn adjust(&mut self, adjustment: &Adjustment) -> Option<Reaction> {
        let reaction = match adjustment {
            Adjustment::WindowPosition { position } => {
                self.window_position = clamp_percent(*position);
                let open = (100.0 - self.window_position).round();
                Action::new(format!("Window {}% open", open), Intensity::Light).into()
            }
            Adjustment::LedIntensity { intensity } => {
                self.led_intensity = if intensity.is_nan() {
                    0.0
                } else {
                    intensity.clamp(0.0, 1.0)
                };
                let percent = (self.led_intensity * 100.0).round();
                Action::new(format!("LED intensity {}%", percent), Intensity::Light).into()
            }
            Adjustment::LedColor { color } => {
                self.led_color = color.clone();
                Action::new("LED color changed", Intensity::Light).into()
            }
            Adjustment::DoorSide { side } => {
                self.side = *side;
                let controls = contextual_controls(self.mode, self.side);
                Reaction {
                    action: Some(Action::new(format!("{} door selected", side), Intensity::Medium)),
                    speech: Some(format!(
                        "{} door - Available controls: {}",
                        side,
                        control_list(controls)
                    )),
                }
            }
            _ => return None,
        };
        Some(reaction)
    }

    fn on_lifecycle(&mut self, state: InteractionState) {
        self.led_intensity = lifecycle_led_intensity(state);
        self.proximity_detected = state != InteractionState::Inactive;
    }

    fn detail(&self) -> ConceptDetail {
        ConceptDetail::VehicleDoor(VehicleDoorDetail {
            side: self.side,
            window_position: self.window_position,
            locked: self.locked,
            radio_station: self.radio_station,
            led_intensity: self.led_intensity,
            led_color: self.led_color.clone(),
            proximity_detected: self.proximity_detected,
            trunk_open: self.trunk_open,
        })
    }
}
