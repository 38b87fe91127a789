//! Concept panels: sofa arm, steering wheel and vehicle door
//!
//! Each concept supplies the page-specific half of the interaction: its
//! controls, contextual modes, control effects and the phrases spoken on
//! lifecycle changes. The shared state machine drives all three.

mod sofa_arm;
mod steering_wheel;
mod vehicle_door;

use serde::{Deserialize, Serialize};

use crate::feedback::Cue;
use crate::interaction::{Intensity, InteractionState};

pub use sofa_arm::{SofaArm, SofaArmDetail};
pub use steering_wheel::{SteeringWheel, SteeringWheelDetail};
pub use vehicle_door::{DoorSide, VehicleDoor, VehicleDoorDetail};

/// Which concept a page demonstrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKind {
    SofaArm,
    SteeringWheel,
    VehicleDoor,
}

impl ConceptKind {
    /// Fresh concept state for a newly mounted page
    pub fn create(self) -> Box<dyn Concept> {
        match self {
            ConceptKind::SofaArm => Box::new(SofaArm::default()),
            ConceptKind::SteeringWheel => Box::new(SteeringWheel::default()),
            ConceptKind::VehicleDoor => Box::new(VehicleDoor::default()),
        }
    }
}

impl std::fmt::Display for ConceptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConceptKind::SofaArm => write!(f, "sofa-arm"),
            ConceptKind::SteeringWheel => write!(f, "steering-wheel"),
            ConceptKind::VehicleDoor => write!(f, "vehicle-door"),
        }
    }
}

/// Every control a concept panel can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    // Sofa arm
    #[serde(rename = "Play/Pause")]
    PlayPause,
    #[serde(rename = "Volume+")]
    VolumeUp,
    #[serde(rename = "Volume-")]
    VolumeDown,
    #[serde(rename = "Next")]
    NextTrack,
    #[serde(rename = "Previous")]
    PreviousTrack,
    Lights,
    Bluetooth,
    Temperature,
    Home,

    // Steering wheel
    Media,
    Phone,
    Voice,
    Cruise,
    #[serde(rename = "Speed+")]
    SpeedUp,
    #[serde(rename = "Speed-")]
    SpeedDown,
    Distance,
    Cancel,
    Camera,
    Sensors,
    #[serde(rename = "Park Assist")]
    ParkAssist,
    Emergency,

    // Vehicle door
    Window,
    Lock,
    Radio,
    Trunk,
    #[serde(rename = "LED")]
    Led,
}

impl Control {
    /// Label shown on the panel and used in spoken feedback
    pub fn label(self) -> &'static str {
        match self {
            Control::PlayPause => "Play/Pause",
            Control::VolumeUp => "Volume+",
            Control::VolumeDown => "Volume-",
            Control::NextTrack => "Next",
            Control::PreviousTrack => "Previous",
            Control::Lights => "Lights",
            Control::Bluetooth => "Bluetooth",
            Control::Temperature => "Temperature",
            Control::Home => "Home",
            Control::Media => "Media",
            Control::Phone => "Phone",
            Control::Voice => "Voice",
            Control::Cruise => "Cruise",
            Control::SpeedUp => "Speed+",
            Control::SpeedDown => "Speed-",
            Control::Distance => "Distance",
            Control::Cancel => "Cancel",
            Control::Camera => "Camera",
            Control::Sensors => "Sensors",
            Control::ParkAssist => "Park Assist",
            Control::Emergency => "Emergency",
            Control::Window => "Window",
            Control::Lock => "Lock",
            Control::Radio => "Radio",
            Control::Trunk => "Trunk",
            Control::Led => "LED",
        }
    }
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Contextual modes; each concept accepts its own subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    // Steering wheel
    Drive,
    Cruise,
    Parking,
    // Vehicle door
    Parked,
    Driving,
    Valet,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Drive => write!(f, "drive"),
            Mode::Cruise => write!(f, "cruise"),
            Mode::Parking => write!(f, "parking"),
            Mode::Parked => write!(f, "parked"),
            Mode::Driving => write!(f, "driving"),
            Mode::Valet => write!(f, "valet"),
        }
    }
}

/// Ambient light reported by the simulated sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightLevel {
    Low,
    Medium,
    High,
}

impl LightLevel {
    pub const ALL: [LightLevel; 3] = [LightLevel::Low, LightLevel::Medium, LightLevel::High];
}

/// Continuous or concept-specific inputs that are not button presses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    /// Sofa arm volume slider, 0-100
    Volume { level: f32 },
    /// Door window slider, 100 = closed, 0 = open
    WindowPosition { position: f32 },
    /// Door LED slider, 0.0-1.0
    LedIntensity { intensity: f32 },
    /// Door LED color, e.g. "#3b82f6"
    LedColor { color: String },
    /// Switch between driver and passenger door panels
    DoorSide { side: DoorSide },
    /// Steering wheel grip sensors
    HandPosition { left: bool, right: bool },
}

/// Something that just happened and must fan out to every channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub label: String,
    pub intensity: Intensity,
    pub cue: Cue,
}

impl Action {
    /// Action whose cue follows the intensity
    pub fn new(label: impl Into<String>, intensity: Intensity) -> Self {
        Self {
            label: label.into(),
            intensity,
            cue: Cue::for_intensity(intensity),
        }
    }

    /// Action whose cue is looked up from the label itself
    pub fn labelled(label: impl Into<String>, intensity: Intensity) -> Self {
        let label = label.into();
        let cue = Cue::from_label(&label);
        Self {
            label,
            intensity,
            cue,
        }
    }
}

/// Result of an adjustment: an optional action plus optional extra speech
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    pub action: Option<Action>,
    pub speech: Option<String>,
}

impl From<Action> for Reaction {
    fn from(action: Action) -> Self {
        Self {
            action: Some(action),
            speech: None,
        }
    }
}

/// Phrases and labels used on lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePhrases {
    /// Action label when the panel becomes active
    pub activated: &'static str,
    /// Spoken when a hand is detected
    pub proximity: &'static str,
    /// Spoken when the panel deactivates
    pub deactivated: &'static str,
}

/// Concept-specific state exposed in snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "concept", rename_all = "snake_case")]
pub enum ConceptDetail {
    SofaArm(SofaArmDetail),
    SteeringWheel(SteeringWheelDetail),
    VehicleDoor(VehicleDoorDetail),
}

/// Page-specific behaviour plugged into the interaction state machine
pub trait Concept: Send {
    fn kind(&self) -> ConceptKind;

    fn phrases(&self) -> LifecyclePhrases;

    /// Cue for the activation action
    fn activation_cue(&self) -> Cue {
        Cue::Press
    }

    /// Current contextual mode, if the concept has modes
    fn mode(&self) -> Option<Mode> {
        None
    }

    /// Switch mode. Returns false if the mode does not apply.
    fn set_mode(&mut self, _mode: Mode) -> bool {
        false
    }

    /// Controls that may be pressed in the given lifecycle state
    fn available_controls(&self, state: InteractionState) -> Vec<Control>;

    /// The control that stays selected after `pressed` fires
    fn select(&self, _previous: Option<Control>, pressed: Control) -> Option<Control> {
        Some(pressed)
    }

    /// Fire the effect bound to a control
    fn operate(&mut self, control: Control, previous: Option<Control>) -> Option<Action>;

    fn adjust(&mut self, _adjustment: &Adjustment) -> Option<Reaction> {
        None
    }

    /// Called after every lifecycle transition
    fn on_lifecycle(&mut self, _state: InteractionState) {}

    /// Whether the concept consumes ambient light readings
    fn senses_ambient_light(&self) -> bool {
        false
    }

    fn ambient(&mut self, _light: LightLevel) {}

    fn detail(&self) -> ConceptDetail;
}
