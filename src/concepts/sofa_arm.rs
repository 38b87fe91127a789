//! Sofa arm media controls

use serde::{Deserialize, Serialize};

use super::{
    Action, Adjustment, Concept, ConceptDetail, ConceptKind, Control, LifecyclePhrases,
    LightLevel, Reaction,
};
use crate::feedback::Cue;
use crate::interaction::{clamp_percent, Intensity, InteractionState};

const VOLUME_STEP: f32 = 5.0;

const CONTROLS: &[Control] = &[
    Control::PlayPause,
    Control::VolumeUp,
    Control::VolumeDown,
    Control::NextTrack,
    Control::PreviousTrack,
    Control::Lights,
    Control::Bluetooth,
    Control::Temperature,
    Control::Home,
];

/// Media and smart-home state behind the sofa arm panel
#[derive(Debug, Clone)]
pub struct SofaArm {
    playing: bool,
    volume: f32,
    lights_on: bool,
    bluetooth_connected: bool,
    brightness: u8,
    light_level: LightLevel,
}

impl Default for SofaArm {
    fn default() -> Self {
        Self {
            playing: false,
            volume: 65.0,
            lights_on: false,
            bluetooth_connected: true,
            brightness: 80,
            light_level: LightLevel::Medium,
        }
    }
}

/// Snapshot of the sofa arm state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofaArmDetail {
    pub playing: bool,
    pub volume: f32,
    pub lights_on: bool,
    pub bluetooth_connected: bool,
    pub brightness: u8,
    pub panel_opacity: f32,
    pub light_level: LightLevel,
}

impl SofaArm {
    /// Panel opacity derived from the adaptive brightness
    pub fn panel_opacity(&self) -> f32 {
        f32::from(self.brightness) / 100.0 * 0.85
    }
}

impl Concept for SofaArm {
    fn kind(&self) -> ConceptKind {
        ConceptKind::SofaArm
    }

    fn phrases(&self) -> LifecyclePhrases {
        LifecyclePhrases {
            activated: "Panel activated",
            proximity: "Hand detected, showing basic controls",
            deactivated: "Panel deactivated",
        }
    }

    fn activation_cue(&self) -> Cue {
        Cue::PanelActivated
    }

    fn available_controls(&self, state: InteractionState) -> Vec<Control> {
        // Proximity only illuminates the panel outline; touching activates it
        match state {
            InteractionState::Active => CONTROLS.to_vec(),
            InteractionState::Inactive | InteractionState::Proximity => Vec::new(),
        }
    }

    fn operate(&mut self, control: Control, _previous: Option<Control>) -> Option<Action> {
        let label = match control {
            Control::PlayPause => {
                self.playing = !self.playing;
                if self.playing {
                    "Playing"
                } else {
                    "Paused"
                }
            }
            Control::VolumeUp => {
                self.volume = (self.volume + VOLUME_STEP).min(100.0);
                "Volume up"
            }
            Control::VolumeDown => {
                self.volume = (self.volume - VOLUME_STEP).max(0.0);
                "Volume down"
            }
            Control::NextTrack => "Next track",
            Control::PreviousTrack => "Previous track",
            Control::Lights => {
                self.lights_on = !self.lights_on;
                if self.lights_on {
                    "Lights on"
                } else {
                    "Lights off"
                }
            }
            Control::Bluetooth => {
                self.bluetooth_connected = !self.bluetooth_connected;
                if self.bluetooth_connected {
                    "Bluetooth on"
                } else {
                    "Bluetooth off"
                }
            }
            Control::Temperature => "Temperature control",
            Control::Home => "Home menu",
            _ => return None,
        };
        Some(Action::labelled(label, Intensity::Medium))
    }

    fn adjust(&mut self, adjustment: &Adjustment) -> Option<Reaction> {
        match adjustment {
            Adjustment::Volume { level } => {
                self.volume = clamp_percent(*level);
                let label = format!("Volume {}%", self.volume.round());
                Some(Action::new(label, Intensity::Light).into())
            }
            _ => None,
        }
    }

    fn senses_ambient_light(&self) -> bool {
        true
    }

    fn ambient(&mut self, light: LightLevel) {
        self.light_level = light;
        self.brightness = match light {
            LightLevel::Low => 40,
            LightLevel::Medium => 70,
            LightLevel::High => 100,
        };
    }

    fn detail(&self) -> ConceptDetail {
        ConceptDetail::SofaArm(SofaArmDetail {
            playing: self.playing,
            volume: self.volume,
            lights_on: self.lights_on,
            bluetooth_connected: self.bluetooth_connected,
            brightness: self.brightness,
            panel_opacity: self.panel_opacity(),
            light_level: self.light_level,
        })
    }
}
