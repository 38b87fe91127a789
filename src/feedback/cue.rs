//! Audio cue descriptors
//!
//! Each action label maps to a named cue, and each cue to a short sequence
//! of tones or noise bursts offset from the moment the cue is played.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::interaction::Intensity;

/// A single sound produced by the tone backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sound {
    /// Sine tone at a note name such as "C4"
    Tone {
        note: &'static str,
        duration: Duration,
        velocity: f32,
    },
    /// Short white-noise click
    Noise { duration: Duration },
}

/// A sound scheduled `delay` after the cue starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneStep {
    pub sound: Sound,
    pub delay: Duration,
}

const fn tone(note: &'static str, duration_ms: u64, velocity: f32, delay_ms: u64) -> ToneStep {
    ToneStep {
        sound: Sound::Tone {
            note,
            duration: Duration::from_millis(duration_ms),
            velocity,
        },
        delay: Duration::from_millis(delay_ms),
    }
}

const fn click(duration_ms: u64) -> ToneStep {
    ToneStep {
        sound: Sound::Noise {
            duration: Duration::from_millis(duration_ms),
        },
        delay: Duration::ZERO,
    }
}

const PANEL_ACTIVATED: &[ToneStep] = &[tone("C4", 100, 0.5, 0), tone("E4", 100, 0.3, 100)];
const VOLUME_UP: &[ToneStep] = &[tone("C5", 50, 0.3, 0)];
const VOLUME_DOWN: &[ToneStep] = &[tone("G4", 50, 0.3, 0)];
const PLAYING: &[ToneStep] = &[tone("G4", 50, 0.4, 0), tone("C5", 50, 0.4, 70)];
const PAUSED: &[ToneStep] = &[tone("C5", 50, 0.4, 0), tone("G4", 50, 0.4, 70)];
const NEXT_TRACK: &[ToneStep] = &[tone("E5", 50, 0.3, 0), tone("G5", 50, 0.3, 50)];
const PREVIOUS_TRACK: &[ToneStep] = &[tone("G5", 50, 0.3, 0), tone("E5", 50, 0.3, 50)];
const LIGHTS_ON: &[ToneStep] = &[tone("C6", 200, 0.2, 0)];
const LIGHTS_OFF: &[ToneStep] = &[tone("A3", 200, 0.2, 0)];
const CLICK: &[ToneStep] = &[click(50)];
const BLUETOOTH_ON: &[ToneStep] = &[
    tone("C5", 50, 0.3, 0),
    tone("E5", 50, 0.3, 100),
    tone("G5", 50, 0.3, 200),
];
const BLUETOOTH_OFF: &[ToneStep] = &[
    tone("G5", 50, 0.3, 0),
    tone("E5", 50, 0.3, 100),
    tone("C5", 50, 0.3, 200),
];
const TAP: &[ToneStep] = &[tone("G5", 30, 0.2, 0)];
const PRESS: &[ToneStep] = &[tone("C4", 100, 0.6, 0), tone("G4", 60, 0.4, 60)];
const PROXIMITY: &[ToneStep] = &[tone("E6", 40, 0.15, 0)];
const DEFAULT: &[ToneStep] = &[tone("C4", 80, 0.3, 0)];

/// Named audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    PanelActivated,
    VolumeUp,
    VolumeDown,
    Playing,
    Paused,
    NextTrack,
    PreviousTrack,
    LightsOn,
    LightsOff,
    TemperatureControl,
    HomeMenu,
    BluetoothOn,
    BluetoothOff,
    /// Light guidance touch
    Tap,
    /// Firm, activating press
    Press,
    /// Hand approaching the panel
    Proximity,
    Default,
}

impl Cue {
    /// Map a raw action label to its cue, falling back to `Cue::Default`
    pub fn from_label(label: &str) -> Self {
        match label {
            "Panel activated" => Cue::PanelActivated,
            "Volume up" => Cue::VolumeUp,
            "Volume down" => Cue::VolumeDown,
            "Playing" => Cue::Playing,
            "Paused" => Cue::Paused,
            "Next track" => Cue::NextTrack,
            "Previous track" => Cue::PreviousTrack,
            "Lights on" => Cue::LightsOn,
            "Lights off" => Cue::LightsOff,
            "Temperature control" => Cue::TemperatureControl,
            "Home menu" => Cue::HomeMenu,
            "Bluetooth on" => Cue::BluetoothOn,
            "Bluetooth off" => Cue::BluetoothOff,
            "tap" => Cue::Tap,
            "press" => Cue::Press,
            "proximity" | "Proximity" => Cue::Proximity,
            _ => Cue::Default,
        }
    }

    /// Generic cue for a feedback intensity
    pub fn for_intensity(intensity: Intensity) -> Self {
        match intensity {
            Intensity::Light => Cue::Tap,
            Intensity::Medium => Cue::Default,
            Intensity::Strong => Cue::Press,
        }
    }

    /// The sounds making up this cue, ordered by delay
    pub fn steps(self) -> &'static [ToneStep] {
        match self {
            Cue::PanelActivated => PANEL_ACTIVATED,
            Cue::VolumeUp => VOLUME_UP,
            Cue::VolumeDown => VOLUME_DOWN,
            Cue::Playing => PLAYING,
            Cue::Paused => PAUSED,
            Cue::NextTrack => NEXT_TRACK,
            Cue::PreviousTrack => PREVIOUS_TRACK,
            Cue::LightsOn => LIGHTS_ON,
            Cue::LightsOff => LIGHTS_OFF,
            Cue::TemperatureControl | Cue::HomeMenu => CLICK,
            Cue::BluetoothOn => BLUETOOTH_ON,
            Cue::BluetoothOff => BLUETOOTH_OFF,
            Cue::Tap => TAP,
            Cue::Press => PRESS,
            Cue::Proximity => PROXIMITY,
            Cue::Default => DEFAULT,
        }
    }
}

impl std::fmt::Display for Cue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Cue::PanelActivated => "panel_activated",
            Cue::VolumeUp => "volume_up",
            Cue::VolumeDown => "volume_down",
            Cue::Playing => "playing",
            Cue::Paused => "paused",
            Cue::NextTrack => "next_track",
            Cue::PreviousTrack => "previous_track",
            Cue::LightsOn => "lights_on",
            Cue::LightsOff => "lights_off",
            Cue::TemperatureControl => "temperature_control",
            Cue::HomeMenu => "home_menu",
            Cue::BluetoothOn => "bluetooth_on",
            Cue::BluetoothOff => "bluetooth_off",
            Cue::Tap => "tap",
            Cue::Press => "press",
            Cue::Proximity => "proximity",
            Cue::Default => "default",
        };
        f.write_str(name)
    }
}
