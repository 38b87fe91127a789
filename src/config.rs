//! Configuration loading and management

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::app::AppSettings;
use crate::interaction::{MachineSettings, PressureThresholds};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{light_below_key} ({light_below}) must be below {activate_at_key} ({activate_at})")]
    Thresholds {
        light_below_key: &'static str,
        light_below: String,
        activate_at_key: &'static str,
        activate_at: String,
    },
}

const SOCKET: &str = "TOUCHPANEL_SOCKET";
const FEEDBACK_WINDOW_MS: &str = "TOUCHPANEL_FEEDBACK_WINDOW_MS";
const HOVER_WINDOW_MS: &str = "TOUCHPANEL_HOVER_WINDOW_MS";
const AMBIENT_INTERVAL_MS: &str = "TOUCHPANEL_AMBIENT_INTERVAL_MS";
const LIGHT_BELOW: &str = "TOUCHPANEL_LIGHT_BELOW";
const ACTIVATE_AT: &str = "TOUCHPANEL_ACTIVATE_AT";
const SPEECH_COMMAND: &str = "TOUCHPANEL_SPEECH_COMMAND";
const MODEL_PATH: &str = "TOUCHPANEL_MODEL_PATH";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Unix domain socket for IPC
    pub socket_path: PathBuf,

    /// Directory for runtime data
    pub data_dir: PathBuf,

    pub thresholds: PressureThresholds,
    pub feedback_window: Duration,
    pub hover_window: Duration,
    pub ambient_interval: Duration,

    /// External synthesizer (e.g. `espeak`); simulated speech when unset
    pub speech_command: Option<String>,

    /// Steering wheel model asset
    pub model_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        let home = std::env::var("HOME").context("HOME is not set")?;
        let config = Self::from_lookup(&home, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup(
        home: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("touchpanel");

        let socket_path = lookup(SOCKET)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("daemon.sock"));

        let defaults = MachineSettings::default();
        let thresholds = PressureThresholds {
            light_below: parse_or(&lookup, LIGHT_BELOW, defaults.thresholds.light_below)?,
            activate_at: parse_or(&lookup, ACTIVATE_AT, defaults.thresholds.activate_at)?,
        };
        if !(thresholds.light_below < thresholds.activate_at) {
            return Err(ConfigError::Thresholds {
                light_below_key: LIGHT_BELOW,
                light_below: thresholds.light_below.to_string(),
                activate_at_key: ACTIVATE_AT,
                activate_at: thresholds.activate_at.to_string(),
            });
        }

        Ok(Self {
            socket_path,
            data_dir,
            thresholds,
            feedback_window: millis_or(&lookup, FEEDBACK_WINDOW_MS, defaults.feedback_window)?,
            hover_window: millis_or(&lookup, HOVER_WINDOW_MS, Duration::from_millis(1500))?,
            ambient_interval: millis_or(&lookup, AMBIENT_INTERVAL_MS, Duration::from_secs(8))?,
            speech_command: lookup(SPEECH_COMMAND).filter(|s| !s.trim().is_empty()),
            model_path: lookup(MODEL_PATH).filter(|s| !s.is_empty()).map(PathBuf::from),
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            machine: MachineSettings {
                thresholds: self.thresholds,
                feedback_window: self.feedback_window,
            },
            ambient_interval: self.ambient_interval,
            model_path: self.model_path.clone(),
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    let ms: u64 = parse_or(lookup, key, default_ms)?;
    if ms == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: ms.to_string(),
        });
    }
    Ok(Duration::from_millis(ms))
}
