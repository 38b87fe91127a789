//! 3D scene asset boundary
//!
//! Loading the steering wheel model must never take the page down: a
//! missing or unreadable asset degrades to a placeholder view.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::concepts::{ConceptDetail, Control, Mode};
use crate::interaction::{InteractionState, PanelSnapshot};

/// What the presentation layer should render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneView {
    Model { path: PathBuf },
    Fallback { reason: String },
}

impl SceneView {
    /// Resolve the model asset, falling back on any failure
    pub fn load(model_path: Option<&Path>) -> Self {
        let Some(path) = model_path else {
            return Self::fallback("no model configured".to_string());
        };

        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => {
                debug!(?path, "scene model found");
                Self::Model {
                    path: path.to_path_buf(),
                }
            }
            Ok(_) => Self::fallback(format!("{} is not a file", path.display())),
            Err(e) => Self::fallback(format!("{}: {}", path.display(), e)),
        }
    }

    fn fallback(reason: String) -> Self {
        warn!(%reason, "scene model unavailable, using fallback view");
        Self::Fallback { reason }
    }

    #[cfg(test)]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// State the 3D wheel scene animates from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub state: InteractionState,
    pub mode: Option<Mode>,
    pub active_button: Option<Control>,
    pub left_hand: bool,
    pub right_hand: bool,
}

impl SceneSnapshot {
    /// Only steering wheel pages have a scene
    pub fn from_panel(panel: &PanelSnapshot) -> Option<Self> {
        let ConceptDetail::SteeringWheel(wheel) = &panel.detail else {
            return None;
        };
        Some(Self {
            state: panel.state,
            mode: panel.mode,
            active_button: panel.active_control,
            left_hand: wheel.left_hand,
            right_hand: wheel.right_hand,
        })
    }
}
