//! Interaction module: the shared touch panel state machine
//!
//! Provides the lifecycle states (Inactive, Proximity, Active), the
//! pressure classification policy, the transient feedback indicator and
//! the machine that fans each action out to every feedback channel.

mod ambient;
mod indicator;
mod machine;
mod state;

pub use ambient::spawn_ambient_sensor;
pub use machine::{
    FeedbackContext, InteractionMachine, MachineSettings, Outcome, PanelEvent, PanelSnapshot,
};
pub use state::{clamp_percent, Intensity, InteractionState, PressureThresholds};
