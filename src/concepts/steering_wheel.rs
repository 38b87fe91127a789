//! Steering wheel with pressure-sensitive contextual controls

use serde::{Deserialize, Serialize};

use super::{
    Action, Adjustment, Concept, ConceptDetail, ConceptKind, Control, LifecyclePhrases, Mode,
    Reaction,
};
use crate::interaction::{Intensity, InteractionState};

const SPEED_STEP: u16 = 5;
const MIN_CRUISE_SPEED: u16 = 20;
const MAX_CRUISE_SPEED: u16 = 120;

/// Controls offered in each driving mode
pub fn contextual_controls(mode: Mode) -> &'static [Control] {
    match mode {
        Mode::Drive => &[Control::Media, Control::Phone, Control::Voice, Control::Cruise],
        Mode::Cruise => &[Control::SpeedUp, Control::SpeedDown, Control::Distance, Control::Cancel],
        Mode::Parking => &[
            Control::Camera,
            Control::Sensors,
            Control::ParkAssist,
            Control::Emergency,
        ],
        _ => &[],
    }
}

#[derive(Debug, Clone)]
pub struct SteeringWheel {
    mode: Mode,
    left_hand: bool,
    right_hand: bool,
    cruise_speed: u16,
}

impl Default for SteeringWheel {
    fn default() -> Self {
        Self {
            mode: Mode::Drive,
            left_hand: false,
            right_hand: false,
            cruise_speed: 65,
        }
    }
}

/// Snapshot of the steering wheel state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteeringWheelDetail {
    pub left_hand: bool,
    pub right_hand: bool,
    pub cruise_speed: u16,
}

impl Concept for SteeringWheel {
    fn kind(&self) -> ConceptKind {
        ConceptKind::SteeringWheel
    }

    fn phrases(&self) -> LifecyclePhrases {
        LifecyclePhrases {
            activated: "Steering controls activated",
            proximity: "Hand detected on steering wheel",
            deactivated: "Steering controls deactivated",
        }
    }

    fn mode(&self) -> Option<Mode> {
        Some(self.mode)
    }

    fn set_mode(&mut self, mode: Mode) -> bool {
        if contextual_controls(mode).is_empty() {
            return false;
        }
        self.mode = mode;
        true
    }

    fn available_controls(&self, _state: InteractionState) -> Vec<Control> {
        contextual_controls(self.mode).to_vec()
    }

    fn operate(&mut self, control: Control, _previous: Option<Control>) -> Option<Action> {
        match control {
            Control::SpeedUp => {
                self.cruise_speed = (self.cruise_speed + SPEED_STEP).min(MAX_CRUISE_SPEED);
            }
            Control::SpeedDown => {
                self.cruise_speed = self
                    .cruise_speed
                    .saturating_sub(SPEED_STEP)
                    .max(MIN_CRUISE_SPEED);
            }
            _ if contextual_controls(self.mode).contains(&control) => {}
            _ => return None,
        }
        Some(Action::new(format!("{} pressed", control), Intensity::Strong))
    }

    fn adjust(&mut self, adjustment: &Adjustment) -> Option<Reaction> {
        let Adjustment::HandPosition { left, right } = *adjustment else {
            return None;
        };
        self.left_hand = left;
        self.right_hand = right;

        if left && right {
            Some(Reaction::default())
        } else {
            Some(Action::new("Safety alert: Keep both hands on wheel", Intensity::Strong).into())
        }
    }

    fn detail(&self) -> ConceptDetail {
        ConceptDetail::SteeringWheel(SteeringWheelDetail {
            left_hand: self.left_hand,
            right_hand: self.right_hand,
            cruise_speed: self.cruise_speed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Cue;

    #[test]
    fn test_controls_follow_mode() {
        let mut wheel = SteeringWheel::default();
        assert_eq!(
            wheel.available_controls(InteractionState::Active),
            [Control::Media, Control::Phone, Control::Voice, Control::Cruise]
        );

        assert!(wheel.set_mode(Mode::Parking));
        assert!(wheel
            .available_controls(InteractionState::Active)
            .contains(&Control::ParkAssist));
    }

    #[test]
    fn test_rejects_door_modes() {
        let mut wheel = SteeringWheel::default();
        assert!(!wheel.set_mode(Mode::Valet));
        assert_eq!(wheel.mode(), Some(Mode::Drive));
    }

    #[test]
    fn test_press_label_and_cue() {
        let mut wheel = SteeringWheel::default();
        wheel.set_mode(Mode::Cruise);
        let action = wheel.operate(Control::SpeedUp, None).unwrap();
        assert_eq!(action.label, "Speed+ pressed");
        assert_eq!(action.cue, Cue::Press);
        assert_eq!(wheel.cruise_speed, 70);
    }

    #[test]
    fn test_cruise_speed_bounds() {
        let mut wheel = SteeringWheel::default();
        wheel.set_mode(Mode::Cruise);
        for _ in 0..40 {
            wheel.operate(Control::SpeedDown, None);
        }
        assert_eq!(wheel.cruise_speed, MIN_CRUISE_SPEED);
    }

    #[test]
    fn test_hand_release_raises_safety_alert() {
        let mut wheel = SteeringWheel::default();
        let both = wheel.adjust(&Adjustment::HandPosition {
            left: true,
            right: true,
        });
        assert_eq!(both, Some(Reaction::default()));

        let one = wheel
            .adjust(&Adjustment::HandPosition {
                left: true,
                right: false,
            })
            .unwrap();
        let action = one.action.unwrap();
        assert_eq!(action.label, "Safety alert: Keep both hands on wheel");
        assert_eq!(action.intensity, Intensity::Strong);
    }
}
