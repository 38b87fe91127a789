//! Simulated ambient light sensor
//!
//! Periodically feeds a random light level to a mounted page. Readings only
//! touch cosmetic concept fields, never the lifecycle state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::seq::SliceRandom;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::machine::InteractionMachine;
use crate::concepts::LightLevel;

/// Pick a light level at random
pub fn random_light_level() -> LightLevel {
    let mut rng = rand::thread_rng();
    LightLevel::ALL
        .choose(&mut rng)
        .copied()
        .unwrap_or(LightLevel::Medium)
}

/// Spawn the sensor loop for a machine. Abort the handle on unmount.
pub fn spawn_ambient_sensor(
    machine: Arc<Mutex<InteractionMachine>>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let light = random_light_level();
            debug!(?light, "ambient light sample");
            machine
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .sense_ambient(light);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::{ConceptDetail, ConceptKind};
    use crate::interaction::{InteractionState, MachineSettings};
    use crate::testing::{settle, TestHarness};

    #[tokio::test(start_paused = true)]
    async fn test_sensor_updates_brightness_on_interval() {
        let harness = TestHarness::new();
        let machine = Arc::new(Mutex::new(InteractionMachine::new(
            ConceptKind::SofaArm.create(),
            harness.context.clone(),
            MachineSettings::default(),
        )));

        let sensor = spawn_ambient_sensor(Arc::clone(&machine), Duration::from_secs(8));
        settle().await;

        let brightness = |m: &Arc<Mutex<InteractionMachine>>| {
            match m.lock().unwrap().snapshot().detail {
                ConceptDetail::SofaArm(sofa) => sofa.brightness,
                _ => unreachable!(),
            }
        };
        assert_eq!(brightness(&machine), 80);

        tokio::time::sleep(Duration::from_millis(8100)).await;
        assert!([40, 70, 100].contains(&brightness(&machine)));
        assert_eq!(machine.lock().unwrap().state(), InteractionState::Inactive);

        sensor.abort();
    }
}
