use bevy::prelude::*;

pub use cadence_choreography;
pub use cadence_clock;

mod resources;
mod systems;

pub use resources::{CadenceEvent, CadenceFrameStats, CadenceRuntime};
pub use systems::{forward_events_system, pump_clock_system};

use cadence_choreography::ChoreographerConfig;
use cadence_clock::ClockConfig;

/// Drives a [`CadenceRuntime`] from Bevy's `Time` once per `Update`.
///
/// The runtime is a non-send resource: the clock and choreographer are
/// single-threaded handles, so every system touching them runs on the main
/// thread.
#[derive(Clone, Debug, Default)]
pub struct CadencePlugin {
    pub clock: ClockConfig,
    pub choreographer: ChoreographerConfig,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CadenceSet {
    Pump,
    Forward,
}

impl Plugin for CadencePlugin {
    fn build(&self, app: &mut App) {
        app.insert_non_send_resource(CadenceRuntime::new(
            self.clock.clone(),
            self.choreographer.clone(),
        ))
        .init_resource::<CadenceFrameStats>()
        .add_event::<CadenceEvent>()
        .configure_sets(Update, (CadenceSet::Pump, CadenceSet::Forward).chain())
        .add_systems(Update, pump_clock_system.in_set(CadenceSet::Pump))
        .add_systems(Update, forward_events_system.in_set(CadenceSet::Forward));
    }
}
