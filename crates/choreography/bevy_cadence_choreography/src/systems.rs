use bevy::log::error;
use bevy::prelude::*;

use crate::resources::{CadenceEvent, CadenceFrameStats, CadenceRuntime};

/// Sample Bevy's clock and deliver one frame while the frame source is open.
///
/// Subscriber failures are logged and counted; the next `Update` delivers a
/// fresh frame.
pub fn pump_clock_system(
    runtime: NonSend<CadenceRuntime>,
    time: Res<Time>,
    mut stats: ResMut<CadenceFrameStats>,
) {
    runtime.time.set(time.elapsed_seconds_f64());
    if !runtime.gate.is_open() {
        return;
    }
    match runtime.clock.frame() {
        Ok(Some(tick)) => {
            stats.frames += 1;
            stats.last_time = tick.time;
        }
        Ok(None) => {}
        Err(err) => {
            stats.errors += 1;
            let category = err.category();
            let report = anyhow::Error::new(err);
            error!(category, "cadence frame failed: {report:#}");
        }
    }
}

pub fn forward_events_system(
    runtime: NonSend<CadenceRuntime>,
    mut events: EventWriter<CadenceEvent>,
) {
    for event in runtime.choreographer.drain_events() {
        events.send(CadenceEvent(event));
    }
}
