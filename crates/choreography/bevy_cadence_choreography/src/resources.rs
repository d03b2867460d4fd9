use bevy::prelude::*;
use cadence_choreography::{Choreographer, ChoreographerConfig, ChoreographyEvent};
use cadence_clock::{Clock, ClockConfig, FrameGate, ManualTimeSource};

/// Clock and choreographer owned by the Bevy world.
///
/// `time` is fed from `Time::elapsed_seconds_f64` before each frame; `gate`
/// reports whether anything is subscribed.
pub struct CadenceRuntime {
    pub clock: Clock,
    pub choreographer: Choreographer,
    pub time: ManualTimeSource,
    pub gate: FrameGate,
}

impl CadenceRuntime {
    pub fn new(clock_cfg: ClockConfig, choreographer_cfg: ChoreographerConfig) -> Self {
        let time = ManualTimeSource::new(0.0);
        let gate = FrameGate::new();
        let clock = Clock::new(clock_cfg, time.clone(), gate.clone());
        let choreographer = Choreographer::new(&clock, choreographer_cfg);
        Self {
            clock,
            choreographer,
            time,
            gate,
        }
    }
}

/// Counters updated by the pump system.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct CadenceFrameStats {
    pub frames: u64,
    pub errors: u64,
    /// `Tick::time` of the last delivered frame.
    pub last_time: f64,
}

/// Choreography events re-published as Bevy events.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CadenceEvent(pub ChoreographyEvent);
