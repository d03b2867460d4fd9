//! Clock configuration.

use serde::{Deserialize, Serialize};

/// Tunables for [`crate::Clock`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Upper bound applied to `Tick::delta_time` after a stall (debugger,
    /// hidden surface). `Tick::time` is never clamped. `None` keeps raw deltas.
    #[serde(default)]
    pub max_delta_seconds: Option<f64>,
}

impl ClockConfig {
    pub(crate) fn clamp_delta(&self, delta: f64) -> f64 {
        let delta = delta.max(0.0);
        match self.max_delta_seconds {
            Some(max) if delta > max => max,
            _ => delta,
        }
    }
}
