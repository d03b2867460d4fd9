//! Per-frame tick snapshot.

use serde::{Deserialize, Serialize};

/// One frame's worth of timing, identical for every subscriber of that frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    /// Seconds since the frame loop (re)started.
    pub time: f64,
    /// Seconds since the previous tick; zero on the first tick after a start.
    pub delta_time: f64,
    /// Always false at the clock layer.
    pub is_paused: bool,
    /// Monotonic frame counter; keeps counting across loop restarts.
    pub frame: u64,
}
