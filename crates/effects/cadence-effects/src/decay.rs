/// Decay rate used by radar-style sweeps.
pub const DEFAULT_PHOSPHOR_DECAY_RATE: f64 = 2.0;

/// Remaining phosphor brightness `exp(-rate * t)` at `time_since_sweep`
/// seconds after the beam passed.
#[inline]
pub fn phosphor_decay(time_since_sweep: f64, decay_rate: f64) -> f64 {
    (-decay_rate * time_since_sweep).exp()
}
