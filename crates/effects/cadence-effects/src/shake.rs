use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 2D displacement in the host's units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Random screen-shake offset: uniform direction, magnitude in
/// `[intensity / 2, intensity]`.
pub fn generate_shake<R: Rng + ?Sized>(intensity: f64, rng: &mut R) -> Offset {
    let angle = rng.gen::<f64>() * TAU;
    let magnitude = intensity * (0.5 + rng.gen::<f64>() * 0.5);
    Offset {
        x: angle.cos() * magnitude,
        y: angle.sin() * magnitude,
    }
}
