//! One-shot particle bursts.
//!
//! A burst only seeds particle state; integrating velocity and counting down
//! `life` is the host's job.

use std::f64::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EffectsError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: f64,
    pub max_life: f64,
    pub size: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BurstOptions {
    /// Upper bound of the initial speed; each particle gets `[speed / 2, speed]`.
    pub speed: f64,
    /// Seconds.
    pub life: f64,
    /// Upper bound of the size; each particle gets `[size / 2, size]`.
    pub size: f64,
    pub colors: Vec<String>,
}

impl Default for BurstOptions {
    fn default() -> Self {
        Self {
            speed: 100.0,
            life: 1.0,
            size: 4.0,
            colors: vec!["#ff3366".into(), "#ffaa00".into(), "#ff6600".into()],
        }
    }
}

/// Spawn `count` particles at `(x, y)` flying out in uniformly random directions.
pub fn create_particle_burst<R: Rng + ?Sized>(
    x: f64,
    y: f64,
    count: usize,
    options: &BurstOptions,
    rng: &mut R,
) -> Result<Vec<Particle>, EffectsError> {
    if options.colors.is_empty() {
        return Err(EffectsError::EmptyPalette);
    }
    let mut particles = Vec::with_capacity(count);
    for _ in 0..count {
        let angle = rng.gen::<f64>() * TAU;
        let velocity = options.speed * (0.5 + rng.gen::<f64>() * 0.5);
        let size = options.size * (0.5 + rng.gen::<f64>() * 0.5);
        let color = options
            .colors
            .choose(rng)
            .cloned()
            .ok_or(EffectsError::EmptyPalette)?;
        particles.push(Particle {
            x,
            y,
            vx: angle.cos() * velocity,
            vy: angle.sin() * velocity,
            life: options.life,
            max_life: options.life,
            size,
            color,
        });
    }
    Ok(particles)
}
