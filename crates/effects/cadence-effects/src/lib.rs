//! Stateless helpers for step callbacks: easing curves, colour blending,
//! screen shake, particle bursts and phosphor decay.
//!
//! Randomised helpers take the RNG as a parameter so hosts can seed them.

pub mod color;
pub mod decay;
pub mod easing;
pub mod error;
pub mod particles;
pub mod shake;

pub use color::{lerp_hex, lerp_rgb, Rgb};
pub use decay::{phosphor_decay, DEFAULT_PHOSPHOR_DECAY_RATE};
pub use easing::Easing;
pub use error::EffectsError;
pub use particles::{create_particle_burst, BurstOptions, Particle};
pub use shake::{generate_shake, Offset};
