//! Cadence Clock (engine-agnostic)
//!
//! A single frame pump shared by every animation consumer in a process. The
//! clock owns the host's frame-request resource, requests it when the first
//! subscriber arrives and cancels it when the last one leaves. Each delivered
//! frame becomes one [`Tick`] that is fanned out synchronously to all
//! subscribers.
//!
//! Hosts wire a [`TimeSource`] and a [`FrameSource`] into [`Clock::new`] and
//! call [`Clock::frame`] whenever the frame source delivers a frame.

pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod source;
pub mod tick;

pub use clock::{Clock, SubscriptionGuard};
pub use config::ClockConfig;
pub use error::ClockError;
pub use ids::SubscriptionId;
pub use source::{FrameGate, FrameSource, ManualTimeSource, MonotonicTimeSource, TimeSource};
pub use tick::Tick;
