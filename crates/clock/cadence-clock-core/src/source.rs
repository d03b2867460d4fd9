//! Environment seams: where time comes from and how frames are requested.
//!
//! The clock never talks to a windowing system directly. A host (Bevy app,
//! winit loop, offline renderer, test) provides a [`TimeSource`] and a
//! [`FrameSource`], then calls [`crate::Clock::frame`] whenever a frame is due.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time in seconds.
pub trait TimeSource {
    fn now_seconds(&self) -> f64;
}

/// The host's frame-request resource.
///
/// `request_frames` is called once when the clock gains its first subscriber,
/// `cancel_frames` once when it loses its last one (or is dropped while running).
pub trait FrameSource {
    fn request_frames(&mut self);
    fn cancel_frames(&mut self);
}

/// Wall-clock time anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTimeSource {
    anchor: Instant,
}

impl MonotonicTimeSource {
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTimeSource {
    fn now_seconds(&self) -> f64 {
        self.anchor.elapsed().as_secs_f64()
    }
}

/// Externally driven time. Clones share the same reading, so a host can keep
/// one clone and hand another to the clock.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<f64>>,
}

impl ManualTimeSource {
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Jump to an absolute reading.
    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    /// Move forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }

    pub fn get(&self) -> f64 {
        self.now.get()
    }
}

impl TimeSource for ManualTimeSource {
    fn now_seconds(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Default)]
struct GateState {
    open: Cell<bool>,
    requests: Cell<u64>,
    cancellations: Cell<u64>,
}

/// Polled frame source.
///
/// The clock flips the gate open and closed; the host loop checks
/// [`FrameGate::is_open`] before calling [`crate::Clock::frame`]. The gate also
/// counts how often it was requested and cancelled.
#[derive(Debug, Clone, Default)]
pub struct FrameGate {
    state: Rc<GateState>,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.state.open.get()
    }

    /// Number of `request_frames` calls seen so far.
    pub fn requests(&self) -> u64 {
        self.state.requests.get()
    }

    /// Number of `cancel_frames` calls seen so far.
    pub fn cancellations(&self) -> u64 {
        self.state.cancellations.get()
    }
}

impl FrameSource for FrameGate {
    fn request_frames(&mut self) {
        self.state.open.set(true);
        self.state.requests.set(self.state.requests.get() + 1);
    }

    fn cancel_frames(&mut self) {
        self.state.open.set(false);
        self.state
            .cancellations
            .set(self.state.cancellations.get() + 1);
    }
}
