//! Error types for the frame clock.

/// Failures surfaced by [`crate::Clock::frame`].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ClockError {
    /// `frame()` was called while a tick was still being delivered.
    #[error("frame dispatched while tick {frame} is still being delivered")]
    ReentrantFrame { frame: u64 },

    /// A subscriber returned an error; delivery of the frame stopped there.
    #[error("subscriber {subscription} failed on frame {frame}")]
    Subscriber {
        subscription: u64,
        frame: u64,
        #[source]
        source: anyhow::Error,
    },
}

impl ClockError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ReentrantFrame { .. } => "misuse",
            Self::Subscriber { .. } => "subscriber",
        }
    }
}
