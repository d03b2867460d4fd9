//! Per-step, per-cycle state machine.
//!
//! Transitions depend only on the current phase and the elapsed time, so the
//! exactly-once guarantees can be read off the match in [`StepPhase::advance`]:
//! `on_start` fires only on leaving `Pending`, `on_complete` only on entering
//! `Completed`, and `Completed` has no outgoing edge within a cycle.

use serde::{Deserialize, Serialize};

use crate::step::Step;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepPhase {
    /// Window not reached yet this cycle.
    #[default]
    Pending,
    /// Inside the window; `on_start` already fired.
    Active,
    /// Window closed; `on_complete` already fired.
    Completed,
}

/// Hooks to fire for one step on one tick, in order: start, update, complete.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepTransition {
    pub fire_start: bool,
    pub progress: Option<f64>,
    pub fire_complete: bool,
}

impl StepTransition {
    pub const NONE: Self = Self {
        fire_start: false,
        progress: None,
        fire_complete: false,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl StepPhase {
    /// Compute the next phase for `step` at `elapsed` seconds into the cycle.
    ///
    /// A `Pending` step whose whole window was skipped (dropped or coalesced
    /// frames) goes straight to `Completed`, firing both start and complete.
    pub fn advance(self, step: &Step, elapsed: f64) -> (StepPhase, StepTransition) {
        let end = step.end_time();
        if elapsed < step.start_time {
            return (self, StepTransition::NONE);
        }
        if elapsed < end {
            return match self {
                StepPhase::Pending => (
                    StepPhase::Active,
                    StepTransition {
                        fire_start: true,
                        progress: Some(step.progress_at(elapsed)),
                        fire_complete: false,
                    },
                ),
                StepPhase::Active => (
                    StepPhase::Active,
                    StepTransition {
                        progress: Some(step.progress_at(elapsed)),
                        ..StepTransition::NONE
                    },
                ),
                StepPhase::Completed => (StepPhase::Completed, StepTransition::NONE),
            };
        }
        match self {
            StepPhase::Pending => (
                StepPhase::Completed,
                StepTransition {
                    fire_start: true,
                    progress: None,
                    fire_complete: true,
                },
            ),
            StepPhase::Active => (
                StepPhase::Completed,
                StepTransition {
                    fire_complete: true,
                    ..StepTransition::NONE
                },
            ),
            StepPhase::Completed => (StepPhase::Completed, StepTransition::NONE),
        }
    }
}
