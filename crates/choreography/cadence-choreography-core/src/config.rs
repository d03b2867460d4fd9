//! Choreographer configuration.

use serde::{Deserialize, Serialize};

/// How a choreography's total duration is derived from its steps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DurationPolicy {
    /// `start_time + duration` of the last declared step. Steps declared out
    /// of chronological order can end the cycle before an earlier-declared,
    /// later-ending step completes.
    #[default]
    LastDeclared,
    /// Latest `start_time + duration` across all steps.
    LatestEnd,
}

/// Configuration for [`crate::Choreographer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChoreographerConfig {
    pub duration_policy: DurationPolicy,
    /// Maximum number of buffered [`crate::ChoreographyEvent`]s. The oldest
    /// event is dropped on overflow; `0` disables recording.
    pub event_capacity: usize,
}

impl Default for ChoreographerConfig {
    fn default() -> Self {
        Self {
            duration_policy: DurationPolicy::LastDeclared,
            event_capacity: 1024,
        }
    }
}
