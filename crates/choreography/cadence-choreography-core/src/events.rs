//! Discrete signals recorded while choreographies run.
//!
//! Events are observability only; hooks have already fired by the time an
//! event is read. Hosts poll them with [`crate::Choreographer::drain_events`].

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[non_exhaustive]
pub enum ChoreographyEvent {
    Started {
        choreography: String,
        start_time: f64,
    },
    /// A `start` with an id that was already running discarded the old run.
    Replaced {
        choreography: String,
    },
    Stopped {
        choreography: String,
    },
    StepStarted {
        choreography: String,
        step: String,
        cycle: u64,
        time: f64,
    },
    StepCompleted {
        choreography: String,
        step: String,
        cycle: u64,
        time: f64,
    },
    Looped {
        choreography: String,
        cycle: u64,
        time: f64,
    },
    /// A non-looping choreography reached its total duration and was removed.
    Finished {
        choreography: String,
        time: f64,
    },
}

impl ChoreographyEvent {
    pub fn choreography(&self) -> &str {
        match self {
            Self::Started { choreography, .. }
            | Self::Replaced { choreography }
            | Self::Stopped { choreography }
            | Self::StepStarted { choreography, .. }
            | Self::StepCompleted { choreography, .. }
            | Self::Looped { choreography, .. }
            | Self::Finished { choreography, .. } => choreography,
        }
    }
}
