//! Error types for choreography definitions.

/// Rejections raised by [`crate::Choreographer::start`] and the stored-choreography loader.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ChoreographyError {
    #[error("choreography id must not be empty")]
    EmptyId,

    #[error("step #{index} of choreography '{choreography}' has an empty id")]
    EmptyStepId { choreography: String, index: usize },

    #[error("step '{step}' appears more than once in choreography '{choreography}'")]
    DuplicateStep { choreography: String, step: String },

    #[error("step '{step}' of choreography '{choreography}' has non-positive duration {duration}")]
    InvalidDuration {
        choreography: String,
        step: String,
        duration: f64,
    },

    #[error("step '{step}' of choreography '{choreography}' has invalid start time {start_time}")]
    InvalidStartTime {
        choreography: String,
        step: String,
        start_time: f64,
    },

    #[error("failed to parse stored choreography: {reason}")]
    Parse { reason: String },
}

impl ChoreographyError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::EmptyStepId { .. } | Self::DuplicateStep { .. } => "identity",
            Self::InvalidDuration { .. } | Self::InvalidStartTime { .. } => "timing",
            Self::Parse { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for ChoreographyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}
