//! Choreography definitions: an ordered list of steps sharing one start time.

use hashbrown::HashSet;

use crate::config::DurationPolicy;
use crate::error::ChoreographyError;
use crate::step::Step;

/// Steps are evaluated independently every tick; they need not be sorted or
/// disjoint.
#[derive(Clone, Debug)]
pub struct Choreography {
    pub id: String,
    pub steps: Vec<Step>,
    /// Restart from the first step when the total duration elapses.
    pub looping: bool,
}

impl Choreography {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            steps: Vec::new(),
            looping: false,
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Length of one cycle. Zero for an empty choreography.
    pub fn total_duration(&self, policy: DurationPolicy) -> f64 {
        match policy {
            DurationPolicy::LastDeclared => self.steps.last().map_or(0.0, Step::end_time),
            DurationPolicy::LatestEnd => self
                .steps
                .iter()
                .map(Step::end_time)
                .fold(0.0, f64::max),
        }
    }

    /// Reject definitions whose windows are undefined.
    ///
    /// An empty step list is valid: it finishes on the first tick.
    pub fn validate(&self) -> Result<(), ChoreographyError> {
        if self.id.is_empty() {
            return Err(ChoreographyError::EmptyId);
        }
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            if step.id.is_empty() {
                return Err(ChoreographyError::EmptyStepId {
                    choreography: self.id.clone(),
                    index,
                });
            }
            if !seen.insert(step.id.as_str()) {
                return Err(ChoreographyError::DuplicateStep {
                    choreography: self.id.clone(),
                    step: step.id.clone(),
                });
            }
            if !(step.duration.is_finite() && step.duration > 0.0) {
                return Err(ChoreographyError::InvalidDuration {
                    choreography: self.id.clone(),
                    step: step.id.clone(),
                    duration: step.duration,
                });
            }
            if !(step.start_time.is_finite() && step.start_time >= 0.0) {
                return Err(ChoreographyError::InvalidStartTime {
                    choreography: self.id.clone(),
                    step: step.id.clone(),
                    start_time: step.start_time,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out_of_order() -> Choreography {
        Choreography::new("c")
            .step(Step::new("long", 0.0, 3.0))
            .step(Step::new("short", 0.5, 0.5))
    }

    #[test]
    fn total_duration_follows_policy() {
        let c = out_of_order();
        assert_eq!(c.total_duration(DurationPolicy::LastDeclared), 1.0);
        assert_eq!(c.total_duration(DurationPolicy::LatestEnd), 3.0);
        let empty = Choreography::new("e");
        assert_eq!(empty.total_duration(DurationPolicy::LastDeclared), 0.0);
        assert_eq!(empty.total_duration(DurationPolicy::LatestEnd), 0.0);
    }

    #[test]
    fn rejects_non_positive_and_non_finite_durations() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let c = Choreography::new("c").step(Step::new("s", 0.0, bad));
            assert!(matches!(
                c.validate(),
                Err(ChoreographyError::InvalidDuration { .. })
            ));
        }
    }

    #[test]
    fn rejects_negative_start_and_duplicate_ids() {
        let negative = Choreography::new("c").step(Step::new("s", -0.1, 1.0));
        assert!(matches!(
            negative.validate(),
            Err(ChoreographyError::InvalidStartTime { .. })
        ));

        let dup = Choreography::new("c")
            .step(Step::new("s", 0.0, 1.0))
            .step(Step::new("s", 1.0, 1.0));
        assert_eq!(
            dup.validate(),
            Err(ChoreographyError::DuplicateStep {
                choreography: "c".into(),
                step: "s".into()
            })
        );
    }

    #[test]
    fn empty_choreography_is_valid() {
        assert!(Choreography::new("c").validate().is_ok());
        assert_eq!(
            Choreography::new("").validate(),
            Err(ChoreographyError::EmptyId)
        );
    }
}
