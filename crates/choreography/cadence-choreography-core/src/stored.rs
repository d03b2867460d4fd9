use serde::{Deserialize, Serialize};

use crate::choreography::Choreography;
use crate::error::ChoreographyError;
use crate::step::{Step, StepHooks};

/// Timing-only step description as stored in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDef {
    pub id: String,
    pub start_time: f64,
    pub duration: f64,
}

/// Timing-only choreography description as stored in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChoreographyDef {
    pub id: String,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default)]
    pub steps: Vec<StepDef>,
}

impl ChoreographyDef {
    /// Attach hooks by step id and build a runnable choreography.
    pub fn into_choreography<F>(self, mut hooks: F) -> Choreography
    where
        F: FnMut(&str) -> StepHooks,
    {
        let steps = self
            .steps
            .into_iter()
            .map(|s| {
                let step_hooks = hooks(&s.id);
                Step::new(s.id, s.start_time, s.duration).with_hooks(step_hooks)
            })
            .collect();
        Choreography {
            id: self.id,
            steps,
            looping: self.looping,
        }
    }
}

impl From<&Choreography> for ChoreographyDef {
    fn from(c: &Choreography) -> Self {
        Self {
            id: c.id.clone(),
            looping: c.looping,
            steps: c
                .steps
                .iter()
                .map(|s| StepDef {
                    id: s.id.clone(),
                    start_time: s.start_time,
                    duration: s.duration,
                })
                .collect(),
        }
    }
}

/// Parse a stored choreography:
/// `{ "id": "...", "loop": false, "steps": [{ "id", "startTime", "duration" }] }`.
///
/// Times are in seconds. The result is validated with the same rules
/// [`crate::Choreographer::start`] applies.
pub fn parse_choreography_json(s: &str) -> Result<ChoreographyDef, ChoreographyError> {
    let def: ChoreographyDef = serde_json::from_str(s)?;
    def.clone().into_choreography(|_| StepHooks::default()).validate()?;
    Ok(def)
}
