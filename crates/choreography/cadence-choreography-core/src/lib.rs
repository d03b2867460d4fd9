//! Cadence Choreography (engine-agnostic)
//!
//! Sequences named, timed steps into optionally looping timelines driven by a
//! [`cadence_clock::Clock`]. Each step moves through `Pending → Active →
//! Completed` once per cycle; the hooks attached to those transitions fire
//! exactly once no matter how irregular the tick spacing is.

pub mod choreographer;
pub mod choreography;
pub mod config;
pub mod error;
pub mod events;
pub mod phase;
pub mod step;
pub mod stored;

// Re-exports for consumers (hosts/adapters)
pub use cadence_clock::{Clock, Tick};
pub use choreographer::{Choreographer, WeakChoreographer};
pub use choreography::Choreography;
pub use config::{ChoreographerConfig, DurationPolicy};
pub use error::ChoreographyError;
pub use events::ChoreographyEvent;
pub use phase::{StepPhase, StepTransition};
pub use step::{Step, StepHooks};
pub use stored::{parse_choreography_json, ChoreographyDef, StepDef};
