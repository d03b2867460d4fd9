//! Steps: one timed window of a choreography plus its lifecycle hooks.

use std::fmt;
use std::rc::Rc;

/// Hook fired on a lifecycle edge.
pub type Hook = Rc<dyn Fn() -> anyhow::Result<()>>;
/// Hook fired with the step's progress in `[0, 1]`.
pub type ProgressHook = Rc<dyn Fn(f64) -> anyhow::Result<()>>;

/// Caller-supplied callbacks for one step. All optional.
///
/// Hooks are shared (`Rc`) so a choreography can be cloned, restarted or
/// snapshotted without copying caller state. Mutable caller state belongs in
/// a `Cell`/`RefCell` captured by the closure.
#[derive(Clone, Default)]
pub struct StepHooks {
    pub on_start: Option<Hook>,
    pub on_update: Option<ProgressHook>,
    pub on_complete: Option<Hook>,
}

impl fmt::Debug for StepHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepHooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl StepHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        self.on_start = Some(Rc::new(f));
        self
    }

    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> anyhow::Result<()> + 'static,
    {
        self.on_update = Some(Rc::new(f));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        self.on_complete = Some(Rc::new(f));
        self
    }
}

/// A timed window `[start_time, start_time + duration)` measured from the
/// choreography's start, in seconds.
#[derive(Clone, Debug)]
pub struct Step {
    pub id: String,
    pub start_time: f64,
    pub duration: f64,
    pub hooks: StepHooks,
}

impl Step {
    pub fn new(id: impl Into<String>, start_time: f64, duration: f64) -> Self {
        Self {
            id: id.into(),
            start_time,
            duration,
            hooks: StepHooks::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: StepHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        self.hooks = self.hooks.on_start(f);
        self
    }

    pub fn on_update<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> anyhow::Result<()> + 'static,
    {
        self.hooks = self.hooks.on_update(f);
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        self.hooks = self.hooks.on_complete(f);
        self
    }

    #[inline]
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Clamped progress through the window at `elapsed`.
    #[inline]
    pub fn progress_at(&self, elapsed: f64) -> f64 {
        ((elapsed - self.start_time) / self.duration).clamp(0.0, 1.0)
    }
}
