//! Choreographer: runs any number of choreographies off one clock subscription.
//!
//! Methods:
//! - new (subscribes once), start, stop, active_choreographies
//! - step_phases / cycle / drain_events (read-only inspection)
//!
//! Hooks may call back into the choreographer. Interior borrows are never held
//! while a hook runs; the active set is snapshotted at the top of every tick, so
//! a run started from a hook is first evaluated on the next tick, while a stop
//! or replacement silences the affected run immediately.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use anyhow::Context;
use cadence_clock::{Clock, SubscriptionId, Tick};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::choreography::Choreography;
use crate::config::ChoreographerConfig;
use crate::error::ChoreographyError;
use crate::events::ChoreographyEvent;
use crate::phase::{StepPhase, StepTransition};
use crate::step::Step;

/// Private run-state of one active choreography.
#[derive(Debug)]
struct Run {
    choreography: Rc<Choreography>,
    /// Clock time at which the current cycle began.
    start_time: f64,
    phases: Vec<StepPhase>,
    cycle: u64,
    /// Set by stop/replace/finish; a cancelled run never fires another hook.
    cancelled: bool,
}

impl Run {
    fn new(choreography: Rc<Choreography>, start_time: f64) -> Self {
        let phases = vec![StepPhase::Pending; choreography.steps.len()];
        Self {
            choreography,
            start_time,
            phases,
            cycle: 0,
            cancelled: false,
        }
    }

    fn rebase(&mut self, time: f64) {
        self.start_time = time;
        self.phases.fill(StepPhase::Pending);
        self.cycle += 1;
    }
}

type RunCell = Rc<RefCell<Run>>;

#[derive(Debug)]
struct State {
    cfg: ChoreographerConfig,
    active: IndexMap<String, RunCell>,
    events: VecDeque<ChoreographyEvent>,
    /// Events dropped since the last drain. Overflow is reported once per
    /// drain period, when this leaves zero.
    dropped: u64,
}

impl State {
    fn new(cfg: ChoreographerConfig) -> Self {
        Self {
            cfg,
            active: IndexMap::new(),
            events: VecDeque::new(),
            dropped: 0,
        }
    }

    /// Returns true when this call started a new overflow.
    fn record(&mut self, event: ChoreographyEvent) -> bool {
        let capacity = self.cfg.event_capacity;
        if capacity == 0 {
            return false;
        }
        let mut overflowed = false;
        if self.events.len() >= capacity {
            self.events.pop_front();
            overflowed = self.dropped == 0;
            self.dropped += 1;
            if overflowed {
                warn!(capacity, "choreography event buffer full; dropping oldest events until drained");
            }
        }
        self.events.push_back(event);
        overflowed
    }

    fn drain(&mut self) -> Vec<ChoreographyEvent> {
        if self.dropped > 0 {
            debug!(dropped = self.dropped, "choreography events dropped before drain");
            self.dropped = 0;
        }
        self.events.drain(..).collect()
    }
}

struct Shared {
    clock: Clock,
    subscription: Cell<Option<SubscriptionId>>,
    state: RefCell<State>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.clock.unsubscribe(id);
            debug!(subscription = id.0, "choreographer detached from clock");
        }
    }
}

/// Handle to a choreographer. Clones share the same registry.
///
/// The clock subscription lives as long as any strong handle. Hooks that need
/// to call `start`/`stop` should capture a [`WeakChoreographer`] from
/// [`Choreographer::downgrade`]; a strong handle inside a hook keeps the
/// choreographer (and its clock subscription) alive forever.
#[derive(Clone)]
pub struct Choreographer {
    shared: Rc<Shared>,
}

impl fmt::Debug for Choreographer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Choreographer")
            .field("subscription", &self.shared.subscription.get())
            .field("active", &state.active.keys().collect::<Vec<_>>())
            .field("pending_events", &state.events.len())
            .finish_non_exhaustive()
    }
}

/// Non-owning handle for use inside hooks.
#[derive(Clone, Debug, Default)]
pub struct WeakChoreographer {
    shared: Weak<Shared>,
}

impl WeakChoreographer {
    pub fn upgrade(&self) -> Option<Choreographer> {
        self.shared.upgrade().map(|shared| Choreographer { shared })
    }
}

impl Choreographer {
    /// Create a choreographer and register its single subscription on `clock`.
    pub fn new(clock: &Clock, cfg: ChoreographerConfig) -> Self {
        let shared = Rc::new(Shared {
            clock: clock.clone(),
            subscription: Cell::new(None),
            state: RefCell::new(State::new(cfg)),
        });
        let weak = Rc::downgrade(&shared);
        let id = clock.subscribe(move |tick| match weak.upgrade() {
            Some(shared) => Choreographer { shared }.on_tick(tick),
            None => Ok(()),
        });
        shared.subscription.set(Some(id));
        debug!(subscription = id.0, "choreographer attached to clock");
        Self { shared }
    }

    pub fn downgrade(&self) -> WeakChoreographer {
        WeakChoreographer {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Validate and activate `choreography`, anchored at the clock's current time.
    ///
    /// An active run with the same id is replaced: its run-state is discarded
    /// and none of its pending hooks fire.
    pub fn start(&self, choreography: Choreography) -> Result<(), ChoreographyError> {
        choreography.validate()?;
        let start_time = self.shared.clock.current_time();
        let id = choreography.id.clone();
        let steps = choreography.steps.len();
        let run = Rc::new(RefCell::new(Run::new(Rc::new(choreography), start_time)));

        let replaced = {
            let mut state = self.shared.state.borrow_mut();
            let replaced = state.active.insert(id.clone(), run);
            if replaced.is_some() {
                state.record(ChoreographyEvent::Replaced {
                    choreography: id.clone(),
                });
            }
            state.record(ChoreographyEvent::Started {
                choreography: id.clone(),
                start_time,
            });
            replaced
        };
        if let Some(old) = replaced {
            old.borrow_mut().cancelled = true;
            debug!(choreography = %id, start_time, steps, "choreography replaced");
        } else {
            debug!(choreography = %id, start_time, steps, "choreography started");
        }
        Ok(())
    }

    /// Deactivate a choreography. No hook fires for it afterwards, not even a
    /// completion for a step caught mid-window. Returns false if it was not active.
    pub fn stop(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.shared.state.borrow_mut();
            let removed = state.active.shift_remove(id);
            if removed.is_some() {
                state.record(ChoreographyEvent::Stopped {
                    choreography: id.to_string(),
                });
            }
            removed
        };
        match removed {
            Some(run) => {
                run.borrow_mut().cancelled = true;
                debug!(choreography = id, "choreography stopped");
                true
            }
            None => false,
        }
    }

    /// Snapshot of the running set, in start order.
    pub fn active_choreographies(&self) -> IndexMap<String, Rc<Choreography>> {
        self.shared
            .state
            .borrow()
            .active
            .iter()
            .map(|(id, run)| (id.clone(), Rc::clone(&run.borrow().choreography)))
            .collect()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.shared.state.borrow().active.contains_key(id)
    }

    /// Current phase of every step of an active choreography.
    pub fn step_phases(&self, id: &str) -> Option<Vec<(String, StepPhase)>> {
        let state = self.shared.state.borrow();
        let run = state.active.get(id)?.borrow();
        Some(
            run.choreography
                .steps
                .iter()
                .zip(run.phases.iter())
                .map(|(step, phase)| (step.id.clone(), *phase))
                .collect(),
        )
    }

    /// Zero-based cycle counter of an active choreography.
    pub fn cycle(&self, id: &str) -> Option<u64> {
        let state = self.shared.state.borrow();
        let cycle = state.active.get(id)?.borrow().cycle;
        Some(cycle)
    }

    /// Take all recorded events, oldest first.
    pub fn drain_events(&self) -> Vec<ChoreographyEvent> {
        self.shared.state.borrow_mut().drain()
    }

    fn record(&self, event: ChoreographyEvent) {
        self.shared.state.borrow_mut().record(event);
    }

    fn on_tick(&self, tick: &Tick) -> anyhow::Result<()> {
        let runs: Vec<(String, RunCell)> = self
            .shared
            .state
            .borrow()
            .active
            .iter()
            .map(|(id, run)| (id.clone(), Rc::clone(run)))
            .collect();
        for (id, run) in runs {
            self.advance_run(&id, &run, tick)?;
        }
        Ok(())
    }

    fn advance_run(&self, id: &str, run: &RunCell, tick: &Tick) -> anyhow::Result<()> {
        let (choreography, elapsed, cycle) = {
            let r = run.borrow();
            if r.cancelled {
                return Ok(());
            }
            (Rc::clone(&r.choreography), tick.time - r.start_time, r.cycle)
        };
        trace!(choreography = id, elapsed, cycle, "advance");

        for (index, step) in choreography.steps.iter().enumerate() {
            let transition = {
                let mut r = run.borrow_mut();
                if r.cancelled {
                    return Ok(());
                }
                let (next, transition) = r.phases[index].advance(step, elapsed);
                r.phases[index] = next;
                transition
            };
            if !transition.is_empty() {
                self.fire(id, run, step, cycle, tick, transition)?;
            }
        }

        let policy = self.shared.state.borrow().cfg.duration_policy;
        if elapsed < choreography.total_duration(policy) {
            return Ok(());
        }

        let looped = {
            let mut r = run.borrow_mut();
            if r.cancelled {
                return Ok(());
            }
            if choreography.looping && !choreography.steps.is_empty() {
                r.rebase(tick.time);
                Some(r.cycle)
            } else {
                r.cancelled = true;
                None
            }
        };

        let removed = {
            let mut state = self.shared.state.borrow_mut();
            match looped {
                Some(cycle) => {
                    state.record(ChoreographyEvent::Looped {
                        choreography: id.to_string(),
                        cycle,
                        time: tick.time,
                    });
                    None
                }
                None => {
                    let ours = state
                        .active
                        .get(id)
                        .is_some_and(|current| Rc::ptr_eq(current, run));
                    state.record(ChoreographyEvent::Finished {
                        choreography: id.to_string(),
                        time: tick.time,
                    });
                    if ours {
                        state.active.shift_remove(id)
                    } else {
                        None
                    }
                }
            }
        };
        match looped {
            Some(cycle) => debug!(choreography = id, cycle, time = tick.time, "choreography looped"),
            None => debug!(choreography = id, time = tick.time, "choreography finished"),
        }
        drop(removed);
        Ok(())
    }

    fn fire(
        &self,
        id: &str,
        run: &RunCell,
        step: &Step,
        cycle: u64,
        tick: &Tick,
        transition: StepTransition,
    ) -> anyhow::Result<()> {
        let hooks = &step.hooks;
        if transition.fire_start {
            self.record(ChoreographyEvent::StepStarted {
                choreography: id.to_string(),
                step: step.id.clone(),
                cycle,
                time: tick.time,
            });
            if let Some(hook) = &hooks.on_start {
                hook().with_context(|| {
                    format!("on_start of step '{}' in choreography '{id}'", step.id)
                })?;
            }
        }
        if let Some(progress) = transition.progress {
            if run.borrow().cancelled {
                return Ok(());
            }
            if let Some(hook) = &hooks.on_update {
                hook(progress).with_context(|| {
                    format!("on_update of step '{}' in choreography '{id}'", step.id)
                })?;
            }
        }
        if transition.fire_complete {
            if run.borrow().cancelled {
                return Ok(());
            }
            self.record(ChoreographyEvent::StepCompleted {
                choreography: id.to_string(),
                step: step.id.clone(),
                cycle,
                time: tick.time,
            });
            if let Some(hook) = &hooks.on_complete {
                hook().with_context(|| {
                    format!("on_complete of step '{}' in choreography '{id}'", step.id)
                })?;
            }
        }
        Ok(())
    }
}
