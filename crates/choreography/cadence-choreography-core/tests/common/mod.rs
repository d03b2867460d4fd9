#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use cadence_choreography::{Choreographer, ChoreographerConfig, Step, StepHooks};
use cadence_clock::{Clock, ClockConfig, FrameGate, ManualTimeSource, Tick};

pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn init_tracing() {
    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "cadence_choreography=debug".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub struct Harness {
    pub clock: Clock,
    pub time: ManualTimeSource,
    pub gate: FrameGate,
    pub choreo: Choreographer,
    pub log: CallLog,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ChoreographerConfig::default())
    }

    pub fn with_config(cfg: ChoreographerConfig) -> Self {
        init_tracing();
        let time = ManualTimeSource::new(0.0);
        let gate = FrameGate::new();
        let clock = Clock::new(ClockConfig::default(), time.clone(), gate.clone());
        let choreo = Choreographer::new(&clock, cfg);
        Self {
            clock,
            time,
            gate,
            choreo,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Deliver one frame at `t` seconds after the loop started.
    pub fn tick_at(&self, t: f64) -> Tick {
        self.time.set(t);
        self.clock
            .frame()
            .expect("frame dispatch")
            .expect("clock should be running")
    }

    /// Entries logged since the last call.
    pub fn take_log(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn step(&self, id: &str, start: f64, duration: f64) -> Step {
        Step::new(id, start, duration).with_hooks(logging_hooks(&self.log, id))
    }
}

/// Hooks that append `id.start`, `id.update(0.50)` and `id.complete` to `log`.
pub fn logging_hooks(log: &CallLog, id: &str) -> StepHooks {
    let (start_log, update_log, complete_log) = (log.clone(), log.clone(), log.clone());
    let (start_id, update_id, complete_id) = (id.to_string(), id.to_string(), id.to_string());
    StepHooks::new()
        .on_start(move || {
            start_log.borrow_mut().push(format!("{start_id}.start"));
            Ok(())
        })
        .on_update(move |p| {
            update_log
                .borrow_mut()
                .push(format!("{update_id}.update({p:.2})"));
            Ok(())
        })
        .on_complete(move || {
            complete_log
                .borrow_mut()
                .push(format!("{complete_id}.complete"));
            Ok(())
        })
}

pub fn strs(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}
