//! The shared frame clock.
//!
//! Methods:
//! - subscribe / subscribe_scoped / unsubscribe (reference-counts the frame source)
//! - frame (host entry point: build one Tick and fan it out)
//! - current_time

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::config::ClockConfig;
use crate::error::ClockError;
use crate::ids::{IdAllocator, SubscriptionId};
use crate::source::{FrameSource, TimeSource};
use crate::tick::Tick;

type SubscriberFn = dyn FnMut(&Tick) -> anyhow::Result<()>;
type SubscriberSlot = Rc<RefCell<Box<SubscriberFn>>>;

struct ClockInner {
    cfg: ClockConfig,
    time_source: Box<dyn TimeSource>,
    frame_source: Box<dyn FrameSource>,
    ids: IdAllocator,
    subscribers: IndexMap<SubscriptionId, SubscriberSlot>,
    running: bool,
    origin: f64,
    last_time: Option<f64>,
    current: Tick,
    next_frame: u64,
    dispatching: bool,
}

impl ClockInner {
    fn start_loop(&mut self) {
        self.origin = self.time_source.now_seconds();
        self.last_time = None;
        // New time base: readers between now and the first frame see zero.
        self.current.time = 0.0;
        self.current.delta_time = 0.0;
        self.running = true;
        self.frame_source.request_frames();
        debug!(origin = self.origin, "frame source requested");
    }

    fn stop_loop(&mut self) {
        self.running = false;
        self.last_time = None;
        self.frame_source.cancel_frames();
        debug!(time = self.current.time, "frame source cancelled");
    }
}

impl Drop for ClockInner {
    fn drop(&mut self) {
        if self.running {
            self.stop_loop();
        }
    }
}

/// Handle to a frame clock. Clones share the same clock.
///
/// All methods take `&self` and may be called from inside a subscriber
/// callback, except [`Clock::frame`] which rejects re-entry.
#[derive(Clone)]
pub struct Clock {
    inner: Rc<RefCell<ClockInner>>,
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Clock")
            .field("running", &inner.running)
            .field("subscribers", &inner.subscribers.len())
            .field("current", &inner.current)
            .finish_non_exhaustive()
    }
}

/// Resets the dispatching flag even if a subscriber panics.
struct DispatchGuard<'a> {
    inner: &'a RefCell<ClockInner>,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.dispatching = false;
        }
    }
}

impl Clock {
    /// Create an idle clock. Nothing is requested from `frame_source` until
    /// the first subscription.
    pub fn new(
        cfg: ClockConfig,
        time_source: impl TimeSource + 'static,
        frame_source: impl FrameSource + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ClockInner {
                cfg,
                time_source: Box::new(time_source),
                frame_source: Box::new(frame_source),
                ids: IdAllocator::default(),
                subscribers: IndexMap::new(),
                running: false,
                origin: 0.0,
                last_time: None,
                current: Tick::default(),
                next_frame: 0,
                dispatching: false,
            })),
        }
    }

    /// Register `callback` for every subsequent tick.
    ///
    /// The first subscription requests frames from the frame source and starts
    /// a new loop: `Tick::time` restarts near zero and the first tick carries a
    /// zero delta.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Tick) -> anyhow::Result<()> + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.ids.alloc();
        inner
            .subscribers
            .insert(id, Rc::new(RefCell::new(Box::new(callback))));
        if !inner.running {
            inner.start_loop();
        }
        trace!(
            subscription = id.0,
            subscribers = inner.subscribers.len(),
            "subscribed"
        );
        id
    }

    /// Like [`Clock::subscribe`], but the subscription ends when the guard drops.
    pub fn subscribe_scoped<F>(&self, callback: F) -> SubscriptionGuard
    where
        F: FnMut(&Tick) -> anyhow::Result<()> + 'static,
    {
        let id = self.subscribe(callback);
        SubscriptionGuard {
            clock: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Remove a subscription. Returns false if it was already gone.
    ///
    /// Removing the last subscriber cancels the frame source.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let removed = inner.subscribers.shift_remove(&id);
            if removed.is_some() {
                trace!(
                    subscription = id.0,
                    subscribers = inner.subscribers.len(),
                    "unsubscribed"
                );
                if inner.subscribers.is_empty() && inner.running {
                    inner.stop_loop();
                }
            }
            removed
        };
        // The callback may own guards that unsubscribe on drop; drop it unborrowed.
        removed.is_some()
    }

    /// Deliver one frame: sample the time source, build the tick and invoke
    /// every subscriber with it.
    ///
    /// Returns `Ok(None)` when the clock is idle (a frame that arrived after
    /// cancellation). The first subscriber error aborts the frame.
    pub fn frame(&self) -> Result<Option<Tick>, ClockError> {
        let (tick, slots) = {
            let mut inner = self.inner.borrow_mut();
            if inner.dispatching {
                return Err(ClockError::ReentrantFrame {
                    frame: inner.current.frame,
                });
            }
            if !inner.running {
                trace!("frame delivered while idle; ignored");
                return Ok(None);
            }
            let now = inner.time_source.now_seconds();
            let delta_time = match inner.last_time {
                Some(last) => inner.cfg.clamp_delta(now - last),
                None => 0.0,
            };
            inner.last_time = Some(now);
            let tick = Tick {
                time: now - inner.origin,
                delta_time,
                is_paused: false,
                frame: inner.next_frame,
            };
            inner.next_frame = inner.next_frame.wrapping_add(1);
            inner.current = tick;
            inner.dispatching = true;
            let slots: Vec<(SubscriptionId, SubscriberSlot)> = inner
                .subscribers
                .iter()
                .map(|(id, slot)| (*id, Rc::clone(slot)))
                .collect();
            (tick, slots)
        };

        let _guard = DispatchGuard { inner: &self.inner };
        trace!(
            frame = tick.frame,
            time = tick.time,
            dt = tick.delta_time,
            "tick"
        );
        for (id, slot) in slots {
            // Unsubscribed earlier in this frame.
            if !self.inner.borrow().subscribers.contains_key(&id) {
                continue;
            }
            let mut callback = slot.borrow_mut();
            (*callback)(&tick).map_err(|source| ClockError::Subscriber {
                subscription: id.0,
                frame: tick.frame,
                source,
            })?;
        }
        Ok(Some(tick))
    }

    /// Time of the most recent tick, `0.0` before the first tick of the
    /// current loop.
    pub fn current_time(&self) -> f64 {
        self.inner.borrow().current.time
    }

    /// Whether the frame source is currently requested.
    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// Scoped subscription returned by [`Clock::subscribe_scoped`].
#[derive(Debug)]
pub struct SubscriptionGuard {
    clock: Weak<RefCell<ClockInner>>,
    id: Option<SubscriptionId>,
}

impl SubscriptionGuard {
    pub fn id(&self) -> Option<SubscriptionId> {
        self.id
    }

    /// End the subscription now.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let (Some(id), Some(inner)) = (self.id.take(), self.clock.upgrade()) {
            Clock { inner }.unsubscribe(id);
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.release();
    }
}
