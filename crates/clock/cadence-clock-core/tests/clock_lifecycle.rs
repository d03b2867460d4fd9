use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use cadence_clock::{
    Clock, ClockConfig, ClockError, FrameGate, ManualTimeSource, SubscriptionId, Tick,
};

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "cadence_clock=debug".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn mk_clock() -> (Clock, ManualTimeSource, FrameGate) {
    init_tracing();
    let time = ManualTimeSource::new(0.0);
    let gate = FrameGate::new();
    let clock = Clock::new(ClockConfig::default(), time.clone(), gate.clone());
    (clock, time, gate)
}

fn recorder(clock: &Clock) -> (SubscriptionId, Rc<RefCell<Vec<Tick>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = clock.subscribe(move |tick| {
        sink.borrow_mut().push(*tick);
        Ok(())
    });
    (id, seen)
}

#[test]
fn one_frame_reaches_every_subscriber_once_with_the_same_time() {
    let (clock, time, _gate) = mk_clock();
    let recorders: Vec<_> = (0..5).map(|_| recorder(&clock)).collect();

    time.set(0.016);
    clock.frame().unwrap();

    for (_, seen) in &recorders {
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_abs_diff_eq!(seen[0].time, 0.016, epsilon = 1e-12);
        assert!(!seen[0].is_paused);
    }
}

#[test]
fn first_tick_after_cold_start_has_zero_delta() {
    let (clock, time, _gate) = mk_clock();
    time.set(3.0);
    let (_, seen) = recorder(&clock);

    time.set(3.5);
    clock.frame().unwrap();
    time.set(3.6);
    clock.frame().unwrap();

    let seen = seen.borrow();
    assert_eq!(seen[0].delta_time, 0.0);
    assert_abs_diff_eq!(seen[1].delta_time, 0.1, epsilon = 1e-9);
    assert_eq!(seen[1].frame, seen[0].frame + 1);
}

#[test]
fn restart_after_gap_starts_with_zero_delta_again() {
    let (clock, time, _gate) = mk_clock();
    let (first, _) = recorder(&clock);
    clock.frame().unwrap();
    clock.unsubscribe(first);

    time.set(60.0);
    let (_, seen) = recorder(&clock);
    time.set(60.25);
    clock.frame().unwrap();

    let seen = seen.borrow();
    assert_eq!(seen[0].delta_time, 0.0);
    assert_abs_diff_eq!(seen[0].time, 0.25, epsilon = 1e-9);
}

#[test]
fn frame_source_is_requested_and_cancelled_once_per_busy_period() {
    let (clock, _time, gate) = mk_clock();

    let a = clock.subscribe(|_| Ok(()));
    let b = clock.subscribe(|_| Ok(()));
    let c = clock.subscribe(|_| Ok(()));
    assert_eq!(gate.requests(), 1);
    assert!(gate.is_open());

    clock.unsubscribe(b);
    clock.unsubscribe(a);
    assert_eq!(gate.cancellations(), 0);
    clock.unsubscribe(c);
    assert_eq!(gate.cancellations(), 1);
    assert!(!gate.is_open());
    assert!(!clock.is_running());

    // Second busy period.
    let d = clock.subscribe(|_| Ok(()));
    assert_eq!(gate.requests(), 2);
    clock.unsubscribe(d);
    assert_eq!(gate.cancellations(), 2);
}

#[test]
fn unsubscribe_twice_is_a_no_op() {
    let (clock, _time, gate) = mk_clock();
    let id = clock.subscribe(|_| Ok(()));
    assert!(clock.unsubscribe(id));
    assert!(!clock.unsubscribe(id));
    assert_eq!(gate.cancellations(), 1);
}

#[test]
fn scoped_subscription_ends_on_drop() {
    let (clock, _time, gate) = mk_clock();
    {
        let guard = clock.subscribe_scoped(|_| Ok(()));
        assert!(guard.id().is_some());
        assert_eq!(clock.subscriber_count(), 1);
    }
    assert_eq!(clock.subscriber_count(), 0);
    assert_eq!(gate.cancellations(), 1);

    let guard = clock.subscribe_scoped(|_| Ok(()));
    guard.cancel();
    assert_eq!(gate.cancellations(), 2);
}

#[test]
fn subscriber_removed_mid_frame_is_skipped_for_that_frame() {
    let (clock, _time, _gate) = mk_clock();
    let victim: Rc<RefCell<Option<SubscriptionId>>> = Rc::new(RefCell::new(None));

    let killer_clock = clock.clone();
    let target = victim.clone();
    clock.subscribe(move |_| {
        if let Some(id) = target.borrow_mut().take() {
            killer_clock.unsubscribe(id);
        }
        Ok(())
    });
    let (id, seen) = recorder(&clock);
    *victim.borrow_mut() = Some(id);

    clock.frame().unwrap();
    assert!(seen.borrow().is_empty());
}

#[test]
fn subscriber_added_mid_frame_starts_on_next_frame() {
    let (clock, _time, _gate) = mk_clock();
    let late: Rc<RefCell<Vec<Tick>>> = Rc::new(RefCell::new(Vec::new()));
    let added = Rc::new(RefCell::new(false));

    let adder_clock = clock.clone();
    let sink = late.clone();
    let once = added.clone();
    clock.subscribe(move |_| {
        if !*once.borrow() {
            *once.borrow_mut() = true;
            let sink = sink.clone();
            adder_clock.subscribe(move |tick| {
                sink.borrow_mut().push(*tick);
                Ok(())
            });
        }
        Ok(())
    });

    clock.frame().unwrap();
    assert!(late.borrow().is_empty());
    clock.frame().unwrap();
    assert_eq!(late.borrow().len(), 1);
}

#[test]
fn subscriber_error_aborts_the_frame_and_propagates() {
    let (clock, _time, _gate) = mk_clock();
    let failing = clock.subscribe(|_| Err(anyhow::anyhow!("render target lost")));
    let (_, seen) = recorder(&clock);

    let err = clock.frame().unwrap_err();
    match &err {
        ClockError::Subscriber {
            subscription,
            source,
            ..
        } => {
            assert_eq!(*subscription, failing.0);
            assert_eq!(source.to_string(), "render target lost");
        }
        other => panic!("unexpected error {other:?}"),
    }
    // No isolation: later subscribers did not run.
    assert!(seen.borrow().is_empty());

    // The clock keeps working once the failing subscriber is gone.
    clock.unsubscribe(failing);
    clock.frame().unwrap();
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn current_time_is_readable_inside_and_outside_ticks() {
    let (clock, time, _gate) = mk_clock();
    let observed = Rc::new(RefCell::new(None));
    let reader = clock.clone();
    let slot = observed.clone();
    clock.subscribe(move |_| {
        *slot.borrow_mut() = Some(reader.current_time());
        Ok(())
    });
    assert_eq!(clock.current_time(), 0.0);
    time.set(1.25);
    clock.frame().unwrap();
    assert_eq!(*observed.borrow(), Some(1.25));
    assert_eq!(clock.current_time(), 1.25);
}
