mod common;

use cadence_choreography::{Choreography, ChoreographyEvent};
use common::{strs, Harness};

#[test]
fn intro_runs_fade_then_hold_and_is_removed() {
    let h = Harness::new();
    h.choreo
        .start(
            Choreography::new("intro")
                .step(h.step("fadeIn", 0.0, 0.5))
                .step(h.step("hold", 0.5, 1.0)),
        )
        .unwrap();

    h.tick_at(0.0);
    assert_eq!(h.take_log(), strs(&["fadeIn.start", "fadeIn.update(0.00)"]));

    h.tick_at(0.25);
    assert_eq!(h.take_log(), strs(&["fadeIn.update(0.50)"]));

    h.tick_at(0.5);
    assert_eq!(
        h.take_log(),
        strs(&["fadeIn.complete", "hold.start", "hold.update(0.00)"])
    );

    h.tick_at(0.75);
    assert_eq!(h.take_log(), strs(&["hold.update(0.25)"]));

    h.tick_at(1.5);
    assert_eq!(h.take_log(), strs(&["hold.complete"]));
    assert!(h.choreo.active_choreographies().is_empty());

    h.tick_at(1.6);
    assert!(h.take_log().is_empty());
    assert!(!h.choreo.is_active("intro"));
}

#[test]
fn intro_event_trail() {
    let h = Harness::new();
    h.choreo
        .start(
            Choreography::new("intro")
                .step(h.step("fadeIn", 0.0, 0.5))
                .step(h.step("hold", 0.5, 1.0)),
        )
        .unwrap();
    for t in [0.0, 0.25, 0.5, 0.75, 1.5, 1.6] {
        h.tick_at(t);
    }

    let events = h.choreo.drain_events();
    let kinds: Vec<String> = events
        .iter()
        .map(|ev| {
            let json = serde_json::to_value(ev).unwrap();
            match json.get("step").and_then(|s| s.as_str()) {
                Some(step) => format!("{}:{step}", json["kind"].as_str().unwrap()),
                None => json["kind"].as_str().unwrap().to_string(),
            }
        })
        .collect();
    assert_eq!(
        kinds,
        strs(&[
            "started",
            "stepStarted:fadeIn",
            "stepCompleted:fadeIn",
            "stepStarted:hold",
            "stepCompleted:hold",
            "finished",
        ])
    );
    assert_eq!(
        events.last(),
        Some(&ChoreographyEvent::Finished {
            choreography: "intro".into(),
            time: 1.5,
        })
    );
}

#[test]
fn dropping_the_choreographer_releases_the_frame_source() {
    let h = Harness::new();
    assert!(h.gate.is_open());
    let Harness { clock, gate, choreo, .. } = h;
    drop(choreo);
    assert_eq!(clock.subscriber_count(), 0);
    assert!(!gate.is_open());
}
