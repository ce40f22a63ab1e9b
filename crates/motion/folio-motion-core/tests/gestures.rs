use std::cell::RefCell;
use std::rc::Rc;

use folio_motion_core::{
    GestureEvent, GestureKind, Point, PointerInput, PointerSample, PointerSource, TouchConfig,
    TouchHandler,
};

fn touch(phase: &str, x: f64, y: f64, t: f64) -> PointerInput {
    input(PointerSource::Touch, phase, x, y, t)
}

fn mouse(phase: &str, x: f64, y: f64, t: f64) -> PointerInput {
    input(PointerSource::Mouse, phase, x, y, t)
}

fn input(source: PointerSource, phase: &str, x: f64, y: f64, t: f64) -> PointerInput {
    let sample = PointerSample::new(x, y, t);
    match phase {
        "press" => PointerInput::Press { source, sample },
        "move" => PointerInput::Move { source, sample },
        "release" => PointerInput::Release {
            source,
            timestamp: t,
        },
        "cancel" => PointerInput::Cancel {
            source,
            timestamp: t,
        },
        other => panic!("unknown phase {other}"),
    }
}

/// Handler that records every event kind it emits, in order.
fn recording_handler(config: TouchConfig) -> (TouchHandler, Rc<RefCell<Vec<GestureEvent>>>) {
    let mut handler: TouchHandler = TouchHandler::new(config);
    let seen = Rc::new(RefCell::new(Vec::new()));
    for kind in GestureKind::ALL {
        let seen = Rc::clone(&seen);
        handler.on_event(kind, move |ev| seen.borrow_mut().push(*ev));
    }
    (handler, seen)
}

fn kinds(events: &[GestureEvent]) -> Vec<GestureKind> {
    events.iter().map(GestureEvent::kind).collect()
}

#[test]
fn small_movement_is_a_single_tap_at_start_point() {
    let (mut handler, seen) = recording_handler(TouchConfig::default());
    handler.handle(touch("press", 100.0, 50.0, 0.0));
    handler.handle(touch("move", 104.0, 53.0, 40.0));
    handler.handle(touch("move", 97.0, 48.0, 80.0));
    handler.handle(touch("release", 0.0, 0.0, 120.0));

    let seen = seen.borrow();
    assert_eq!(
        kinds(&seen),
        vec![GestureKind::Start, GestureKind::Tap, GestureKind::End]
    );
    assert_eq!(
        seen[1],
        GestureEvent::Tap {
            position: Point::new(100.0, 50.0)
        }
    );
}

#[test]
fn long_drag_emits_moves_then_one_swipe() {
    let (mut handler, seen) = recording_handler(TouchConfig::default());
    handler.handle(touch("press", 0.0, 0.0, 0.0));
    for i in 1..=5 {
        let t = f64::from(i) * 20.0;
        handler.handle(touch("move", f64::from(i) * 30.0, 0.0, t));
    }
    handler.handle(touch("release", 0.0, 0.0, 120.0));

    let seen = seen.borrow();
    let moves = seen
        .iter()
        .filter(|e| e.kind() == GestureKind::Move)
        .count();
    let swipes: Vec<_> = seen
        .iter()
        .filter(|e| e.kind() == GestureKind::Swipe)
        .collect();
    assert_eq!(moves, 5);
    assert_eq!(swipes.len(), 1);
    assert!(!seen.iter().any(|e| e.kind() == GestureKind::Tap));
    assert_eq!(seen.last(), Some(&GestureEvent::End));

    match swipes[0] {
        GestureEvent::Swipe { position, velocity } => {
            assert_eq!(*position, Point::new(150.0, 0.0));
            // 150px over 100ms
            assert_eq!(velocity.x, 1.5);
            assert_eq!(velocity.y, 0.0);
        }
        other => panic!("expected swipe, got {other:?}"),
    }
}

#[test]
fn swipe_velocity_is_clamped_per_axis() {
    let config = TouchConfig {
        max_velocity: 2.0,
        ..Default::default()
    };
    let (mut handler, seen) = recording_handler(config);
    handler.handle(touch("press", 0.0, 0.0, 0.0));
    handler.handle(touch("move", -500.0, 300.0, 10.0));
    handler.handle(touch("release", 0.0, 0.0, 12.0));

    let velocity = seen
        .borrow()
        .iter()
        .find_map(|e| match e {
            GestureEvent::Swipe { velocity, .. } => Some(*velocity),
            _ => None,
        })
        .expect("swipe");
    assert_eq!(velocity, Point::new(-2.0, 2.0));
}

#[test]
fn move_reports_offset_from_start() {
    let (mut handler, seen) = recording_handler(TouchConfig::default());
    handler.handle(touch("press", 10.0, 10.0, 0.0));
    handler.handle(touch("move", 40.0, 50.0, 16.0));

    let seen = seen.borrow();
    assert_eq!(
        seen[1],
        GestureEvent::Move {
            position: Point::new(40.0, 50.0),
            delta: Point::new(30.0, 40.0),
            distance: 50.0,
        }
    );
    assert!(handler.recognizer().is_dragging());
}

#[test]
fn listeners_run_in_registration_order() {
    let mut handler: TouchHandler = TouchHandler::new(TouchConfig::default());
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        let order = Rc::clone(&order);
        handler
            .on_named("tap", Rc::new(move |_: &GestureEvent| order.borrow_mut().push(tag)))
            .unwrap();
    }
    handler.handle(touch("press", 0.0, 0.0, 0.0));
    handler.handle(touch("release", 0.0, 0.0, 10.0));
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn unknown_event_name_is_rejected() {
    let mut handler: TouchHandler = TouchHandler::new(TouchConfig::default());
    let err = handler
        .on_named("pinch", Rc::new(|_: &GestureEvent| {}))
        .unwrap_err();
    assert!(err.to_string().contains("pinch"), "{err}");
    assert!(handler.listeners().is_empty());
}

#[test]
fn cancel_ends_without_classifying() {
    let (mut handler, seen) = recording_handler(TouchConfig::default());
    handler.handle(touch("press", 0.0, 0.0, 0.0));
    handler.handle(touch("move", 80.0, 0.0, 30.0));
    handler.handle(touch("cancel", 0.0, 0.0, 40.0));
    assert_eq!(
        kinds(&seen.borrow()),
        vec![GestureKind::Start, GestureKind::Move, GestureKind::End]
    );
    assert!(handler.recognizer().state().is_none());
}

#[test]
fn mouse_moves_count_only_while_pressed() {
    let (mut handler, seen) = recording_handler(TouchConfig::default());
    handler.handle(mouse("move", 300.0, 300.0, 0.0));
    handler.handle(mouse("release", 0.0, 0.0, 5.0));
    assert!(seen.borrow().is_empty());

    handler.handle(mouse("press", 0.0, 0.0, 10.0));
    handler.handle(mouse("move", 50.0, 0.0, 30.0));
    handler.handle(mouse("release", 0.0, 0.0, 40.0));
    handler.handle(mouse("move", 200.0, 0.0, 50.0));
    assert_eq!(
        kinds(&seen.borrow()),
        vec![
            GestureKind::Start,
            GestureKind::Move,
            GestureKind::Swipe,
            GestureKind::End
        ]
    );
}

#[test]
fn emulated_mouse_after_touch_is_ignored() {
    let (mut handler, seen) = recording_handler(TouchConfig::default());
    handler.handle(touch("press", 5.0, 5.0, 0.0));
    handler.handle(touch("release", 0.0, 0.0, 50.0));
    // compatibility mouse events follow the touch
    handler.handle(mouse("press", 5.0, 5.0, 60.0));
    handler.handle(mouse("release", 0.0, 0.0, 61.0));
    assert_eq!(
        kinds(&seen.borrow()),
        vec![GestureKind::Start, GestureKind::Tap, GestureKind::End]
    );

    // a real click well after the touch goes through
    handler.handle(mouse("press", 5.0, 5.0, 2000.0));
    handler.handle(mouse("release", 0.0, 0.0, 2010.0));
    assert_eq!(seen.borrow().len(), 6);
}

#[test]
fn other_source_is_ignored_during_active_gesture() {
    let (mut handler, seen) = recording_handler(TouchConfig::default());
    handler.handle(touch("press", 0.0, 0.0, 0.0));
    handler.handle(mouse("press", 100.0, 100.0, 5.0));
    handler.handle(mouse("move", 200.0, 100.0, 6.0));
    handler.handle(mouse("release", 0.0, 0.0, 7.0));
    handler.handle(touch("release", 0.0, 0.0, 20.0));
    assert_eq!(
        kinds(&seen.borrow()),
        vec![GestureKind::Start, GestureKind::Tap, GestureKind::End]
    );
}

#[test]
fn destroy_silences_handler() {
    let (mut handler, seen) = recording_handler(TouchConfig::default());
    handler.handle(touch("press", 0.0, 0.0, 0.0));
    handler.destroy();
    handler.handle(touch("release", 0.0, 0.0, 10.0));
    handler.handle(touch("press", 0.0, 0.0, 20.0));
    assert_eq!(kinds(&seen.borrow()), vec![GestureKind::Start]);
    assert!(handler.is_destroyed());
    assert!(handler.listeners().is_empty());

    handler.on_event(GestureKind::Tap, |_| panic!("destroyed handler dispatched"));
    handler.handle(touch("release", 0.0, 0.0, 30.0));
}

#[test]
fn route_pairs_events_with_listener_snapshots() {
    let mut handler: TouchHandler<&'static str> = TouchHandler::new(TouchConfig::default());
    handler.on(GestureKind::Tap, "tap-a");
    handler.on(GestureKind::End, "end-a");
    handler.on(GestureKind::Tap, "tap-b");

    assert_eq!(
        handler.route(touch("press", 1.0, 1.0, 0.0)),
        vec![(
            GestureEvent::Start {
                position: Point::new(1.0, 1.0),
                timestamp: 0.0
            },
            vec![]
        )]
    );
    let routed = handler.route(touch("release", 0.0, 0.0, 10.0));
    assert_eq!(routed.len(), 2);
    assert_eq!(routed[0].1, vec!["tap-a", "tap-b"]);
    assert_eq!(routed[1], (GestureEvent::End, vec!["end-a"]));
}
