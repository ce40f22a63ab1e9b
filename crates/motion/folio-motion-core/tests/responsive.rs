use std::cell::RefCell;
use std::rc::Rc;

use folio_motion_core::{
    Breakpoint, ManualTimers, ManualViewport, ResponsiveConfig, ResponsiveEvent, ResponsiveHandler,
};

struct Harness {
    viewport: Rc<ManualViewport>,
    timers: ManualTimers,
    handler: ResponsiveHandler<ManualTimers>,
    changes: Rc<RefCell<Vec<Breakpoint>>>,
}

fn harness(width: f64) -> Harness {
    let viewport = Rc::new(ManualViewport::new(width));
    let timers = ManualTimers::new();
    let handler = ResponsiveHandler::new(
        &ResponsiveConfig::default(),
        viewport.clone(),
        timers.clone(),
    );
    let changes = Rc::new(RefCell::new(Vec::new()));
    let c = Rc::clone(&changes);
    handler.on_change(move |bp| c.borrow_mut().push(bp));
    Harness {
        viewport,
        timers,
        handler,
        changes,
    }
}

impl Harness {
    fn resize(&self, width: f64) {
        self.viewport.set_width(width);
        self.handler.resized();
    }
}

#[test]
fn initial_breakpoint_comes_from_construction_width() {
    assert_eq!(harness(1280.0).handler.current(), Breakpoint::Desktop);
    assert_eq!(harness(800.0).handler.current(), Breakpoint::Tablet);
    assert_eq!(harness(500.0).handler.current(), Breakpoint::Mobile);
    assert_eq!(harness(320.0).handler.current(), Breakpoint::Small);
}

#[test]
fn resize_within_a_range_does_not_notify() {
    let h = harness(1200.0);
    for width in [1100.0, 1500.0, 1024.0] {
        h.resize(width);
        h.timers.advance(300.0);
    }
    assert!(h.changes.borrow().is_empty());
    assert_eq!(h.handler.current(), Breakpoint::Desktop);
}

#[test]
fn crossing_waits_for_the_debounce_window() {
    let h = harness(1200.0);
    h.resize(700.0);
    assert!(h.handler.is_settling());
    h.timers.advance(249.0);
    assert!(h.changes.borrow().is_empty());
    assert_eq!(h.handler.current(), Breakpoint::Desktop);

    h.timers.advance(1.0);
    assert_eq!(*h.changes.borrow(), vec![Breakpoint::Tablet]);
    assert_eq!(h.handler.current(), Breakpoint::Tablet);
    assert!(!h.handler.is_settling());
}

#[test]
fn burst_of_resizes_reports_only_the_settled_width() {
    let h = harness(1200.0);
    // drag through tablet and mobile, settle on small
    for width in [900.0, 700.0, 500.0, 300.0] {
        h.resize(width);
        h.timers.advance(50.0);
    }
    h.timers.advance(500.0);
    assert_eq!(*h.changes.borrow(), vec![Breakpoint::Small]);
}

#[test]
fn round_trip_that_ends_where_it_started_is_silent() {
    let h = harness(1200.0);
    h.resize(600.0);
    h.timers.advance(100.0);
    h.resize(1300.0);
    h.timers.advance(500.0);
    assert!(h.changes.borrow().is_empty());
}

#[test]
fn listeners_may_register_more_listeners() {
    let h = harness(1200.0);
    let late = Rc::new(RefCell::new(Vec::new()));
    let handler = Rc::new(h.handler);
    {
        let weak = Rc::downgrade(&handler);
        let late = Rc::clone(&late);
        handler.on(
            ResponsiveEvent::Change,
            Rc::new(move |_: Breakpoint| {
                if let Some(handler) = weak.upgrade() {
                    let late = Rc::clone(&late);
                    handler.on_change(move |bp| late.borrow_mut().push(bp));
                }
            }),
        );
    }
    h.viewport.set_width(700.0);
    handler.resized();
    h.timers.advance(300.0);
    assert!(late.borrow().is_empty());

    h.viewport.set_width(300.0);
    handler.resized();
    h.timers.advance(300.0);
    assert_eq!(*late.borrow(), vec![Breakpoint::Small]);
    assert_eq!(
        *h.changes.borrow(),
        vec![Breakpoint::Tablet, Breakpoint::Small]
    );
}

#[test]
fn destroy_cancels_pending_work_and_listeners() {
    let h = harness(1200.0);
    h.resize(400.0);
    h.handler.destroy();
    assert!(!h.handler.is_settling());
    h.timers.advance(1000.0);
    assert!(h.changes.borrow().is_empty());
    assert_eq!(h.timers.pending(), 0);

    h.resize(800.0);
    h.timers.advance(1000.0);
    assert!(h.changes.borrow().is_empty());
}
