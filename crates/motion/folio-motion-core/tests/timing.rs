use std::cell::RefCell;
use std::rc::Rc;

use folio_motion_core::{Debounced, ManualTimers, Throttled};

fn recorder() -> (Rc<RefCell<Vec<(f64, u32)>>>, ManualTimers) {
    (Rc::new(RefCell::new(Vec::new())), ManualTimers::new())
}

#[test]
fn debounce_collapses_a_burst_into_one_trailing_call() {
    let (calls, timers) = recorder();
    let debounced = {
        let calls = Rc::clone(&calls);
        let clock = timers.clone();
        Debounced::new(timers.clone(), 250.0, move |arg: u32| {
            calls.borrow_mut().push((clock.now(), arg))
        })
    };

    // five calls within 100ms
    for arg in 1..=5 {
        debounced.call(arg);
        timers.advance(20.0);
    }
    assert!(calls.borrow().is_empty());
    assert!(debounced.is_pending());

    timers.advance(1000.0);
    // last call at t=80, so the callback lands at t=330
    assert_eq!(*calls.borrow(), vec![(330.0, 5)]);
    assert!(!debounced.is_pending());
}

#[test]
fn debounce_fires_again_after_quiet_period() {
    let (calls, timers) = recorder();
    let calls_in = Rc::clone(&calls);
    let debounced = Debounced::new(timers.clone(), 100.0, move |arg: u32| {
        calls_in.borrow_mut().push((0.0, arg))
    });

    debounced.call(1);
    timers.advance(150.0);
    debounced.call(2);
    timers.advance(99.0);
    assert_eq!(calls.borrow().len(), 1);
    timers.advance(1.0);
    assert_eq!(*calls.borrow(), vec![(0.0, 1), (0.0, 2)]);
}

#[test]
fn debounce_cancel_drops_pending_call() {
    let (calls, timers) = recorder();
    let calls_in = Rc::clone(&calls);
    let debounced = Debounced::new(timers.clone(), 50.0, move |arg: u32| {
        calls_in.borrow_mut().push((0.0, arg))
    });
    debounced.call(7);
    debounced.cancel();
    timers.advance(500.0);
    assert!(calls.borrow().is_empty());
    assert_eq!(debounced.delay_ms(), 50.0);
}

#[test]
fn throttle_runs_first_call_and_drops_the_rest() {
    let (calls, timers) = recorder();
    let throttled = {
        let calls = Rc::clone(&calls);
        let clock = timers.clone();
        Throttled::new(timers.clone(), 1000.0, move |arg: u32| {
            calls.borrow_mut().push((clock.now(), arg))
        })
    };

    // three calls within 200ms
    assert!(throttled.call(1));
    timers.advance(100.0);
    assert!(!throttled.call(2));
    timers.advance(100.0);
    assert!(!throttled.call(3));
    assert_eq!(*calls.borrow(), vec![(0.0, 1)]);

    // dropped calls are never replayed
    timers.advance(2000.0);
    assert_eq!(calls.borrow().len(), 1);
    assert!(throttled.is_open());

    assert!(throttled.call(4));
    assert_eq!(calls.borrow().last(), Some(&(2200.0, 4)));
    assert!(!throttled.is_open());
}

#[test]
fn throttle_reopens_exactly_at_limit() {
    let (calls, timers) = recorder();
    let calls_in = Rc::clone(&calls);
    let throttled = Throttled::new(timers.clone(), 300.0, move |arg: u32| {
        calls_in.borrow_mut().push((0.0, arg))
    });
    assert!(throttled.call(1));
    timers.advance(299.0);
    assert!(!throttled.call(2));
    timers.advance(1.0);
    assert!(throttled.call(3));
    assert_eq!(calls.borrow().len(), 2);
}

#[test]
fn wrappers_reentering_themselves_do_not_panic() {
    let timers = ManualTimers::new();
    let slot: Rc<RefCell<Option<Debounced<u32, ManualTimers>>>> = Rc::new(RefCell::new(None));
    let hits = Rc::new(RefCell::new(Vec::new()));
    let debounced = {
        let hits = Rc::clone(&hits);
        let weak = Rc::downgrade(&slot);
        Debounced::new(timers.clone(), 10.0, move |n: u32| {
            hits.borrow_mut().push(n);
            if n < 3 {
                if let Some(slot) = weak.upgrade() {
                    if let Some(d) = slot.borrow().as_ref() {
                        d.call(n + 1);
                    }
                }
            }
        })
    };
    *slot.borrow_mut() = Some(debounced);
    if let Some(d) = slot.borrow().as_ref() {
        d.call(1);
    }
    timers.advance(100.0);
    assert_eq!(*hits.borrow(), vec![1, 2, 3]);
}
