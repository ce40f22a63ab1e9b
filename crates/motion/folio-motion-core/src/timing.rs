//! Timer seam plus the debounce and throttle wrappers built on it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::ids::TimerHandle;

/// Host timer facility (`setTimeout` / `clearTimeout` in the browser).
pub trait TimerHost {
    fn set_timeout(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle;
    fn clear_timeout(&self, handle: TimerHandle);
}

struct DebounceState<A, T: TimerHost> {
    timers: T,
    delay_ms: f64,
    callback: Box<dyn Fn(A)>,
    pending: Cell<Option<TimerHandle>>,
}

/// Calls the wrapped function once, with the latest argument, after
/// `delay_ms` without further calls. Dropping it cancels a pending call.
pub struct Debounced<A: 'static, T: TimerHost + 'static> {
    state: Rc<DebounceState<A, T>>,
}

impl<A: 'static, T: TimerHost + 'static> Debounced<A, T> {
    pub fn new(timers: T, delay_ms: f64, callback: impl Fn(A) + 'static) -> Self {
        Self {
            state: Rc::new(DebounceState {
                timers,
                delay_ms,
                callback: Box::new(callback),
                pending: Cell::new(None),
            }),
        }
    }

    pub fn call(&self, arg: A) {
        self.cancel();
        let weak: Weak<DebounceState<A, T>> = Rc::downgrade(&self.state);
        let handle = self.state.timers.set_timeout(
            self.state.delay_ms,
            Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.pending.set(None);
                    (state.callback)(arg);
                }
            }),
        );
        self.state.pending.set(Some(handle));
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.state.pending.take() {
            self.state.timers.clear_timeout(handle);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }

    pub fn delay_ms(&self) -> f64 {
        self.state.delay_ms
    }
}

impl<A: 'static, T: TimerHost + 'static> Drop for Debounced<A, T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<A: 'static, T: TimerHost + 'static> fmt::Debug for Debounced<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("delay_ms", &self.state.delay_ms)
            .field("pending", &self.is_pending())
            .finish()
    }
}

struct ThrottleState<A, T: TimerHost> {
    timers: T,
    limit_ms: f64,
    callback: Box<dyn Fn(A)>,
    closed: Cell<bool>,
    reopen: Cell<Option<TimerHandle>>,
}

/// Calls the wrapped function immediately, then drops every call for
/// `limit_ms`. Dropped calls are not queued.
pub struct Throttled<A: 'static, T: TimerHost + 'static> {
    state: Rc<ThrottleState<A, T>>,
}

impl<A: 'static, T: TimerHost + 'static> Throttled<A, T> {
    pub fn new(timers: T, limit_ms: f64, callback: impl Fn(A) + 'static) -> Self {
        Self {
            state: Rc::new(ThrottleState {
                timers,
                limit_ms,
                callback: Box::new(callback),
                closed: Cell::new(false),
                reopen: Cell::new(None),
            }),
        }
    }

    /// Returns whether the call went through.
    pub fn call(&self, arg: A) -> bool {
        let state = &self.state;
        if state.closed.get() {
            return false;
        }
        state.closed.set(true);
        let weak = Rc::downgrade(state);
        let handle = state.timers.set_timeout(
            state.limit_ms,
            Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.reopen.set(None);
                    state.closed.set(false);
                }
            }),
        );
        state.reopen.set(Some(handle));
        (state.callback)(arg);
        true
    }

    pub fn is_open(&self) -> bool {
        !self.state.closed.get()
    }
}

impl<A: 'static, T: TimerHost + 'static> Drop for Throttled<A, T> {
    fn drop(&mut self) {
        if let Some(handle) = self.state.reopen.take() {
            self.state.timers.clear_timeout(handle);
        }
    }
}

impl<A: 'static, T: TimerHost + 'static> fmt::Debug for Throttled<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttled")
            .field("limit_ms", &self.state.limit_ms)
            .field("open", &self.is_open())
            .finish()
    }
}

struct PendingTimer {
    handle: TimerHandle,
    due: f64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualTimersState {
    now: f64,
    next: i32,
    queue: Vec<PendingTimer>,
}

/// Timer host driven by explicit [`ManualTimers::advance`] calls.
///
/// Clones share the same clock and queue.
#[derive(Clone, Default)]
pub struct ManualTimers {
    state: Rc<RefCell<ManualTimersState>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Move the clock forward by `ms`, firing due timers in due order. Timers
    /// scheduled by a firing callback fire too if they fall inside the window.
    pub fn advance(&self, ms: f64) {
        let target = self.state.borrow().now + ms;
        loop {
            let next = {
                let mut st = self.state.borrow_mut();
                let idx = st
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by(|(_, a), (_, b)| {
                        a.due
                            .total_cmp(&b.due)
                            .then(a.handle.0.cmp(&b.handle.0))
                    })
                    .map(|(i, _)| i);
                idx.map(|i| {
                    let timer = st.queue.remove(i);
                    st.now = st.now.max(timer.due);
                    timer
                })
            };
            match next {
                Some(timer) => (timer.callback)(),
                None => break,
            }
        }
        self.state.borrow_mut().now = target;
    }
}

impl TimerHost for ManualTimers {
    fn set_timeout(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let mut st = self.state.borrow_mut();
        st.next += 1;
        let handle = TimerHandle(st.next);
        let due = st.now + delay_ms.max(0.0);
        st.queue.push(PendingTimer {
            handle,
            due,
            callback,
        });
        handle
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.state.borrow_mut().queue.retain(|t| t.handle != handle);
    }
}

impl fmt::Debug for ManualTimers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.state.borrow();
        f.debug_struct("ManualTimers")
            .field("now", &st.now)
            .field("pending", &st.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timers_fire_in_due_order() {
        let timers = ManualTimers::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(30.0, "c"), (10.0, "a"), (20.0, "b")] {
            let log = Rc::clone(&log);
            timers.set_timeout(delay, Box::new(move || log.borrow_mut().push(tag)));
        }
        timers.advance(25.0);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        timers.advance(5.0);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(timers.now(), 30.0);
    }

    #[test]
    fn cleared_timer_never_fires() {
        let timers = ManualTimers::new();
        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        let h = timers.set_timeout(5.0, Box::new(move || f.set(true)));
        timers.clear_timeout(h);
        timers.advance(10.0);
        assert!(!fired.get());
    }

    #[test]
    fn dropping_debounce_cancels_pending_call() {
        let timers = ManualTimers::new();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let debounced = Debounced::new(timers.clone(), 50.0, move |_: ()| c.set(c.get() + 1));
        debounced.call(());
        assert!(debounced.is_pending());
        drop(debounced);
        timers.advance(100.0);
        assert_eq!(count.get(), 0);
        assert_eq!(timers.pending(), 0);
    }
}
