//! Debounced viewport breakpoint observer.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ResponsiveConfig;
use crate::error::MotionError;
use crate::listeners::ListenerMap;
use crate::timing::{Debounced, TimerHost};
use crate::utils::{Breakpoint, Breakpoints};

/// Source of the current viewport width.
pub trait Viewport {
    fn width(&self) -> f64;
}

/// Viewport with a settable width, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct ManualViewport {
    width: Cell<f64>,
}

impl ManualViewport {
    pub fn new(width: f64) -> Self {
        Self {
            width: Cell::new(width),
        }
    }

    pub fn set_width(&self, width: f64) {
        self.width.set(width);
    }
}

impl Viewport for ManualViewport {
    fn width(&self) -> f64 {
        self.width.get()
    }
}

/// Stored breakpoint plus the thresholds used to recompute it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreakpointObserver {
    breakpoints: Breakpoints,
    current: Breakpoint,
}

impl BreakpointObserver {
    pub fn new(breakpoints: Breakpoints, width: f64) -> Self {
        Self {
            breakpoints,
            current: breakpoints.classify(width),
        }
    }

    pub fn current(&self) -> Breakpoint {
        self.current
    }

    /// Reclassify `width`; returns the new breakpoint only if it changed.
    pub fn observe(&mut self, width: f64) -> Option<Breakpoint> {
        let next = self.breakpoints.classify(width);
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsiveEvent {
    Change,
}

impl FromStr for ResponsiveEvent {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "change" => Ok(ResponsiveEvent::Change),
            other => Err(MotionError::UnknownEvent {
                name: other.to_string(),
                expected: "change",
            }),
        }
    }
}

pub type BreakpointListener = Rc<dyn Fn(Breakpoint)>;

struct Shared {
    observer: BreakpointObserver,
    listeners: ListenerMap<ResponsiveEvent, BreakpointListener>,
    viewport: Rc<dyn Viewport>,
}

fn settle(shared: &RefCell<Shared>) {
    let (next, listeners) = {
        let mut s = shared.borrow_mut();
        let width = s.viewport.width();
        match s.observer.observe(width) {
            Some(next) => (next, s.listeners.snapshot(&ResponsiveEvent::Change)),
            None => return,
        }
    };
    debug!("breakpoint changed to {next}");
    for listener in listeners {
        listener(next);
    }
}

/// Emits `change` when a settled resize crosses a breakpoint.
pub struct ResponsiveHandler<T: TimerHost + 'static> {
    shared: Rc<RefCell<Shared>>,
    resize: Debounced<(), T>,
}

impl<T: TimerHost + 'static> ResponsiveHandler<T> {
    pub fn new(config: &ResponsiveConfig, viewport: Rc<dyn Viewport>, timers: T) -> Self {
        let observer = BreakpointObserver::new(config.breakpoints, viewport.width());
        let shared = Rc::new(RefCell::new(Shared {
            observer,
            listeners: ListenerMap::new(),
            viewport,
        }));
        let weak: Weak<RefCell<Shared>> = Rc::downgrade(&shared);
        let resize = Debounced::new(timers, config.debounce_ms, move |()| {
            if let Some(shared) = weak.upgrade() {
                settle(&shared);
            }
        });
        Self { shared, resize }
    }

    pub fn current(&self) -> Breakpoint {
        self.shared.borrow().observer.current()
    }

    pub fn on(&self, event: ResponsiveEvent, listener: BreakpointListener) {
        self.shared.borrow_mut().listeners.on(event, listener);
    }

    pub fn on_change(&self, f: impl Fn(Breakpoint) + 'static) {
        self.on(ResponsiveEvent::Change, Rc::new(f));
    }

    /// Host resize notification; recomputation waits for the debounce window.
    pub fn resized(&self) {
        self.resize.call(());
    }

    pub fn is_settling(&self) -> bool {
        self.resize.is_pending()
    }

    /// Cancel a pending recomputation and drop every listener.
    pub fn destroy(&self) {
        self.resize.cancel();
        self.shared.borrow_mut().listeners.clear();
    }
}

impl<T: TimerHost + 'static> fmt::Debug for ResponsiveHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.shared.borrow();
        f.debug_struct("ResponsiveHandler")
            .field("current", &s.observer.current())
            .field("listeners", &s.listeners.len())
            .field("resize", &self.resize)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observer_reports_only_changes() {
        let mut obs = BreakpointObserver::new(Breakpoints::default(), 1200.0);
        assert_eq!(obs.current(), Breakpoint::Desktop);
        assert_eq!(obs.observe(1100.0), None);
        assert_eq!(obs.observe(800.0), Some(Breakpoint::Tablet));
        assert_eq!(obs.observe(800.0), None);
        assert_eq!(obs.observe(300.0), Some(Breakpoint::Small));
        assert_eq!(obs.current(), Breakpoint::Small);
    }

    #[test]
    fn event_names() {
        assert_eq!(
            "change".parse::<ResponsiveEvent>().unwrap(),
            ResponsiveEvent::Change
        );
        assert!("resize".parse::<ResponsiveEvent>().is_err());
    }
}
