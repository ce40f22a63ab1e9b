//! Touch / mouse gesture recognition.
//!
//! Touch and mouse streams are normalized into [`PointerInput`] and fed to a
//! [`GestureRecognizer`], which classifies each press → release sequence:
//! - movement within `threshold` px of the start → `tap` at the start point
//! - movement beyond it → `move` events while dragging, then `swipe`
//! - every sequence ends with `end`
//!
//! Velocity is displacement over time since the press, clamped per axis to
//! `max_velocity` (px/ms).

use std::fmt;
use std::ops::Sub;
use std::rc::Rc;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::TouchConfig;
use crate::error::{MotionError, Result};
use crate::listeners::ListenerMap;

/// Mouse presses this soon after a touch gesture ends are treated as the
/// browser's emulated compatibility events and ignored.
pub const EMULATED_MOUSE_WINDOW_MS: f64 = 800.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other - self).length()
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSource {
    Touch,
    Mouse,
}

/// Pointer position (client px) at a host timestamp (ms).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub timestamp: f64,
}

impl PointerSample {
    pub const fn new(x: f64, y: f64, timestamp: f64) -> Self {
        Self { x, y, timestamp }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Normalized native pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum PointerInput {
    Press {
        source: PointerSource,
        sample: PointerSample,
    },
    Move {
        source: PointerSource,
        sample: PointerSample,
    },
    Release {
        source: PointerSource,
        timestamp: f64,
    },
    Cancel {
        source: PointerSource,
        timestamp: f64,
    },
}

impl PointerInput {
    pub fn source(&self) -> PointerSource {
        match *self {
            PointerInput::Press { source, .. }
            | PointerInput::Move { source, .. }
            | PointerInput::Release { source, .. }
            | PointerInput::Cancel { source, .. } => source,
        }
    }
}

/// Event names listeners can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Start,
    Move,
    Tap,
    Swipe,
    End,
}

impl GestureKind {
    pub const ALL: [GestureKind; 5] = [
        GestureKind::Start,
        GestureKind::Move,
        GestureKind::Tap,
        GestureKind::Swipe,
        GestureKind::End,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GestureKind::Start => "start",
            GestureKind::Move => "move",
            GestureKind::Tap => "tap",
            GestureKind::Swipe => "swipe",
            GestureKind::End => "end",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureKind {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        GestureKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| MotionError::UnknownEvent {
                name: s.to_string(),
                expected: "start, move, tap, swipe, end",
            })
    }
}

/// Classified gesture event, serialized with a `type` tag for JS consumers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GestureEvent {
    Start {
        position: Point,
        timestamp: f64,
    },
    Move {
        position: Point,
        /// Displacement from the start point.
        delta: Point,
        distance: f64,
    },
    Tap {
        position: Point,
    },
    Swipe {
        position: Point,
        /// px/ms, clamped per axis.
        velocity: Point,
    },
    End,
}

impl GestureEvent {
    pub fn kind(&self) -> GestureKind {
        match self {
            GestureEvent::Start { .. } => GestureKind::Start,
            GestureEvent::Move { .. } => GestureKind::Move,
            GestureEvent::Tap { .. } => GestureKind::Tap,
            GestureEvent::Swipe { .. } => GestureKind::Swipe,
            GestureEvent::End => GestureKind::End,
        }
    }
}

/// State of the press → release sequence in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureState {
    pub source: PointerSource,
    pub start: Point,
    pub start_time: f64,
    pub current: Point,
    pub dragging: bool,
    pub velocity: Point,
}

/// Pure gesture state machine; no listeners, no host types.
#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    config: TouchConfig,
    active: Option<GestureState>,
    last_touch_end: Option<f64>,
}

impl GestureRecognizer {
    pub fn new(config: TouchConfig) -> Self {
        Self {
            config,
            active: None,
            last_touch_end: None,
        }
    }

    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    pub fn state(&self) -> Option<&GestureState> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some_and(|g| g.dragging)
    }

    pub fn velocity(&self) -> Point {
        self.active.map(|g| g.velocity).unwrap_or(Point::ZERO)
    }

    /// Advance the state machine by one input, returning the events it produces.
    pub fn feed(&mut self, input: PointerInput) -> Vec<GestureEvent> {
        match input {
            PointerInput::Press { source, sample } => self.press(source, sample),
            PointerInput::Move { source, sample } => self.moved(source, sample),
            PointerInput::Release { source, timestamp } => self.release(source, timestamp),
            PointerInput::Cancel { source, timestamp } => self.cancel(source, timestamp),
        }
    }

    fn owns(&self, source: PointerSource) -> bool {
        self.active.is_some_and(|g| g.source == source)
    }

    fn press(&mut self, source: PointerSource, sample: PointerSample) -> Vec<GestureEvent> {
        if let Some(g) = self.active {
            if g.source != source {
                return Vec::new();
            }
        }
        if source == PointerSource::Mouse {
            if let Some(ended) = self.last_touch_end {
                if sample.timestamp - ended < EMULATED_MOUSE_WINDOW_MS {
                    return Vec::new();
                }
            }
        }
        let start = sample.point();
        self.active = Some(GestureState {
            source,
            start,
            start_time: sample.timestamp,
            current: start,
            dragging: false,
            velocity: Point::ZERO,
        });
        vec![GestureEvent::Start {
            position: start,
            timestamp: sample.timestamp,
        }]
    }

    fn moved(&mut self, source: PointerSource, sample: PointerSample) -> Vec<GestureEvent> {
        if !self.owns(source) {
            return Vec::new();
        }
        let max_v = self.config.max_velocity;
        let threshold = self.config.threshold;
        let Some(g) = self.active.as_mut() else {
            return Vec::new();
        };

        let position = sample.point();
        let distance = g.start.distance_to(position);
        if distance > threshold {
            g.dragging = true;
        }
        if !g.dragging {
            return Vec::new();
        }

        g.current = position;
        let delta = position - g.start;
        let elapsed = sample.timestamp - g.start_time;
        g.velocity = if elapsed > 0.0 {
            Point::new(
                (delta.x / elapsed).clamp(-max_v, max_v),
                (delta.y / elapsed).clamp(-max_v, max_v),
            )
        } else {
            Point::ZERO
        };
        vec![GestureEvent::Move {
            position,
            delta,
            distance,
        }]
    }

    fn release(&mut self, source: PointerSource, timestamp: f64) -> Vec<GestureEvent> {
        if !self.owns(source) {
            return Vec::new();
        }
        let Some(g) = self.finish(timestamp) else {
            return Vec::new();
        };
        let classified = if g.dragging {
            debug!(
                "swipe at ({}, {}) velocity ({:.3}, {:.3})",
                g.current.x, g.current.y, g.velocity.x, g.velocity.y
            );
            GestureEvent::Swipe {
                position: g.current,
                velocity: g.velocity,
            }
        } else {
            debug!("tap at ({}, {})", g.start.x, g.start.y);
            GestureEvent::Tap { position: g.start }
        };
        vec![classified, GestureEvent::End]
    }

    fn cancel(&mut self, source: PointerSource, timestamp: f64) -> Vec<GestureEvent> {
        if !self.owns(source) {
            return Vec::new();
        }
        self.finish(timestamp);
        vec![GestureEvent::End]
    }

    fn finish(&mut self, timestamp: f64) -> Option<GestureState> {
        let g = self.active.take()?;
        if g.source == PointerSource::Touch {
            self.last_touch_end = Some(timestamp);
        }
        Some(g)
    }
}

/// Listener type for Rust callers.
pub type Listener = Rc<dyn Fn(&GestureEvent)>;

/// Recognizer plus per-event listener lists, bound to one element.
///
/// `L` is the listener representation; hosts with their own callable type
/// (e.g. JS functions) use [`TouchHandler::route`] and invoke listeners
/// themselves.
#[derive(Clone)]
pub struct TouchHandler<L = Listener> {
    recognizer: GestureRecognizer,
    listeners: ListenerMap<GestureKind, L>,
    destroyed: bool,
}

impl<L: Clone> TouchHandler<L> {
    pub fn new(config: TouchConfig) -> Self {
        Self {
            recognizer: GestureRecognizer::new(config),
            listeners: ListenerMap::new(),
            destroyed: false,
        }
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    pub fn listeners(&self) -> &ListenerMap<GestureKind, L> {
        &self.listeners
    }

    pub fn on(&mut self, kind: GestureKind, listener: L) {
        if !self.destroyed {
            self.listeners.on(kind, listener);
        }
    }

    /// Register by event name (`"tap"`, `"swipe"`, ...).
    pub fn on_named(&mut self, name: &str, listener: L) -> Result<()> {
        let kind = name.parse()?;
        self.on(kind, listener);
        Ok(())
    }

    /// Feed one input and pair each resulting event with a snapshot of its
    /// listeners, in registration order.
    pub fn route(&mut self, input: PointerInput) -> Vec<(GestureEvent, Vec<L>)> {
        if self.destroyed {
            return Vec::new();
        }
        self.recognizer
            .feed(input)
            .into_iter()
            .map(|event| {
                let listeners = self.listeners.snapshot(&event.kind());
                (event, listeners)
            })
            .collect()
    }

    /// Drop every listener and ignore further input.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        self.recognizer.active = None;
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl TouchHandler<Listener> {
    pub fn on_event(&mut self, kind: GestureKind, f: impl Fn(&GestureEvent) + 'static) {
        self.on(kind, Rc::new(f));
    }

    /// Feed one input and invoke the listeners for every resulting event.
    pub fn handle(&mut self, input: PointerInput) {
        for (event, listeners) in self.route(input) {
            for listener in listeners {
                listener(&event);
            }
        }
    }
}

impl<L> fmt::Debug for TouchHandler<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TouchHandler")
            .field("recognizer", &self.recognizer)
            .field("listeners", &self.listeners.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
