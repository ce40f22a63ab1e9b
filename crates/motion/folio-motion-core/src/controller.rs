//! AnimationController: one eased property transition at a time, advanced by
//! host display frames.
//!
//! Frame flow:
//! - `animate` revokes any pending frame, starts a session and requests a frame
//! - the host delivers the frame: `begin_frame` → `ActiveFrame::run` → `end_frame`
//! - `end_frame` either requests the next frame or hands back a `FinishedFrame`
//! - the host runs `FinishedFrame::complete`, then `finish_frame` drops the GPU hint
//!
//! The three-step frame API lets a host run user callbacks while it holds no
//! borrow of the controller, so callbacks may start or cancel animations on
//! the same controller. `tick` chains the steps for hosts that don't need that.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::completion::Completion;
use crate::config::AnimationConfig;
use crate::easing::{self, CubicBezier};
use crate::error::MotionError;
use crate::ids::{FrameHandle, IdAllocator, SessionId};
use crate::scheduler::FrameScheduler;
use crate::style::StyleTarget;

/// `on_update(value, progress)`.
pub type UpdateFn = Box<dyn FnMut(f64, f64)>;
pub type CompleteFn = Box<dyn FnOnce()>;

const WILL_CHANGE: &str = "will-change";
const WILL_CHANGE_HINT: &str = "transform, opacity";
const WILL_CHANGE_RESET: &str = "auto";

/// Direction an element travels while sliding into place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
    /// Starts below its resting position.
    #[default]
    Up,
    Down,
    /// Starts right of its resting position.
    Left,
    Right,
}

impl SlideDirection {
    /// Translation offset (axis, px) the element starts from.
    pub fn start_offset(self, distance: f64) -> (char, f64) {
        match self {
            SlideDirection::Up => ('Y', distance),
            SlideDirection::Down => ('Y', -distance),
            SlideDirection::Left => ('X', distance),
            SlideDirection::Right => ('X', -distance),
        }
    }
}

impl FromStr for SlideDirection {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(SlideDirection::Up),
            "down" => Ok(SlideDirection::Down),
            "left" => Ok(SlideDirection::Left),
            "right" => Ok(SlideDirection::Right),
            other => Err(MotionError::UnknownDirection {
                name: other.to_string(),
            }),
        }
    }
}

/// One running transition.
pub struct AnimationSession {
    id: SessionId,
    from: f64,
    to: f64,
    start: f64,
    duration_ms: f64,
    easing: CubicBezier,
    progress: f64,
    on_update: UpdateFn,
    on_complete: Option<CompleteFn>,
}

impl AnimationSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Progress reached by the last sample.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// `(value, progress)` at `now`. Progress never moves backwards, and the
    /// final sample is exactly `(to, 1)`.
    fn sample(&mut self, now: f64) -> (f64, f64) {
        let p = easing::progress(now - self.start, self.duration_ms).max(self.progress);
        self.progress = p;
        if p >= 1.0 {
            (self.to, 1.0)
        } else {
            (self.easing.interpolate(self.from, self.to, p), p)
        }
    }
}

impl fmt::Debug for AnimationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationSession")
            .field("id", &self.id)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("start", &self.start)
            .field("duration_ms", &self.duration_ms)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

/// A session checked out of its controller for the length of one frame.
#[derive(Debug)]
pub struct ActiveFrame {
    session: AnimationSession,
    finished: bool,
}

impl ActiveFrame {
    pub fn session_id(&self) -> SessionId {
        self.session.id
    }

    /// Sample at `now` and call `on_update`. Returns true on the final frame.
    pub fn run(&mut self, now: f64) -> bool {
        let (value, progress) = self.session.sample(now);
        (self.session.on_update)(value, progress);
        self.finished = progress >= 1.0;
        self.finished
    }
}

/// A session that reached progress 1. The GPU hint stays applied until it is
/// handed back to [`AnimationController::finish_frame`].
pub struct FinishedFrame {
    id: SessionId,
    on_complete: Option<CompleteFn>,
}

impl FinishedFrame {
    pub fn session_id(&self) -> SessionId {
        self.id
    }

    /// Run `on_complete`, if any. Hosts call this with the controller unborrowed.
    pub fn complete(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }
}

impl fmt::Debug for FinishedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinishedFrame")
            .field("id", &self.id)
            .field("pending_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Per-element animation engine.
pub struct AnimationController<S: FrameScheduler> {
    config: AnimationConfig,
    scheduler: S,
    target: Rc<dyn StyleTarget>,
    ids: IdAllocator,
    /// Session that currently owns the controller (running or checked out).
    active: Option<SessionId>,
    session: Option<AnimationSession>,
    frame: Option<FrameHandle>,
    hinted: bool,
}

impl<S: FrameScheduler> AnimationController<S> {
    pub fn new(config: AnimationConfig, scheduler: S, target: Rc<dyn StyleTarget>) -> Self {
        Self {
            config,
            scheduler,
            target,
            ids: IdAllocator::new(),
            active: None,
            session: None,
            frame: None,
            hinted: false,
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn target(&self) -> &Rc<dyn StyleTarget> {
        &self.target
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.active
    }

    /// Start a transition from `from` to `to`, replacing any session in flight.
    /// The replaced session's `on_complete` never fires.
    pub fn animate(
        &mut self,
        from: f64,
        to: f64,
        on_update: impl FnMut(f64, f64) + 'static,
        on_complete: Option<CompleteFn>,
    ) -> SessionId {
        self.revoke_frame();
        if let Some(prev) = self.active.take() {
            debug!("animation {:?} superseded", prev);
        }
        self.session = None;

        let id = self.ids.alloc_session();
        self.apply_hint();
        self.session = Some(AnimationSession {
            id,
            from,
            to,
            start: self.scheduler.now(),
            duration_ms: self.config.duration_ms,
            easing: self.config.easing,
            progress: 0.0,
            on_update: Box::new(on_update),
            on_complete,
        });
        self.active = Some(id);
        self.frame = Some(self.scheduler.request_frame());
        debug!(
            "animation {:?} started: {from} -> {to} over {}ms",
            id, self.config.duration_ms
        );
        id
    }

    /// Animate a style property, writing `"{value}{unit}"` every frame.
    pub fn animate_property(
        &mut self,
        property: &str,
        from: f64,
        to: f64,
        unit: Option<&str>,
        on_complete: Option<CompleteFn>,
    ) -> SessionId {
        let target = Rc::clone(&self.target);
        let property = property.to_string();
        let unit = unit.unwrap_or_default().to_string();
        self.animate(
            from,
            to,
            move |value, _| target.set_style(&property, &format!("{value}{unit}")),
            on_complete,
        )
    }

    /// Opacity 0 → 1.
    pub fn fade_in(&mut self) -> Completion {
        self.property_with_completion("opacity", 0.0, 1.0)
    }

    /// Opacity 1 → 0.
    pub fn fade_out(&mut self) -> Completion {
        self.property_with_completion("opacity", 1.0, 0.0)
    }

    /// Translate from `distance` px away (per `direction`) back to 0.
    pub fn slide_in(&mut self, direction: SlideDirection, distance: f64) -> Completion {
        let (axis, offset) = direction.start_offset(distance);
        let target = Rc::clone(&self.target);
        let completion = Completion::new();
        let done = completion.clone();
        self.animate(
            offset,
            0.0,
            move |value, _| target.set_style("transform", &format!("translate{axis}({value}px)")),
            Some(Box::new(move || done.resolve())),
        );
        completion
    }

    fn property_with_completion(&mut self, property: &str, from: f64, to: f64) -> Completion {
        let completion = Completion::new();
        let done = completion.clone();
        self.animate_property(property, from, to, None, Some(Box::new(move || done.resolve())));
        completion
    }

    /// Stop the session in flight without completing it. Returns whether
    /// anything was running.
    pub fn cancel(&mut self) -> bool {
        self.revoke_frame();
        self.session = None;
        let was_active = self.active.take();
        if let Some(id) = was_active {
            debug!("animation {:?} cancelled", id);
            self.release_hint();
        }
        was_active.is_some()
    }

    /// Check the session out for the frame `handle`. `None` for stale or
    /// revoked handles.
    pub fn begin_frame(&mut self, handle: FrameHandle) -> Option<ActiveFrame> {
        if self.frame != Some(handle) {
            trace!("ignoring stale frame {:?}", handle);
            return None;
        }
        self.frame = None;
        self.session.take().map(|session| ActiveFrame {
            session,
            finished: false,
        })
    }

    /// Return a checked-out session. Unfinished sessions get another frame;
    /// a finished one is handed back for the caller to complete and then pass
    /// to `finish_frame`. Sessions superseded in the meantime are dropped.
    pub fn end_frame(&mut self, frame: ActiveFrame) -> Option<FinishedFrame> {
        let id = frame.session.id;
        if self.active != Some(id) {
            trace!("dropping superseded animation {:?}", id);
            return None;
        }
        if frame.finished {
            self.active = None;
            return Some(FinishedFrame {
                id,
                on_complete: frame.session.on_complete,
            });
        }
        self.session = Some(frame.session);
        self.frame = Some(self.scheduler.request_frame());
        None
    }

    /// Release the GPU hint once `on_complete` has run. A session started
    /// from inside `on_complete` keeps the hint.
    pub fn finish_frame(&mut self, finished: FinishedFrame) {
        if self.active.is_none() {
            self.release_hint();
        }
        debug!("animation {:?} complete", finished.id);
    }

    /// Deliver frame `handle` at host time `now`. Returns false for stale handles.
    pub fn tick(&mut self, handle: FrameHandle, now: f64) -> bool {
        let Some(mut frame) = self.begin_frame(handle) else {
            return false;
        };
        frame.run(now);
        if let Some(mut finished) = self.end_frame(frame) {
            finished.complete();
            self.finish_frame(finished);
        }
        true
    }

    fn revoke_frame(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn apply_hint(&mut self) {
        if self.config.gpu_acceleration && !self.hinted {
            self.target.set_style(WILL_CHANGE, WILL_CHANGE_HINT);
            self.hinted = true;
        }
    }

    fn release_hint(&mut self) {
        if self.hinted {
            self.target.set_style(WILL_CHANGE, WILL_CHANGE_RESET);
            self.hinted = false;
        }
    }
}

impl<S: FrameScheduler> Drop for AnimationController<S> {
    fn drop(&mut self) {
        self.revoke_frame();
    }
}

impl<S: FrameScheduler> fmt::Debug for AnimationController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationController")
            .field("config", &self.config)
            .field("active", &self.active)
            .field("frame", &self.frame)
            .field("hinted", &self.hinted)
            .finish_non_exhaustive()
    }
}
