//! web-sys implementations of the core host seams.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use js_sys::{Function, Reflect};
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use folio_motion_core::{
    viewport_width, AnimationConfig, AnimationController, FrameHandle, FrameScheduler,
    StyleTarget, TimerHandle, TimerHost, TouchSignals, Viewport,
};

pub(crate) type SharedController = Rc<RefCell<AnimationController<DomScheduler>>>;

pub(crate) fn window() -> Result<Window, JsError> {
    web_sys::window().ok_or_else(|| JsError::new("no global window"))
}

pub(crate) fn document() -> Result<Document, JsError> {
    window()?
        .document()
        .ok_or_else(|| JsError::new("window has no document"))
}

/// Hand a JS callback failure to the page's uncaught-error path.
///
/// The value is rethrown from a fresh `setTimeout` task, so it reaches
/// `window.onerror` after the frame or event that ran the callback has left
/// every controller consistent.
pub(crate) fn rethrow(context: &str, result: Result<JsValue, JsValue>) {
    let Err(err) = result else {
        return;
    };
    debug!("{context}: callback threw, rethrowing to the host");
    let thrower = Function::new_with_args("error", "throw error");
    let queued = window().map_err(JsValue::from).and_then(|w| {
        w.set_timeout_with_callback_and_timeout_and_arguments_1(&thrower, 0, &err)
    });
    if let Err(schedule_err) = queued {
        warn!("{context}: callback threw {err:?} and could not be rethrown: {schedule_err:?}");
    }
}

type FrameClosure = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` scheduler bound to one controller.
///
/// Frames call back into the controller through a weak reference, so a
/// dropped controller just stops receiving them. Each requested frame's
/// closure is kept until it fires or is cancelled.
pub struct DomScheduler {
    window: Window,
    controller: Weak<RefCell<AnimationController<DomScheduler>>>,
    pending: RefCell<HashMap<i32, FrameClosure>>,
}

impl DomScheduler {
    /// Build a controller whose scheduler points back at it.
    pub(crate) fn controller(
        window: Window,
        config: AnimationConfig,
        target: Rc<dyn StyleTarget>,
    ) -> SharedController {
        Rc::new_cyclic(|weak| {
            let scheduler = DomScheduler {
                window,
                controller: weak.clone(),
                pending: RefCell::new(HashMap::new()),
            };
            RefCell::new(AnimationController::new(config, scheduler, target))
        })
    }

    /// Frames requested and neither delivered nor cancelled.
    #[cfg(test)]
    pub(crate) fn pending_frames(&self) -> usize {
        self.pending.borrow().len()
    }

    fn release(&self, id: i32) -> Option<FrameClosure> {
        self.pending.borrow_mut().remove(&id)
    }
}

fn run_frame(controller: &SharedController, handle: FrameHandle, now: f64) {
    let fired = controller.borrow().scheduler().release(handle.0);
    let frame = controller.borrow_mut().begin_frame(handle);
    let Some(mut frame) = frame else {
        return;
    };
    // user callbacks run with the controller unborrowed
    frame.run(now);
    let finished = controller.borrow_mut().end_frame(frame);
    if let Some(mut finished) = finished {
        finished.complete();
        controller.borrow_mut().finish_frame(finished);
    }
    drop(fired);
}

impl FrameScheduler for DomScheduler {
    fn request_frame(&self) -> FrameHandle {
        let controller = self.controller.clone();
        let issued = Rc::new(Cell::new(FrameHandle(0)));
        let slot = Rc::clone(&issued);
        let callback: FrameClosure = Closure::once(move |now: f64| {
            if let Some(controller) = controller.upgrade() {
                run_frame(&controller, slot.get(), now);
            }
        });
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref::<Function>())
        {
            Ok(id) => {
                issued.set(FrameHandle(id));
                self.pending.borrow_mut().insert(id, callback);
                FrameHandle(id)
            }
            Err(err) => {
                warn!("requestAnimationFrame failed: {err:?}");
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            warn!("cancelAnimationFrame({}) failed: {err:?}", handle.0);
        }
        self.release(handle.0);
    }

    fn now(&self) -> f64 {
        self.window.performance().map_or(0.0, |p| p.now())
    }
}

impl Drop for DomScheduler {
    fn drop(&mut self) {
        for id in self.pending.get_mut().keys() {
            if let Err(err) = self.window.cancel_animation_frame(*id) {
                warn!("cancelAnimationFrame({id}) failed: {err:?}");
            }
        }
    }
}

type TimerClosure = Closure<dyn FnMut()>;

struct TimerSlots {
    window: Window,
    pending: RefCell<HashMap<i32, TimerClosure>>,
}

impl Drop for TimerSlots {
    fn drop(&mut self) {
        for id in self.pending.get_mut().keys() {
            self.window.clear_timeout_with_handle(*id);
        }
    }
}

/// `setTimeout` / `clearTimeout` on the window. Clones share one table of
/// live timer closures; each is dropped when its timer fires or is cleared.
#[derive(Clone)]
pub struct DomTimers {
    slots: Rc<TimerSlots>,
}

impl DomTimers {
    pub(crate) fn new(window: Window) -> Self {
        Self {
            slots: Rc::new(TimerSlots {
                window,
                pending: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Timers set and neither fired nor cleared.
    #[cfg(test)]
    pub(crate) fn pending_timers(&self) -> usize {
        self.slots.pending.borrow().len()
    }
}

impl TimerHost for DomTimers {
    fn set_timeout(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let slots = Rc::downgrade(&self.slots);
        let issued = Rc::new(Cell::new(0));
        let slot = Rc::clone(&issued);
        let closure: TimerClosure = Closure::once(move || {
            let fired = slots
                .upgrade()
                .and_then(|s| s.pending.borrow_mut().remove(&slot.get()));
            callback();
            drop(fired);
        });
        let delay = delay_ms.max(0.0).round() as i32;
        match self
            .slots
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref::<Function>(),
                delay,
            ) {
            Ok(id) => {
                issued.set(id);
                self.slots.pending.borrow_mut().insert(id, closure);
                TimerHandle(id)
            }
            Err(err) => {
                warn!("setTimeout failed: {err:?}");
                TimerHandle(0)
            }
        }
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.slots.window.clear_timeout_with_handle(handle.0);
        self.slots.pending.borrow_mut().remove(&handle.0);
    }
}

/// Inline style of one DOM element.
pub struct ElementStyle {
    element: HtmlElement,
}

impl ElementStyle {
    pub(crate) fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl StyleTarget for ElementStyle {
    fn set_style(&self, property: &str, value: &str) {
        if let Err(err) = self.element.style().set_property(property, value) {
            warn!("style.setProperty({property}, {value}) failed: {err:?}");
        }
    }
}

/// Reads `documentElement.clientWidth` and `innerWidth`.
pub struct WindowViewport {
    window: Window,
}

impl WindowViewport {
    pub(crate) fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Viewport for WindowViewport {
    fn width(&self) -> f64 {
        let document_width = self
            .window
            .document()
            .and_then(|d| d.document_element())
            .map_or(f64::NAN, |el| f64::from(el.client_width()));
        let window_width = self
            .window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(f64::NAN);
        viewport_width(document_width, window_width)
    }
}

pub(crate) fn touch_signals(window: &Window) -> TouchSignals {
    let navigator = window.navigator();
    let has_touch_events =
        Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    let ms_max_touch_points = Reflect::get(&navigator, &JsValue::from_str("msMaxTouchPoints"))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    TouchSignals {
        has_touch_events,
        max_touch_points: navigator.max_touch_points().max(0) as u32,
        ms_max_touch_points: ms_max_touch_points.max(0.0) as u32,
    }
}
