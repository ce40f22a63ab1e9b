use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function, Object};
use log::{debug, warn};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, HtmlElement, MouseEvent, TouchEvent};

use folio_motion_core::{PointerInput, PointerSample, PointerSource, TouchConfig, TouchHandler};

use crate::host::rethrow;

const TOUCH_EVENTS: [&str; 4] = ["touchstart", "touchmove", "touchend", "touchcancel"];
const MOUSE_EVENTS: [&str; 3] = ["mousedown", "mousemove", "mouseup"];

type SharedHandler = Rc<RefCell<TouchHandler<Function>>>;
type NativeListener = Closure<dyn FnMut(Event)>;

/// Gesture recognizer bound to one element's touch and mouse events.
#[wasm_bindgen(js_name = TouchHandler)]
pub struct WasmTouchHandler {
    shared: SharedHandler,
    element: HtmlElement,
    native: RefCell<Vec<(&'static str, NativeListener)>>,
}

/// Normalize a native touch / mouse event.
fn pointer_input(event: &Event) -> Option<PointerInput> {
    let timestamp = event.time_stamp();
    let kind = event.type_();
    match kind.as_str() {
        "touchstart" | "touchmove" => {
            let touch = event.unchecked_ref::<TouchEvent>().touches().get(0)?;
            let sample = PointerSample::new(
                f64::from(touch.client_x()),
                f64::from(touch.client_y()),
                timestamp,
            );
            let source = PointerSource::Touch;
            Some(if kind == "touchstart" {
                PointerInput::Press { source, sample }
            } else {
                PointerInput::Move { source, sample }
            })
        }
        "touchend" => Some(PointerInput::Release {
            source: PointerSource::Touch,
            timestamp,
        }),
        "touchcancel" => Some(PointerInput::Cancel {
            source: PointerSource::Touch,
            timestamp,
        }),
        "mousedown" | "mousemove" => {
            let mouse = event.unchecked_ref::<MouseEvent>();
            let sample = PointerSample::new(
                f64::from(mouse.client_x()),
                f64::from(mouse.client_y()),
                timestamp,
            );
            let source = PointerSource::Mouse;
            Some(if kind == "mousedown" {
                PointerInput::Press { source, sample }
            } else {
                PointerInput::Move { source, sample }
            })
        }
        "mouseup" => Some(PointerInput::Release {
            source: PointerSource::Mouse,
            timestamp,
        }),
        _ => None,
    }
}

fn dispatch(shared: &Weak<RefCell<TouchHandler<Function>>>, event: Event) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Some(input) = pointer_input(&event) else {
        return;
    };
    let routed = shared.borrow_mut().route(input);
    for (gesture, listeners) in routed {
        if listeners.is_empty() {
            continue;
        }
        let payload = match swb::to_value(&gesture) {
            Ok(v) => v,
            Err(e) => {
                warn!("gesture {} serialization failed: {e}", gesture.kind());
                continue;
            }
        };
        for listener in listeners {
            rethrow("touch listener", listener.call1(&JsValue::NULL, &payload));
        }
    }
}

impl WasmTouchHandler {
    /// Attach native listeners to `element`. Touch listeners are passive.
    pub(crate) fn attach(element: HtmlElement, config: TouchConfig) -> Result<Self, JsError> {
        let shared: SharedHandler = Rc::new(RefCell::new(TouchHandler::new(config)));
        let mut native = Vec::with_capacity(TOUCH_EVENTS.len() + MOUSE_EVENTS.len());

        let passive = AddEventListenerOptions::new();
        passive.set_passive(true);
        for name in TOUCH_EVENTS.into_iter().chain(MOUSE_EVENTS) {
            let weak = Rc::downgrade(&shared);
            let listener: NativeListener =
                Closure::new(move |event: Event| dispatch(&weak, event));
            let registered = if name.starts_with("touch") {
                element.add_event_listener_with_callback_and_add_event_listener_options(
                    name,
                    listener.as_ref().unchecked_ref(),
                    &passive,
                )
            } else {
                element.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
            };
            registered
                .map_err(|e| JsError::new(&format!("createTouchHandler: {name} listener: {e:?}")))?;
            native.push((name, listener));
        }
        debug!("touch handler attached ({} native listeners)", native.len());

        Ok(Self {
            shared,
            element,
            native: RefCell::new(native),
        })
    }

    /// Register each `{ eventName: fn }` entry of `callbacks`.
    pub(crate) fn register_all(&self, callbacks: &JsValue) -> Result<(), JsError> {
        if callbacks.is_undefined() || callbacks.is_null() {
            return Ok(());
        }
        let object = callbacks
            .dyn_ref::<Object>()
            .ok_or_else(|| JsError::new("createTouchHandler: callbacks must be an object"))?;
        for entry in Object::entries(object).iter() {
            let pair: Array = entry.unchecked_into();
            let name = pair.get(0).as_string().unwrap_or_default();
            let listener = pair.get(1).dyn_into::<Function>().map_err(|_| {
                JsError::new(&format!("createTouchHandler: '{name}' is not a function"))
            })?;
            self.on(&name, listener)?;
        }
        Ok(())
    }

    fn detach(&self) {
        for (name, listener) in self.native.borrow_mut().drain(..) {
            if let Err(err) = self
                .element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
            {
                warn!("failed to remove {name} listener: {err:?}");
            }
        }
    }
}

#[wasm_bindgen(js_class = TouchHandler)]
impl WasmTouchHandler {
    /// Subscribe to `start`, `move`, `tap`, `swipe` or `end`. Listeners run in
    /// registration order and receive the gesture object (`{ type, ... }`).
    pub fn on(&self, event: &str, callback: Function) -> Result<(), JsError> {
        self.shared
            .borrow_mut()
            .on_named(event, callback)
            .map_err(|e| JsError::new(&format!("on: {e}")))
    }

    /// Remove the native listeners and every callback; later input is ignored.
    pub fn destroy(&self) {
        self.detach();
        self.shared.borrow_mut().destroy();
    }

    #[wasm_bindgen(getter, js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.shared.borrow().recognizer().is_dragging()
    }

    /// `{ x, y }` in px/ms for the gesture in progress.
    #[wasm_bindgen(getter)]
    pub fn velocity(&self) -> Result<JsValue, JsError> {
        let velocity = self.shared.borrow().recognizer().velocity();
        swb::to_value(&velocity).map_err(|e| JsError::new(&format!("velocity: {e}")))
    }

    #[wasm_bindgen(getter)]
    pub fn element(&self) -> HtmlElement {
        self.element.clone()
    }
}

impl Drop for WasmTouchHandler {
    fn drop(&mut self) {
        self.detach();
    }
}
