use std::rc::Rc;

use js_sys::{Array, Function, Object};
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use folio_motion_core::{Breakpoint, ResponsiveConfig, ResponsiveEvent, ResponsiveHandler};

use crate::host::{rethrow, DomTimers, WindowViewport};

type SharedResponsive = Rc<ResponsiveHandler<DomTimers>>;

/// Debounced breakpoint observer on the window's `resize` event.
#[wasm_bindgen(js_name = ResponsiveHandler)]
pub struct WasmResponsiveHandler {
    inner: SharedResponsive,
    window: Window,
    resize: Option<Closure<dyn FnMut()>>,
}

impl WasmResponsiveHandler {
    pub(crate) fn attach(window: Window, config: &ResponsiveConfig) -> Result<Self, JsError> {
        let viewport = Rc::new(WindowViewport::new(window.clone()));
        let inner: SharedResponsive = Rc::new(ResponsiveHandler::new(
            config,
            viewport,
            DomTimers::new(window.clone()),
        ));
        let weak = Rc::downgrade(&inner);
        let resize: Closure<dyn FnMut()> = Closure::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.resized();
            }
        });
        window
            .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("createResponsiveHandler: {e:?}")))?;
        Ok(Self {
            inner,
            window,
            resize: Some(resize),
        })
    }

    pub(crate) fn register_all(&self, callbacks: &JsValue) -> Result<(), JsError> {
        if callbacks.is_undefined() || callbacks.is_null() {
            return Ok(());
        }
        let object = callbacks
            .dyn_ref::<Object>()
            .ok_or_else(|| JsError::new("createResponsiveHandler: callbacks must be an object"))?;
        for entry in Object::entries(object).iter() {
            let pair: Array = entry.unchecked_into();
            let name = pair.get(0).as_string().unwrap_or_default();
            let listener = pair.get(1).dyn_into::<Function>().map_err(|_| {
                JsError::new(&format!("createResponsiveHandler: '{name}' is not a function"))
            })?;
            self.on(&name, listener)?;
        }
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(resize) = self.resize.take() {
            if let Err(err) = self
                .window
                .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
            {
                warn!("failed to remove resize listener: {err:?}");
            }
        }
    }
}

#[wasm_bindgen(js_class = ResponsiveHandler)]
impl WasmResponsiveHandler {
    /// Only `change` is supported; the callback receives the new breakpoint name.
    pub fn on(&self, event: &str, callback: Function) -> Result<(), JsError> {
        let event: ResponsiveEvent = event
            .parse()
            .map_err(|e| JsError::new(&format!("on: {e}")))?;
        self.inner.on(
            event,
            Rc::new(move |bp: Breakpoint| {
                rethrow(
                    "breakpoint listener",
                    callback.call1(&JsValue::NULL, &JsValue::from_str(bp.as_str())),
                )
            }),
        );
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn current(&self) -> String {
        self.inner.current().to_string()
    }

    /// Stop observing: cancels a pending recomputation and drops listeners.
    pub fn destroy(&mut self) {
        self.detach();
        self.inner.destroy();
    }
}

impl Drop for WasmResponsiveHandler {
    fn drop(&mut self) {
        self.detach();
    }
}
