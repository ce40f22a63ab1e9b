use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlElement;

use folio_motion_core::{AnimationConfig, CompleteFn, Completion, SlideDirection};

use crate::host::{rethrow, window, DomScheduler, ElementStyle, SharedController};

/// Distance used by `slideIn` and `data-animation="slide-in"` when none is given.
pub const DEFAULT_SLIDE_DISTANCE: f64 = 50.0;

/// Animation controller bound to one element.
#[wasm_bindgen(js_name = AnimationController)]
pub struct WasmAnimation {
    inner: SharedController,
    element: HtmlElement,
}

fn completion_promise(completion: Completion) -> Promise {
    future_to_promise(async move {
        completion.await;
        Ok(JsValue::UNDEFINED)
    })
}

fn js_on_complete(context: &'static str, f: Option<Function>) -> Option<CompleteFn> {
    f.map(|f| -> CompleteFn { Box::new(move || rethrow(context, f.call0(&JsValue::NULL))) })
}

impl WasmAnimation {
    pub(crate) fn bind(element: HtmlElement, config: AnimationConfig) -> Result<Self, JsError> {
        let style = Rc::new(ElementStyle::new(element.clone()));
        let inner = DomScheduler::controller(window()?, config, style);
        Ok(Self { inner, element })
    }

    pub(crate) fn slide(&self, direction: SlideDirection, distance: f64) -> Promise {
        let completion = self.inner.borrow_mut().slide_in(direction, distance);
        completion_promise(completion)
    }
}

#[wasm_bindgen(js_class = AnimationController)]
impl WasmAnimation {
    /// Drive `onUpdate(value, progress)` every frame from `from` to `to`.
    /// Any animation already running on this element is replaced and its
    /// `onComplete` never fires. Returns the session id.
    pub fn animate(
        &self,
        from: f64,
        to: f64,
        on_update: Function,
        on_complete: Option<Function>,
    ) -> f64 {
        let on_update = move |value: f64, progress: f64| {
            rethrow(
                "animate onUpdate",
                on_update.call2(&JsValue::NULL, &value.into(), &progress.into()),
            )
        };
        let id = self.inner.borrow_mut().animate(
            from,
            to,
            on_update,
            js_on_complete("animate onComplete", on_complete),
        );
        id.0 as f64
    }

    /// Animate a style property, writing `value + unit` each frame.
    #[wasm_bindgen(js_name = animateProperty)]
    pub fn animate_property(
        &self,
        property: &str,
        from: f64,
        to: f64,
        unit: Option<String>,
        on_complete: Option<Function>,
    ) -> f64 {
        let id = self.inner.borrow_mut().animate_property(
            property,
            from,
            to,
            unit.as_deref(),
            js_on_complete("animateProperty onComplete", on_complete),
        );
        id.0 as f64
    }

    /// Resolves when the fade completes; never if it is superseded.
    #[wasm_bindgen(js_name = fadeIn)]
    pub fn fade_in(&self) -> Promise {
        let completion = self.inner.borrow_mut().fade_in();
        completion_promise(completion)
    }

    #[wasm_bindgen(js_name = fadeOut)]
    pub fn fade_out(&self) -> Promise {
        let completion = self.inner.borrow_mut().fade_out();
        completion_promise(completion)
    }

    /// `direction` is one of up / down / left / right (default up);
    /// `distance` defaults to 50px.
    #[wasm_bindgen(js_name = slideIn)]
    pub fn slide_in(
        &self,
        direction: Option<String>,
        distance: Option<f64>,
    ) -> Result<Promise, JsError> {
        let direction = match direction.as_deref() {
            Some(name) => name
                .parse::<SlideDirection>()
                .map_err(|e| JsError::new(&format!("slideIn: {e}")))?,
            None => SlideDirection::default(),
        };
        Ok(self.slide(direction, distance.unwrap_or(DEFAULT_SLIDE_DISTANCE)))
    }

    /// Stop without completing. Returns whether anything was running.
    pub fn cancel(&self) -> bool {
        self.inner.borrow_mut().cancel()
    }

    #[wasm_bindgen(getter, js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.inner.borrow().is_animating()
    }

    #[wasm_bindgen(getter)]
    pub fn element(&self) -> HtmlElement {
        self.element.clone()
    }
}
