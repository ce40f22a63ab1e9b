//! Declarative setup from `data-*` attributes.
//!
//! - `data-animation="fade-in"`: fade the element in
//! - `data-animation="slide-in"`: slide in, with optional `data-direction`
//!   (up / down / left / right) and `data-distance` (px)
//! - `data-touch`: attach a touch handler with no callbacks
//!
//! Bound controllers and handlers live in a page-lifetime registry.

use std::cell::RefCell;

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use folio_motion_core::{Config, SlideDirection};

use crate::animation::{WasmAnimation, DEFAULT_SLIDE_DISTANCE};
use crate::touch::WasmTouchHandler;

pub const ANIMATION_ATTR: &str = "data-animation";
pub const DIRECTION_ATTR: &str = "data-direction";
pub const DISTANCE_ATTR: &str = "data-distance";
pub const TOUCH_ATTR: &str = "data-touch";

#[derive(Default)]
struct Registry {
    animations: Vec<WasmAnimation>,
    touch: Vec<WasmTouchHandler>,
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

/// All elements matching `selector` that are `HTMLElement`s, in DOM order.
pub(crate) fn select_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsError> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|e| JsError::new(&format!("invalid selector '{selector}': {e:?}")))?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

fn slide_params(element: &HtmlElement) -> (SlideDirection, f64) {
    let direction = match element.get_attribute(DIRECTION_ATTR) {
        Some(name) => name.parse().unwrap_or_else(|e| {
            warn!("{DIRECTION_ATTR}: {e}; sliding up");
            SlideDirection::default()
        }),
        None => SlideDirection::default(),
    };
    let distance = element
        .get_attribute(DISTANCE_ATTR)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite())
        .unwrap_or(DEFAULT_SLIDE_DISTANCE);
    (direction, distance)
}

/// Bind every annotated element under `document`. Returns how many elements
/// were bound.
pub(crate) fn scan(document: &Document, config: &Config) -> Result<u32, JsError> {
    let mut animations = Vec::new();
    for element in select_all(document, &format!("[{ANIMATION_ATTR}]"))? {
        let kind = element.get_attribute(ANIMATION_ATTR).unwrap_or_default();
        let controller = WasmAnimation::bind(element.clone(), config.animation.clone())?;
        match kind.as_str() {
            "fade-in" => {
                let _ = controller.fade_in();
            }
            "slide-in" => {
                let (direction, distance) = slide_params(&element);
                let _ = controller.slide(direction, distance);
            }
            other => {
                warn!("{ANIMATION_ATTR}=\"{other}\" is not fade-in or slide-in; skipped");
                continue;
            }
        }
        animations.push(controller);
    }

    let mut touch = Vec::new();
    for element in select_all(document, &format!("[{TOUCH_ATTR}]"))? {
        touch.push(WasmTouchHandler::attach(element, config.touch.clone())?);
    }

    let bound = animations.len() + touch.len();
    debug!(
        "auto-init bound {} animations, {} touch handlers",
        animations.len(),
        touch.len()
    );
    REGISTRY.with(|r| {
        let mut r = r.borrow_mut();
        r.animations.extend(animations);
        r.touch.extend(touch);
    });
    Ok(bound as u32)
}

/// Drop everything auto-init bound, detaching touch listeners.
pub(crate) fn clear() {
    let old = REGISTRY.with(|r| std::mem::take(&mut *r.borrow_mut()));
    drop(old);
}
