//! Browser façade for folio-motion.
//!
//! Factories bind core controllers and handlers to DOM elements; `init`
//! stores the page config, routes `log` to the console and runs
//! attribute-driven auto-initialization once the document is ready.

use js_sys::{Array, Function};
use log::{debug, warn, Level};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use folio_motion_core::{is_touch_device, Debounced, Throttled, Viewport};

mod animation;
mod auto_init;
mod host;
mod responsive;
mod settings;
mod touch;

pub use animation::WasmAnimation;
pub use responsive::WasmResponsiveHandler;
pub use touch::WasmTouchHandler;

use host::{document, rethrow, touch_signals, window, DomTimers, WindowViewport};

/// Keys `init` reads besides the component sections.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct InitOptions {
    log_level: String,
    auto_init: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            log_level: "warn".into(),
            auto_init: true,
        }
    }
}

/// Install the panic hook and console logger, store `config` (partial JSON
/// over the defaults) and, unless `auto_init: false`, bind annotated
/// elements once the DOM is ready.
///
/// Example:
///   init({ animation: { duration_ms: 500 }, log_level: "debug" })
#[wasm_bindgen]
pub fn init(config: JsValue) -> Result<(), JsError> {
    console_error_panic_hook::set_once();

    let overrides = settings::options_json("init", config)?;
    let options: InitOptions = match &overrides {
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| JsError::new(&format!("init: options error: {e}")))?,
        None => InitOptions::default(),
    };
    let level: Level = options.log_level.parse().unwrap_or(Level::Warn);
    if console_log::init_with_level(level).is_err() {
        debug!("console logger already installed");
    }

    let cfg = match &overrides {
        Some(v) => folio_motion_core::Config::default()
            .merged(v)
            .map_err(|e| JsError::new(&format!("init: {e}")))?,
        None => folio_motion_core::Config::default(),
    };
    settings::store(cfg);

    if options.auto_init {
        when_ready(|| {
            if let Err(err) = auto_init() {
                warn!("auto-init failed: {:?}", JsValue::from(err));
            }
        })?;
    }
    Ok(())
}

fn when_ready(f: impl FnOnce() + 'static) -> Result<(), JsError> {
    let document = document()?;
    if document.ready_state() != "loading" {
        f();
        return Ok(());
    }
    let callback = Closure::once_into_js(f);
    document
        .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        .map_err(|e| JsError::new(&format!("init: DOMContentLoaded listener: {e:?}")))
}

/// Bind `[data-animation]` and `[data-touch]` elements using the stored
/// config. Returns the number of elements bound. Calling it again first
/// releases the previous bindings.
#[wasm_bindgen(js_name = autoInit)]
pub fn auto_init() -> Result<u32, JsError> {
    auto_init::clear();
    auto_init::scan(&document()?, &settings::current())
}

/// Bind an animation controller to the first element matching `selector`.
/// `options` overrides the `animation` config section. Returns `undefined`
/// when nothing matches.
#[wasm_bindgen(js_name = createAnimation)]
pub fn create_animation(
    selector: &str,
    options: JsValue,
) -> Result<Option<WasmAnimation>, JsError> {
    let cfg = settings::resolve("createAnimation", Some("animation"), options)?;
    let Some(element) = auto_init::select_all(&document()?, selector)?
        .into_iter()
        .next()
    else {
        debug!("createAnimation: no element matches '{selector}'");
        return Ok(None);
    };
    WasmAnimation::bind(element, cfg.animation).map(Some)
}

/// Attach a touch handler to the first element matching `selector` and
/// register `callbacks` (`{ tap: fn, swipe: fn, ... }`). `options`
/// overrides the `touch` config section.
#[wasm_bindgen(js_name = createTouchHandler)]
pub fn create_touch_handler(
    selector: &str,
    callbacks: JsValue,
    options: JsValue,
) -> Result<Option<WasmTouchHandler>, JsError> {
    let cfg = settings::resolve("createTouchHandler", Some("touch"), options)?;
    let Some(element) = auto_init::select_all(&document()?, selector)?
        .into_iter()
        .next()
    else {
        debug!("createTouchHandler: no element matches '{selector}'");
        return Ok(None);
    };
    let handler = WasmTouchHandler::attach(element, cfg.touch)?;
    handler.register_all(&callbacks)?;
    Ok(Some(handler))
}

/// Observe breakpoint changes; `callbacks` is `{ change: fn(name) }`.
/// `options` overrides the `responsive` config section.
#[wasm_bindgen(js_name = createResponsiveHandler)]
pub fn create_responsive_handler(
    callbacks: JsValue,
    options: JsValue,
) -> Result<WasmResponsiveHandler, JsError> {
    let cfg = settings::resolve("createResponsiveHandler", Some("responsive"), options)?;
    let handler = WasmResponsiveHandler::attach(window()?, &cfg.responsive)?;
    handler.register_all(&callbacks)?;
    Ok(handler)
}

/// Call `f(controller, element, index)` with a fresh controller for every
/// element matching `selector`, in DOM order. Returns `f`'s results.
#[wasm_bindgen(js_name = animateBatch)]
pub fn animate_batch(selector: &str, f: Function) -> Result<Array, JsError> {
    let cfg = settings::current();
    let results = Array::new();
    for (index, element) in auto_init::select_all(&document()?, selector)?
        .into_iter()
        .enumerate()
    {
        let controller = WasmAnimation::bind(element.clone(), cfg.animation.clone())?;
        match f.call3(
            &JsValue::NULL,
            &JsValue::from(controller),
            &element,
            &JsValue::from(index as u32),
        ) {
            Ok(value) => {
                results.push(&value);
            }
            Err(err) => {
                rethrow("animateBatch", Err(err));
                results.push(&JsValue::UNDEFINED);
            }
        }
    }
    Ok(results)
}

/// Wrap `f` so it runs once, with the latest argument, `ms` after calls stop.
#[wasm_bindgen]
pub fn debounce(f: Function, ms: f64) -> Result<Function, JsError> {
    let debounced = Debounced::new(DomTimers::new(window()?), ms, move |arg: JsValue| {
        rethrow("debounced function", f.call1(&JsValue::NULL, &arg))
    });
    let wrapper: Closure<dyn Fn(JsValue)> = Closure::new(move |arg: JsValue| debounced.call(arg));
    Ok(wrapper.into_js_value().unchecked_into())
}

/// Wrap `f` so it runs at most once per `ms`; calls in between are dropped.
#[wasm_bindgen]
pub fn throttle(f: Function, ms: f64) -> Result<Function, JsError> {
    let throttled = Throttled::new(DomTimers::new(window()?), ms, move |arg: JsValue| {
        rethrow("throttled function", f.call1(&JsValue::NULL, &arg))
    });
    let wrapper: Closure<dyn Fn(JsValue)> = Closure::new(move |arg: JsValue| {
        throttled.call(arg);
    });
    Ok(wrapper.into_js_value().unchecked_into())
}

#[wasm_bindgen(js_name = isTouchDevice)]
pub fn is_touch() -> Result<bool, JsError> {
    Ok(is_touch_device(touch_signals(&window()?)))
}

#[wasm_bindgen(js_name = viewportWidth)]
pub fn viewport_width() -> Result<f64, JsError> {
    Ok(WindowViewport::new(window()?).width())
}

/// Breakpoint name for the current width under the stored config.
#[wasm_bindgen(js_name = currentBreakpoint)]
pub fn current_breakpoint() -> Result<String, JsError> {
    let width = viewport_width()?;
    let breakpoints = settings::current().responsive.breakpoints;
    Ok(breakpoints.classify(width).to_string())
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen(js_name = abiVersion)]
pub fn abi_version() -> u32 {
    1
}
