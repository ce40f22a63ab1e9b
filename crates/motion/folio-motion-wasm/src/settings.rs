//! Page-wide configuration stored by `init` and per-instance overrides.

use std::cell::RefCell;

use serde_json::{Map, Value as JsonValue};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use folio_motion_core::Config;

thread_local! {
    static CONFIG: RefCell<Config> = RefCell::new(Config::default());
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Convert an optional JS options object into JSON.
pub(crate) fn options_json(context: &str, value: JsValue) -> Result<Option<JsonValue>, JsError> {
    if jsvalue_is_undefined_or_null(&value) {
        return Ok(None);
    }
    swb::from_value(value)
        .map(Some)
        .map_err(|e| JsError::new(&format!("{context}: options error: {e}")))
}

pub(crate) fn current() -> Config {
    CONFIG.with(|c| c.borrow().clone())
}

pub(crate) fn store(config: Config) {
    CONFIG.with(|c| *c.borrow_mut() = config);
}

/// Stored config with `options` merged into `section` (or into the whole
/// config when `section` is `None`).
pub(crate) fn resolve(
    context: &str,
    section: Option<&str>,
    options: JsValue,
) -> Result<Config, JsError> {
    let base = current();
    let Some(options) = options_json(context, options)? else {
        return Ok(base);
    };
    let overrides = match section {
        Some(section) => {
            let mut wrapped = Map::new();
            wrapped.insert(section.to_string(), options);
            JsonValue::Object(wrapped)
        }
        None => options,
    };
    base.merged(&overrides)
        .map_err(|e| JsError::new(&format!("{context}: {e}")))
}
