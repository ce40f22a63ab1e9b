//! Style output seam.

use std::cell::{Cell, RefCell};

use indexmap::IndexMap;

/// Receives per-frame style writes for one element.
pub trait StyleTarget {
    fn set_style(&self, property: &str, value: &str);
}

/// In-memory inline style: last value per property, in first-write order.
/// Doubles as a headless target and as a recorder in tests.
#[derive(Debug, Default)]
pub struct InlineStyle {
    props: RefCell<IndexMap<String, String>>,
    writes: Cell<usize>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: &str) -> Option<String> {
        self.props.borrow().get(property).cloned()
    }

    /// Total number of writes received.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// `property: value; ...` in first-write order.
    pub fn css_text(&self) -> String {
        self.props
            .borrow()
            .iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl StyleTarget for InlineStyle {
    fn set_style(&self, property: &str, value: &str) {
        self.props
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
    }
}
