//! Error types for folio-motion.

/// Errors raised by configuration and listener registration.
///
/// A missing element is not an error: factories return `None` for it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MotionError {
    /// Event name not recognized by the handler it was registered on.
    #[error("Unknown event '{name}' (expected one of: {expected})")]
    UnknownEvent { name: String, expected: &'static str },

    /// Breakpoint label outside small / mobile / tablet / desktop.
    #[error("Unknown breakpoint '{name}'")]
    UnknownBreakpoint { name: String },

    /// Slide direction outside up / down / left / right.
    #[error("Unknown slide direction '{name}'")]
    UnknownDirection { name: String },

    /// Configuration rejected by validation.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Configuration JSON could not be parsed.
    #[error("Config parse error: {reason}")]
    ConfigParse { reason: String },
}

impl MotionError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MotionError>;
