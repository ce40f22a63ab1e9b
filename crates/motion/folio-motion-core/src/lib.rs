//! folio-motion core (host-agnostic)
//!
//! Animation, gesture and breakpoint logic for the portfolio front end. Host
//! facilities are reached through small traits so the same code runs under
//! the browser adapter (`folio-motion-wasm`) and in native tests:
//! - [`FrameScheduler`]: one callback per display refresh
//! - [`TimerHost`]: set/clear timeout
//! - [`StyleTarget`]: inline style writes for one element
//! - [`Viewport`]: current viewport width

pub mod completion;
pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod gesture;
pub mod ids;
pub mod listeners;
pub mod responsive;
pub mod scheduler;
pub mod style;
pub mod timing;
pub mod utils;

// Re-exports for consumers (adapters)
pub use completion::Completion;
pub use config::{AnimationConfig, Config, ResponsiveConfig, TouchConfig};
pub use controller::{
    ActiveFrame, AnimationController, AnimationSession, CompleteFn, FinishedFrame, SlideDirection,
    UpdateFn,
};
pub use easing::CubicBezier;
pub use error::{MotionError, Result};
pub use gesture::{
    GestureEvent, GestureKind, GestureRecognizer, GestureState, Listener, Point, PointerInput,
    PointerSample, PointerSource, TouchHandler,
};
pub use ids::{FrameHandle, SessionId, TimerHandle};
pub use listeners::ListenerMap;
pub use responsive::{
    BreakpointListener, BreakpointObserver, ManualViewport, ResponsiveEvent, ResponsiveHandler,
    Viewport,
};
pub use scheduler::{FrameScheduler, ManualFrames};
pub use style::{InlineStyle, StyleTarget};
pub use timing::{Debounced, ManualTimers, Throttled, TimerHost};
pub use utils::{is_touch_device, viewport_width, Breakpoint, Breakpoints, TouchSignals};
