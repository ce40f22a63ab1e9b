//! Stateless helpers: touch capability, viewport width, breakpoint lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Touch indicators as reported by the host environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchSignals {
    /// `ontouchstart` is present on the window.
    pub has_touch_events: bool,
    pub max_touch_points: u32,
    /// Legacy `navigator.msMaxTouchPoints`.
    pub ms_max_touch_points: u32,
}

/// True if any touch indicator is present.
pub fn is_touch_device(signals: TouchSignals) -> bool {
    signals.has_touch_events || signals.max_touch_points > 0 || signals.ms_max_touch_points > 0
}

/// Larger of the document and window widths. Non-finite readings are ignored.
pub fn viewport_width(document_width: f64, window_width: f64) -> f64 {
    [document_width, window_width]
        .into_iter()
        .filter(|w| w.is_finite())
        .fold(0.0, f64::max)
}

/// Viewport size class, ordered from narrowest to widest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Small,
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 4] = [
        Breakpoint::Small,
        Breakpoint::Mobile,
        Breakpoint::Tablet,
        Breakpoint::Desktop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Small => "small",
            Breakpoint::Mobile => "mobile",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Breakpoint {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Breakpoint::ALL
            .into_iter()
            .find(|bp| bp.as_str() == s)
            .ok_or_else(|| MotionError::UnknownBreakpoint {
                name: s.to_string(),
            })
    }
}

/// Three ascending pixel widths at which the layout changes class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub mobile: f64,
    pub tablet: f64,
    pub desktop: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: 480.0,
            tablet: 768.0,
            desktop: 1024.0,
        }
    }
}

impl Breakpoints {
    /// Classify a width. Total over f64; NaN classifies as `Small`.
    pub fn classify(&self, width: f64) -> Breakpoint {
        if width.is_nan() || width < self.mobile {
            Breakpoint::Small
        } else if width < self.tablet {
            Breakpoint::Mobile
        } else if width < self.desktop {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.mobile < self.tablet && self.tablet < self.desktop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_default_table() {
        let bps = Breakpoints::default();
        let table = [
            (0.0, Breakpoint::Small),
            (400.0, Breakpoint::Small),
            (479.9, Breakpoint::Small),
            (480.0, Breakpoint::Mobile),
            (767.0, Breakpoint::Mobile),
            (768.0, Breakpoint::Tablet),
            (1023.0, Breakpoint::Tablet),
            (1024.0, Breakpoint::Desktop),
            (4096.0, Breakpoint::Desktop),
            (f64::INFINITY, Breakpoint::Desktop),
            (f64::NAN, Breakpoint::Small),
        ];
        for (w, expected) in table {
            assert_eq!(bps.classify(w), expected, "width {w}");
        }
    }

    #[test]
    fn breakpoint_order_and_names() {
        assert!(Breakpoint::Small < Breakpoint::Mobile);
        assert!(Breakpoint::Tablet < Breakpoint::Desktop);
        assert_eq!("tablet".parse::<Breakpoint>().unwrap(), Breakpoint::Tablet);
        assert!("huge".parse::<Breakpoint>().is_err());
        assert_eq!(
            serde_json::to_string(&Breakpoint::Mobile).unwrap(),
            "\"mobile\""
        );
    }

    #[test]
    fn touch_detection() {
        assert!(!is_touch_device(TouchSignals::default()));
        assert!(is_touch_device(TouchSignals {
            has_touch_events: true,
            ..Default::default()
        }));
        assert!(is_touch_device(TouchSignals {
            max_touch_points: 5,
            ..Default::default()
        }));
        assert!(is_touch_device(TouchSignals {
            ms_max_touch_points: 1,
            ..Default::default()
        }));
    }

    #[test]
    fn viewport_width_takes_max() {
        assert_eq!(viewport_width(1000.0, 1015.0), 1015.0);
        assert_eq!(viewport_width(800.0, 0.0), 800.0);
        assert_eq!(viewport_width(f64::NAN, 640.0), 640.0);
        assert_eq!(viewport_width(f64::NAN, f64::NAN), 0.0);
    }
}
