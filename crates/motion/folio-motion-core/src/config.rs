//! Configuration for folio-motion components.
//!
//! Every section derives `Default` and `#[serde(default)]`, so a partial JSON
//! object deserializes as "defaults with these fields replaced".

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::easing::CubicBezier;
use crate::error::{MotionError, Result};
use crate::utils::Breakpoints;

/// Top-level configuration handed to each component constructor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub animation: AnimationConfig,
    pub touch: TouchConfig,
    pub responsive: ResponsiveConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub duration_ms: f64,
    pub easing: CubicBezier,
    /// Apply a `will-change` hint while a session is running.
    pub gpu_acceleration: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 300.0,
            easing: CubicBezier::default(),
            gpu_acceleration: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchConfig {
    /// Distance in px the pointer must travel before a gesture becomes a drag.
    pub threshold: f64,
    /// Per-axis velocity cap in px/ms.
    pub max_velocity: f64,
    /// Accepted for compatibility with existing page configs; gesture
    /// recognition does not read it.
    pub damping: f64,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            max_velocity: 10.0,
            damping: 0.95,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveConfig {
    pub breakpoints: Breakpoints,
    pub debounce_ms: f64,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            debounce_ms: 250.0,
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON document over the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(json).map_err(|e| MotionError::ConfigParse {
            reason: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Shallow-merge `overrides` over `self`: for each section present in
    /// `overrides`, the keys it names replace the ones in `self`.
    pub fn merged(&self, overrides: &JsonValue) -> Result<Self> {
        let mut base = serde_json::to_value(self).map_err(|e| MotionError::ConfigParse {
            reason: e.to_string(),
        })?;
        if let (Some(base_obj), Some(over_obj)) = (base.as_object_mut(), overrides.as_object()) {
            for (section, over) in over_obj {
                match (base_obj.get_mut(section), over.as_object()) {
                    (Some(JsonValue::Object(target)), Some(fields)) => {
                        for (k, v) in fields {
                            target.insert(k.clone(), v.clone());
                        }
                    }
                    _ => {
                        base_obj.insert(section.clone(), over.clone());
                    }
                }
            }
        }
        let cfg: Config = serde_json::from_value(base).map_err(|e| MotionError::ConfigParse {
            reason: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let a = &self.animation;
        if !(a.duration_ms >= 0.0) {
            return Err(MotionError::invalid_config(format!(
                "animation.duration_ms must be >= 0, got {}",
                a.duration_ms
            )));
        }
        let t = &self.touch;
        if !(t.threshold >= 0.0) {
            return Err(MotionError::invalid_config(format!(
                "touch.threshold must be >= 0, got {}",
                t.threshold
            )));
        }
        if !(t.max_velocity > 0.0) {
            return Err(MotionError::invalid_config(format!(
                "touch.max_velocity must be > 0, got {}",
                t.max_velocity
            )));
        }
        let r = &self.responsive;
        if !r.breakpoints.is_ascending() {
            let b = r.breakpoints;
            return Err(MotionError::invalid_config(format!(
                "responsive.breakpoints must ascend (mobile < tablet < desktop), got {} / {} / {}",
                b.mobile, b.tablet, b.desktop
            )));
        }
        if !(r.debounce_ms >= 0.0) {
            return Err(MotionError::invalid_config(format!(
                "responsive.debounce_ms must be >= 0, got {}",
                r.debounce_ms
            )));
        }
        Ok(())
    }
}
