use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Point;

/// The region of the complex plane currently on display.
///
/// `center_x`/`center_y` locate the plane point under the middle of the
/// viewport; `zoom` is the magnification relative to the default extents
/// (larger = closer). `zoom` is always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
}

impl ViewportState {
    pub const DEFAULT_CENTER_X: f64 = -0.5;
    pub const DEFAULT_CENTER_Y: f64 = 0.0;
    pub const DEFAULT_ZOOM: f64 = 1.0;

    /// Build a state, rejecting zooms that are not finite and positive.
    pub fn new(center_x: f64, center_y: f64, zoom: f64) -> Result<Self, InvalidState> {
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(InvalidState::Zoom(zoom));
        }
        if !(center_x.is_finite() && center_y.is_finite()) {
            return Err(InvalidState::Center(center_x, center_y));
        }
        Ok(Self {
            center_x,
            center_y,
            zoom,
        })
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    pub fn is_valid(&self) -> bool {
        Self::new(self.center_x, self.center_y, self.zoom).is_ok()
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            center_x: Self::DEFAULT_CENTER_X,
            center_y: Self::DEFAULT_CENTER_Y,
            zoom: Self::DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidState {
    #[error("zoom must be finite and positive, got {0}")]
    Zoom(f64),
    #[error("center must be finite, got ({0}, {1})")]
    Center(f64, f64),
}

/// Tuning for turning the widget's discrete zoom level into a scale factor.
///
/// Passed by value into every update; nothing reads it from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GestureConfig {
    /// Number of discrete levels the widget offers. Informational.
    pub zoom_levels: i32,
    /// Level at which the scale factor is exactly 1.
    pub neutral_zoom_level: i32,
    /// Multiplicative scale applied per level above or below neutral.
    pub scale_per_zoom_level: f64,
    /// Forwarded to the pan/zoom widget when it fits the image.
    pub zoom_to_fit_zoom_level_factor: f64,
    /// Width of the plane visible at zoom 1.
    pub plane_width: f64,
    /// Height of the plane visible at zoom 1.
    pub plane_height: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            zoom_levels: 12,
            neutral_zoom_level: 5,
            scale_per_zoom_level: 1.5,
            zoom_to_fit_zoom_level_factor: 1.0,
            plane_width: 3.0,
            plane_height: 2.0,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), InvalidGestureConfig> {
        if !(self.scale_per_zoom_level.is_finite() && self.scale_per_zoom_level > 0.0) {
            return Err(InvalidGestureConfig::ScalePerZoomLevel(
                self.scale_per_zoom_level,
            ));
        }
        if self.neutral_zoom_level < 0 || self.neutral_zoom_level >= self.zoom_levels {
            return Err(InvalidGestureConfig::NeutralZoomLevel {
                neutral: self.neutral_zoom_level,
                levels: self.zoom_levels,
            });
        }
        let extents_ok = |v: f64| v.is_finite() && v > 0.0;
        if !(extents_ok(self.plane_width) && extents_ok(self.plane_height)) {
            return Err(InvalidGestureConfig::PlaneExtents {
                width: self.plane_width,
                height: self.plane_height,
            });
        }
        Ok(())
    }

    /// Scale factor for a widget level: `scale_per_zoom_level ^ (level - neutral)`.
    pub fn level_scale(&self, zoom_level: i32) -> f64 {
        let delta = i64::from(zoom_level) - i64::from(self.neutral_zoom_level);
        // powi takes i32; deltas beyond that range saturate to 0 or inf anyway.
        let delta = delta.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        self.scale_per_zoom_level.powi(delta)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidGestureConfig {
    #[error("scalePerZoomLevel must be finite and positive, got {0}")]
    ScalePerZoomLevel(f64),
    #[error("neutralZoomLevel {neutral} outside [0, {levels})")]
    NeutralZoomLevel { neutral: i32, levels: i32 },
    #[error("plane extents must be finite and positive, got {width}x{height}")]
    PlaneExtents { width: f64, height: f64 },
}

/// One pointer/zoom observation, consumed by a single update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureSample {
    pub pointer_x: f64,
    pub pointer_y: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub gesture_zoom_level: i32,
}

/// What the pan/zoom widget reports about its own transform.
///
/// `model_center` is the image pixel currently under the middle of the
/// viewport, which becomes the gesture's pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceTransform {
    pub model_center: Point,
    pub zoom_level: i32,
}

/// Rectangle of the plane covered by a [`ViewportState`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneExtents {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlaneExtents {
    pub fn max_x(&self) -> f64 {
        self.min_x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.min_y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_matches_initial_view() {
        let s = ViewportState::default();
        assert_eq!(s.center_x, -0.5);
        assert_eq!(s.center_y, 0.0);
        assert_eq!(s.zoom, 1.0);
        assert!(s.is_valid());
    }

    #[test]
    fn rejects_non_positive_zoom() {
        assert_eq!(
            ViewportState::new(0.0, 0.0, 0.0),
            Err(InvalidState::Zoom(0.0))
        );
        assert!(ViewportState::new(0.0, 0.0, -2.0).is_err());
        assert!(ViewportState::new(0.0, 0.0, f64::NAN).is_err());
        assert!(ViewportState::new(f64::INFINITY, 0.0, 1.0).is_err());
    }

    #[test]
    fn default_gesture_config_is_valid() {
        assert_eq!(GestureConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_catches_bad_config() {
        let bad_scale = GestureConfig {
            scale_per_zoom_level: 0.0,
            ..GestureConfig::default()
        };
        assert!(matches!(
            bad_scale.validate(),
            Err(InvalidGestureConfig::ScalePerZoomLevel(_))
        ));

        let bad_neutral = GestureConfig {
            neutral_zoom_level: 12,
            ..GestureConfig::default()
        };
        assert!(matches!(
            bad_neutral.validate(),
            Err(InvalidGestureConfig::NeutralZoomLevel { .. })
        ));

        let bad_plane = GestureConfig {
            plane_height: -1.0,
            ..GestureConfig::default()
        };
        assert!(matches!(
            bad_plane.validate(),
            Err(InvalidGestureConfig::PlaneExtents { .. })
        ));
    }

    #[test]
    fn level_scale_is_exponential_in_delta() {
        let config = GestureConfig::default();
        assert_eq!(config.level_scale(5), 1.0);
        assert!((config.level_scale(6) - 1.5).abs() < f64::EPSILON);
        assert!((config.level_scale(4) - 1.0 / 1.5).abs() < 1e-12);
        assert!((config.level_scale(7) - 2.25).abs() < 1e-12);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(ViewportState::default()).unwrap();
        assert_eq!(json["centerX"], -0.5);
        let config: GestureConfig =
            serde_json::from_str(r#"{"neutralZoomLevel": 3}"#).unwrap();
        assert_eq!(config.neutral_zoom_level, 3);
        assert_eq!(config.zoom_levels, 12);
    }
}
