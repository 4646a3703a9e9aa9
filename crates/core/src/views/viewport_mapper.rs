use mandel_view_protocol::{
    GestureConfig, GestureSample, InvalidGestureConfig, PlaneExtents, Point, ViewportState,
};
use thiserror::Error;

/// Inputs that violate the mapper's contract.
///
/// The mapping is total over valid inputs; these are returned instead of
/// letting a division by zero leak NaN or infinity into the view state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionViolation {
    #[error("viewport must have positive size, got {width}x{height}")]
    NonPositiveViewport { width: f64, height: f64 },
    #[error("prior zoom must be finite and positive, got {0}")]
    NonPositiveZoom(f64),
    #[error("zoom level {level} scales zoom out of range ({zoom})")]
    ZoomOutOfRange { level: i32, zoom: f64 },
}

/// Apply one pan/zoom gesture to a viewport state.
///
/// The center moves toward the pointer by its offset from the middle of the
/// viewport, measured in viewport fractions and scaled to the plane extents
/// visible at the *prior* zoom. The zoom is then multiplied by
/// `scale_per_zoom_level ^ (level - neutral)`.
///
/// A pointer at the exact middle of the viewport leaves the center alone;
/// a gesture at the neutral level leaves the zoom alone.
pub fn update(
    state: &ViewportState,
    config: &GestureConfig,
    sample: &GestureSample,
) -> Result<ViewportState, PreconditionViolation> {
    check_viewport(sample.viewport_width, sample.viewport_height)?;
    check_zoom(state.zoom)?;

    let level_scale = config.level_scale(sample.gesture_zoom_level);

    let dx = sample.pointer_x - sample.viewport_width / 2.0;
    let dy = sample.pointer_y - sample.viewport_height / 2.0;

    let center_x = state.center_x + (dx / sample.viewport_width) / state.zoom * config.plane_width;
    let center_y =
        state.center_y + (dy / sample.viewport_height) / state.zoom * config.plane_height;

    let zoom = state.zoom * level_scale;
    if !(zoom.is_finite() && zoom > 0.0) {
        return Err(PreconditionViolation::ZoomOutOfRange {
            level: sample.gesture_zoom_level,
            zoom,
        });
    }

    Ok(ViewportState {
        center_x,
        center_y,
        zoom,
    })
}

/// The rectangle of the plane shown for `state`.
pub fn extents(state: &ViewportState, config: &GestureConfig) -> PlaneExtents {
    let width = config.plane_width / state.zoom;
    let height = config.plane_height / state.zoom;
    PlaneExtents {
        min_x: state.center_x - width / 2.0,
        min_y: state.center_y - height / 2.0,
        width,
        height,
    }
}

/// Map a viewport pixel to the plane point rendered there.
///
/// Pixel `(0, 0)` is the top-left corner and lands on `(min_x, min_y)`.
pub fn plane_point(
    state: &ViewportState,
    config: &GestureConfig,
    pixel: Point,
    viewport_width: f64,
    viewport_height: f64,
) -> Result<Point, PreconditionViolation> {
    check_viewport(viewport_width, viewport_height)?;
    check_zoom(state.zoom)?;
    let ext = extents(state, config);
    Ok(Point::new(
        pixel.x / viewport_width * ext.width + ext.min_x,
        pixel.y / viewport_height * ext.height + ext.min_y,
    ))
}

fn check_viewport(width: f64, height: f64) -> Result<(), PreconditionViolation> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if positive(width) && positive(height) {
        Ok(())
    } else {
        Err(PreconditionViolation::NonPositiveViewport { width, height })
    }
}

fn check_zoom(zoom: f64) -> Result<(), PreconditionViolation> {
    if zoom.is_finite() && zoom > 0.0 {
        Ok(())
    } else {
        Err(PreconditionViolation::NonPositiveZoom(zoom))
    }
}

/// A [`GestureConfig`] that has passed validation, bundled with the
/// mapping operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMapper {
    config: GestureConfig,
}

impl ViewportMapper {
    pub fn new(config: GestureConfig) -> Result<Self, InvalidGestureConfig> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn update(
        &self,
        state: &ViewportState,
        sample: &GestureSample,
    ) -> Result<ViewportState, PreconditionViolation> {
        update(state, &self.config, sample)
    }

    pub fn extents(&self, state: &ViewportState) -> PlaneExtents {
        extents(state, &self.config)
    }

    pub fn plane_point(
        &self,
        state: &ViewportState,
        pixel: Point,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<Point, PreconditionViolation> {
        plane_point(state, &self.config, pixel, viewport_width, viewport_height)
    }
}
