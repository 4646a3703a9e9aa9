use mandel_view_core::Surface;
use mandel_view_protocol::{ImageRequest, Point, Rect, SurfaceTransform, ViewportState};

/// Fraction of the viewport one arrow key press pans by.
const PAN_STEP: f64 = 0.1;

/// Keyboard stand-in for the browser's pan/zoom widget.
///
/// Arrow keys move the model point under the viewport center, `+`/`-` move
/// the zoom level. Nothing reaches the session until the gesture is committed.
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    width: f64,
    height: f64,
    neutral_level: i32,
    max_level: i32,
    model_center: Point,
    zoom_level: i32,
    image: Option<ImageRequest>,
    image_loaded: bool,
}

impl TerminalSurface {
    pub fn new(width: f64, height: f64, neutral_level: i32, zoom_levels: i32) -> Self {
        Self {
            width,
            height,
            neutral_level,
            max_level: (zoom_levels - 1).max(neutral_level),
            model_center: Point::new(width / 2.0, height / 2.0),
            zoom_level: neutral_level,
            image: None,
            image_loaded: false,
        }
    }

    pub fn pan(&mut self, steps_x: i32, steps_y: i32) {
        self.model_center.x += f64::from(steps_x) * self.width * PAN_STEP;
        self.model_center.y += f64::from(steps_y) * self.height * PAN_STEP;
    }

    pub fn zoom_in(&mut self) {
        self.zoom_level = (self.zoom_level + 1).min(self.max_level);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_level = (self.zoom_level - 1).max(0);
    }

    pub fn image(&self) -> Option<&ImageRequest> {
        self.image.as_ref()
    }

    /// The terminal has nothing to fetch, so a shown image is ready at once.
    /// Returns whether a load should be signalled.
    pub fn poll_loaded(&mut self) -> bool {
        if self.image.is_some() && !self.image_loaded {
            self.image_loaded = true;
            return true;
        }
        false
    }

    /// Pending pan as a fraction of the viewport, for display.
    pub fn pending_offset(&self) -> (f64, f64) {
        (
            self.model_center.x / self.width - 0.5,
            self.model_center.y / self.height - 0.5,
        )
    }
}

impl Surface for TerminalSurface {
    fn current_transform(&self) -> SurfaceTransform {
        SurfaceTransform {
            model_center: self.model_center,
            zoom_level: self.zoom_level,
        }
    }

    fn apply_transform(&mut self, _state: &ViewportState) {
        // The image is re-requested for every state; the widget itself
        // resets when the new image is fitted.
    }

    fn zoom_to_fit(&mut self, rect: Rect, _zoom_level_factor: f64) {
        self.model_center = rect.center();
        self.zoom_level = self.neutral_level;
    }

    fn show_image(&mut self, request: &ImageRequest) {
        self.image = Some(request.clone());
        self.image_loaded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandel_view_core::{ViewerConfig, ViewerSession};

    #[test]
    fn keyboard_gesture_round_trip() {
        let config = ViewerConfig::default();
        let (w, h) = config.viewport_size();
        let surface = TerminalSurface::new(w, h, 5, 12);
        let mut session = ViewerSession::new(config, surface).unwrap();

        assert!(session.surface_mut().poll_loaded());
        session.on_image_load();
        assert!(!session.surface_mut().poll_loaded());

        // Five steps right = half a viewport = half the plane width.
        session.surface_mut().pan(5, 0);
        session.surface_mut().zoom_in();
        let state = session.on_gesture().unwrap();
        assert!((state.center_x - 1.0).abs() < 1e-9);
        assert!((state.zoom - 1.5).abs() < 1e-12);

        assert!(session.surface_mut().poll_loaded());
        session.on_image_load();
        assert_eq!(session.surface().pending_offset(), (0.0, 0.0));
        assert_eq!(session.surface().current_transform().zoom_level, 5);
    }

    #[test]
    fn zoom_level_stays_in_range() {
        let mut surface = TerminalSurface::new(900.0, 600.0, 5, 12);
        for _ in 0..20 {
            surface.zoom_in();
        }
        assert_eq!(surface.current_transform().zoom_level, 11);
        for _ in 0..20 {
            surface.zoom_out();
        }
        assert_eq!(surface.current_transform().zoom_level, 0);
    }
}
