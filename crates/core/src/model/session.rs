use mandel_view_protocol::{GestureSample, ImageRequest, PlaneExtents, Rect, ViewportState};
use thiserror::Error;

use crate::config::{ConfigError, ViewerConfig};
use crate::model::surface::Surface;
use crate::views::{PreconditionViolation, ViewportMapper, fit_to_initial_view};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("gesture rejected: {0}")]
    Precondition(#[from] PreconditionViolation),
}

/// One viewing session: the logical view state plus the surface showing it.
///
/// Each event is handled to completion before returning. The session owns
/// the only copy of the [`ViewportState`]; the surface just gets told.
#[derive(Debug)]
pub struct ViewerSession<S> {
    config: ViewerConfig,
    mapper: ViewportMapper,
    state: ViewportState,
    surface: S,
    /// Set while an image has been requested and its load not yet seen.
    awaiting_load: bool,
}

impl<S: Surface> ViewerSession<S> {
    /// Validate `config`, start at its initial state, and request the
    /// first image.
    pub fn new(config: ViewerConfig, surface: S) -> Result<Self, SessionError> {
        config.validate()?;
        let mapper = ViewportMapper::new(config.gesture).map_err(ConfigError::from)?;
        let mut session = Self {
            state: config.initial_state,
            config,
            mapper,
            surface,
            awaiting_load: false,
        };
        session.request_image();
        Ok(session)
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Plane rectangle covered by the current state.
    pub fn extents(&self) -> PlaneExtents {
        self.mapper.extents(&self.state)
    }

    /// The image matching the current state.
    pub fn image_request(&self) -> ImageRequest {
        ImageRequest::for_state(
            &self.state,
            self.config.viewport_width,
            self.config.viewport_height,
            &self.config.colors,
            self.config.color_spacing,
        )
    }

    /// Whether an image load signal would currently be acted on.
    pub fn is_awaiting_load(&self) -> bool {
        self.awaiting_load
    }

    /// Fold the surface's current pan/zoom into the logical view.
    ///
    /// On success the new state is applied to the surface and the matching
    /// image requested. On failure nothing changes.
    pub fn on_gesture(&mut self) -> Result<ViewportState, SessionError> {
        let transform = self.surface.current_transform();
        let (width, height) = self.config.viewport_size();
        let sample = GestureSample {
            pointer_x: transform.model_center.x,
            pointer_y: transform.model_center.y,
            viewport_width: width,
            viewport_height: height,
            gesture_zoom_level: transform.zoom_level,
        };

        let next = match self.mapper.update(&self.state, &sample) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(?sample, error = %e, "rejected gesture");
                return Err(e.into());
            }
        };

        tracing::debug!(
            center_x = next.center_x,
            center_y = next.center_y,
            zoom = next.zoom,
            level = sample.gesture_zoom_level,
            "applied gesture"
        );
        self.state = next;
        self.surface.apply_transform(&self.state);
        self.request_image();
        Ok(next)
    }

    /// Handle the image-loaded signal.
    ///
    /// Fits the surface to the viewport once per requested image; repeated
    /// signals for the same image are ignored and return `None`.
    pub fn on_image_load(&mut self) -> Option<Rect> {
        if !self.awaiting_load {
            tracing::warn!("image load signal with no image pending, ignoring");
            return None;
        }
        self.awaiting_load = false;

        let (width, height) = self.config.viewport_size();
        let rect = fit_to_initial_view(width, height);
        tracing::debug!(width, height, "fitting surface to initial view");
        self.surface
            .zoom_to_fit(rect, self.config.gesture.zoom_to_fit_zoom_level_factor);
        Some(rect)
    }

    /// Return to the configured initial state.
    pub fn reset(&mut self) {
        self.state = self.config.initial_state;
        self.surface.apply_transform(&self.state);
        self.request_image();
    }

    fn request_image(&mut self) {
        let request = self.image_request();
        self.surface.show_image(&request);
        self.awaiting_load = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::surface::CommandQueue;
    use mandel_view_protocol::{Point, SurfaceCommand, SurfaceTransform};

    fn session() -> ViewerSession<CommandQueue> {
        ViewerSession::new(
            ViewerConfig::default(),
            CommandQueue::at_rest(900.0, 600.0, 5),
        )
        .unwrap()
    }

    #[test]
    fn new_session_requests_initial_image() {
        let mut s = session();
        assert_eq!(*s.state(), ViewportState::default());
        assert!(s.is_awaiting_load());
        let cmds = s.surface_mut().drain();
        assert_eq!(cmds.len(), 1);
        let SurfaceCommand::ShowImage { request } = &cmds[0] else {
            unreachable!("expected ShowImage, got {cmds:?}");
        };
        assert_eq!(request.center, Point::new(-0.5, 0.0));
        assert_eq!(request.width, 900);
    }

    #[test]
    fn image_load_fits_once() {
        let mut s = session();
        s.surface_mut().drain();

        assert_eq!(s.on_image_load(), Some(Rect::from_size(900.0, 600.0)));
        assert_eq!(s.on_image_load(), None);
        assert_eq!(
            s.surface_mut().drain(),
            vec![SurfaceCommand::ZoomToFit {
                rect: Rect::from_size(900.0, 600.0),
                zoom_level_factor: 1.0,
            }]
        );
        // State is display-only for fitting.
        assert_eq!(*s.state(), ViewportState::default());
    }

    #[test]
    fn fit_carries_configured_zoom_level_factor() {
        let mut config = ViewerConfig::default();
        config.gesture.zoom_to_fit_zoom_level_factor = 0.75;
        let mut s =
            ViewerSession::new(config, CommandQueue::at_rest(900.0, 600.0, 5)).unwrap();
        s.surface_mut().drain();

        s.on_image_load();
        assert_eq!(
            s.surface_mut().drain(),
            vec![SurfaceCommand::ZoomToFit {
                rect: Rect::from_size(900.0, 600.0),
                zoom_level_factor: 0.75,
            }]
        );
    }

    #[test]
    fn gesture_updates_state_and_requests_image() {
        let mut s = session();
        s.on_image_load();
        s.surface_mut().drain();

        s.surface_mut().set_transform(SurfaceTransform {
            model_center: Point::new(450.0, 300.0),
            zoom_level: 6,
        });
        let next = s.on_gesture().unwrap();
        assert!((next.zoom - 1.5).abs() < 1e-12);
        assert_eq!(next.center_x, -0.5);
        assert!(s.is_awaiting_load());

        let cmds = s.surface_mut().drain();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0], SurfaceCommand::ApplyTransform { state: next });
        let SurfaceCommand::ShowImage { request } = &cmds[1] else {
            unreachable!("expected ShowImage, got {cmds:?}");
        };
        assert!((request.zoom - 1.5).abs() < 1e-12);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut s = session();
        s.surface_mut().set_transform(SurfaceTransform {
            model_center: Point::new(900.0, 600.0),
            zoom_level: 8,
        });
        s.on_gesture().unwrap();
        assert_ne!(*s.state(), ViewportState::default());
        s.reset();
        assert_eq!(*s.state(), ViewportState::default());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ViewerConfig {
            viewport_width: 0,
            ..ViewerConfig::default()
        };
        let err = ViewerSession::new(config, CommandQueue::at_rest(0.0, 0.0, 5)).unwrap_err();
        assert!(matches!(err, SessionError::Config(ConfigError::Invalid(_))));
    }
}
