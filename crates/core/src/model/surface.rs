use mandel_view_protocol::{
    ImageRequest, Point, Rect, SurfaceCommand, SurfaceTransform, ViewportState,
};

/// The pan/zoom widget and image element a session drives.
///
/// All calls are synchronous; the session never waits on the surface.
pub trait Surface {
    /// Where the widget currently is: the image pixel under the middle of
    /// the viewport and the widget's discrete zoom level.
    fn current_transform(&self) -> SurfaceTransform;

    /// Adopt a new logical view.
    fn apply_transform(&mut self, state: &ViewportState);

    /// Fit the displayed image into `rect`. `zoom_level_factor` is the
    /// configured `zoomToFitZoomLevelFactor` for the widget.
    fn zoom_to_fit(&mut self, rect: Rect, zoom_level_factor: f64);

    /// Replace the displayed image.
    fn show_image(&mut self, request: &ImageRequest);
}

/// A surface that records what it was told as [`SurfaceCommand`]s.
///
/// Used where the real widget lives on the other side of a boundary and
/// pulls commands instead of being called.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandQueue {
    transform: SurfaceTransform,
    commands: Vec<SurfaceCommand>,
}

impl CommandQueue {
    pub fn new(transform: SurfaceTransform) -> Self {
        Self {
            transform,
            commands: Vec::new(),
        }
    }

    /// A widget at rest: centered on a `width`x`height` image at `neutral_level`.
    pub fn at_rest(width: f64, height: f64, neutral_level: i32) -> Self {
        Self::new(SurfaceTransform {
            model_center: Point::new(width / 2.0, height / 2.0),
            zoom_level: neutral_level,
        })
    }

    /// Record the widget's latest transform, ahead of a gesture.
    pub fn set_transform(&mut self, transform: SurfaceTransform) {
        self.transform = transform;
    }

    pub fn drain(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for CommandQueue {
    fn current_transform(&self) -> SurfaceTransform {
        self.transform
    }

    fn apply_transform(&mut self, state: &ViewportState) {
        self.commands
            .push(SurfaceCommand::ApplyTransform { state: *state });
    }

    fn zoom_to_fit(&mut self, rect: Rect, zoom_level_factor: f64) {
        self.commands.push(SurfaceCommand::ZoomToFit {
            rect,
            zoom_level_factor,
        });
    }

    fn show_image(&mut self, request: &ImageRequest) {
        self.commands.push(SurfaceCommand::ShowImage {
            request: request.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_order() {
        let mut queue = CommandQueue::at_rest(900.0, 600.0, 5);
        assert_eq!(queue.current_transform().model_center, Point::new(450.0, 300.0));

        queue.apply_transform(&ViewportState::default());
        queue.zoom_to_fit(Rect::from_size(900.0, 600.0), 1.0);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[0], SurfaceCommand::ApplyTransform { .. }));
        assert!(matches!(drained[1], SurfaceCommand::ZoomToFit { .. }));
        assert!(queue.drain().is_empty());
    }
}
