use serde::{Deserialize, Serialize};

use crate::request::ImageRequest;
use crate::types::Rect;
use crate::viewport::ViewportState;

/// A single instruction for the rendering surface.
///
/// Front ends that cannot implement the core's `Surface` trait directly
/// (e.g. across the WASM boundary) receive these instead and apply them in
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceCommand {
    /// Fit the displayed image into this pixel region, with the widget's
    /// zoom-level factor for fitting.
    ZoomToFit {
        rect: Rect,
        #[serde(rename = "zoomToFitZoomLevelFactor")]
        zoom_level_factor: f64,
    },

    /// Adopt a new logical view.
    ApplyTransform { state: ViewportState },

    /// Swap the displayed image for the one described here.
    ShowImage { request: ImageRequest },
}
