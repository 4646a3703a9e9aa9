pub mod commands;
pub mod request;
pub mod types;
pub mod viewport;

pub use commands::SurfaceCommand;
pub use request::{ImageRequest, RENDER_PATH, RequestError};
pub use types::{Point, Rect};
pub use viewport::{
    GestureConfig, GestureSample, InvalidGestureConfig, InvalidState, PlaneExtents,
    SurfaceTransform, ViewportState,
};
