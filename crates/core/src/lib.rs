//! Pan/zoom viewport mapping for a pre-rendered Mandelbrot image.
//!
//! [`views`] holds the pure transforms, [`model`] wires them to a rendering
//! [`Surface`](model::Surface), and [`config`] loads the tuning.

pub mod config;
pub mod model;
pub mod views;

pub use config::{ConfigError, ViewerConfig};
pub use model::{CommandQueue, SessionError, Surface, ViewerSession};
pub use views::{PreconditionViolation, ViewportMapper};
