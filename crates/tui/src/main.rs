mod renderer;
mod surface;

use anyhow::{Context, Result};
use mandel_view_core::{ViewerConfig, ViewerSession};
use tracing_subscriber::EnvFilter;

use crate::surface::TerminalSurface;

fn main() -> Result<()> {
    // Off by default: the terminal is in raw mode. Redirect stderr to keep logs.
    let filter =
        EnvFilter::try_from_env("MANDEL_VIEW_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => ViewerConfig::default(),
    };

    tracing::info!(
        width = config.viewport_width,
        height = config.viewport_height,
        "starting viewer"
    );

    let (width, height) = config.viewport_size();
    let surface = TerminalSurface::new(
        width,
        height,
        config.gesture.neutral_zoom_level,
        config.gesture.zoom_levels,
    );
    let mut session = ViewerSession::new(config, surface)?;

    renderer::run_tui(&mut session)
}
