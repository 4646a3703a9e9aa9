use mandel_view_protocol::Rect;

/// Region the surface should fit once the backing image has loaded.
///
/// Display-only: the logical viewport state is untouched, the widget just
/// snaps its own transform back to the full surface.
pub fn fit_to_initial_view(viewport_width: f64, viewport_height: f64) -> Rect {
    Rect::from_size(viewport_width, viewport_height)
}
