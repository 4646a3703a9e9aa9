pub mod initial_view;
pub mod viewport_mapper;

pub use initial_view::fit_to_initial_view;
pub use viewport_mapper::{PreconditionViolation, ViewportMapper, extents, plane_point, update};
