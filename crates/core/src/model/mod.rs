pub mod session;
pub mod surface;

pub use session::{SessionError, ViewerSession};
pub use surface::{CommandQueue, Surface};
