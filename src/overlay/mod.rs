pub mod layout;
pub mod renderer;
pub mod session;
pub mod state;
pub mod style;
pub mod surface;
pub mod window;

pub use layout::{layout_dots, DotDescriptor, Edge, Point};
pub use renderer::CueRenderer;
pub use session::{OverlaySession, SurfaceBinding};
pub use state::SessionState;
pub use style::DotStyle;
pub use surface::SurfaceRect;
