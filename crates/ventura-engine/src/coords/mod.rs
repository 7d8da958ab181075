//! Screen-space sizing shared by the camera and renderers.
//!
//! World space is y-up with the camera centred on its position; the viewport
//! only fixes how many logical pixels the visible region spans.

mod viewport;

pub use viewport::Viewport;
