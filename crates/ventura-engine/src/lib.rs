//! Ventura engine crate.
//!
//! A small wgpu 2D renderer: textured instanced sprites and flat-colored meshes,
//! hosted by a winit runtime.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod transform;

pub use transform::Transform;
