//! GPU rendering subsystem.
//!
//! Renderers consume `scene` draw streams and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers).
//! `SceneRenderer` interleaves both pipelines in z order within one pass.
//!
//! Convention:
//! - CPU geometry is in world units (logical pixels at zoom 1, +Y up).
//! - Vertex shaders apply the camera view-projection from `@group(0) @binding(0)`.

mod common;
mod ctx;
#[cfg(test)]
mod shader_eval;

pub mod binding;
pub mod camera;
pub mod color;
pub mod scene_pass;
pub mod shaders;
pub mod sprite;
pub mod stages;
pub mod texture;
pub mod vertex;

pub use camera::{Camera2d, CameraUniform};
pub use color::ColorRenderer;
pub use ctx::{RenderCtx, RenderTarget};
pub use scene_pass::{PaintRun, SceneRenderer};
pub use sprite::{SpriteInstance, SpriteRenderer, SpriteShading, SpriteTexture};
pub use texture::Texture;
pub use vertex::{ColorVertex, SpriteVertex};
