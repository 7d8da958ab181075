//! Embedded WGSL sources and their entry points.
//!
//! Both shaders declare the camera at `@group(0) @binding(0)`. The sprite shader also binds
//! instance transforms at group 1 and its texture + sampler at group 2.

/// Instanced, textured quads.
pub const SPRITE_WGSL: &str = include_str!("shaders/sprite.wgsl");

/// Flat-colored world-space geometry.
pub const COLOR_WGSL: &str = include_str!("shaders/color.wgsl");

/// Vertex entry point of both shaders.
pub const VERTEX_ENTRY: &str = "vs_main";

/// Fragment entry point of both shaders.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Sampling fragment entry point of the sprite shader.
pub const TEXTURED_FRAGMENT_ENTRY: &str = "fs_textured";

pub(super) fn create_module(
    device: &wgpu::Device,
    label: &str,
    source: &'static str,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}
