//! Vertex records uploaded to the GPU.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::paint::Color;

// ── sprite vertex ─────────────────────────────────────────────────────────

/// Sprite quad corner: local position + texture coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // tex_coords
    ];

    #[inline]
    pub const fn new(position: [f32; 2], tex_coords: [f32; 2]) -> Self {
        Self { position, tex_coords }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Unit quad centred on the origin, y up. Texture v grows downwards.
pub const SPRITE_QUAD_VERTICES: [SpriteVertex; 4] = [
    SpriteVertex::new([-0.5, 0.5], [0.0, 0.0]),  // top left
    SpriteVertex::new([-0.5, -0.5], [0.0, 1.0]), // bottom left
    SpriteVertex::new([0.5, -0.5], [1.0, 1.0]),  // bottom right
    SpriteVertex::new([0.5, 0.5], [1.0, 0.0]),   // top right
];

/// Two counter-clockwise triangles over [`SPRITE_QUAD_VERTICES`].
pub const SPRITE_QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

// ── color vertex ──────────────────────────────────────────────────────────

/// World-space vertex with an opaque RGB color.
///
/// Alpha is not stored; the color shader writes `1.0`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl ColorVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x3  // color
    ];

    #[inline]
    pub fn new(position: Vec2, color: Color) -> Self {
        Self { position: position.to_array(), color: color.rgb_array() }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }

    #[inline]
    pub fn color(&self) -> Vec3 {
        Vec3::from_array(self.color)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position().is_finite() && self.color().is_finite()
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
