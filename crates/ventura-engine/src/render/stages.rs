//! CPU evaluation of the shader stages in `shaders/*.wgsl`.
//!
//! Each function computes exactly what its WGSL counterpart computes for one invocation.
//! Used to test the math without a GPU and to reason about where sprites land on screen.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Constant output of the sprite shader's `fs_main`.
pub const SPRITE_PLACEHOLDER_COLOR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

/// Output of the sprite vertex stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteVaryings {
    pub clip_position: Vec4,
    pub tex_coords: Vec2,
}

/// Output of the color vertex stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorVaryings {
    pub clip_position: Vec4,
    pub color: Vec4,
}

// ── sprite ────────────────────────────────────────────────────────────────

/// Sprite `vs_main` for one vertex of one instance.
#[inline]
pub fn sprite_vertex(
    view_projection: Mat4,
    instance_transform: Mat4,
    position: Vec2,
    tex_coords: Vec2,
) -> SpriteVaryings {
    SpriteVaryings {
        clip_position: view_projection * instance_transform * position.extend(0.0).extend(1.0),
        tex_coords,
    }
}

/// Sprite `fs_main`. Texture coordinates are ignored.
#[inline]
pub fn sprite_fragment(_tex_coords: Vec2) -> Vec4 {
    SPRITE_PLACEHOLDER_COLOR
}

/// Runs the sprite vertex stage the way an instanced draw does: for every instance in
/// order, every vertex in order.
///
/// The result is instance-major: `out[i * vertices.len() + v]` belongs to instance `i`.
pub fn sprite_draw_vertices(
    view_projection: Mat4,
    instances: &[Mat4],
    vertices: &[(Vec2, Vec2)],
) -> Vec<SpriteVaryings> {
    let mut out = Vec::with_capacity(instances.len() * vertices.len());
    for transform in instances {
        for &(position, tex_coords) in vertices {
            out.push(sprite_vertex(view_projection, *transform, position, tex_coords));
        }
    }
    out
}

// ── color ─────────────────────────────────────────────────────────────────

/// Color `vs_main`. Alpha is always `1.0`.
#[inline]
pub fn color_vertex(view_projection: Mat4, position: Vec2, color: Vec3) -> ColorVaryings {
    ColorVaryings {
        clip_position: view_projection * position.extend(0.0).extend(1.0),
        color: color.extend(1.0),
    }
}

/// Color `fs_main`.
#[inline]
pub fn color_fragment(color: Vec4) -> Vec4 {
    color
}
