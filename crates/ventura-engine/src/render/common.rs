//! Pipeline state shared by the sprite and color renderers.

use std::ops::Range;

use crate::render::binding::UniformBinding;
use crate::render::camera::CameraUniform;

/// Straight-alpha "over" blending.
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::ALPHA_BLENDING
}

/// Camera uniform for `@group(0) @binding(0)`, visible to the vertex stage.
pub(super) fn camera_binding(device: &wgpu::Device, label: &str) -> UniformBinding<CameraUniform> {
    UniformBinding::new(
        device,
        label,
        wgpu::ShaderStages::VERTEX,
        &CameraUniform::default(),
    )
}

pub(super) fn triangle_list(cull_mode: Option<wgpu::Face>) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

/// Intersects `range` with `0..len`. Inverted ranges come back empty.
pub(super) fn clamp_range(range: Range<u32>, len: u32) -> Range<u32> {
    let end = range.end.min(len);
    range.start.min(end)..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_range_keeps_ranges_inside_len() {
        assert_eq!(clamp_range(2..5, 10), 2..5);
        assert_eq!(clamp_range(0..10, 10), 0..10);
    }

    #[test]
    fn clamp_range_cuts_past_len() {
        assert_eq!(clamp_range(8..20, 10), 8..10);
        assert!(clamp_range(12..20, 10).is_empty());
        assert!(clamp_range(0..4, 0).is_empty());
    }
}
