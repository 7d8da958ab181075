//! Orthographic 2D camera and its GPU uniform.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

use crate::coords::Viewport;

/// Camera looking down -Z at the world plane, centred on `position`.
///
/// One world unit maps to one logical pixel at `zoom == 1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2d {
    pub position: Vec2,
    /// Counter-clockwise camera roll in radians.
    pub rotation: f32,
    /// Magnification; clamped to `[MIN_ZOOM, MAX_ZOOM]` when building matrices.
    pub zoom: f32,
}

impl Camera2d {
    pub const MIN_ZOOM: f32 = 0.05;
    pub const MAX_ZOOM: f32 = 32.0;

    #[inline]
    pub const fn new(position: Vec2) -> Self {
        Self { position, rotation: 0.0, zoom: 1.0 }
    }

    #[inline]
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    fn effective_zoom(&self) -> f32 {
        if self.zoom.is_finite() {
            self.zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM)
        } else {
            1.0
        }
    }

    /// World → view. Inverse of `T(position) · R(rotation) · S(1 / zoom)`.
    pub fn view(&self) -> Mat4 {
        let zoom = self.effective_zoom();
        Mat4::from_scale(glam::Vec3::new(zoom, zoom, 1.0))
            * Mat4::from_rotation_z(-self.rotation)
            * Mat4::from_translation(-self.position.extend(0.0))
    }

    /// View → clip. The viewport's logical size spans the clip-space square.
    pub fn projection(viewport: Viewport) -> Mat4 {
        let half_width = viewport.width.max(1.0) / 2.0;
        let half_height = viewport.height.max(1.0) / 2.0;
        Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, -1.0, 1.0)
    }

    pub fn view_projection(&self, viewport: Viewport) -> Mat4 {
        Self::projection(viewport) * self.view()
    }
}

impl Default for Camera2d {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

/// View-projection matrix as uploaded to `@group(0) @binding(0)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
}

impl CameraUniform {
    #[inline]
    pub fn new(view_projection: Mat4) -> Self {
        Self { view_projection: view_projection.to_cols_array_2d() }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    fn clip(camera: &Camera2d, viewport: Viewport, p: Vec2) -> Vec4 {
        camera.view_projection(viewport) * Vec4::new(p.x, p.y, 0.0, 1.0)
    }

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    const VP: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn origin_maps_to_clip_centre() {
        let c = clip(&Camera2d::default(), VP, Vec2::ZERO);
        assert!(approx(c, Vec4::new(0.0, 0.0, c.z, 1.0)));
        assert!((0.0..=1.0).contains(&c.z), "depth {} outside wgpu range", c.z);
    }

    #[test]
    fn viewport_corner_maps_to_clip_corner() {
        let c = clip(&Camera2d::default(), VP, Vec2::new(400.0, 300.0));
        assert!(approx(c, Vec4::new(1.0, 1.0, c.z, 1.0)), "got {c}");

        let c = clip(&Camera2d::default(), VP, Vec2::new(-400.0, -300.0));
        assert!(approx(c, Vec4::new(-1.0, -1.0, c.z, 1.0)), "got {c}");
    }

    #[test]
    fn camera_position_is_screen_centre() {
        let camera = Camera2d::new(Vec2::new(100.0, -50.0));
        let c = clip(&camera, VP, Vec2::new(100.0, -50.0));
        assert!(approx(c, Vec4::new(0.0, 0.0, c.z, 1.0)), "got {c}");
    }

    #[test]
    fn zoom_magnifies() {
        let camera = Camera2d::default().with_zoom(2.0);
        let c = clip(&camera, VP, Vec2::new(200.0, 150.0));
        assert!(approx(c, Vec4::new(1.0, 1.0, c.z, 1.0)), "got {c}");
    }

    #[test]
    fn zoom_is_clamped_and_sanitized() {
        let tiny = Camera2d::default().with_zoom(0.0);
        assert_eq!(tiny.view(), Camera2d::default().with_zoom(Camera2d::MIN_ZOOM).view());

        let nan = Camera2d::default().with_zoom(f32::NAN);
        assert_eq!(nan.view(), Camera2d::default().view());
    }

    #[test]
    fn rotation_rolls_the_view() {
        let camera = Camera2d::default().with_rotation(std::f32::consts::FRAC_PI_2);
        // A point on the camera's local +X axis (world +Y) appears to the right.
        let v = camera.view().transform_point3(Vec3::new(0.0, 10.0, 0.0));
        assert!((v - Vec3::new(10.0, 0.0, 0.0)).abs().max_element() < 1e-4, "got {v}");
    }

    #[test]
    fn degenerate_viewport_does_not_produce_infinities() {
        let m = Camera2d::default().view_projection(Viewport::new(0.0, 0.0));
        assert!(m.is_finite());
    }

    #[test]
    fn uniform_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let u = CameraUniform::new(m);
        assert_eq!(u.view_projection[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
    }
}
