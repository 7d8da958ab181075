use glam::{Mat4, Vec2};

/// Position, orientation and size of an object in world space.
///
/// World space is y-up and measured in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Counter-clockwise rotation in radians.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    /// Default sprite edge length. The sprite quad is a unit square.
    pub const DEFAULT_SCALE: Vec2 = Vec2::splat(32.0);

    #[inline]
    pub const fn new(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self { position, rotation, scale }
    }

    #[inline]
    pub fn from_translation(x: f32, y: f32) -> Self {
        Self { position: Vec2::new(x, y), ..Default::default() }
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the per-axis scale.
    ///
    /// Exactly one negative component mirrors the sprite quad, which flips its winding to
    /// clockwise; the sprite pipeline culls back faces, so such a sprite is not drawn.
    /// Negating both axes is a half turn and stays visible.
    #[inline]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// `translation * rotation * scale`.
    pub fn matrix(&self) -> Mat4 {
        let translation = Mat4::from_translation(self.position.extend(0.0));
        let rotation = Mat4::from_rotation_z(self.rotation);
        let scale = Mat4::from_scale(self.scale.extend(1.0));

        translation * rotation * scale
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0.0, Self::DEFAULT_SCALE)
    }
}

impl From<Transform> for Mat4 {
    fn from(value: Transform) -> Self {
        value.matrix()
    }
}
