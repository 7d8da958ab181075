use crate::scene::{DrawCmd, DrawList, ZIndex};
use crate::transform::Transform;

/// Sprite draw payload: one instance of the unit sprite quad.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteCmd {
    pub transform: Transform,
}

impl SpriteCmd {
    #[inline]
    pub fn new(transform: Transform) -> Self {
        Self { transform }
    }

    /// Whether the sprite renderer uploads this sprite. Non-finite transforms are dropped.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.transform.is_finite()
    }
}

impl DrawList {
    /// Records a sprite draw command.
    #[inline]
    pub fn push_sprite(&mut self, z: ZIndex, transform: Transform) {
        self.push(z, DrawCmd::Sprite(SpriteCmd::new(transform)));
    }
}
