use super::shapes::mesh::MeshCmd;
use super::shapes::sprite::SpriteCmd;

/// Renderer-agnostic draw command stream.
///
/// `Sprite` commands are consumed by `render::SpriteRenderer`, `Mesh` commands by
/// `render::ColorRenderer`. Each renderer skips the variants it does not own.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Sprite(SpriteCmd),
    Mesh(MeshCmd),
}
