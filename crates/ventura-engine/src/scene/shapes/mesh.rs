use glam::Vec2;

use crate::paint::Color;
use crate::render::ColorVertex;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Flat-colored triangle list in world space.
///
/// `vertices.len()` should be a multiple of 3; the color renderer skips meshes that are not.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshCmd {
    pub vertices: Vec<ColorVertex>,
}

impl MeshCmd {
    #[inline]
    pub fn new(vertices: Vec<ColorVertex>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn is_triangle_list(&self) -> bool {
        !self.vertices.is_empty() && self.vertices.len() % 3 == 0
    }

    /// Whether the color renderer uploads this mesh: whole triangles, finite vertices.
    pub fn is_drawable(&self) -> bool {
        self.is_triangle_list() && self.vertices.iter().all(ColorVertex::is_finite)
    }
}

impl DrawList {
    /// Records a triangle-list mesh.
    #[inline]
    pub fn push_mesh(&mut self, z: ZIndex, vertices: Vec<ColorVertex>) {
        self.push(z, DrawCmd::Mesh(MeshCmd::new(vertices)));
    }

    /// Records a single triangle.
    #[inline]
    pub fn push_triangle(&mut self, z: ZIndex, vertices: [ColorVertex; 3]) {
        self.push_mesh(z, vertices.to_vec());
    }

    /// Records an axis-aligned solid rectangle centred on `center`.
    pub fn push_solid_rect(&mut self, z: ZIndex, center: Vec2, size: Vec2, color: Color) {
        let h = size * 0.5;
        let bl = ColorVertex::new(center + Vec2::new(-h.x, -h.y), color);
        let br = ColorVertex::new(center + Vec2::new(h.x, -h.y), color);
        let tr = ColorVertex::new(center + Vec2::new(h.x, h.y), color);
        let tl = ColorVertex::new(center + Vec2::new(-h.x, h.y), color);
        self.push_mesh(z, vec![bl, br, tr, tr, tl, bl]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_rect_is_two_triangles() {
        let mut list = DrawList::new();
        list.push_solid_rect(ZIndex(0), Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0), Color::BLUE);

        let DrawCmd::Mesh(mesh) = &list.items()[0].cmd else { panic!("expected mesh") };
        assert!(mesh.is_triangle_list());
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.vertices[0].position, [8.0, 9.0]);
        assert_eq!(mesh.vertices[2].position, [12.0, 11.0]);
        assert!(mesh.vertices.iter().all(|v| v.color == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn partial_triangles_are_not_a_triangle_list() {
        let v = ColorVertex::new(Vec2::ZERO, Color::WHITE);
        assert!(!MeshCmd::new(vec![v, v]).is_triangle_list());
        assert!(!MeshCmd::new(Vec::new()).is_triangle_list());
        assert!(MeshCmd::new(vec![v, v, v]).is_triangle_list());
    }
}
