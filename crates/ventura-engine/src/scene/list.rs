use super::{DrawCmd, SortKey, ZIndex};

/// A single draw item: sort key + command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Recorded draw stream for a frame.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no per-frame allocation once warmed
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_indices.clear();
        self.sorted_dirty = true;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Pushes a draw command with the given z-index.
    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            cmd,
        });

        self.sorted_dirty = true;
    }

    /// Iterates items in paint order (back-to-front) without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Keys are unique (order is per-item), so an unstable sort is deterministic.
        let items = &self.items;
        self.sorted_indices.sort_unstable_by_key(|&i| items[i].key);

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    fn x_of(item: &DrawItem) -> f32 {
        match &item.cmd {
            DrawCmd::Sprite(s) => s.transform.position.x,
            DrawCmd::Mesh(_) => f32::NAN,
        }
    }

    #[test]
    fn paint_order_sorts_by_z_then_insertion() {
        let mut list = DrawList::new();
        list.push_sprite(ZIndex(1), Transform::from_translation(0.0, 0.0));
        list.push_sprite(ZIndex(0), Transform::from_translation(1.0, 0.0));
        list.push_sprite(ZIndex(1), Transform::from_translation(2.0, 0.0));
        list.push_sprite(ZIndex(-5), Transform::from_translation(3.0, 0.0));

        let xs: Vec<f32> = list.iter_in_paint_order().map(x_of).collect();
        assert_eq!(xs, vec![3.0, 1.0, 0.0, 2.0]);
    }

    #[test]
    fn items_keep_insertion_order() {
        let mut list = DrawList::new();
        list.push_sprite(ZIndex(9), Transform::from_translation(0.0, 0.0));
        list.push_sprite(ZIndex(0), Transform::from_translation(1.0, 0.0));

        let xs: Vec<f32> = list.items().iter().map(x_of).collect();
        assert_eq!(xs, vec![0.0, 1.0]);
    }

    #[test]
    fn pushing_after_iteration_resorts() {
        let mut list = DrawList::new();
        list.push_sprite(ZIndex(1), Transform::from_translation(0.0, 0.0));
        assert_eq!(list.iter_in_paint_order().count(), 1);

        list.push_sprite(ZIndex(0), Transform::from_translation(1.0, 0.0));
        let xs: Vec<f32> = list.iter_in_paint_order().map(x_of).collect();
        assert_eq!(xs, vec![1.0, 0.0]);
    }

    #[test]
    fn clear_resets_items_and_ordering() {
        let mut list = DrawList::new();
        list.push_sprite(ZIndex(0), Transform::default());
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter_in_paint_order().count(), 0);

        list.push_sprite(ZIndex(0), Transform::default());
        assert_eq!(list.items()[0].key.order, 0);
    }
}
