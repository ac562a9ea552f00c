use ascii_tree::Tree;
use serde::Serialize;

use crate::layout_engine::{Direction, LayoutError, Neighbours};
use crate::model::TileId;
use crate::sys::geometry::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TileSlot {
    pub tile: TileId,
    pub rect: Rect,
    pub neighbours: Neighbours,
}

/// The ordered tile sequence of one layout together with the geometry and
/// neighbour graph the variant computed for it. Position 0 is the first tile
/// in layout order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TileSlots {
    area: Rect,
    slots: Vec<TileSlot>,
}

impl TileSlots {
    pub fn new(area: Rect) -> Self { Self { area, slots: Vec::new() } }

    pub fn area(&self) -> Rect { self.area }

    pub(crate) fn set_area(&mut self, area: Rect) { self.area = area; }

    pub fn len(&self) -> usize { self.slots.len() }

    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &TileSlot> { self.slots.iter() }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TileSlot> {
        self.slots.iter_mut()
    }

    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ { self.slots.iter().map(|s| s.tile) }

    pub fn get(&self, index: usize) -> Option<&TileSlot> { self.slots.get(index) }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut TileSlot> {
        self.slots.get_mut(index)
    }

    pub fn index_of(&self, tile: TileId) -> Option<usize> {
        self.slots.iter().position(|s| s.tile == tile)
    }

    pub fn rect_of(&self, tile: TileId) -> Option<Rect> {
        self.index_of(tile).map(|i| self.slots[i].rect)
    }

    /// Replaces the sequence. Duplicates keep their first position.
    pub(crate) fn seed(&mut self, tiles: &[TileId]) {
        self.slots.clear();
        for &tile in tiles {
            self.insert(tile, None);
        }
    }

    /// Inserts before the tile under `drop_point`, else at the end. Returns
    /// the position used, or `None` if the tile is already present.
    pub(crate) fn insert(&mut self, tile: TileId, drop_point: Option<Point>) -> Option<usize> {
        if self.index_of(tile).is_some() {
            return None;
        }
        let index = drop_point
            .and_then(|p| self.index_at(p))
            .unwrap_or(self.slots.len());
        let neighbours = Neighbours::isolated(index);
        self.slots.insert(index, TileSlot { tile, rect: Rect::default(), neighbours });
        Some(index)
    }

    /// Returns the position the tile held.
    pub(crate) fn remove(&mut self, tile: TileId) -> Option<usize> {
        let index = self.index_of(tile)?;
        self.slots.remove(index);
        Some(index)
    }

    /// Exchanges sequence positions; each tile takes over the other's
    /// rectangle and neighbours. A swap of a tile with itself is a no-op.
    pub(crate) fn swap(&mut self, a: TileId, b: TileId) -> bool {
        if a == b {
            return false;
        }
        let (Some(i), Some(j)) = (self.index_of(a), self.index_of(b)) else {
            return false;
        };
        self.slots[i].tile = b;
        self.slots[j].tile = a;
        true
    }

    fn index_at(&self, point: Point) -> Option<usize> {
        if !self.area.contains(point) {
            return None;
        }
        self.slots.iter().position(|s| s.rect.contains(point))
    }

    pub fn tile_at(&self, point: Point) -> Option<TileId> {
        self.index_at(point).map(|i| self.slots[i].tile)
    }

    pub fn geometry_at(&self, point: Point) -> Option<Rect> {
        self.index_at(point).map(|i| self.slots[i].rect)
    }

    /// Follows the neighbour graph. Without a direct neighbour the result is
    /// the wrap target when `wrap` is set, otherwise the tile itself.
    pub fn adjacent(&self, tile: TileId, direction: Direction, wrap: bool) -> Option<TileId> {
        let index = self.index_of(tile)?;
        let edge = self.slots[index].neighbours.get(direction);
        if edge.direct || wrap {
            self.slots.get(edge.index).map(|s| s.tile).or(Some(tile))
        } else {
            Some(tile)
        }
    }

    /// Verifies that the rectangles stay inside the area, do not overlap,
    /// and leave at most `max_gap` square pixels uncovered, and that the
    /// neighbour graph only refers to live positions.
    pub fn check_partition(&self, max_gap: i64) -> Result<(), LayoutError> {
        if self.slots.is_empty() {
            return Ok(());
        }
        let mut covered = 0i64;
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(dup) = self.slots[..i].iter().position(|s| s.tile == slot.tile) {
                return Err(LayoutError::DuplicateTile { first: dup, second: i });
            }
            if !self.area.contains_rect(&slot.rect) {
                return Err(LayoutError::OutOfBounds { index: i, rect: slot.rect, area: self.area });
            }
            let overlap = self.slots[..i].iter().position(|s| s.rect.intersects(&slot.rect));
            if let Some(other) = overlap {
                return Err(LayoutError::Overlap { first: other, second: i });
            }
            if let Some(stale) = slot.neighbours.indices().find(|&n| n >= self.slots.len()) {
                return Err(LayoutError::StaleNeighbour { index: i, neighbour: stale });
            }
            covered += slot.rect.area();
        }
        let gap = self.area.area() - covered;
        if gap > max_gap {
            return Err(LayoutError::CoverageGap { gap, allowed: max_gap });
        }
        Ok(())
    }

    pub fn draw_tree(&self, name: &str) -> String {
        let a = self.area;
        let leaves = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let r = s.rect;
                Tree::Leaf(vec![format!(
                    "#{i} ({},{} {}x{}) {:?}",
                    r.x, r.y, r.width, r.height, s.tile
                )])
            })
            .collect();
        let root = Tree::Node(format!("{name} ({},{} {}x{})", a.x, a.y, a.width, a.height), leaves);
        let mut out = String::new();
        if ascii_tree::write_tree(&mut out, &root).is_err() {
            out.clear();
        }
        out
    }
}
