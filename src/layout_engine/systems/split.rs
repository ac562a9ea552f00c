use tracing::trace;

use crate::layout_engine::{Direction, Neighbours, TileSlots};
use crate::model::TileId;
use crate::sys::geometry::{Point, Rect};

/// Master/stack placement shared by the built-in variants.
///
/// The first tile (the master) occupies a full-height column on the left;
/// the rest share the right column in equal horizontal bands. The column
/// boundary is chosen as `floor(width * num / den)` when the layout first
/// reaches two tiles and is kept afterwards until the layout drops back to
/// a single tile. Band heights are `floor(height / stacked)`, so up to
/// `stacked - 1` pixel rows at the bottom of the stack stay uncovered.
#[derive(Clone, Debug)]
pub(crate) struct SplitLayout {
    slots: TileSlots,
    ratio: (i32, i32),
    master_width: Option<i32>,
}

impl SplitLayout {
    pub(crate) fn new(area: Rect, ratio: (i32, i32)) -> Self {
        Self { slots: TileSlots::new(area), ratio, master_width: None }
    }

    pub(crate) fn slots(&self) -> &TileSlots { &self.slots }

    pub(crate) fn slots_mut(&mut self) -> &mut TileSlots { &mut self.slots }

    fn initial_master_width(&self) -> i32 {
        let (num, den) = self.ratio;
        let width = i64::from(self.slots.area().width.max(0));
        (width * i64::from(num) / i64::from(den.max(1))) as i32
    }

    pub(crate) fn reset(&mut self) {
        self.master_width = None;
        self.arrange();
    }

    pub(crate) fn add(&mut self, tile: TileId, drop_point: Option<Point>) -> bool {
        let Some(index) = self.slots.insert(tile, drop_point) else {
            return false;
        };
        trace!(?tile, index, "tile inserted");
        self.arrange();
        true
    }

    pub(crate) fn remove(&mut self, tile: TileId) -> bool {
        let Some(index) = self.slots.remove(tile) else {
            return false;
        };
        trace!(?tile, index, "tile removed");
        self.arrange();
        true
    }

    /// Recomputes rectangles and neighbours, keeping the column boundary
    /// while there are at least two tiles.
    fn arrange(&mut self) {
        let area = self.slots.area();
        match self.slots.len() {
            0 => self.master_width = None,
            1 => {
                self.master_width = None;
                if let Some(slot) = self.slots.get_mut(0) {
                    slot.rect = area;
                    slot.neighbours = Neighbours::isolated(0);
                }
            }
            _ => {
                let master_width = match self.master_width {
                    Some(width) => width,
                    None => self.initial_master_width(),
                };
                self.master_width = Some(master_width);
                if let Some(master) = self.slots.get_mut(0) {
                    master.rect = Rect::new(area.x, area.y, master_width, area.height);
                }
                self.update_stacking_area();
                self.link_neighbours();
            }
        }
    }

    /// Splits the stack column into equal bands, top to bottom.
    fn update_stacking_area(&mut self) {
        let area = self.slots.area();
        let stacked = self.slots.len().saturating_sub(1);
        let Some(master_width) = self.master_width else {
            return;
        };
        if stacked == 0 {
            return;
        }
        let band = area.height / stacked as i32;
        let x = area.x + master_width;
        let width = area.width - master_width;
        let mut y = area.y;
        for slot in self.slots.iter_mut().skip(1) {
            slot.rect = Rect::new(x, y, width, band);
            y += band;
        }
    }

    fn link_neighbours(&mut self) {
        let n = self.slots.len();
        if n < 2 {
            return;
        }
        let last = n - 1;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let mut links = Neighbours::isolated(i);
            if i == 0 {
                links.set(Direction::Right, 1, true);
                links.set(Direction::Left, 1, false);
            } else {
                links.set(Direction::Left, 0, true);
                links.set(Direction::Right, 0, false);
                if i > 1 {
                    links.set(Direction::Up, i - 1, true);
                } else {
                    links.set(Direction::Up, last, false);
                }
                if i < last {
                    links.set(Direction::Down, i + 1, true);
                } else {
                    links.set(Direction::Down, 1, false);
                }
            }
            slot.neighbours = links;
        }
    }

    /// Moves the column boundary and the boundaries shared with the stacked
    /// tiles directly above and below `tile`.
    pub(crate) fn resize(&mut self, tile: TileId, rect: Rect, min_size: i32) -> bool {
        let Some(index) = self.slots.index_of(tile) else {
            return false;
        };
        let n = self.slots.len();
        let Some(master_width) = self.master_width.filter(|_| n >= 2) else {
            return false;
        };
        let area = self.slots.area();
        let mut changed = false;

        let requested = if index == 0 { rect.right() - area.x } else { rect.x - area.x };
        let lo = min_size.min(area.width / 2);
        let hi = (area.width - min_size).max(lo);
        let split = requested.clamp(lo, hi);
        if split != master_width {
            self.master_width = Some(split);
            if let Some(master) = self.slots.get_mut(0) {
                master.rect.width = split;
            }
            for slot in self.slots.iter_mut().skip(1) {
                slot.rect.x = area.x + split;
                slot.rect.width = area.width - split;
            }
            changed = true;
        }

        if index >= 1 {
            if index > 1 {
                changed |= self.move_band_boundary(index - 1, rect.y, min_size);
            }
            if index < n - 1 {
                changed |= self.move_band_boundary(index, rect.bottom(), min_size);
            }
        }
        changed
    }

    /// Moves the edge between stacked positions `upper` and `upper + 1`.
    fn move_band_boundary(&mut self, upper: usize, edge: i32, min_size: i32) -> bool {
        let (Some(above), Some(below)) =
            (self.slots.get(upper).map(|s| s.rect), self.slots.get(upper + 1).map(|s| s.rect))
        else {
            return false;
        };
        let lo = above.y + min_size.min(above.height);
        let hi = (below.bottom() - min_size.min(below.height)).max(lo);
        let edge = edge.clamp(lo, hi);
        if edge == below.y {
            return false;
        }
        if let Some(slot) = self.slots.get_mut(upper) {
            slot.rect.height = edge - above.y;
        }
        if let Some(slot) = self.slots.get_mut(upper + 1) {
            slot.rect.y = edge;
            slot.rect.height = below.bottom() - edge;
        }
        true
    }

    /// Rows lost to integer division in the stack column.
    pub(crate) fn max_coverage_gap(&self) -> i64 {
        let stacked = self.slots.len().saturating_sub(1);
        match self.master_width {
            Some(master_width) if stacked > 1 => {
                let width = i64::from(self.slots.area().width - master_width);
                width * (stacked as i64 - 1)
            }
            _ => 0,
        }
    }
}
