use super::split::SplitLayout;
use super::{LayoutSystem, LayoutVariant};
use crate::layout_engine::TileSlots;
use crate::model::TileId;
use crate::sys::geometry::{Point, Rect};

/// Master column taking half of the area, remaining tiles stacked to its
/// right.
#[derive(Clone, Debug)]
pub struct SpiralLayoutSystem(SplitLayout);

impl SpiralLayoutSystem {
    pub const RATIO: (i32, i32) = (1, 2);

    pub fn new(area: Rect) -> Self { Self(SplitLayout::new(area, Self::RATIO)) }
}

impl LayoutSystem for SpiralLayoutSystem {
    fn variant(&self) -> LayoutVariant { LayoutVariant::Spiral }

    fn slots(&self) -> &TileSlots { self.0.slots() }

    fn slots_mut(&mut self) -> &mut TileSlots { self.0.slots_mut() }

    fn reset_tile_sizes(&mut self) { self.0.reset(); }

    fn add_tile(&mut self, tile: TileId, drop_point: Option<Point>) -> bool {
        self.0.add(tile, drop_point)
    }

    fn remove_tile(&mut self, tile: TileId) -> bool { self.0.remove(tile) }

    fn resize_tile(&mut self, tile: TileId, rect: Rect, min_size: i32) -> bool {
        self.0.resize(tile, rect, min_size)
    }

    fn max_coverage_gap(&self) -> i64 { self.0.max_coverage_gap() }
}
