use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::layout_engine::{Direction, LayoutError, TileSlots};
use crate::model::TileId;
use crate::sys::geometry::{Point, Rect};

/// Operations every layout variant supports over its ordered tile sequence.
///
/// Variants provide placement (`add_tile`, `remove_tile`, `resize_tile`,
/// `reset_tile_sizes`); lookups, swapping and hit testing work on the shared
/// [`TileSlots`] and are identical for all of them.
#[enum_dispatch]
pub trait LayoutSystem {
    fn variant(&self) -> LayoutVariant;
    fn slots(&self) -> &TileSlots;
    fn slots_mut(&mut self) -> &mut TileSlots;

    /// Recomputes every rectangle and the whole neighbour graph from the
    /// current tile sequence, discarding user resizes.
    fn reset_tile_sizes(&mut self);

    /// Inserts a tile before the tile under `drop_point`, or at the end of
    /// the sequence. Returns false if the tile is already present.
    fn add_tile(&mut self, tile: TileId, drop_point: Option<Point>) -> bool;

    /// Returns false if the tile is not present.
    fn remove_tile(&mut self, tile: TileId) -> bool;

    /// Moves the boundaries of `tile` towards `rect`, never letting a tile
    /// shrink below `min_size`. Returns whether any geometry changed.
    fn resize_tile(&mut self, tile: TileId, rect: Rect, min_size: i32) -> bool;

    /// Upper bound, in square pixels, of area the placement leaves uncovered
    /// because of integer division.
    fn max_coverage_gap(&self) -> i64;

    fn area(&self) -> Rect { self.slots().area() }

    fn set_area(&mut self, area: Rect) {
        self.slots_mut().set_area(area);
        self.reset_tile_sizes();
    }

    fn tiles(&self) -> Vec<TileId> { self.slots().tiles().collect() }

    fn tile_count(&self) -> usize { self.slots().len() }

    fn contains(&self, tile: TileId) -> bool { self.slots().index_of(tile).is_some() }

    fn rect_of(&self, tile: TileId) -> Option<Rect> { self.slots().rect_of(tile) }

    fn adjacent_tile(&self, tile: TileId, direction: Direction, wrap: bool) -> Option<TileId> {
        self.slots().adjacent(tile, direction, wrap)
    }

    fn swap_tiles(&mut self, a: TileId, b: TileId) -> bool { self.slots_mut().swap(a, b) }

    fn tile_at(&self, point: Point) -> Option<TileId> { self.slots().tile_at(point) }

    fn tile_geometry_at(&self, point: Point) -> Option<Rect> { self.slots().geometry_at(point) }

    fn check_invariants(&self) -> Result<(), LayoutError> {
        self.slots().check_partition(self.max_coverage_gap())
    }

    fn draw_tree(&self) -> String { self.slots().draw_tree(&self.variant().to_string()) }
}

mod split;
mod spiral;
mod two_third;

pub use spiral::SpiralLayoutSystem;
pub use two_third::TwoThirdLayoutSystem;

#[derive(Debug, Clone)]
#[enum_dispatch(LayoutSystem)]
pub enum LayoutSystemKind {
    Spiral(SpiralLayoutSystem),
    TwoThird(TwoThirdLayoutSystem),
}

/// Name of a placement algorithm, as used in configuration and commands.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayoutVariant {
    #[default]
    Spiral,
    TwoThird,
}

impl LayoutVariant {
    /// Builds a layout of this variant over `area` seeded with `tiles` in
    /// order, with geometry computed from scratch.
    pub fn create(self, area: Rect, tiles: &[TileId]) -> LayoutSystemKind {
        let mut layout: LayoutSystemKind = match self {
            LayoutVariant::Spiral => SpiralLayoutSystem::new(area).into(),
            LayoutVariant::TwoThird => TwoThirdLayoutSystem::new(area).into(),
        };
        layout.slots_mut().seed(tiles);
        layout.reset_tile_sizes();
        layout
    }
}
