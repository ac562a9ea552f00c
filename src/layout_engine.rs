use thiserror::Error;

use crate::sys::geometry::Rect;

pub(crate) mod graph;
mod screen_layout;
mod slots;
pub mod systems;

pub use graph::{Direction, Neighbour, Neighbours};
pub use screen_layout::{GeometryUpdate, ScreenLayout};
pub use slots::{TileSlot, TileSlots};
pub use systems::{
    LayoutSystem, LayoutSystemKind, LayoutVariant, SpiralLayoutSystem, TwoThirdLayoutSystem,
};

/// Broken layout invariants. These indicate a bug in a placement algorithm;
/// positions refer to the layout's tile sequence.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("tiles #{first} and #{second} overlap")]
    Overlap { first: usize, second: usize },
    #[error("tile #{index} at {rect:?} leaves the layout area {area:?}")]
    OutOfBounds { index: usize, rect: Rect, area: Rect },
    #[error("{gap} square pixels uncovered, at most {allowed} allowed")]
    CoverageGap { gap: i64, allowed: i64 },
    #[error("tile #{index} links to missing position {neighbour}")]
    StaleNeighbour { index: usize, neighbour: usize },
    #[error("tile appears at positions #{first} and #{second}")]
    DuplicateTile { first: usize, second: usize },
}
