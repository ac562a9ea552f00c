use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn slot(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Edge of the neighbour graph: an index into the owning layout's tile
/// sequence. When `direct` is false there is no tile in that direction and
/// `index` names the tile at the opposite edge of the same axis, which is
/// where a wrapping move lands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbour {
    pub index: usize,
    pub direct: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbours([Neighbour; 4]);

impl Neighbours {
    /// Every direction is an edge that wraps back onto `index` itself.
    pub fn isolated(index: usize) -> Self { Self([Neighbour { index, direct: false }; 4]) }

    pub fn get(&self, direction: Direction) -> Neighbour { self.0[direction.slot()] }

    pub fn has_direct(&self, direction: Direction) -> bool { self.get(direction).direct }

    pub fn set(&mut self, direction: Direction, index: usize, direct: bool) {
        self.0[direction.slot()] = Neighbour { index, direct };
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ { self.0.iter().map(|n| n.index) }
}
