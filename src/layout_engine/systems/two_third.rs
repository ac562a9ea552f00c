use super::split::SplitLayout;
use super::{LayoutSystem, LayoutVariant};
use crate::layout_engine::TileSlots;
use crate::model::TileId;
use crate::sys::geometry::{Point, Rect};

/// Master column taking two thirds of the area, remaining tiles stacked in
/// the last third.
#[derive(Clone, Debug)]
pub struct TwoThirdLayoutSystem(SplitLayout);

impl TwoThirdLayoutSystem {
    pub const RATIO: (i32, i32) = (2, 3);

    pub fn new(area: Rect) -> Self { Self(SplitLayout::new(area, Self::RATIO)) }
}

impl LayoutSystem for TwoThirdLayoutSystem {
    fn variant(&self) -> LayoutVariant { LayoutVariant::TwoThird }

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

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn master_takes_two_thirds_and_stack_shares_the_rest() {
        let mut map: SlotMap<TileId, ()> = SlotMap::with_key();
        let t: Vec<TileId> = (0..3).map(|_| map.insert(())).collect();
        let mut layout = TwoThirdLayoutSystem::new(Rect::new(0, 0, 1920, 1080));
        for &tile in &t {
            assert!(layout.add_tile(tile, None));
        }
        assert_eq!(layout.rect_of(t[0]), Some(Rect::new(0, 0, 1280, 1080)));
        assert_eq!(layout.rect_of(t[1]), Some(Rect::new(1280, 0, 640, 540)));
        assert_eq!(layout.rect_of(t[2]), Some(Rect::new(1280, 540, 640, 540)));

        assert!(layout.remove_tile(t[1]));
        assert_eq!(layout.rect_of(t[2]), Some(Rect::new(1280, 0, 640, 1080)));
        assert!(!layout.remove_tile(t[1]));
        layout.check_invariants().unwrap();
    }

    #[test]
    fn removing_the_master_promotes_the_first_stacked_tile() {
        let mut map: SlotMap<TileId, ()> = SlotMap::with_key();
        let t: Vec<TileId> = (0..3).map(|_| map.insert(())).collect();
        let mut layout = TwoThirdLayoutSystem::new(Rect::new(0, 0, 1920, 1080));
        for &tile in &t {
            layout.add_tile(tile, None);
        }
        layout.remove_tile(t[0]);
        assert_eq!(layout.tiles(), vec![t[1], t[2]]);
        assert_eq!(layout.rect_of(t[1]), Some(Rect::new(0, 0, 1280, 1080)));
        assert_eq!(layout.rect_of(t[2]), Some(Rect::new(1280, 0, 640, 1080)));
    }
}
