use tracing::{debug, error};

use crate::layout_engine::{Direction, LayoutSystem, LayoutSystemKind, LayoutVariant};
use crate::model::TileId;
use crate::sys::geometry::{Point, Rect};

/// A rectangle the caller should push to a tile's windows.
pub type GeometryUpdate = (TileId, Rect);

/// One layout bound to a (desktop, screen) pair.
///
/// Mutations always update the held layout. They return the geometry to
/// write to the host only while the binding is active; an inactive binding
/// returns nothing and its windows are left alone until [`activate`].
///
/// [`activate`]: ScreenLayout::activate
#[derive(Debug, Clone)]
pub struct ScreenLayout {
    desktop: usize,
    screen: usize,
    layout: LayoutSystemKind,
    active: bool,
}

impl ScreenLayout {
    pub fn new(desktop: usize, screen: usize, variant: LayoutVariant, area: Rect) -> Self {
        Self {
            desktop,
            screen,
            layout: variant.create(area, &[]),
            active: false,
        }
    }

    pub fn desktop(&self) -> usize { self.desktop }

    pub fn screen(&self) -> usize { self.screen }

    pub fn layout(&self) -> &LayoutSystemKind { &self.layout }

    pub fn variant(&self) -> LayoutVariant { self.layout.variant() }

    pub fn area(&self) -> Rect { self.layout.area() }

    pub fn is_active(&self) -> bool { self.active }

    pub fn tiles(&self) -> Vec<TileId> { self.layout.tiles() }

    pub fn contains(&self, tile: TileId) -> bool { self.layout.contains(tile) }

    pub fn rect_of(&self, tile: TileId) -> Option<Rect> { self.layout.rect_of(tile) }

    /// Marks the binding active and returns every tile's rectangle.
    pub fn activate(&mut self) -> Vec<GeometryUpdate> {
        self.active = true;
        self.all_geometry()
    }

    pub fn deactivate(&mut self) { self.active = false; }

    /// Replaces the layout with a fresh one of `variant` holding the same
    /// tiles in the same order.
    pub fn set_layout_variant(&mut self, variant: LayoutVariant) -> Vec<GeometryUpdate> {
        let tiles = self.layout.tiles();
        let (desktop, screen) = (self.desktop, self.screen);
        debug!(desktop, screen, %variant, tiles = tiles.len(), "layout variant");
        self.layout = variant.create(self.layout.area(), &tiles);
        self.settle(true)
    }

    pub fn add_tile(&mut self, tile: TileId, drop_point: Option<Point>) -> Vec<GeometryUpdate> {
        let changed = self.layout.add_tile(tile, drop_point);
        self.settle(changed)
    }

    pub fn remove_tile(&mut self, tile: TileId) -> Vec<GeometryUpdate> {
        let changed = self.layout.remove_tile(tile);
        self.settle(changed)
    }

    pub fn resize_tile(&mut self, tile: TileId, rect: Rect, min_size: i32) -> Vec<GeometryUpdate> {
        let changed = self.layout.resize_tile(tile, rect, min_size);
        self.settle(changed)
    }

    pub fn swap_tiles(&mut self, a: TileId, b: TileId) -> Vec<GeometryUpdate> {
        let changed = self.layout.swap_tiles(a, b);
        self.settle(changed)
    }

    pub fn set_area(&mut self, area: Rect) -> Vec<GeometryUpdate> {
        if self.layout.area() == area {
            return Vec::new();
        }
        self.layout.set_area(area);
        self.settle(true)
    }

    pub fn adjacent_tile(&self, tile: TileId, direction: Direction, wrap: bool) -> Option<TileId> {
        self.layout.adjacent_tile(tile, direction, wrap)
    }

    pub fn tile_at(&self, point: Point) -> Option<TileId> { self.layout.tile_at(point) }

    pub fn tile_geometry_at(&self, point: Point) -> Option<Rect> {
        self.layout.tile_geometry_at(point)
    }

    pub fn draw_tree(&self) -> String { self.layout.draw_tree() }

    fn all_geometry(&self) -> Vec<GeometryUpdate> {
        self.layout.slots().iter().map(|s| (s.tile, s.rect)).collect()
    }

    fn settle(&mut self, changed: bool) -> Vec<GeometryUpdate> {
        if !changed {
            return Vec::new();
        }
        if let Err(err) = self.layout.check_invariants() {
            debug_assert!(false, "layout invariant violated: {err}\n{}", self.layout.draw_tree());
            let (desktop, screen) = (self.desktop, self.screen);
            error!(desktop, screen, %err, "layout invariant violated, recomputing");
            self.layout.reset_tile_sizes();
        }
        if self.active { self.all_geometry() } else { Vec::new() }
    }
}
