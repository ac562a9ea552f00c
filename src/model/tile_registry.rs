use slotmap::SlotMap;
use thiserror::Error;
use tracing::{debug, trace};

use crate::common::collections::{HashMap, HashSet};
use crate::model::signal::Signal;
use crate::model::tile::{Tile, TileId};
use crate::sys::host::{WindowId, WindowInfo};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("window {0} is not tracked")]
    UnknownWindow(WindowId),
    #[error("tile {0:?} does not exist")]
    UnknownTile(TileId),
    #[error("window {0} is already a member of the target tile")]
    AlreadyMember(WindowId),
}

/// Owns every tile and the window → tile side table.
///
/// `tile_added` / `tile_removed` fire exactly once per structural change.
/// Tiles created for forced-floating windows are kept quiet until the host
/// lifts the restriction; only then are they announced through
/// `tile_added`. A tile that was never announced is never reported removed.
#[derive(Debug, Default)]
pub struct TileRegistry {
    tiles: SlotMap<TileId, Tile>,
    window_to_tile: HashMap<WindowId, TileId>,
    announced: HashSet<TileId>,
    pub tile_added: Signal<TileId>,
    pub tile_removed: Signal<TileId>,
}

impl TileRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn add_window(&mut self, info: &WindowInfo) -> TileId {
        if let Some(&existing) = self.window_to_tile.get(&info.id) {
            trace!(window = %info.id, "window already tracked");
            return existing;
        }
        let id = self.tiles.insert_with_key(|id| Tile::new(id, info));
        self.window_to_tile.insert(info.id, id);
        let forced_floating = info.forced_floating;
        debug!(window = %info.id, tile = ?id, forced_floating, "tile created");
        if !info.forced_floating {
            self.announce(id);
        }
        id
    }

    /// Removes the window from its tile, destroying the tile once empty.
    /// Returns false for unknown windows.
    pub fn remove_window(&mut self, window: WindowId) -> bool {
        let Some(id) = self.window_to_tile.remove(&window) else {
            return false;
        };
        let now_empty = match self.tiles.get_mut(id) {
            Some(tile) => {
                tile.unmerge(window);
                tile.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.destroy(id);
        }
        true
    }

    pub fn get_tile(&self, window: WindowId) -> Option<TileId> {
        self.window_to_tile.get(&window).copied()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> { self.tiles.get(id) }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> { self.tiles.get_mut(id) }

    pub fn tile_for_window(&self, window: WindowId) -> Option<&Tile> {
        self.get_tile(window).and_then(|id| self.tiles.get(id))
    }

    pub fn tile_for_window_mut(&mut self, window: WindowId) -> Option<&mut Tile> {
        let id = self.get_tile(window)?;
        self.tiles.get_mut(id)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> { self.tiles.values() }

    pub fn len(&self) -> usize { self.tiles.len() }

    pub fn is_empty(&self) -> bool { self.tiles.is_empty() }

    pub fn is_announced(&self, id: TileId) -> bool { self.announced.contains(&id) }

    /// Groups `window` into the tile holding `target`.
    pub fn merge_window(
        &mut self,
        window: WindowId,
        target: WindowId,
    ) -> Result<TileId, RegistryError> {
        let source = self.get_tile(window).ok_or(RegistryError::UnknownWindow(window))?;
        let dest = self.get_tile(target).ok_or(RegistryError::UnknownWindow(target))?;
        if source == dest {
            return Err(RegistryError::AlreadyMember(window));
        }
        self.remove_window(window);
        if let Some(tile) = self.tiles.get_mut(dest) {
            tile.merge(window);
        }
        self.window_to_tile.insert(window, dest);
        debug!(%window, tile = ?dest, "window merged");
        Ok(dest)
    }

    /// Takes a window out of a grouped tile into a tile of its own. A window
    /// that is already alone keeps its tile.
    pub fn split_window(&mut self, window: WindowId) -> Result<TileId, RegistryError> {
        let source = self.get_tile(window).ok_or(RegistryError::UnknownWindow(window))?;
        let Some(tile) = self.tiles.get_mut(source) else {
            return Err(RegistryError::UnknownTile(source));
        };
        if tile.windows().len() < 2 {
            return Ok(source);
        }
        tile.unmerge(window);
        let info = WindowInfo {
            id: window,
            title: String::new(),
            desktop: tile.desktop().map_or(0, |d| d.to_host()),
            screen: tile.screen(),
            geometry: tile.rect(),
            forced_floating: tile.is_forced_floating(),
        };
        let floating = tile.is_floating();
        self.window_to_tile.remove(&window);
        let id = self.tiles.insert_with_key(|id| Tile::new(id, &info));
        if let Some(new_tile) = self.tiles.get_mut(id) {
            new_tile.set_floating(floating);
        }
        self.window_to_tile.insert(window, id);
        debug!(%window, from = ?source, tile = ?id, "window split into its own tile");
        if !info.forced_floating {
            self.announce(id);
        }
        Ok(id)
    }

    /// Applies a host forced-floating change. Announces tiles that were held
    /// back because they started out forced floating.
    pub fn set_forced_floating(&mut self, window: WindowId, forced: bool) -> bool {
        let Some(id) = self.get_tile(window) else {
            return false;
        };
        let changed = match self.tiles.get_mut(id) {
            Some(tile) => tile.set_forced_floating(forced),
            None => false,
        };
        if !forced && !self.is_announced(id) {
            self.announce(id);
        }
        changed
    }

    fn announce(&mut self, id: TileId) {
        if self.announced.insert(id) {
            self.tile_added.emit(&id);
        }
    }

    fn destroy(&mut self, id: TileId) {
        if self.announced.remove(&id) {
            self.tile_removed.emit(&id);
        }
        self.tiles.remove(id);
        debug!(tile = ?id, "tile destroyed");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sys::geometry::Rect;

    fn info(id: u64, forced_floating: bool) -> WindowInfo {
        WindowInfo {
            id: WindowId(id),
            title: format!("window {id}"),
            desktop: 1,
            screen: 0,
            geometry: Rect::new(0, 0, 100, 100),
            forced_floating,
        }
    }

    fn log_events(registry: &TileRegistry) -> Rc<RefCell<Vec<(&'static str, TileId)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let added = log.clone();
        registry.tile_added.connect(move |id| added.borrow_mut().push(("added", *id)));
        let removed = log.clone();
        registry.tile_removed.connect(move |id| removed.borrow_mut().push(("removed", *id)));
        log
    }

    #[test]
    fn add_window_creates_one_tile_once() {
        let mut registry = TileRegistry::new();
        let log = log_events(&registry);
        let id = registry.add_window(&info(1, false));
        assert_eq!(registry.add_window(&info(1, false)), id);

        let tile = registry.tile(registry.get_tile(WindowId(1)).unwrap()).unwrap();
        assert_eq!(tile.windows().iter().filter(|&&w| w == WindowId(1)).count(), 1);
        assert_eq!(*log.borrow(), vec![("added", id)]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removing_last_window_fires_removed_once() {
        let mut registry = TileRegistry::new();
        let log = log_events(&registry);
        let id = registry.add_window(&info(1, false));
        assert!(registry.remove_window(WindowId(1)));
        assert!(!registry.remove_window(WindowId(1)));
        assert_eq!(*log.borrow(), vec![("added", id), ("removed", id)]);
        assert!(registry.tile(id).is_none());
        assert!(registry.get_tile(WindowId(1)).is_none());
    }

    #[test]
    fn forced_floating_tiles_are_announced_when_released() {
        let mut registry = TileRegistry::new();
        let log = log_events(&registry);
        let id = registry.add_window(&info(1, true));
        assert!(log.borrow().is_empty());

        registry.set_forced_floating(WindowId(1), false);
        registry.set_forced_floating(WindowId(1), true);
        registry.set_forced_floating(WindowId(1), false);
        assert_eq!(*log.borrow(), vec![("added", id)]);
    }

    #[test]
    fn unannounced_tiles_vanish_silently() {
        let mut registry = TileRegistry::new();
        let log = log_events(&registry);
        registry.add_window(&info(1, true));
        registry.remove_window(WindowId(1));
        assert!(log.borrow().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn merge_and_split() {
        let mut registry = TileRegistry::new();
        let log = log_events(&registry);
        let a = registry.add_window(&info(1, false));
        let b = registry.add_window(&info(2, false));

        assert_eq!(registry.merge_window(WindowId(2), WindowId(1)), Ok(a));
        assert_eq!(
            registry.merge_window(WindowId(2), WindowId(1)),
            Err(RegistryError::AlreadyMember(WindowId(2)))
        );
        assert_eq!(registry.tile(a).unwrap().windows(), &[WindowId(1), WindowId(2)]);
        assert!(registry.tile(b).is_none());

        let c = registry.split_window(WindowId(2)).unwrap();
        assert_ne!(c, a);
        assert_eq!(registry.split_window(WindowId(2)), Ok(c));
        assert_eq!(registry.tile(a).unwrap().windows(), &[WindowId(1)]);
        assert_eq!(*log.borrow(), vec![("added", a), ("added", b), ("removed", b), ("added", c)]);
        assert_eq!(
            registry.merge_window(WindowId(9), WindowId(1)),
            Err(RegistryError::UnknownWindow(WindowId(9)))
        );
    }
}
