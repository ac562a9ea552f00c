use tracing::{debug, trace, warn};

use crate::model::TileId;
use crate::reactor::Reactor;
use crate::sys::geometry::{Point, Rect};
use crate::sys::host::{WindowHost, WindowId};

/// Move and resize handling. The `handle_window_*` functions turn host
/// notifications into tile signals; the `on_*` functions react to those
/// signals once the tile has published them.
pub struct DragEventHandler;

impl DragEventHandler {
    pub fn handle_window_move_started<H: WindowHost>(reactor: &mut Reactor<H>, window: WindowId) {
        if let Some(tile) = reactor.tiles.tile_for_window(window) {
            tile.signals().moving_started.emit(&());
        }
    }

    pub fn handle_window_move_step<H: WindowHost>(
        reactor: &mut Reactor<H>,
        window: WindowId,
        rect: Rect,
    ) {
        if let Some(tile) = reactor.tiles.tile_for_window(window) {
            tile.signals().moving_step.emit(&rect);
        }
    }

    pub fn handle_window_move_ended<H: WindowHost>(reactor: &mut Reactor<H>, window: WindowId) {
        if let Some(tile) = reactor.tiles.tile_for_window(window) {
            tile.signals().moving_ended.emit(&());
        }
    }

    pub fn handle_window_resize_started<H: WindowHost>(reactor: &mut Reactor<H>, window: WindowId) {
        if let Some(tile) = reactor.tiles.tile_for_window(window) {
            tile.signals().resizing_started.emit(&());
        }
    }

    pub fn handle_window_resize_step<H: WindowHost>(
        reactor: &mut Reactor<H>,
        window: WindowId,
        rect: Rect,
    ) {
        if let Some(tile) = reactor.tiles.tile_for_window(window) {
            tile.signals().resizing_step.emit(&rect);
        }
    }

    pub fn handle_window_resize_ended<H: WindowHost>(reactor: &mut Reactor<H>, window: WindowId) {
        if let Some(tile) = reactor.tiles.tile_for_window(window) {
            tile.signals().resizing_ended.emit(&());
        }
    }

    pub fn on_move_started<H: WindowHost>(reactor: &mut Reactor<H>, tile: TileId) {
        let Some(screen) = reactor.tiles.tile(tile).map(|t| t.screen()) else {
            return;
        };
        if reactor.drag_manager.start_move(tile, screen) {
            debug!(?tile, screen, "move started");
        } else {
            warn!(
                ?tile,
                state = ?reactor.drag_manager.drag_state,
                "move started during another move - ignoring"
            );
        }
    }

    /// Shows where the window would land: the tile under its centre, or the
    /// whole screen when there is none.
    pub fn on_move_step<H: WindowHost>(reactor: &mut Reactor<H>, tile: TileId, rect: Rect) {
        if !reactor.drag_manager.is_moving(tile) || !reactor.config.settings.drop_preview {
            return;
        }
        let centre = rect.mid();
        let last_screen = reactor.screen_count().saturating_sub(1);
        let Some(screen) = Self::screen_at(reactor, centre)
            .or_else(|| reactor.tiles.tile(tile).map(|t| t.screen().min(last_screen)))
        else {
            return;
        };
        let Some(layout) = reactor.screen_layout(reactor.current_desktop, screen) else {
            return;
        };
        let outline = layout.tile_geometry_at(centre).unwrap_or(layout.area());
        trace!(?tile, ?outline, "drop preview");
        reactor.host.show_outline(outline);
    }

    /// A move across screens transfers the tile to the layout under the
    /// drop point. A move within a screen swaps with the tile under the
    /// drop point, if any. Either way the window is put back into its slot.
    pub fn on_move_ended<H: WindowHost>(reactor: &mut Reactor<H>, tile: TileId) {
        let Some(origin) = reactor.drag_manager.finish_move(tile) else {
            trace!(?tile, "move end without a matching start");
            return;
        };
        if reactor.config.settings.drop_preview {
            reactor.host.hide_outline();
        }
        let host_active = reactor.host.active_window();
        let Some((screen, window)) =
            reactor.tiles.tile(tile).map(|t| (t.screen(), t.active_window(host_active)))
        else {
            return;
        };
        let drop_point = window.and_then(|w| reactor.host.window_geometry(w)).map(|r| r.mid());

        if screen != origin {
            debug!(?tile, from = origin, to = screen, "tile dragged to another screen");
            reactor.sync_placement(tile, drop_point);
        } else if let (Some(point), Some((desktop, screen))) =
            (drop_point, reactor.layout_of(tile))
        {
            let target = reactor.screen_layout(desktop, screen).and_then(|l| l.tile_at(point));
            if let Some(target) = target {
                debug!(?tile, ?target, "swapping dragged tile");
                if let Some(layout) = reactor.screen_layout_mut(desktop, screen) {
                    let updates = layout.swap_tiles(tile, target);
                    reactor.apply_updates(updates);
                }
            }
        }
        reactor.refresh_tile(tile);
    }

    pub fn on_resize_started<H: WindowHost>(reactor: &mut Reactor<H>, tile: TileId) {
        debug!(?tile, "resize started");
        reactor.drag_manager.resizing = Some(tile);
    }

    /// Hands the window's final geometry to every layout holding the tile.
    pub fn on_resize_ended<H: WindowHost>(reactor: &mut Reactor<H>, tile: TileId) {
        if reactor.drag_manager.resizing == Some(tile) {
            reactor.drag_manager.resizing = None;
        }
        let window = reactor
            .tiles
            .tile(tile)
            .and_then(|t| t.active_window(reactor.host.active_window()));
        let Some(rect) = window.and_then(|w| reactor.host.window_geometry(w)) else {
            return;
        };
        let placement = reactor.placement(tile).map(<[_]>::to_vec).unwrap_or_default();
        let min_size = reactor.config.settings.min_tile_size;
        for (desktop, screen) in placement {
            if let Some(layout) = reactor.screen_layout_mut(desktop, screen) {
                let updates = layout.resize_tile(tile, rect, min_size);
                reactor.apply_updates(updates);
            }
        }
        debug!(?tile, ?rect, "resize ended");
        reactor.refresh_tile(tile);
    }

    fn screen_at<H: WindowHost>(reactor: &Reactor<H>, point: Point) -> Option<usize> {
        reactor
            .layouts
            .get(reactor.current_desktop)?
            .iter()
            .find(|layout| layout.area().contains(point))
            .map(|layout| layout.screen())
    }
}
