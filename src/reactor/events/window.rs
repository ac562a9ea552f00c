use tracing::{debug, trace, warn};

use crate::reactor::Reactor;
use crate::sys::geometry::Rect;
use crate::sys::host::{Desktop, HostDesktop, WindowHost, WindowId, WindowInfo};

pub struct WindowEventHandler;

impl WindowEventHandler {
    pub fn handle_window_added<H: WindowHost>(reactor: &mut Reactor<H>, info: WindowInfo) {
        let tile = reactor.tiles.add_window(&info);
        trace!(window = %info.id, ?tile, "window added");
    }

    pub fn handle_window_closed<H: WindowHost>(reactor: &mut Reactor<H>, window: WindowId) {
        if !reactor.tiles.remove_window(window) {
            debug!(%window, "close for unknown window - ignoring");
        }
    }

    pub fn handle_window_screen_changed<H: WindowHost>(
        reactor: &mut Reactor<H>,
        window: WindowId,
        screen: usize,
    ) {
        if screen >= reactor.screen_count() {
            let screens = reactor.screen_count();
            warn!(%window, screen, screens, "screen out of range - ignoring");
            return;
        }
        if let Some(tile) = reactor.tiles.tile_for_window_mut(window) {
            tile.set_screen(screen);
        }
    }

    pub fn handle_window_desktop_changed<H: WindowHost>(
        reactor: &mut Reactor<H>,
        window: WindowId,
        raw: HostDesktop,
    ) {
        let desktop = Desktop::from_host(raw);
        if let Some(Desktop::Index(index)) = desktop {
            if index >= reactor.desktop_count() {
                warn!(%window, desktop = raw, "desktop out of range - ignoring");
                return;
            }
        }
        if let Some(tile) = reactor.tiles.tile_for_window_mut(window) {
            tile.set_desktop(desktop);
        }
    }

    pub fn handle_window_geometry_changed<H: WindowHost>(
        reactor: &mut Reactor<H>,
        window: WindowId,
        rect: Rect,
    ) {
        if let Some(tile) = reactor.tiles.tile_for_window(window) {
            tile.observe_geometry(rect);
        }
    }

    pub fn handle_window_forced_floating_changed<H: WindowHost>(
        reactor: &mut Reactor<H>,
        window: WindowId,
        forced: bool,
    ) {
        if !reactor.tiles.set_forced_floating(window, forced) {
            trace!(%window, forced, "forced floating unchanged");
        }
    }

    pub fn handle_window_grouped<H: WindowHost>(
        reactor: &mut Reactor<H>,
        window: WindowId,
        with: WindowId,
    ) {
        match reactor.tiles.merge_window(window, with) {
            Ok(tile) => {
                reactor.drain();
                reactor.refresh_tile(tile);
            }
            Err(err) => warn!(%window, %with, %err, "cannot group windows"),
        }
    }

    pub fn handle_window_ungrouped<H: WindowHost>(reactor: &mut Reactor<H>, window: WindowId) {
        if let Err(err) = reactor.tiles.split_window(window) {
            warn!(%window, %err, "cannot ungroup window");
        }
    }
}
