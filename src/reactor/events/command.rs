use tracing::{debug, info, trace, warn};

use crate::layout_engine::Direction;
use crate::model::TileId;
use crate::reactor::{Reactor, TilingCommand};
use crate::sys::host::WindowHost;

pub struct CommandEventHandler;

impl CommandEventHandler {
    pub fn handle_command<H: WindowHost>(reactor: &mut Reactor<H>, cmd: TilingCommand) {
        info!(?cmd);
        match cmd {
            TilingCommand::CycleLayoutVariant { forward } => {
                Self::cycle_layout_variant(reactor, forward)
            }
            TilingCommand::SwitchLayoutVariant { desktop, screen, index } => {
                Self::switch_layout_variant(reactor, desktop, screen, index)
            }
            TilingCommand::ToggleFloating => Self::toggle_floating(reactor),
            TilingCommand::SwitchFocus(direction) => Self::switch_focus(reactor, direction),
            TilingCommand::MoveTile(direction) => Self::move_tile(reactor, direction),
        }
    }

    /// Steps the layout on the current desktop and active screen through the
    /// configured list. A layout whose variant is not in the list restarts
    /// at the first entry.
    fn cycle_layout_variant<H: WindowHost>(reactor: &mut Reactor<H>, forward: bool) {
        let (desktop, screen) = (reactor.current_desktop, reactor.current_screen);
        let Some(variant) = reactor.screen_layout(desktop, screen).map(|l| l.variant()) else {
            warn!(desktop, screen, "no layout to cycle");
            return;
        };
        let settings = &reactor.config.settings;
        let count = settings.layouts.len();
        if count == 0 {
            return;
        }
        let index = match settings.layout_index(variant) {
            Some(i) if forward => (i + 1) % count,
            Some(i) => (i + count - 1) % count,
            None => 0,
        };
        Self::switch_layout_variant(reactor, desktop, screen, index);
    }

    fn switch_layout_variant<H: WindowHost>(
        reactor: &mut Reactor<H>,
        desktop: usize,
        screen: usize,
        index: usize,
    ) {
        let Some(&variant) = reactor.config.settings.layouts.get(index) else {
            warn!(index, "layout index out of range - ignoring");
            return;
        };
        let Some(layout) = reactor.screen_layout_mut(desktop, screen) else {
            warn!(desktop, screen, "layout position out of range - ignoring");
            return;
        };
        let updates = layout.set_layout_variant(variant);
        reactor.apply_updates(updates);
    }

    fn active_tile<H: WindowHost>(reactor: &Reactor<H>) -> Option<TileId> {
        let window = reactor.host.active_window()?;
        reactor.tile_of_window(window)
    }

    /// Placement follows through the tile's floating signal; toggling a
    /// forced-floating tile only flips the user flag.
    fn toggle_floating<H: WindowHost>(reactor: &mut Reactor<H>) {
        let Some(id) = Self::active_tile(reactor) else {
            trace!("no active tile to toggle");
            return;
        };
        if let Some(tile) = reactor.tiles.tile_mut(id) {
            let floating = !tile.is_floating();
            tile.set_floating(floating);
            debug!(tile = ?id, floating, "floating toggled");
        }
    }

    fn switch_focus<H: WindowHost>(reactor: &mut Reactor<H>, direction: Direction) {
        let Some(tile) = Self::active_tile(reactor) else {
            return;
        };
        let wrap = reactor.config.settings.wrap_focus;
        let Some(target) = Self::adjacent(reactor, tile, direction, wrap) else {
            return;
        };
        if target == tile {
            trace!(?tile, %direction, "no tile to focus");
            return;
        }
        if let Some(window) = reactor.tiles.tile(target).and_then(|t| t.representative()) {
            reactor.host.activate_window(window);
        }
    }

    fn move_tile<H: WindowHost>(reactor: &mut Reactor<H>, direction: Direction) {
        let Some(tile) = Self::active_tile(reactor) else {
            return;
        };
        if !reactor.tiles.tile(tile).is_some_and(|t| t.wants_tiling()) {
            trace!(?tile, "floating tiles are not moved");
            return;
        }
        let Some((desktop, screen)) = reactor.layout_of(tile) else {
            return;
        };
        let Some(target) = Self::adjacent(reactor, tile, direction, true) else {
            return;
        };
        if let Some(layout) = reactor.screen_layout_mut(desktop, screen) {
            let updates = layout.swap_tiles(tile, target);
            reactor.apply_updates(updates);
        }
    }

    fn adjacent<H: WindowHost>(
        reactor: &Reactor<H>,
        tile: TileId,
        direction: Direction,
        wrap: bool,
    ) -> Option<TileId> {
        let (desktop, screen) = reactor.layout_of(tile)?;
        reactor.screen_layout(desktop, screen)?.adjacent_tile(tile, direction, wrap)
    }
}
