use tracing::trace;

use crate::model::signal::Signal;
use crate::sys::geometry::Rect;
use crate::sys::host::{Desktop, WindowId, WindowInfo};

slotmap::new_key_type! {
    pub struct TileId;
}

/// Change notifications published by a tile.
///
/// Everything except the floating pair is a layout signal: layout signals
/// are muted while the tile is not live (not placed in any layout, or
/// floating) so host property writes on unplaced tiles never reach the
/// layouts. The floating pair stays audible because it is what decides
/// placement in the first place.
#[derive(Debug, Default)]
pub struct TileSignals {
    /// `(assigned, observed)` when the host reports geometry that differs
    /// from the rectangle the layout assigned.
    pub geometry_changed: Signal<(Rect, Rect)>,
    pub screen_changed: Signal<(usize, usize)>,
    pub desktop_changed: Signal<(Option<Desktop>, Option<Desktop>)>,
    pub moving_started: Signal<()>,
    pub moving_step: Signal<Rect>,
    pub moving_ended: Signal<()>,
    pub resizing_started: Signal<()>,
    pub resizing_step: Signal<Rect>,
    pub resizing_ended: Signal<()>,
    pub floating_changed: Signal<(bool, bool)>,
    pub forced_floating_changed: Signal<(bool, bool)>,
}

impl TileSignals {
    fn set_layout_muted(&self, muted: bool) {
        self.geometry_changed.set_muted(muted);
        self.screen_changed.set_muted(muted);
        self.desktop_changed.set_muted(muted);
        self.moving_started.set_muted(muted);
        self.moving_step.set_muted(muted);
        self.moving_ended.set_muted(muted);
        self.resizing_started.set_muted(muted);
        self.resizing_step.set_muted(muted);
        self.resizing_ended.set_muted(muted);
    }

    pub fn layout_muted(&self) -> bool { self.screen_changed.is_muted() }
}

/// One layout slot holding one or more grouped windows.
#[derive(Debug)]
pub struct Tile {
    id: TileId,
    windows: Vec<WindowId>,
    rect: Rect,
    screen: usize,
    desktop: Option<Desktop>,
    floating: bool,
    forced_floating: bool,
    live: bool,
    signals: TileSignals,
}

impl Tile {
    pub(crate) fn new(id: TileId, info: &WindowInfo) -> Self {
        let tile = Self {
            id,
            windows: vec![info.id],
            rect: info.geometry,
            screen: info.screen,
            desktop: Desktop::from_host(info.desktop),
            floating: false,
            forced_floating: info.forced_floating,
            live: false,
            signals: TileSignals::default(),
        };
        tile.update_emit_signals();
        tile
    }

    pub fn id(&self) -> TileId { self.id }

    pub fn windows(&self) -> &[WindowId] { &self.windows }

    /// The window whose host properties stand for the whole tile.
    pub fn representative(&self) -> Option<WindowId> { self.windows.first().copied() }

    pub fn contains(&self, window: WindowId) -> bool { self.windows.contains(&window) }

    pub fn is_empty(&self) -> bool { self.windows.is_empty() }

    pub fn signals(&self) -> &TileSignals { &self.signals }

    pub fn rect(&self) -> Rect { self.rect }

    pub fn screen(&self) -> usize { self.screen }

    pub fn desktop(&self) -> Option<Desktop> { self.desktop }

    pub fn is_floating(&self) -> bool { self.floating }

    pub fn is_forced_floating(&self) -> bool { self.forced_floating }

    /// True when neither the user nor the host keeps this tile out of the
    /// layouts.
    pub fn wants_tiling(&self) -> bool { !self.floating && !self.forced_floating }

    pub fn is_live(&self) -> bool { self.live }

    /// The host-focused member if it belongs to this tile, otherwise the
    /// representative.
    pub fn active_window(&self, host_active: Option<WindowId>) -> Option<WindowId> {
        match host_active {
            Some(window) if self.contains(window) => Some(window),
            _ => self.representative(),
        }
    }

    pub(crate) fn merge(&mut self, window: WindowId) -> bool {
        if self.contains(window) {
            return false;
        }
        self.windows.push(window);
        true
    }

    pub(crate) fn unmerge(&mut self, window: WindowId) -> bool {
        let before = self.windows.len();
        self.windows.retain(|&w| w != window);
        before != self.windows.len()
    }

    /// Stores the layout-assigned rectangle. Returns whether it changed.
    pub fn set_rectangle(&mut self, rect: Rect) -> bool {
        if self.rect == rect {
            return false;
        }
        trace!(tile = ?self.id, ?rect, "tile rectangle");
        self.rect = rect;
        true
    }

    /// Reports geometry observed on the host for one of the members.
    pub fn observe_geometry(&self, observed: Rect) {
        if observed != self.rect {
            self.signals.geometry_changed.emit(&(self.rect, observed));
        }
    }

    pub fn set_floating(&mut self, floating: bool) -> bool {
        if self.floating == floating {
            return false;
        }
        let old = self.floating;
        self.floating = floating;
        self.update_emit_signals();
        self.signals.floating_changed.emit(&(old, floating));
        true
    }

    pub fn set_forced_floating(&mut self, forced: bool) -> bool {
        if self.forced_floating == forced {
            return false;
        }
        let old = self.forced_floating;
        self.forced_floating = forced;
        self.update_emit_signals();
        self.signals.forced_floating_changed.emit(&(old, forced));
        true
    }

    pub fn set_screen(&mut self, screen: usize) -> bool {
        if self.screen == screen {
            return false;
        }
        let old = self.screen;
        self.screen = screen;
        self.signals.screen_changed.emit(&(old, screen));
        true
    }

    pub fn set_desktop(&mut self, desktop: Option<Desktop>) -> bool {
        if self.desktop == desktop {
            return false;
        }
        let old = self.desktop;
        self.desktop = desktop;
        self.signals.desktop_changed.emit(&(old, desktop));
        true
    }

    /// Marks the tile as placed in (or removed from) the layouts.
    pub fn set_live(&mut self, live: bool) {
        if self.live != live {
            self.live = live;
            self.update_emit_signals();
        }
    }

    pub fn update_emit_signals(&self) {
        self.signals.set_layout_muted(!self.live || !self.wants_tiling());
    }
}
