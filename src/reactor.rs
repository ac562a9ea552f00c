//! The Reactor's job is to keep the layouts coherent with what the host
//! reports.
//!
//! Host events arrive through [`Reactor::handle_event`]. They update the tile
//! registry and the tiles; the resulting tile and registry signals are
//! forwarded into a queue which is drained before `handle_event` returns.
//! Layout mutations therefore never run inside a signal emission.
//!
//! Whether a tile is placed is tracked in one table ([`TileBinding`]). Every
//! path that can change placement (floating, forced floating, screen or
//! desktop changes, grid changes, tile creation and destruction) goes through
//! the same reconcile step, which adds or removes the tile exactly once.

mod events;
mod managers;
mod replay;

#[cfg(test)]
mod testing;

use crossbeam_channel::{Receiver, Sender};
pub use managers::{DragManager, DragState};
pub use replay::{Record, Scenario, observe, replay};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use self::events::command::CommandEventHandler;
use self::events::drag::DragEventHandler;
use self::events::space::SpaceEventHandler;
use self::events::window::WindowEventHandler;
use crate::common::collections::HashMap;
use crate::common::config::Config;
use crate::layout_engine::{Direction, GeometryUpdate, ScreenLayout};
use crate::model::{Signal, TileId, TileRegistry};
use crate::sys::geometry::{Point, Rect};
use crate::sys::host::{Desktop, HostDesktop, WindowHost, WindowId, WindowInfo};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// A window appeared. Also used for every window found at startup by
    /// hosts that prefer pushing them over being enumerated.
    WindowAdded(WindowInfo),
    WindowClosed(WindowId),
    WindowScreenChanged(WindowId, usize),
    WindowDesktopChanged(WindowId, HostDesktop),
    /// Geometry observed outside of a drag or resize.
    WindowGeometryChanged(WindowId, Rect),
    WindowMoveStarted(WindowId),
    WindowMoveStep(WindowId, Rect),
    WindowMoveEnded(WindowId),
    WindowResizeStarted(WindowId),
    WindowResizeStep(WindowId, Rect),
    WindowResizeEnded(WindowId),
    WindowForcedFloatingChanged(WindowId, bool),
    WindowGrouped {
        window: WindowId,
        with: WindowId,
    },
    WindowUngrouped(WindowId),
    WindowActivated(WindowId),

    DesktopCountChanged {
        columns: usize,
        rows: usize,
    },
    ScreenCountChanged(Vec<Rect>),
    CurrentDesktopChanged(HostDesktop),
    ActiveScreenChanged(usize),
    /// `desktop: None` applies to the screen on every desktop.
    TilingAreaChanged {
        desktop: Option<HostDesktop>,
        screen: usize,
        area: Rect,
    },

    Command(TilingCommand),
}

/// User-facing commands, usually bound to shortcuts by the surrounding
/// window manager.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TilingCommand {
    CycleLayoutVariant { forward: bool },
    /// `index` refers to the configured layout list.
    SwitchLayoutVariant { desktop: usize, screen: usize, index: usize },
    ToggleFloating,
    SwitchFocus(Direction),
    MoveTile(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementChange {
    pub tile: TileId,
    pub placed: bool,
}

/// Signal payloads forwarded from the registry and the tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Notification {
    TileAdded(TileId),
    TileRemoved(TileId),
    GeometryDrift { tile: TileId, assigned: Rect },
    ScreenChanged(TileId),
    DesktopChanged(TileId),
    MoveStarted(TileId),
    MoveStep(TileId, Rect),
    MoveEnded(TileId),
    ResizeStarted(TileId),
    ResizeStep(TileId, Rect),
    ResizeEnded(TileId),
    FloatingChanged(TileId),
}

/// Reactor-side state of a tile whose signals are forwarded. The forwarding
/// handlers live on the tile's signals and go away with the tile.
/// `placement` is `None` while the tile is not placed anywhere.
#[derive(Debug, Default)]
pub struct TileBinding {
    pub placement: Option<Vec<(usize, usize)>>,
}

pub struct Reactor<H: WindowHost> {
    pub(crate) config: Config,
    pub(crate) host: H,
    pub(crate) tiles: TileRegistry,
    /// Indexed `[desktop][screen]`; every row has the same length.
    pub(crate) layouts: Vec<Vec<ScreenLayout>>,
    pub(crate) current_desktop: usize,
    pub(crate) current_screen: usize,
    pub(crate) drag_manager: DragManager,
    pub(crate) bindings: HashMap<TileId, TileBinding>,
    notify_tx: Sender<Notification>,
    notifications: Receiver<Notification>,
    record: Record,
    pub placement_changed: Signal<PlacementChange>,
}

impl<H: WindowHost> Reactor<H> {
    /// Builds the desktop × screen grid from the host and places every
    /// window it currently reports.
    pub fn new(host: H, config: Config) -> Self { Self::with_record(host, config, Record::none()) }

    pub fn with_record(host: H, config: Config, record: Record) -> Self {
        let (notify_tx, notifications) = crossbeam_channel::unbounded();
        let tiles = TileRegistry::new();
        let tx = notify_tx.clone();
        tiles.tile_added.connect(move |&id| {
            let _ = tx.send(Notification::TileAdded(id));
        });
        let tx = notify_tx.clone();
        tiles.tile_removed.connect(move |&id| {
            let _ = tx.send(Notification::TileRemoved(id));
        });

        let current_desktop =
            Desktop::from_host(host.current_desktop()).and_then(Desktop::index).unwrap_or(0);
        let current_screen = host.active_screen();
        let mut reactor = Reactor {
            config,
            host,
            tiles,
            layouts: Vec::new(),
            current_desktop,
            current_screen,
            drag_manager: DragManager::default(),
            bindings: HashMap::default(),
            notify_tx,
            notifications,
            record,
            placement_changed: Signal::new(),
        };
        SpaceEventHandler::reconcile_grid(&mut reactor);
        for info in reactor.host.windows() {
            reactor.tiles.add_window(&info);
        }
        reactor.drain();
        info!(
            desktops = reactor.layouts.len(),
            screens = reactor.screen_count(),
            tiles = reactor.tiles.len(),
            "reactor started"
        );
        reactor
    }

    #[instrument(name = "reactor::handle_event", skip(self))]
    pub fn handle_event(&mut self, event: Event) {
        self.record.on_event(&event);
        match event {
            Event::WindowAdded(info) => WindowEventHandler::handle_window_added(self, info),
            Event::WindowClosed(window) => WindowEventHandler::handle_window_closed(self, window),
            Event::WindowScreenChanged(window, screen) => {
                WindowEventHandler::handle_window_screen_changed(self, window, screen)
            }
            Event::WindowDesktopChanged(window, desktop) => {
                WindowEventHandler::handle_window_desktop_changed(self, window, desktop)
            }
            Event::WindowGeometryChanged(window, rect) => {
                WindowEventHandler::handle_window_geometry_changed(self, window, rect)
            }
            Event::WindowForcedFloatingChanged(window, forced) => {
                WindowEventHandler::handle_window_forced_floating_changed(self, window, forced)
            }
            Event::WindowGrouped { window, with } => {
                WindowEventHandler::handle_window_grouped(self, window, with)
            }
            Event::WindowUngrouped(window) => {
                WindowEventHandler::handle_window_ungrouped(self, window)
            }
            Event::WindowActivated(window) => trace!(%window, "window activated"),
            Event::WindowMoveStarted(window) => {
                DragEventHandler::handle_window_move_started(self, window)
            }
            Event::WindowMoveStep(window, rect) => {
                DragEventHandler::handle_window_move_step(self, window, rect)
            }
            Event::WindowMoveEnded(window) => {
                DragEventHandler::handle_window_move_ended(self, window)
            }
            Event::WindowResizeStarted(window) => {
                DragEventHandler::handle_window_resize_started(self, window)
            }
            Event::WindowResizeStep(window, rect) => {
                DragEventHandler::handle_window_resize_step(self, window, rect)
            }
            Event::WindowResizeEnded(window) => {
                DragEventHandler::handle_window_resize_ended(self, window)
            }
            Event::DesktopCountChanged { .. } | Event::ScreenCountChanged(_) => {
                SpaceEventHandler::reconcile_grid(self)
            }
            Event::CurrentDesktopChanged(desktop) => {
                SpaceEventHandler::handle_current_desktop_changed(self, desktop)
            }
            Event::ActiveScreenChanged(screen) => {
                SpaceEventHandler::handle_active_screen_changed(self, screen)
            }
            Event::TilingAreaChanged { desktop, screen, area } => {
                SpaceEventHandler::handle_tiling_area_changed(self, desktop, screen, area)
            }
            Event::Command(cmd) => CommandEventHandler::handle_command(self, cmd),
        }
        self.drain();
    }

    pub fn config(&self) -> &Config { &self.config }

    pub fn host(&self) -> &H { &self.host }

    pub fn host_mut(&mut self) -> &mut H { &mut self.host }

    pub fn tiles(&self) -> &TileRegistry { &self.tiles }

    pub fn current_desktop(&self) -> usize { self.current_desktop }

    pub fn current_screen(&self) -> usize { self.current_screen }

    pub fn desktop_count(&self) -> usize { self.layouts.len() }

    pub fn screen_count(&self) -> usize { self.layouts.first().map_or(0, Vec::len) }

    pub fn drag_state(&self) -> DragState { self.drag_manager.drag_state }

    pub fn screen_layout(&self, desktop: usize, screen: usize) -> Option<&ScreenLayout> {
        self.layouts.get(desktop)?.get(screen)
    }

    pub(crate) fn screen_layout_mut(
        &mut self,
        desktop: usize,
        screen: usize,
    ) -> Option<&mut ScreenLayout> {
        self.layouts.get_mut(desktop)?.get_mut(screen)
    }

    pub fn binding(&self, tile: TileId) -> Option<&TileBinding> { self.bindings.get(&tile) }

    /// Layouts the tile is placed in, in `(desktop, screen)` form.
    pub fn placement(&self, tile: TileId) -> Option<&[(usize, usize)]> {
        self.bindings.get(&tile)?.placement.as_deref()
    }

    /// Renders every layout of the grid, one tree per screen.
    pub fn draw_layouts(&self) -> String {
        let mut out = String::new();
        for row in &self.layouts {
            for layout in row {
                let marker = if layout.is_active() { " (active)" } else { "" };
                out.push_str(&format!(
                    "desktop {} screen {}{marker}\n",
                    Desktop::Index(layout.desktop()).to_host(),
                    layout.screen()
                ));
                out.push_str(&layout.draw_tree());
            }
        }
        out
    }

    /// Handles queued notifications until the queue is empty.
    pub(crate) fn drain(&mut self) {
        while let Ok(notification) = self.notifications.try_recv() {
            trace!(?notification, "notification");
            self.handle_notification(notification);
        }
    }

    fn handle_notification(&mut self, notification: Notification) {
        match notification {
            Notification::TileAdded(tile) => {
                self.bind(tile);
                self.sync_placement(tile, None);
            }
            Notification::TileRemoved(tile) => self.unbind(tile),
            Notification::FloatingChanged(tile) | Notification::DesktopChanged(tile) => {
                self.sync_placement(tile, None)
            }
            Notification::ScreenChanged(tile) => {
                if self.drag_manager.is_moving(tile) {
                    trace!(?tile, "screen change deferred until the move ends");
                } else {
                    self.sync_placement(tile, None);
                }
            }
            Notification::GeometryDrift { tile, assigned } => {
                if self.drag_manager.is_busy(tile) {
                    return;
                }
                debug!(?tile, ?assigned, "restoring tile geometry");
                self.refresh_tile(tile);
            }
            Notification::MoveStarted(tile) => DragEventHandler::on_move_started(self, tile),
            Notification::MoveStep(tile, rect) => DragEventHandler::on_move_step(self, tile, rect),
            Notification::MoveEnded(tile) => DragEventHandler::on_move_ended(self, tile),
            Notification::ResizeStarted(tile) => DragEventHandler::on_resize_started(self, tile),
            Notification::ResizeStep(tile, rect) => {
                trace!(?tile, ?rect, "resizing");
            }
            Notification::ResizeEnded(tile) => DragEventHandler::on_resize_ended(self, tile),
        }
    }

    fn bind(&mut self, id: TileId) {
        if self.bindings.contains_key(&id) {
            return;
        }
        let Some(tile) = self.tiles.tile(id) else {
            trace!(tile = ?id, "tile vanished before it could be bound");
            return;
        };
        let s = tile.signals();
        let tx = &self.notify_tx;
        forward(&s.geometry_changed, tx, move |&(assigned, _)| {
            Notification::GeometryDrift { tile: id, assigned }
        });
        forward(&s.screen_changed, tx, move |_| Notification::ScreenChanged(id));
        forward(&s.desktop_changed, tx, move |_| Notification::DesktopChanged(id));
        forward(&s.moving_started, tx, move |_| Notification::MoveStarted(id));
        forward(&s.moving_step, tx, move |&rect| Notification::MoveStep(id, rect));
        forward(&s.moving_ended, tx, move |_| Notification::MoveEnded(id));
        forward(&s.resizing_started, tx, move |_| Notification::ResizeStarted(id));
        forward(&s.resizing_step, tx, move |&rect| Notification::ResizeStep(id, rect));
        forward(&s.resizing_ended, tx, move |_| Notification::ResizeEnded(id));
        forward(&s.floating_changed, tx, move |_| Notification::FloatingChanged(id));
        forward(&s.forced_floating_changed, tx, move |_| Notification::FloatingChanged(id));
        debug!(tile = ?id, "tile bound");
        self.bindings.insert(id, TileBinding { placement: None });
    }

    fn unbind(&mut self, tile: TileId) {
        let Some(binding) = self.bindings.remove(&tile) else {
            return;
        };
        self.abandon_drag(tile);
        if let Some(placement) = binding.placement {
            for (desktop, screen) in placement {
                if let Some(layout) = self.screen_layout_mut(desktop, screen) {
                    let updates = layout.remove_tile(tile);
                    self.apply_updates(updates);
                }
            }
            debug!(?tile, "tile unplaced");
            self.placement_changed.emit(&PlacementChange { tile, placed: false });
        }
        debug!(?tile, "tile unbound");
    }

    /// Layouts a tile should be in given its current state, or `None` if it
    /// should not be placed. Indices past the grid are clamped to the last
    /// desktop or screen so tiles survive the grid shrinking.
    fn desired_placement(&self, id: TileId) -> Option<Vec<(usize, usize)>> {
        let tile = self.tiles.tile(id)?;
        if !tile.wants_tiling() {
            return None;
        }
        let desktop = tile.desktop()?;
        let desktops = self.desktop_count();
        let screens = self.screen_count();
        if desktops == 0 || screens == 0 {
            return None;
        }
        let screen = tile.screen().min(screens - 1);
        match desktop {
            Desktop::All => Some((0..desktops).map(|d| (d, screen)).collect()),
            Desktop::Index(d) => Some(vec![(d.min(desktops - 1), screen)]),
        }
    }

    /// Brings a tile's placement in line with its state. Adds and removals
    /// happen only for layouts that actually change, and
    /// `placement_changed` fires only when the tile goes from placed to
    /// unplaced or back.
    pub(crate) fn sync_placement(&mut self, tile: TileId, drop_point: Option<Point>) {
        let Some(binding) = self.bindings.get(&tile) else {
            return;
        };
        let current = binding.placement.clone();
        let desired = self.desired_placement(tile);
        if current == desired {
            trace!(?tile, "placement unchanged");
            return;
        }
        let old = current.as_deref().unwrap_or_default();
        let new = desired.as_deref().unwrap_or_default();
        for &(desktop, screen) in old.iter().filter(|slot| !new.contains(slot)) {
            if let Some(layout) = self.screen_layout_mut(desktop, screen) {
                let updates = layout.remove_tile(tile);
                self.apply_updates(updates);
            }
        }
        for &(desktop, screen) in new.iter().filter(|slot| !old.contains(slot)) {
            if let Some(layout) = self.screen_layout_mut(desktop, screen) {
                let updates = layout.add_tile(tile, drop_point);
                self.apply_updates(updates);
            }
        }
        let was_placed = current.is_some();
        let placed = desired.is_some();
        if let Some(binding) = self.bindings.get_mut(&tile) {
            binding.placement = desired;
        }
        if was_placed != placed {
            if !placed {
                self.abandon_drag(tile);
            }
            if let Some(t) = self.tiles.tile_mut(tile) {
                t.set_live(placed);
            }
            debug!(?tile, placed, "placement changed");
            self.placement_changed.emit(&PlacementChange { tile, placed });
        } else {
            debug!(?tile, "tile transferred between layouts");
        }
    }

    /// Cancels a move or resize of a tile that is no longer placed; its
    /// muted signals would never report the end.
    fn abandon_drag(&mut self, tile: TileId) {
        if self.drag_manager.forget(tile) && self.config.settings.drop_preview {
            self.host.hide_outline();
        }
    }

    /// Stores each rectangle on its tile and writes it to the member
    /// windows.
    pub(crate) fn apply_updates(&mut self, updates: Vec<GeometryUpdate>) {
        for (id, rect) in updates {
            let Some(tile) = self.tiles.tile_mut(id) else {
                continue;
            };
            tile.set_rectangle(rect);
            let windows = tile.windows().to_vec();
            for window in windows {
                self.host.set_window_geometry(window, rect);
            }
        }
    }

    /// Writes the tile's assigned rectangle to its windows again if the tile
    /// is shown in an active layout.
    pub(crate) fn refresh_tile(&mut self, id: TileId) {
        let Some((desktop, screen)) = self.visible_layout_of(id) else {
            return;
        };
        let Some(rect) = self.screen_layout(desktop, screen).and_then(|l| l.rect_of(id)) else {
            return;
        };
        self.apply_updates(vec![(id, rect)]);
    }

    /// The layout used for commands on `tile`: the one on the current
    /// desktop if any, else the first it is placed in.
    pub(crate) fn layout_of(&self, tile: TileId) -> Option<(usize, usize)> {
        let placement = self.placement(tile)?;
        placement
            .iter()
            .find(|(desktop, _)| *desktop == self.current_desktop)
            .or_else(|| placement.first())
            .copied()
    }

    fn visible_layout_of(&self, tile: TileId) -> Option<(usize, usize)> {
        let (desktop, screen) = self.layout_of(tile)?;
        let layout = self.screen_layout(desktop, screen)?;
        layout.is_active().then_some((desktop, screen))
    }

    pub(crate) fn tile_of_window(&self, window: WindowId) -> Option<TileId> {
        self.tiles.get_tile(window)
    }
}

fn forward<A: 'static>(
    signal: &Signal<A>,
    tx: &Sender<Notification>,
    make: impl Fn(&A) -> Notification + 'static,
) {
    let tx = tx.clone();
    signal.connect(move |args| {
        let _ = tx.send(make(args));
    });
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::testing::*;
    use super::*;
    use crate::layout_engine::{LayoutSystem, LayoutVariant};
    use crate::sys::headless::{HeadlessHost, HeadlessSetup};

    fn placements(reactor: &Reactor<HeadlessHost>) -> Rc<RefCell<Vec<PlacementChange>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log2 = log.clone();
        reactor.placement_changed.connect(move |change| log2.borrow_mut().push(*change));
        log
    }

    #[test]
    fn startup_places_existing_windows() {
        let mut setup = single_screen();
        setup.windows = make_windows(3, 0);
        let reactor = Reactor::new_for_test(setup);
        assert_eq!(reactor.layout_tiles(0, 0).len(), 3);
        assert_eq!(reactor.window_rect(1), Rect::new(0, 0, 960, 1080));
        assert_eq!(reactor.window_rect(2), Rect::new(960, 0, 960, 540));
        assert_eq!(reactor.window_rect(3), Rect::new(960, 540, 960, 540));
    }

    #[test]
    fn adding_and_closing_windows_reflows_the_screen() {
        let mut reactor = Reactor::new_for_test(single_screen());
        reactor.handle_events(make_windows(3, 0).into_iter().map(Event::WindowAdded));
        reactor.feed(Event::WindowClosed(WindowId(2)));
        assert_eq!(reactor.window_rect(1), Rect::new(0, 0, 960, 1080));
        assert_eq!(reactor.window_rect(3), Rect::new(960, 0, 960, 1080));

        reactor.feed(Event::WindowClosed(WindowId(2)));
        assert_eq!(reactor.layout_tiles(0, 0).len(), 2);
    }

    #[test]
    fn window_is_in_exactly_one_tile() {
        let mut reactor = Reactor::new_for_test(single_screen());
        let info = make_window(1, 0);
        reactor.feed(Event::WindowAdded(info.clone()));
        reactor.feed(Event::WindowAdded(info));
        let tile = reactor.tile_of(1);
        let members = reactor.tiles().tile(tile).unwrap();
        assert_eq!(members.windows(), &[WindowId(1)]);
        assert_eq!(members.signals().floating_changed.handler_count(), 1);
        assert_eq!(reactor.layout_tiles(0, 0), vec![tile]);
    }

    #[test]
    fn toggling_floating_twice_places_and_unplaces_once_each() {
        let mut setup = single_screen();
        setup.windows = make_windows(2, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let log = placements(&reactor);
        let tile = reactor.tile_of(2);
        let before = reactor.layout_tiles(0, 0);

        reactor.host_mut().activate_window(WindowId(2));
        reactor.feed(Event::Command(TilingCommand::ToggleFloating));
        assert_eq!(reactor.layout_tiles(0, 0).len(), 1);
        assert_eq!(reactor.window_rect(1), Rect::new(0, 0, 1920, 1080));
        reactor.feed(Event::Command(TilingCommand::ToggleFloating));

        assert_eq!(reactor.layout_tiles(0, 0), before);
        assert_eq!(
            *log.borrow(),
            vec![
                PlacementChange { tile, placed: false },
                PlacementChange { tile, placed: true },
            ]
        );
    }

    #[test]
    fn forced_floating_overrides_do_not_double_unplace() {
        let mut setup = single_screen();
        setup.windows = make_windows(2, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let log = placements(&reactor);

        reactor.host_mut().activate_window(WindowId(2));
        reactor.feed(Event::WindowForcedFloatingChanged(WindowId(2), true));
        reactor.feed(Event::Command(TilingCommand::ToggleFloating));
        reactor.feed(Event::Command(TilingCommand::ToggleFloating));
        assert_eq!(log.borrow().len(), 1);
        reactor.feed(Event::WindowForcedFloatingChanged(WindowId(2), false));
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(reactor.layout_tiles(0, 0).len(), 2);
    }

    #[test]
    fn windows_opened_forced_floating_are_placed_once_released() {
        let mut reactor = Reactor::new_for_test(single_screen());
        let mut dialog = make_window(7, 0);
        dialog.forced_floating = true;
        reactor.feed(Event::WindowAdded(dialog));
        assert!(reactor.layout_tiles(0, 0).is_empty());
        reactor.feed(Event::WindowForcedFloatingChanged(WindowId(7), false));
        assert_eq!(reactor.layout_tiles(0, 0), vec![reactor.tile_of(7)]);
        assert_eq!(reactor.window_rect(7), Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn drag_to_another_screen_transfers_the_tile() {
        let mut setup = two_screens();
        setup.windows = make_windows(3, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let tile = reactor.tile_of(3);

        reactor.handle_events([
            Event::WindowMoveStarted(WindowId(3)),
            Event::WindowMoveStep(WindowId(3), Rect::new(2000, 100, 400, 300)),
            Event::WindowScreenChanged(WindowId(3), 1),
        ]);
        assert!(reactor.layout_tiles(0, 0).contains(&tile));
        assert_eq!(reactor.host().outline(), Some(Rect::new(1920, 0, 1920, 1080)));

        reactor.feed(Event::WindowMoveEnded(WindowId(3)));
        assert_eq!(reactor.layout_tiles(0, 0).len(), 2);
        assert_eq!(reactor.layout_tiles(0, 1), vec![tile]);
        assert_eq!(reactor.host().outline(), None);
        assert_eq!(reactor.window_rect(3), Rect::new(1920, 0, 1920, 1080));
        let origin = reactor.screen_layout(0, 0).unwrap().layout();
        origin.check_invariants().unwrap();
        assert_eq!(reactor.drag_state(), DragState::Idle);
    }

    #[test]
    fn drag_within_a_screen_swaps_with_tile_under_drop_point() {
        let mut setup = single_screen();
        setup.windows = make_windows(3, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let (a, c) = (reactor.tile_of(1), reactor.tile_of(3));

        reactor.handle_events([
            Event::WindowMoveStarted(WindowId(1)),
            Event::WindowMoveStep(WindowId(1), Rect::new(1200, 700, 400, 300)),
            Event::WindowMoveEnded(WindowId(1)),
        ]);
        let tiles = reactor.layout_tiles(0, 0);
        assert_eq!(tiles[0], c);
        assert_eq!(tiles[2], a);
        assert_eq!(reactor.window_rect(1), Rect::new(960, 540, 960, 540));
        assert_eq!(reactor.window_rect(3), Rect::new(0, 0, 960, 1080));
    }

    #[test]
    fn dropping_a_window_onto_itself_snaps_it_back() {
        let mut setup = single_screen();
        setup.windows = make_windows(2, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let before = reactor.layout_tiles(0, 0);
        reactor.handle_events([
            Event::WindowMoveStarted(WindowId(1)),
            Event::WindowMoveStep(WindowId(1), Rect::new(30, 30, 960, 1080)),
            Event::WindowMoveEnded(WindowId(1)),
        ]);
        assert_eq!(reactor.layout_tiles(0, 0), before);
        assert_eq!(reactor.window_rect(1), Rect::new(0, 0, 960, 1080));
    }

    #[test]
    fn second_move_start_keeps_the_origin() {
        let mut setup = two_screens();
        setup.windows = vec![make_window(1, 0), make_window(2, 1)];
        let mut reactor = Reactor::new_for_test(setup);
        let tile = reactor.tile_of(1);
        reactor.handle_events([
            Event::WindowMoveStarted(WindowId(1)),
            Event::WindowMoveStarted(WindowId(2)),
        ]);
        assert_eq!(reactor.drag_state(), DragState::Moving { tile, origin_screen: 0 });
    }

    #[test]
    fn floating_a_tile_mid_move_cancels_the_move() {
        let mut setup = single_screen();
        setup.windows = make_windows(3, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let (a, b, c) = (reactor.tile_of(1), reactor.tile_of(2), reactor.tile_of(3));
        reactor.host_mut().activate_window(WindowId(2));

        reactor.handle_events([
            Event::WindowMoveStarted(WindowId(2)),
            Event::WindowMoveStep(WindowId(2), Rect::new(100, 100, 400, 300)),
        ]);
        assert!(reactor.host().outline().is_some());
        reactor.feed(Event::Command(TilingCommand::ToggleFloating));
        let floating = reactor.tiles().tile(b).unwrap();
        assert!(!floating.is_live());
        assert!(floating.signals().layout_muted());
        assert_eq!(reactor.drag_state(), DragState::Idle);
        assert_eq!(reactor.host().outline(), None);

        reactor.handle_events([
            Event::WindowMoveEnded(WindowId(2)),
            Event::Command(TilingCommand::ToggleFloating),
        ]);
        assert_eq!(reactor.layout_tiles(0, 0), vec![a, c, b]);

        reactor.handle_events([
            Event::WindowMoveStarted(WindowId(1)),
            Event::WindowMoveStep(WindowId(1), Rect::new(1200, 700, 400, 300)),
            Event::WindowMoveEnded(WindowId(1)),
        ]);
        assert_eq!(reactor.layout_tiles(0, 0), vec![b, c, a]);
        assert_eq!(reactor.drag_state(), DragState::Idle);
    }

    #[test]
    fn forced_floating_mid_resize_restores_snap_back() {
        let mut setup = single_screen();
        setup.windows = make_windows(2, 0);
        let mut reactor = Reactor::new_for_test(setup);
        reactor.handle_events([
            Event::WindowResizeStarted(WindowId(2)),
            Event::WindowForcedFloatingChanged(WindowId(2), true),
            Event::WindowResizeEnded(WindowId(2)),
            Event::WindowForcedFloatingChanged(WindowId(2), false),
        ]);
        assert_eq!(reactor.window_rect(2), Rect::new(960, 0, 960, 1080));

        reactor.feed(Event::WindowGeometryChanged(WindowId(2), Rect::new(5, 5, 10, 10)));
        assert_eq!(reactor.window_rect(2), Rect::new(960, 0, 960, 1080));
    }

    #[test]
    fn geometry_drift_snaps_back() {
        let mut setup = single_screen();
        setup.windows = make_windows(2, 0);
        let mut reactor = Reactor::new_for_test(setup);
        reactor.feed(Event::WindowGeometryChanged(WindowId(2), Rect::new(5, 5, 10, 10)));
        assert_eq!(reactor.window_rect(2), Rect::new(960, 0, 960, 1080));
    }

    #[test]
    fn resize_end_moves_the_split() {
        let mut setup = single_screen();
        setup.windows = make_windows(2, 0);
        let mut reactor = Reactor::new_for_test(setup);
        reactor.handle_events([
            Event::WindowResizeStarted(WindowId(1)),
            Event::WindowResizeStep(WindowId(1), Rect::new(0, 0, 1200, 1080)),
            Event::WindowResizeEnded(WindowId(1)),
        ]);
        assert_eq!(reactor.window_rect(1), Rect::new(0, 0, 1200, 1080));
        assert_eq!(reactor.window_rect(2), Rect::new(1200, 0, 720, 1080));
    }

    #[test]
    fn switch_focus_follows_neighbours_without_wrapping() {
        let mut setup = single_screen();
        setup.windows = make_windows(3, 0);
        let mut reactor = Reactor::new_for_test(setup);
        reactor.host_mut().activate_window(WindowId(1));

        reactor.feed(Event::Command(TilingCommand::SwitchFocus(Direction::Right)));
        assert_eq!(reactor.host().active_window(), Some(WindowId(2)));
        reactor.feed(Event::Command(TilingCommand::SwitchFocus(Direction::Up)));
        assert_eq!(reactor.host().active_window(), Some(WindowId(2)));
        reactor.feed(Event::Command(TilingCommand::SwitchFocus(Direction::Down)));
        assert_eq!(reactor.host().active_window(), Some(WindowId(3)));
        reactor.feed(Event::Command(TilingCommand::SwitchFocus(Direction::Right)));
        assert_eq!(reactor.host().active_window(), Some(WindowId(3)));
    }

    #[test]
    fn move_tile_wraps_and_skips_floating_tiles() {
        let mut setup = single_screen();
        setup.windows = make_windows(3, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let (a, b, c) = (reactor.tile_of(1), reactor.tile_of(2), reactor.tile_of(3));
        reactor.host_mut().activate_window(WindowId(2));

        reactor.feed(Event::Command(TilingCommand::MoveTile(Direction::Up)));
        assert_eq!(reactor.layout_tiles(0, 0), vec![a, c, b]);
        assert_eq!(reactor.window_rect(2), Rect::new(960, 540, 960, 540));

        reactor.feed(Event::Command(TilingCommand::ToggleFloating));
        let before = reactor.layout_tiles(0, 0);
        reactor.feed(Event::Command(TilingCommand::MoveTile(Direction::Left)));
        assert_eq!(reactor.layout_tiles(0, 0), before);
    }

    #[test]
    fn cycling_layout_variants_preserves_tiles() {
        let mut setup = single_screen();
        setup.windows = make_windows(3, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let before = reactor.layout_tiles(0, 0);

        reactor.feed(Event::Command(TilingCommand::CycleLayoutVariant { forward: true }));
        let layout = reactor.screen_layout(0, 0).unwrap();
        assert_eq!(layout.variant(), LayoutVariant::TwoThird);
        assert_eq!(layout.tiles(), before);
        assert_eq!(reactor.window_rect(1), Rect::new(0, 0, 1280, 1080));

        reactor.feed(Event::Command(TilingCommand::CycleLayoutVariant { forward: false }));
        assert_eq!(reactor.screen_layout(0, 0).unwrap().variant(), LayoutVariant::Spiral);

        reactor.feed(Event::Command(TilingCommand::SwitchLayoutVariant {
            desktop: 0,
            screen: 3,
            index: 1,
        }));
        assert_eq!(reactor.screen_layout(0, 0).unwrap().variant(), LayoutVariant::Spiral);
    }

    #[test]
    fn all_desktop_windows_follow_the_grid() {
        let mut setup = single_screen();
        setup.desktop_columns = 2;
        let mut sticky = make_window(1, 0);
        sticky.desktop = -1;
        setup.windows = vec![sticky, make_window(2, 0)];
        let mut reactor = Reactor::new_for_test(setup);
        let tile = reactor.tile_of(1);
        assert_eq!(reactor.placement(tile), Some(&[(0, 0), (1, 0)][..]));

        reactor.feed(Event::DesktopCountChanged { columns: 3, rows: 1 });
        assert_eq!(reactor.placement(tile), Some(&[(0, 0), (1, 0), (2, 0)][..]));
        assert_eq!(reactor.layout_tiles(2, 0), vec![tile]);

        reactor.feed(Event::DesktopCountChanged { columns: 1, rows: 1 });
        assert_eq!(reactor.desktop_count(), 1);
        assert_eq!(reactor.placement(tile), Some(&[(0, 0)][..]));
    }

    #[test]
    fn shrinking_the_grid_migrates_tiles_instead_of_dropping_them() {
        let mut setup = two_screens();
        setup.desktop_columns = 2;
        let mut far = make_window(1, 1);
        far.desktop = 2;
        setup.windows = vec![far, make_window(2, 0)];
        let mut reactor = Reactor::new_for_test(setup);
        let log = placements(&reactor);
        let tile = reactor.tile_of(1);
        assert_eq!(reactor.placement(tile), Some(&[(1, 1)][..]));

        reactor.feed(Event::DesktopCountChanged { columns: 1, rows: 1 });
        reactor.feed(Event::ScreenCountChanged(vec![Rect::new(0, 0, 1920, 1080)]));
        assert_eq!(reactor.placement(tile), Some(&[(0, 0)][..]));
        assert_eq!(reactor.layout_tiles(0, 0).len(), 2);
        assert!(log.borrow().is_empty());
        assert_eq!(reactor.window_rect(1), Rect::new(960, 0, 960, 1080));
    }

    #[test]
    fn growing_screens_activates_new_layouts_on_the_current_desktop() {
        let mut reactor = Reactor::new_for_test(single_screen());
        reactor.feed(Event::ScreenCountChanged(vec![
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1920, 0, 1280, 1024),
        ]));
        let layout = reactor.screen_layout(0, 1).unwrap();
        assert!(layout.is_active());
        assert_eq!(layout.area(), Rect::new(1920, 0, 1280, 1024));

        reactor.feed(Event::WindowAdded(make_window(4, 1)));
        assert_eq!(reactor.window_rect(4), Rect::new(1920, 0, 1280, 1024));
    }

    #[test]
    fn resized_screen_reflows_its_layouts() {
        let mut setup = single_screen();
        setup.windows = make_windows(2, 0);
        let mut reactor = Reactor::new_for_test(setup);
        reactor.feed(Event::ScreenCountChanged(vec![Rect::new(0, 0, 1280, 720)]));
        assert_eq!(reactor.window_rect(1), Rect::new(0, 0, 640, 720));
        assert_eq!(reactor.window_rect(2), Rect::new(640, 0, 640, 720));
    }

    #[test]
    fn desktop_switch_renders_only_the_visible_row() {
        let mut setup = single_screen();
        setup.desktop_columns = 2;
        let mut other = make_window(2, 0);
        other.desktop = 2;
        setup.windows = vec![make_window(1, 0), other];
        let mut reactor = Reactor::new_for_test(setup);
        assert!(!reactor.screen_layout(1, 0).unwrap().is_active());
        let writes = reactor.host().geometry_writes();

        reactor.feed(Event::WindowAdded(make_window(3, 0)));
        let mut hidden = make_window(4, 0);
        hidden.desktop = 2;
        reactor.feed(Event::WindowAdded(hidden));
        assert_eq!(reactor.host().geometry_writes(), writes + 2);

        reactor.feed(Event::CurrentDesktopChanged(2));
        assert_eq!(reactor.current_desktop(), 1);
        assert!(reactor.screen_layout(1, 0).unwrap().is_active());
        assert!(!reactor.screen_layout(0, 0).unwrap().is_active());
        assert_eq!(reactor.window_rect(4), Rect::new(960, 0, 960, 1080));

        reactor.feed(Event::CurrentDesktopChanged(9));
        assert_eq!(reactor.current_desktop(), 1);
    }

    #[test]
    fn moving_a_window_to_another_desktop_transfers_it() {
        let mut setup = single_screen();
        setup.desktop_columns = 2;
        setup.windows = make_windows(2, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let tile = reactor.tile_of(2);
        reactor.feed(Event::WindowDesktopChanged(WindowId(2), 2));
        assert_eq!(reactor.placement(tile), Some(&[(1, 0)][..]));
        assert_eq!(reactor.window_rect(1), Rect::new(0, 0, 1920, 1080));

        reactor.feed(Event::WindowDesktopChanged(WindowId(2), 5));
        assert_eq!(reactor.placement(tile), Some(&[(1, 0)][..]));
    }

    #[test]
    fn grouping_shares_the_tile_geometry() {
        let mut setup = single_screen();
        setup.windows = make_windows(3, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let a = reactor.tile_of(1);

        reactor.feed(Event::WindowGrouped { window: WindowId(3), with: WindowId(1) });
        assert_eq!(reactor.tile_of(3), a);
        assert_eq!(reactor.layout_tiles(0, 0).len(), 2);
        assert_eq!(reactor.window_rect(3), reactor.window_rect(1));

        reactor.feed(Event::WindowUngrouped(WindowId(3)));
        assert_ne!(reactor.tile_of(3), a);
        assert_eq!(reactor.layout_tiles(0, 0).len(), 3);
        assert_eq!(reactor.window_rect(3), Rect::new(960, 540, 960, 540));
    }

    #[test]
    fn tiling_area_change_recomputes_geometry() {
        let mut setup = single_screen();
        setup.windows = make_windows(2, 0);
        let mut reactor = Reactor::new_for_test(setup);
        reactor.feed(Event::TilingAreaChanged {
            desktop: None,
            screen: 0,
            area: Rect::new(0, 30, 1000, 1050),
        });
        assert_eq!(reactor.window_rect(1), Rect::new(0, 30, 500, 1050));
        assert_eq!(reactor.window_rect(2), Rect::new(500, 30, 500, 1050));
    }

    #[test]
    fn stale_screen_indices_are_ignored() {
        let mut setup = HeadlessSetup::single_screen(Rect::new(0, 0, 800, 600));
        setup.windows = make_windows(1, 0);
        let mut reactor = Reactor::new_for_test(setup);
        let tile = reactor.tile_of(1);
        reactor.feed(Event::WindowScreenChanged(WindowId(1), 4));
        reactor.feed(Event::ActiveScreenChanged(4));
        reactor.feed(Event::TilingAreaChanged {
            desktop: Some(1),
            screen: 4,
            area: Rect::default(),
        });
        assert_eq!(reactor.placement(tile), Some(&[(0, 0)][..]));
        assert_eq!(reactor.current_screen(), 0);
    }
}
