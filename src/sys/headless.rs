use serde::{Deserialize, Serialize};

use crate::common::collections::BTreeMap;
use crate::sys::geometry::Rect;
use crate::sys::host::{HostDesktop, WindowHost, WindowId, WindowInfo};

/// Initial state of a [`HeadlessHost`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadlessSetup {
    pub screens: Vec<Rect>,
    #[serde(default = "one")]
    pub desktop_columns: usize,
    #[serde(default = "one")]
    pub desktop_rows: usize,
    #[serde(default = "first_desktop")]
    pub current_desktop: HostDesktop,
    #[serde(default)]
    pub active_screen: usize,
    #[serde(default)]
    pub windows: Vec<WindowInfo>,
}

impl HeadlessSetup {
    pub fn single_screen(area: Rect) -> Self {
        Self {
            screens: vec![area],
            desktop_columns: 1,
            desktop_rows: 1,
            current_desktop: 1,
            active_screen: 0,
            windows: Vec::new(),
        }
    }
}

fn one() -> usize { 1 }

fn first_desktop() -> HostDesktop { 1 }

/// In-memory host used by tests and by scenario replay.
///
/// Geometry writes are applied verbatim and never echoed back as events;
/// the caller decides which notifications to deliver.
#[derive(Debug)]
pub struct HeadlessHost {
    screens: Vec<Rect>,
    desktop_grid: (usize, usize),
    current_desktop: HostDesktop,
    active_screen: usize,
    windows: BTreeMap<WindowId, WindowInfo>,
    active_window: Option<WindowId>,
    outline: Option<Rect>,
    geometry_writes: usize,
}

impl HeadlessHost {
    pub fn new(setup: HeadlessSetup) -> Self {
        let windows = setup.windows.into_iter().map(|w| (w.id, w)).collect();
        Self {
            screens: setup.screens,
            desktop_grid: (setup.desktop_columns.max(1), setup.desktop_rows.max(1)),
            current_desktop: setup.current_desktop,
            active_screen: setup.active_screen,
            windows,
            active_window: None,
            outline: None,
            geometry_writes: 0,
        }
    }

    pub fn open_window(&mut self, info: WindowInfo) { self.windows.insert(info.id, info); }

    pub fn close_window(&mut self, window: WindowId) {
        self.windows.remove(&window);
        if self.active_window == Some(window) {
            self.active_window = None;
        }
    }

    pub fn window(&self, window: WindowId) -> Option<&WindowInfo> { self.windows.get(&window) }

    /// Simulates the user or the host moving a window without going through
    /// the tiling core.
    pub fn place_window(&mut self, window: WindowId, rect: Rect) {
        if let Some(info) = self.windows.get_mut(&window) {
            info.geometry = rect;
        }
    }

    pub fn set_window_screen(&mut self, window: WindowId, screen: usize) {
        if let Some(info) = self.windows.get_mut(&window) {
            info.screen = screen;
        }
    }

    pub fn set_window_desktop(&mut self, window: WindowId, desktop: HostDesktop) {
        if let Some(info) = self.windows.get_mut(&window) {
            info.desktop = desktop;
        }
    }

    pub fn set_screens(&mut self, screens: Vec<Rect>) {
        self.screens = screens;
        if self.active_screen >= self.screens.len() {
            self.active_screen = self.screens.len().saturating_sub(1);
        }
    }

    pub fn set_screen_area(&mut self, screen: usize, area: Rect) {
        if let Some(rect) = self.screens.get_mut(screen) {
            *rect = area;
        }
    }

    pub fn set_desktop_grid(&mut self, columns: usize, rows: usize) {
        self.desktop_grid = (columns.max(1), rows.max(1));
    }

    pub fn set_current_desktop(&mut self, desktop: HostDesktop) { self.current_desktop = desktop; }

    pub fn set_active_screen(&mut self, screen: usize) { self.active_screen = screen; }

    pub fn set_active_window(&mut self, window: Option<WindowId>) { self.active_window = window; }

    pub fn outline(&self) -> Option<Rect> { self.outline }

    pub fn geometry_writes(&self) -> usize { self.geometry_writes }
}

impl WindowHost for HeadlessHost {
    fn windows(&self) -> Vec<WindowInfo> { self.windows.values().cloned().collect() }

    fn window_geometry(&self, window: WindowId) -> Option<Rect> {
        self.windows.get(&window).map(|w| w.geometry)
    }

    fn set_window_geometry(&mut self, window: WindowId, rect: Rect) {
        if let Some(info) = self.windows.get_mut(&window) {
            info.geometry = rect;
            self.geometry_writes += 1;
        }
    }

    fn tiling_area(&self, _desktop: HostDesktop, screen: usize) -> Rect {
        self.screens.get(screen).copied().unwrap_or_default()
    }

    fn desktop_grid(&self) -> (usize, usize) { self.desktop_grid }

    fn screen_count(&self) -> usize { self.screens.len() }

    fn active_screen(&self) -> usize { self.active_screen }

    fn current_desktop(&self) -> HostDesktop { self.current_desktop }

    fn active_window(&self) -> Option<WindowId> { self.active_window }

    fn activate_window(&mut self, window: WindowId) {
        if self.windows.contains_key(&window) {
            self.active_window = Some(window);
        }
    }

    fn show_outline(&mut self, rect: Rect) { self.outline = Some(rect); }

    fn hide_outline(&mut self) { self.outline = None; }
}
