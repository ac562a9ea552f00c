use super::{Event, Reactor};
use crate::common::config::Config;
use crate::model::TileId;
use crate::sys::geometry::Rect;
use crate::sys::headless::{HeadlessHost, HeadlessSetup};
use crate::sys::host::{WindowId, WindowInfo};

pub fn single_screen() -> HeadlessSetup {
    HeadlessSetup::single_screen(Rect::new(0, 0, 1920, 1080))
}

pub fn two_screens() -> HeadlessSetup {
    let mut setup = single_screen();
    setup.screens.push(Rect::new(1920, 0, 1920, 1080));
    setup
}

/// A normal window on the first desktop.
pub fn make_window(id: u64, screen: usize) -> WindowInfo {
    WindowInfo {
        id: WindowId(id),
        title: format!("Window{id}"),
        desktop: 1,
        screen,
        geometry: Rect::new(100 * id as i32, 100, 400, 300),
        forced_floating: false,
    }
}

/// Windows numbered from 1.
pub fn make_windows(count: u64, screen: usize) -> Vec<WindowInfo> {
    (1..=count).map(|id| make_window(id, screen)).collect()
}

impl Reactor<HeadlessHost> {
    pub fn new_for_test(setup: HeadlessSetup) -> Self {
        Reactor::new(HeadlessHost::new(setup), Config::default())
    }

    pub fn handle_events(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.feed(event);
        }
    }

    pub fn layout_tiles(&self, desktop: usize, screen: usize) -> Vec<TileId> {
        self.screen_layout(desktop, screen).map(|l| l.tiles()).unwrap_or_default()
    }

    #[track_caller]
    pub fn tile_of(&self, window: u64) -> TileId {
        self.tiles().get_tile(WindowId(window)).expect("window has no tile")
    }

    #[track_caller]
    pub fn window_rect(&self, window: u64) -> Rect {
        self.host().window(WindowId(window)).expect("unknown window").geometry
    }
}
