//! The capability surface the tiling core needs from the window manager it
//! runs inside.
//!
//! Desktop numbers crossing this boundary use the host convention: 1-based,
//! `-1` for "on all desktops" and `0` for "on no desktop". Everything behind
//! the boundary uses [`Desktop`], which is 0-based.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sys::geometry::Rect;

/// Host desktop number, 1-based with `-1` meaning all desktops.
pub type HostDesktop = i32;

pub const ALL_DESKTOPS: HostDesktop = -1;

/// Opaque host window identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "w{}", self.0) }
}

/// Internal desktop placement of a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Desktop {
    All,
    Index(usize),
}

impl Desktop {
    /// Translates a host desktop number. Returns `None` for windows that
    /// are on no desktop at all.
    pub fn from_host(raw: HostDesktop) -> Option<Self> {
        match raw {
            ALL_DESKTOPS => Some(Desktop::All),
            n if n >= 1 => Some(Desktop::Index((n - 1) as usize)),
            _ => None,
        }
    }

    pub fn to_host(self) -> HostDesktop {
        match self {
            Desktop::All => ALL_DESKTOPS,
            Desktop::Index(i) => i as HostDesktop + 1,
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Desktop::All => None,
            Desktop::Index(i) => Some(i),
        }
    }
}

/// Snapshot of a host window as reported at enumeration or creation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: WindowId,
    #[serde(default)]
    pub title: String,
    pub desktop: HostDesktop,
    pub screen: usize,
    pub geometry: Rect,
    /// Dialogs, utilities and other windows the host refuses to tile.
    #[serde(default)]
    pub forced_floating: bool,
}

/// Queries and mutations the tiling core performs on the host.
///
/// Implementations are passed to the reactor at construction and are the
/// only way the core observes or touches real windows.
pub trait WindowHost {
    /// Every window currently open, used to rebuild state at startup.
    fn windows(&self) -> Vec<WindowInfo>;

    fn window_geometry(&self, window: WindowId) -> Option<Rect>;
    fn set_window_geometry(&mut self, window: WindowId, rect: Rect);

    /// The area layouts may fill on the given desktop and screen.
    fn tiling_area(&self, desktop: HostDesktop, screen: usize) -> Rect;

    /// Desktop grid as (columns, rows).
    fn desktop_grid(&self) -> (usize, usize);
    fn screen_count(&self) -> usize;
    fn active_screen(&self) -> usize;
    fn current_desktop(&self) -> HostDesktop;

    fn active_window(&self) -> Option<WindowId>;
    fn activate_window(&mut self, window: WindowId);

    fn show_outline(&mut self, _rect: Rect) {}
    fn hide_outline(&mut self) {}

    fn desktop_count(&self) -> usize {
        let (columns, rows) = self.desktop_grid();
        columns * rows
    }
}
