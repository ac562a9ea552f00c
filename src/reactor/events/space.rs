use tracing::{debug, info, warn};

use crate::layout_engine::ScreenLayout;
use crate::reactor::Reactor;
use crate::sys::geometry::Rect;
use crate::sys::host::{Desktop, HostDesktop, WindowHost};

pub struct SpaceEventHandler;

impl SpaceEventHandler {
    /// Resizes the desktop × screen grid to what the host reports.
    ///
    /// Placements in layouts that are dropped are forgotten first, then every
    /// tile is re-placed; tiles that lived on a dropped desktop or screen are
    /// clamped onto the last remaining one and tiles on all desktops gain
    /// the new rows.
    pub fn reconcile_grid<H: WindowHost>(reactor: &mut Reactor<H>) {
        let desktops = reactor.host.desktop_count().max(1);
        let screens = reactor.host.screen_count().max(1);
        if desktops == reactor.desktop_count() && screens == reactor.screen_count() {
            Self::refresh_areas(reactor);
            return;
        }
        info!(
            from = ?(reactor.desktop_count(), reactor.screen_count()),
            to = ?(desktops, screens),
            "reconciling layout grid"
        );

        for binding in reactor.bindings.values_mut() {
            if let Some(placement) = &mut binding.placement {
                placement.retain(|&(d, s)| d < desktops && s < screens);
            }
        }
        reactor.layouts.truncate(desktops);
        for row in &mut reactor.layouts {
            row.truncate(screens);
        }
        reactor.current_desktop = reactor.current_desktop.min(desktops - 1);
        reactor.current_screen = reactor.current_screen.min(screens - 1);

        let variant = reactor.config.settings.default_layout;
        for desktop in 0..desktops {
            if reactor.layouts.len() <= desktop {
                reactor.layouts.push(Vec::with_capacity(screens));
            }
            let host_desktop = Desktop::Index(desktop).to_host();
            for screen in reactor.layouts[desktop].len()..screens {
                let area = reactor.host.tiling_area(host_desktop, screen);
                debug!(desktop, screen, ?area, "layout created");
                reactor.layouts[desktop].push(ScreenLayout::new(desktop, screen, variant, area));
            }
        }

        let current = reactor.current_desktop;
        let mut updates = Vec::new();
        if let Some(row) = reactor.layouts.get_mut(current) {
            for layout in row.iter_mut().filter(|l| !l.is_active()) {
                updates.extend(layout.activate());
            }
        }
        reactor.apply_updates(updates);

        let tiles: Vec<_> = reactor.bindings.keys().copied().collect();
        for tile in tiles {
            reactor.sync_placement(tile, None);
        }
        Self::refresh_areas(reactor);
    }

    /// Picks up screens that changed size without the grid changing shape.
    fn refresh_areas<H: WindowHost>(reactor: &mut Reactor<H>) {
        for desktop in 0..reactor.desktop_count() {
            let host_desktop = Desktop::Index(desktop).to_host();
            for screen in 0..reactor.screen_count() {
                let area = reactor.host.tiling_area(host_desktop, screen);
                if let Some(layout) = reactor.screen_layout_mut(desktop, screen) {
                    let updates = layout.set_area(area);
                    reactor.apply_updates(updates);
                }
            }
        }
    }

    pub fn handle_current_desktop_changed<H: WindowHost>(
        reactor: &mut Reactor<H>,
        raw: HostDesktop,
    ) {
        let Some(desktop) = Desktop::from_host(raw).and_then(Desktop::index) else {
            warn!(desktop = raw, "current desktop is not a single desktop - ignoring");
            return;
        };
        if desktop >= reactor.desktop_count() {
            let desktops = reactor.desktop_count();
            warn!(desktop = raw, desktops, "desktop out of range - ignoring");
            return;
        }
        if desktop == reactor.current_desktop {
            return;
        }
        if let Some(row) = reactor.layouts.get_mut(reactor.current_desktop) {
            row.iter_mut().for_each(ScreenLayout::deactivate);
        }
        reactor.current_desktop = desktop;
        let mut updates = Vec::new();
        if let Some(row) = reactor.layouts.get_mut(desktop) {
            for layout in row.iter_mut() {
                updates.extend(layout.activate());
            }
        }
        debug!(desktop, "desktop switched");
        reactor.apply_updates(updates);
    }

    pub fn handle_active_screen_changed<H: WindowHost>(reactor: &mut Reactor<H>, screen: usize) {
        if screen >= reactor.screen_count() {
            warn!(screen, screens = reactor.screen_count(), "screen out of range - ignoring");
            return;
        }
        reactor.current_screen = screen;
    }

    pub fn handle_tiling_area_changed<H: WindowHost>(
        reactor: &mut Reactor<H>,
        desktop: Option<HostDesktop>,
        screen: usize,
        area: Rect,
    ) {
        if screen >= reactor.screen_count() {
            warn!(screen, "tiling area for unknown screen - ignoring");
            return;
        }
        let rows: Vec<usize> = match desktop.map(Desktop::from_host) {
            None | Some(Some(Desktop::All)) => (0..reactor.desktop_count()).collect(),
            Some(Some(Desktop::Index(d))) if d < reactor.desktop_count() => vec![d],
            Some(_) => {
                warn!(?desktop, "tiling area for unknown desktop - ignoring");
                return;
            }
        };
        for desktop in rows {
            if let Some(layout) = reactor.screen_layout_mut(desktop, screen) {
                let updates = layout.set_area(area);
                reactor.apply_updates(updates);
            }
        }
    }
}
