use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Event, Reactor};
use crate::common::config::Config;
use crate::sys::headless::{HeadlessHost, HeadlessSetup};

/// A host setup and the events to play against it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub host: HeadlessSetup,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Scenario {
    pub fn read(path: &Path) -> anyhow::Result<Scenario> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Scenario> { Ok(serde_json::from_str(buf)?) }
}

/// Runs a scenario on a headless host and returns the reactor for
/// inspection.
pub fn replay(scenario: Scenario, config: Config, record: Record) -> Reactor<HeadlessHost> {
    let host = HeadlessHost::new(scenario.host);
    let mut reactor = Reactor::with_record(host, config, record);
    let count = scenario.events.len();
    for event in scenario.events {
        reactor.feed(event);
    }
    info!(events = count, "replay finished");
    reactor
}

/// Applies the host-side effect of an event to a headless host, so that
/// later queries see the state the event describes.
pub fn observe(host: &mut HeadlessHost, event: &Event) {
    match event {
        Event::WindowAdded(info) => host.open_window(info.clone()),
        Event::WindowClosed(window) => host.close_window(*window),
        Event::WindowScreenChanged(window, screen) => host.set_window_screen(*window, *screen),
        Event::WindowDesktopChanged(window, desktop) => host.set_window_desktop(*window, *desktop),
        Event::WindowGeometryChanged(window, rect)
        | Event::WindowMoveStep(window, rect)
        | Event::WindowResizeStep(window, rect) => host.place_window(*window, *rect),
        Event::WindowActivated(window) => host.set_active_window(Some(*window)),
        Event::DesktopCountChanged { columns, rows } => host.set_desktop_grid(*columns, *rows),
        Event::ScreenCountChanged(screens) => host.set_screens(screens.clone()),
        Event::CurrentDesktopChanged(desktop) => host.set_current_desktop(*desktop),
        Event::ActiveScreenChanged(screen) => host.set_active_screen(*screen),
        Event::TilingAreaChanged { screen, area, .. } => host.set_screen_area(*screen, *area),
        Event::WindowMoveStarted(_)
        | Event::WindowMoveEnded(_)
        | Event::WindowResizeStarted(_)
        | Event::WindowResizeEnded(_)
        | Event::WindowForcedFloatingChanged(..)
        | Event::WindowGrouped { .. }
        | Event::WindowUngrouped(_)
        | Event::Command(_) => {}
    }
}

impl Reactor<HeadlessHost> {
    /// Updates the headless host as the event describes, then handles it.
    pub fn feed(&mut self, event: Event) {
        observe(self.host_mut(), &event);
        self.handle_event(event);
    }
}

/// Appends every handled event to a file as one JSON line.
pub struct Record {
    file: Option<BufWriter<File>>,
}

impl Record {
    pub fn none() -> Self { Self { file: None } }

    pub fn new(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => Some(BufWriter::new(File::create(path)?)),
            None => None,
        };
        Ok(Self { file })
    }

    pub fn is_recording(&self) -> bool { self.file.is_some() }

    pub fn on_event(&mut self, event: &Event) {
        let Some(file) = &mut self.file else {
            return;
        };
        if let Err(err) = Self::write_line(file, event) {
            warn!(%err, "could not record event, recording stopped");
            self.file = None;
        }
    }

    fn write_line(file: &mut BufWriter<File>, event: &Event) -> anyhow::Result<()> {
        serde_json::to_writer(&mut *file, event)?;
        file.write_all(b"\n")?;
        file.flush()?;
        Ok(())
    }
}
