use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tessel_wm::common::config::{Config, config_file};
use tessel_wm::common::log;
use tessel_wm::reactor::{self, Record, Scenario};
use tracing::{info, warn};

#[derive(Parser)]
struct Cli {
    /// Configuration file to use instead of ~/.tessel.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Check whether the configuration loads and is valid, then exit.
    #[arg(long)]
    validate: bool,

    /// Run the events of a JSON scenario against a headless host and print
    /// the resulting layouts.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Record reactor events to the specified file path. Overwrites the file if
    /// exists.
    #[arg(long)]
    record: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let opt: Cli = Parser::parse();
    log::init_logging();

    let path = opt.config.unwrap_or_else(config_file);
    let mut config = Config::read_or_default(&path)
        .with_context(|| format!("could not load {}", path.display()))?;

    if opt.validate {
        let issues = config.validate();
        if issues.is_empty() {
            println!("{}: ok", path.display());
            return Ok(());
        }
        for issue in &issues {
            println!("{}: {issue}", path.display());
        }
        bail!("{} configuration issue(s) found", issues.len());
    }

    let fixes = config.auto_fix_values();
    if fixes > 0 {
        warn!(fixes, "configuration values adjusted");
    }

    let Some(scenario_path) = opt.replay else {
        bail!("nothing to do: pass --replay <scenario.json> or --validate");
    };
    let scenario = Scenario::read(&scenario_path)
        .with_context(|| format!("could not load scenario {}", scenario_path.display()))?;
    let record = Record::new(opt.record.as_deref())?;
    info!(scenario = %scenario_path.display(), events = scenario.events.len(), "replaying");
    let reactor = reactor::replay(scenario, config, record);
    print!("{}", reactor.draw_layouts());
    Ok(())
}
