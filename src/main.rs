mod alarm;
mod controller;
mod diagnostics;
mod format;
mod logging;
mod notify;
mod prefs;
mod scheduler;
mod time_provider;
mod tracker;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::info;

use crate::controller::Controller;
use crate::notify::TerminalBellNotifier;
use crate::prefs::JsonFileStore;
use crate::time_provider::LocalTimeProvider;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliLogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            CliLogLevel::Error => "error",
            CliLogLevel::Warn => "warn",
            CliLogLevel::Info => "info",
            CliLogLevel::Debug => "debug",
            CliLogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "deskclock",
    version,
    about = "Desktop clock with stopwatch, countdown timer and alarms"
)]
struct Cli {
    #[arg(long, default_value = "preferences.json")]
    prefs: PathBuf,

    #[arg(long, value_enum, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,

    #[arg(long)]
    diagnostics: bool,

    #[arg(long, default_value_t = 3)]
    diagnostics_seconds: u64,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.diagnostics_seconds == 0 {
        bail!("--diagnostics-seconds must be greater than zero");
    }

    let _logger = logging::init_logging(cli.log_level.as_filter())?;

    let store = JsonFileStore::open(&cli.prefs)
        .with_context(|| format!("failed to load {}", cli.prefs.display()))?;
    info!("preferences file: {}", store.path().display());

    if cli.diagnostics {
        return diagnostics::run_diagnostics(&store, cli.diagnostics_seconds);
    }

    let controller = Controller::new(
        Box::new(LocalTimeProvider),
        Box::new(store),
        Box::new(TerminalBellNotifier),
    )?;
    ui::app::run_gui(controller)
}
