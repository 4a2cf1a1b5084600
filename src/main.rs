#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod cli;
mod logging;
#[cfg(windows)]
mod window;

use clap::Parser;
use tracing::{error, info, warn};

use tabelo::{error, settings::SettingsStore};

use crate::cli::Cli;

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let log_file = cli.log_file.clone().or_else(logging::default_log_file);
    if let Err(err) = logging::init(cli.log_level.as_deref(), log_file.as_deref()) {
        match logging::init(cli.log_level.as_deref(), None) {
            Ok(()) => warn!(%err, "log file unavailable, logging to stderr"),
            Err(_) => eprintln!("tabelo: {err}"),
        }
    }

    let store = match &cli.settings {
        Some(path) => SettingsStore::with_path(path),
        None => SettingsStore::load(),
    };
    info!(path = %store.path().display(), version = env!("CARGO_PKG_VERSION"), "starting");

    let result = run(store, &cli);
    if let Err(err) = &result {
        error!(%err, "application exited with an error");
    }
    result
}

#[cfg(windows)]
fn run(store: SettingsStore, cli: &Cli) -> error::Result<()> {
    window::run(store, cli.startup_urls())
}

#[cfg(not(windows))]
fn run(_store: SettingsStore, cli: &Cli) -> error::Result<()> {
    let documents = cli.startup_urls();
    warn!(count = documents.len(), "no window host for this platform, documents not opened");
    Err(error::Error::UnsupportedPlatform(std::env::consts::OS))
}
