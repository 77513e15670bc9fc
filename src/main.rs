mod api;
mod config;
mod db;
mod ledger;
mod logging;
mod models;
mod prefs;
mod run;
mod ui;

use anyhow::Result;
use tracing::info;

use crate::config::Config;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let (config, command) = Config::resolve(&args)?;
    config.ensure_dirs()?;
    let _guard = logging::init(&config.log_dir)?;
    info!(version = env!("CARGO_PKG_VERSION"), "budget-planner starting");

    if command.is_empty() {
        let api = api::connect(&config)?;
        run::as_tui(&config, api.as_ref())
    } else {
        run::as_cli(&command, &config)
    }
}
