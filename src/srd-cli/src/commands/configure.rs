//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up srd CLI defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Values to store; `None` leaves the current setting alone
#[derive(Debug, Default)]
pub struct Settings {
    pub base_url: Option<String>,
    pub db: Option<PathBuf>,
    pub progress_every: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    fn is_empty(&self) -> bool {
        self.base_url.is_none()
            && self.db.is_none()
            && self.progress_every.is_none()
            && self.timeout_secs.is_none()
    }
}

/// Handle the configure command
pub fn handle(settings: Settings, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if settings.is_empty() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, settings);
    config.save()?;

    println!("Configuration updated");
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }
    Ok(())
}

fn apply(config: &mut Config, settings: Settings) {
    if let Some(url) = settings.base_url {
        config.base_url = Some(url);
    }
    if let Some(db) = settings.db {
        config.db_path = Some(db);
    }
    if let Some(n) = settings.progress_every {
        config.progress_every = Some(n);
    }
    if let Some(secs) = settings.timeout_secs {
        config.timeout_secs = Some(secs);
    }
}

/// Display current configuration
fn show_config(config: &Config) {
    println!("Base URL:       {}", config.base_url(None));
    println!("Database:       {}", config.db_path(None).display());
    println!("Progress every: {}", config.progress_every(None));
    println!("Timeout:        {}s", config.timeout().as_secs());

    if let Ok(path) = Config::config_path() {
        println!("Config file:    {}", path.display());
    }
}

fn show_usage() {
    println!("Usage: srd configure --base-url URL --db PATH");
    println!("                     --progress-every N --timeout-secs N");
    println!("   or: srd configure --show");
}
