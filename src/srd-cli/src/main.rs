mod cli;
mod commands;
mod config;
mod source;

use anyhow::Result;
use clap::Parser;
use config::Config;
use srd::SyncOptions;
use tracing_subscriber::EnvFilter;

use cli::*;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;

    match cli.command {
        Commands::Configure {
            base_url,
            db,
            progress_every,
            timeout_secs,
            show,
        } => {
            let settings = commands::configure::Settings {
                base_url,
                db,
                progress_every,
                timeout_secs,
            };
            commands::configure::handle(settings, show)?;
        }

        Commands::Init { db } => {
            commands::db::init(&config.db_path(db.db))?;
        }

        Commands::Sync {
            db,
            base_url,
            from_dir,
            progress_every,
        } => {
            let db_path = config.db_path(db.db);
            let options = SyncOptions {
                progress_every: config.progress_every(progress_every),
            };
            match from_dir {
                Some(dir) => {
                    let source = source::DirSource::new(dir);
                    commands::sync::run(&db_path, &source, options)?;
                }
                None => {
                    let source =
                        source::HttpSource::new(&config.base_url(base_url), config.timeout());
                    commands::sync::run(&db_path, &source, options)?;
                }
            }
        }

        Commands::Stats { db } => {
            commands::db::stats(&config.db_path(db.db))?;
        }

        Commands::Show {
            kind,
            slug,
            json,
            db,
        } => {
            commands::db::show(&config.db_path(db.db), kind, &slug, json)?;
        }

        Commands::List { kind, db } => {
            commands::db::list(&config.db_path(db.db), kind)?;
        }
    }

    Ok(())
}
