//! Sync command handler

use anyhow::{Context, Result};
use srd::{RulesSource, SyncOptions, SyncReport, Syncer};
use srd_db::RulesRepository;
use std::path::Path;
use tracing::{info, warn};

/// Bootstrap the schema, run every collection and print a summary
pub fn run(db: &Path, source: &dyn RulesSource, options: SyncOptions) -> Result<SyncReport> {
    let store = super::db::open(db)?;

    // Bootstrap failures are reported but the run continues; a missing
    // table surfaces again when its writer is prepared.
    if let Err(e) = store.init() {
        warn!("Schema bootstrap failed: {}", e);
    }

    info!("Syncing into {}", db.display());
    let report = Syncer::new(source, &store)
        .with_options(options)
        .run()
        .context("Sync aborted")?;

    print_summary(&report);
    Ok(report)
}

fn print_summary(report: &SyncReport) {
    println!(
        "{:<10} {:>7} {:>7} {:>8} {:>7} {:>6}",
        "collection", "listed", "stored", "degraded", "skipped", "failed"
    );
    for c in &report.collections {
        println!(
            "{:<10} {:>7} {:>7} {:>8} {:>7} {:>6}",
            c.collection.to_string(),
            c.listed,
            c.stored,
            c.degraded,
            c.skipped,
            c.failed
        );
        if let Some(err) = &c.list_error {
            println!("  list unavailable: {}", err);
        }
    }
    println!(
        "\n{} rows written ({} degraded, {} failed)",
        report.total_written(),
        report.total_degraded(),
        report.total_failed()
    );
}
