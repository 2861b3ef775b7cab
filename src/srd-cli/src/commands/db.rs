//! Database command handlers: init, stats, show, list

use anyhow::{bail, Context, Result};
use serde_json::Value;
use srd::{EntityKind, Row};
use srd_db::{RulesRepository, SqliteDb};
use std::fs;
use std::path::Path;

/// Open the database, creating its parent directory when needed
pub fn open(db: &Path) -> Result<SqliteDb> {
    if let Some(parent) = db.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    SqliteDb::open(db).with_context(|| format!("Failed to open database at {}", db.display()))
}

pub fn init(db: &Path) -> Result<()> {
    let store = open(db)?;
    store.init().context("Failed to apply schema")?;
    println!("Initialized database at {}", db.display());
    Ok(())
}

pub fn stats(db: &Path) -> Result<()> {
    let store = open(db)?;
    let stats = store.stats().context("Failed to read table counts")?;

    println!("Database: {}", db.display());
    for kind in EntityKind::ALL {
        println!("  {:<10} {:>6}", kind.table(), stats.count(kind));
    }
    println!("  {:<10} {:>6}", "total", stats.total());
    Ok(())
}

pub fn show(db: &Path, kind: EntityKind, slug: &str, json: bool) -> Result<()> {
    let store = open(db)?;
    let Some(row) = store.get(kind, slug)? else {
        bail!("No {} with slug '{}'", kind, slug);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&row)?);
    } else {
        for (key, value) in fields(&row)? {
            println!("{:<22} {}", format!("{}:", key), value);
        }
    }
    Ok(())
}

pub fn list(db: &Path, kind: EntityKind) -> Result<()> {
    let store = open(db)?;
    let rows = store.list(kind)?;

    if rows.is_empty() {
        println!("No {} rows stored", kind);
        return Ok(());
    }

    for row in &rows {
        println!("{:<36} {}", row.slug(), row.name());
    }
    println!("\n{} {} row(s)", rows.len(), kind);
    Ok(())
}

/// Flatten a row into printable `(column, value)` pairs
fn fields(row: &Row) -> Result<Vec<(String, String)>> {
    let Value::Object(map) = serde_json::to_value(row)? else {
        bail!("Row did not serialize to an object");
    };
    Ok(map
        .into_iter()
        .filter(|(key, _)| key != "kind")
        .map(|(key, value)| {
            let shown = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, shown)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use srd::{map_race, Record};

    #[test]
    fn test_open_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("share").join("srd.db");
        init(&path).unwrap();
        assert!(path.exists());
        stats(&path).unwrap();
    }

    #[test]
    fn test_show_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("srd.db");
        let store = open(&path).unwrap();
        store.init().unwrap();
        let doc = json!({
            "index": "elf",
            "name": "Elf",
            "speed": 30,
            "ability_bonuses": [{"ability_score": {"name": "DEX"}, "bonus": 2}]
        });
        store.upsert(&Row::Race(map_race(Record::new(&doc)))).unwrap();

        show(&path, EntityKind::Race, "elf", false).unwrap();
        show(&path, EntityKind::Race, "elf", true).unwrap();
        list(&path, EntityKind::Race).unwrap();
        list(&path, EntityKind::Spell).unwrap();
        assert!(show(&path, EntityKind::Race, "dwarf", false).is_err());
    }

    #[test]
    fn test_fields_skip_tag() {
        let doc = json!({"index": "elf", "name": "Elf"});
        let row = Row::Race(map_race(Record::new(&doc)));
        let fields = fields(&row).unwrap();
        assert!(fields.iter().all(|(k, _)| k != "kind"));
        assert!(fields.contains(&("slug".to_string(), "elf".to_string())));
        assert!(fields.contains(&("speed".to_string(), "30".to_string())));
    }
}
