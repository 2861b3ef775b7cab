//! Batch driver.
//!
//! Walks every collection in a fixed order, fetching one detail document
//! at a time, mapping it and handing the row to the sink. A bad item never
//! stops the batch: fetch and decode failures fall back to a defaulted row,
//! store failures are logged and counted. The only fatal condition is a
//! store that cannot hand out a writer at all.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::extract::Record;
use crate::mappers::map_record;
use crate::sink::{RowWriter, SinkError, UpsertSink};
use crate::source::{ResourceRef, RulesSource};
use crate::types::{Collection, EntityKind};

/// Default number of items between progress lines
pub const DEFAULT_PROGRESS_EVERY: usize = 50;

/// Fatal batch error
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Failed to prepare {kind} writer: {source}")]
    Prepare {
        kind: EntityKind,
        #[source]
        source: SinkError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Log a progress line every this many items (0 disables)
    pub progress_every: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

/// What happened to one listed item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Mapped and written
    Stored,
    /// Detail fetch or decode failed; a defaulted row was used
    Degraded,
    /// Equipment outside the weapon and armor categories
    Skipped,
    /// The store rejected the write
    Failed,
}

/// Per-collection summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub collection: Collection,
    /// Set when the list itself could not be fetched
    pub list_error: Option<String>,
    pub listed: usize,
    pub stored: usize,
    pub degraded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Rows written per entity kind (equipment splits into weapons and armor)
    pub written: BTreeMap<EntityKind, usize>,
}

impl CollectionReport {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            list_error: None,
            listed: 0,
            stored: 0,
            degraded: 0,
            skipped: 0,
            failed: 0,
            written: BTreeMap::new(),
        }
    }

    pub fn written_for(&self, kind: EntityKind) -> usize {
        self.written.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_written(&self) -> usize {
        self.written.values().sum()
    }

    fn record(&mut self, status: ItemStatus, kind: Option<EntityKind>) {
        match status {
            ItemStatus::Stored => self.stored += 1,
            ItemStatus::Degraded => self.degraded += 1,
            ItemStatus::Skipped => self.skipped += 1,
            ItemStatus::Failed => self.failed += 1,
        }
        if let Some(kind) = kind {
            *self.written.entry(kind).or_insert(0) += 1;
        }
    }
}

/// Summary of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub collections: Vec<CollectionReport>,
}

impl SyncReport {
    pub fn get(&self, collection: Collection) -> Option<&CollectionReport> {
        self.collections.iter().find(|r| r.collection == collection)
    }

    pub fn total_written(&self) -> usize {
        self.collections.iter().map(CollectionReport::total_written).sum()
    }

    pub fn total_degraded(&self) -> usize {
        self.collections.iter().map(|r| r.degraded).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.collections.iter().map(|r| r.failed).sum()
    }
}

/// Sequential batch driver over a source and a sink
pub struct Syncer<'a> {
    source: &'a dyn RulesSource,
    sink: &'a dyn UpsertSink,
    options: SyncOptions,
}

impl<'a> Syncer<'a> {
    pub fn new(source: &'a dyn RulesSource, sink: &'a dyn UpsertSink) -> Self {
        Self {
            source,
            sink,
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Sync every collection in order
    pub fn run(&self) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        for collection in Collection::ORDER {
            report.collections.push(self.sync_collection(collection)?);
        }
        Ok(report)
    }

    /// Sync a single collection
    pub fn sync_collection(&self, collection: Collection) -> Result<CollectionReport, SyncError> {
        let mut report = CollectionReport::new(collection);

        let list = match self.source.fetch_list(collection) {
            Ok(list) => list,
            Err(e) => {
                warn!("{}: could not fetch list: {}", collection, e);
                report.list_error = Some(e.to_string());
                return Ok(report);
            }
        };
        report.listed = list.results.len();
        info!("{}: {} listed", collection, report.listed);

        let mut writers = Vec::with_capacity(collection.kinds().len());
        for &kind in collection.kinds() {
            let writer = self
                .sink
                .prepare(kind)
                .map_err(|source| SyncError::Prepare { kind, source })?;
            writers.push((kind, writer));
        }

        for (i, entry) in list.results.iter().enumerate() {
            let (status, kind) = self.sync_item(collection, entry, &mut writers);
            report.record(status, kind);

            let done = i + 1;
            if self.options.progress_every > 0 && done % self.options.progress_every == 0 {
                info!("{}: {}/{}", collection, done, report.listed);
            }
        }

        if collection == Collection::Equipment {
            info!(
                "{}: done, {} weapons, {} armor, {} skipped",
                collection,
                report.written_for(EntityKind::Weapon),
                report.written_for(EntityKind::Armor),
                report.skipped
            );
        } else {
            info!("{}: done, {} written", collection, report.total_written());
        }
        if report.degraded > 0 || report.failed > 0 {
            warn!(
                "{}: {} degraded, {} failed",
                collection, report.degraded, report.failed
            );
        }

        Ok(report)
    }

    /// Fetch, map and write one item. Returns the status and, when a row
    /// was written, its kind.
    fn sync_item(
        &self,
        collection: Collection,
        entry: &ResourceRef,
        writers: &mut [(EntityKind, Box<dyn RowWriter + 'a>)],
    ) -> (ItemStatus, Option<EntityKind>) {
        let reference = entry.detail_ref(collection);
        let (document, degraded) = match self.source.fetch_detail(&reference) {
            Ok(doc @ Value::Object(_)) => (doc, false),
            Ok(_) => {
                warn!("{}: {} is not an object, using defaults", collection, entry.index);
                (Value::Null, true)
            }
            Err(e) => {
                warn!("{}: {} fetch failed, using defaults: {}", collection, entry.index, e);
                (Value::Null, true)
            }
        };

        let Some(mut row) = map_record(collection, Record::new(&document)) else {
            if degraded {
                return (ItemStatus::Degraded, None);
            }
            debug!("{}: {} skipped (not weapon or armor)", collection, entry.index);
            return (ItemStatus::Skipped, None);
        };
        if row.slug().is_empty() {
            row.set_slug(&entry.index);
        }

        let kind = row.kind();
        let Some((_, writer)) = writers.iter_mut().find(|(k, _)| *k == kind) else {
            warn!("{}: no writer for {} rows", collection, kind);
            return (ItemStatus::Failed, None);
        };
        match writer.upsert(&row) {
            Ok(()) if degraded => (ItemStatus::Degraded, Some(kind)),
            Ok(()) => (ItemStatus::Stored, Some(kind)),
            Err(e) => {
                warn!("{}: failed to store {}: {}", collection, row.slug(), e);
                (ItemStatus::Failed, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ResourceList, SourceError};
    use crate::types::Row;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Source backed by in-memory documents keyed by reference
    #[derive(Default)]
    struct MemorySource {
        lists: HashMap<&'static str, Value>,
        details: HashMap<String, Value>,
        fetched: RefCell<Vec<String>>,
    }

    impl MemorySource {
        fn with_item(mut self, collection: Collection, doc: Value) -> Self {
            let index = doc["index"].as_str().unwrap_or("unknown").to_string();
            self.add(collection, &index, Some(doc));
            self
        }

        fn with_missing(mut self, collection: Collection, index: &str) -> Self {
            self.add(collection, index, None);
            self
        }

        fn add(&mut self, collection: Collection, index: &str, doc: Option<Value>) {
            let url = format!("/api/{}/{}", collection.path(), index);
            let list = self
                .lists
                .entry(collection.path())
                .or_insert_with(|| json!({"count": 0, "results": []}));
            list["results"]
                .as_array_mut()
                .unwrap()
                .push(json!({"index": index, "name": index, "url": url}));
            if let Some(doc) = doc {
                self.details.insert(url, doc);
            }
        }
    }

    impl RulesSource for MemorySource {
        fn fetch_list(&self, collection: Collection) -> Result<ResourceList, SourceError> {
            self.lists
                .get(collection.path())
                .map(ResourceList::from_value)
                .ok_or_else(|| SourceError::Transport(format!("no list for {}", collection)))
        }

        fn fetch_detail(&self, reference: &str) -> Result<Value, SourceError> {
            self.fetched.borrow_mut().push(reference.to_string());
            self.details
                .get(reference)
                .cloned()
                .ok_or_else(|| SourceError::Transport(format!("404 {}", reference)))
        }
    }

    /// Sink storing rows in a map keyed by (kind, slug)
    #[derive(Default)]
    struct MemorySink {
        rows: RefCell<HashMap<(EntityKind, String), Row>>,
        prepared: RefCell<Vec<EntityKind>>,
        reject: Option<&'static str>,
    }

    struct MemoryWriter<'s> {
        kind: EntityKind,
        sink: &'s MemorySink,
    }

    impl RowWriter for MemoryWriter<'_> {
        fn upsert(&mut self, row: &Row) -> Result<(), SinkError> {
            if row.kind() != self.kind {
                return Err(SinkError::KindMismatch {
                    writer: self.kind,
                    row: row.kind(),
                });
            }
            if self.sink.reject == Some(row.slug()) {
                return Err(SinkError::Database("disk full".to_string()));
            }
            self.sink
                .rows
                .borrow_mut()
                .insert((row.kind(), row.slug().to_string()), row.clone());
            Ok(())
        }
    }

    impl UpsertSink for MemorySink {
        fn prepare(&self, kind: EntityKind) -> Result<Box<dyn RowWriter + '_>, SinkError> {
            self.prepared.borrow_mut().push(kind);
            Ok(Box::new(MemoryWriter { kind, sink: self }))
        }
    }

    struct BrokenSink;

    impl UpsertSink for BrokenSink {
        fn prepare(&self, _kind: EntityKind) -> Result<Box<dyn RowWriter + '_>, SinkError> {
            Err(SinkError::Database("unable to open database file".to_string()))
        }
    }

    fn sample_source() -> MemorySource {
        MemorySource::default()
            .with_item(
                Collection::Monsters,
                json!({"index": "goblin", "name": "Goblin", "armor_class": [{"value": 15}]}),
            )
            .with_item(Collection::Spells, json!({"index": "light", "name": "Light"}))
            .with_item(Collection::Classes, json!({"index": "wizard", "name": "Wizard"}))
            .with_item(Collection::Races, json!({"index": "elf", "name": "Elf"}))
            .with_item(
                Collection::Equipment,
                json!({"index": "club", "equipment_category": {"index": "weapon"}}),
            )
            .with_item(
                Collection::Equipment,
                json!({"index": "shield", "equipment_category": {"index": "armor"}}),
            )
            .with_item(
                Collection::Equipment,
                json!({"index": "rope", "equipment_category": {"index": "adventuring-gear"}}),
            )
    }

    #[test]
    fn test_run_processes_collections_in_order() {
        let source = sample_source();
        let sink = MemorySink::default();
        let report = Syncer::new(&source, &sink).run().unwrap();

        let order: Vec<_> = report.collections.iter().map(|r| r.collection).collect();
        assert_eq!(order, Collection::ORDER);
        assert_eq!(
            *sink.prepared.borrow(),
            vec![
                EntityKind::Monster,
                EntityKind::Spell,
                EntityKind::Class,
                EntityKind::Race,
                EntityKind::Weapon,
                EntityKind::Armor
            ]
        );
        assert_eq!(report.total_written(), 6);
        assert_eq!(sink.rows.borrow().len(), 6);
    }

    #[test]
    fn test_equipment_split_and_skip() {
        let source = sample_source();
        let sink = MemorySink::default();
        let report = Syncer::new(&source, &sink).run().unwrap();

        let equipment = report.get(Collection::Equipment).unwrap();
        assert_eq!(equipment.listed, 3);
        assert_eq!(equipment.written_for(EntityKind::Weapon), 1);
        assert_eq!(equipment.written_for(EntityKind::Armor), 1);
        assert_eq!(equipment.skipped, 1);

        let rows = sink.rows.borrow();
        assert!(rows.contains_key(&(EntityKind::Weapon, "club".to_string())));
        assert!(!rows.contains_key(&(EntityKind::Armor, "club".to_string())));
        assert!(rows.contains_key(&(EntityKind::Armor, "shield".to_string())));
        assert!(!rows.keys().any(|(_, slug)| slug == "rope"));
    }

    #[test]
    fn test_failed_fetch_writes_defaulted_row() {
        let source = MemorySource::default()
            .with_item(Collection::Monsters, json!({"index": "orc", "name": "Orc"}))
            .with_missing(Collection::Monsters, "lich");
        let sink = MemorySink::default();
        let report = Syncer::new(&source, &sink)
            .sync_collection(Collection::Monsters)
            .unwrap();

        assert_eq!(report.stored, 1);
        assert_eq!(report.degraded, 1);
        assert_eq!(report.written_for(EntityKind::Monster), 2);

        let rows = sink.rows.borrow();
        let Row::Monster(lich) = &rows[&(EntityKind::Monster, "lich".to_string())] else {
            panic!("expected monster row");
        };
        assert_eq!(lich.slug, "lich");
        assert_eq!(lich.armor_class, 10);
        assert_eq!(lich.speed, 30);
    }

    #[test]
    fn test_failed_equipment_fetch_is_not_written() {
        let source = MemorySource::default().with_missing(Collection::Equipment, "mystery");
        let sink = MemorySink::default();
        let report = Syncer::new(&source, &sink)
            .sync_collection(Collection::Equipment)
            .unwrap();
        assert_eq!(report.degraded, 1);
        assert_eq!(report.total_written(), 0);
        assert!(sink.rows.borrow().is_empty());
    }

    #[test]
    fn test_missing_slug_uses_list_identifier() {
        let mut source = MemorySource::default();
        source.add(Collection::Spells, "shield", Some(json!({"name": "Shield", "level": 1})));
        let sink = MemorySink::default();
        let report = Syncer::new(&source, &sink)
            .sync_collection(Collection::Spells)
            .unwrap();
        assert_eq!(report.stored, 1);
        assert!(sink
            .rows
            .borrow()
            .contains_key(&(EntityKind::Spell, "shield".to_string())));
    }

    #[test]
    fn test_store_failure_does_not_abort() {
        let source = MemorySource::default()
            .with_item(Collection::Races, json!({"index": "dwarf"}))
            .with_item(Collection::Races, json!({"index": "gnome"}))
            .with_item(Collection::Races, json!({"index": "human"}));
        let sink = MemorySink {
            reject: Some("gnome"),
            ..Default::default()
        };
        let report = Syncer::new(&source, &sink)
            .sync_collection(Collection::Races)
            .unwrap();
        assert_eq!(report.stored, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(source.fetched.borrow().len(), 3);
    }

    #[test]
    fn test_missing_list_is_reported_not_fatal() {
        let source = MemorySource::default()
            .with_item(Collection::Classes, json!({"index": "bard"}));
        let sink = MemorySink::default();
        let report = Syncer::new(&source, &sink).run().unwrap();

        let monsters = report.get(Collection::Monsters).unwrap();
        assert!(monsters.list_error.is_some());
        assert_eq!(monsters.listed, 0);
        assert_eq!(report.get(Collection::Classes).unwrap().stored, 1);
    }

    #[test]
    fn test_unreachable_store_is_fatal() {
        let source = sample_source();
        let result = Syncer::new(&source, &BrokenSink).run();
        assert!(matches!(
            result,
            Err(SyncError::Prepare {
                kind: EntityKind::Monster,
                ..
            })
        ));
    }

    #[test]
    fn test_rerun_converges() {
        let source = sample_source();
        let sink = MemorySink::default();
        let syncer = Syncer::new(&source, &sink).with_options(SyncOptions { progress_every: 1 });
        syncer.run().unwrap();
        let first = sink.rows.borrow().clone();
        syncer.run().unwrap();
        assert_eq!(*sink.rows.borrow(), first);
    }
}
