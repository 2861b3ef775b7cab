//! # srd
//!
//! Schema-normalization engine for SRD game-rules documents.
//!
//! Source documents (monsters, spells, classes, races, equipment) arrive as
//! loosely-typed JSON. This library maps each one into a strongly-typed row
//! with deterministic defaults and drives a sequential, re-runnable sync
//! into any store that implements [`UpsertSink`].
//!
//! - [`extract`] - typed field accessors over semi-structured records
//! - [`mappers`] - one mapper per entity kind
//! - [`source`] / [`sink`] - collaborator traits for fetching and storing
//! - [`sync`] - the batch driver
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use srd::{map_monster, Record};
//!
//! let doc = json!({"index": "goblin", "name": "Goblin", "armor_class": [{"value": 15}]});
//! let goblin = map_monster(Record::new(&doc));
//! assert_eq!(goblin.armor_class, 15);
//! assert_eq!(goblin.speed, 30);
//! ```

pub mod extract;
pub mod mappers;
pub mod sink;
pub mod source;
pub mod sync;
pub mod types;

#[doc(inline)]
pub use extract::{Field, Record};
#[doc(inline)]
pub use mappers::{
    map_armor, map_class, map_equipment, map_monster, map_race, map_record, map_spell, map_weapon,
    EquipmentCategory,
};
#[doc(inline)]
pub use sink::{RowWriter, SinkError, UpsertSink};
#[doc(inline)]
pub use source::{ResourceList, ResourceRef, RulesSource, SourceError};
#[doc(inline)]
pub use sync::{
    CollectionReport, ItemStatus, SyncError, SyncOptions, SyncReport, Syncer,
    DEFAULT_PROGRESS_EVERY,
};
#[doc(inline)]
pub use types::{
    Action, Armor, CharacterClass, Collection, EntityKind, Monster, Race, Row, Spell,
    UnknownKind, Weapon,
};
