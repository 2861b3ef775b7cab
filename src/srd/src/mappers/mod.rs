//! Entity mappers: one pure function per entity kind turning a source
//! [`Record`] into a typed row.
//!
//! Mappers never fail. Missing or malformed fields fall back to the
//! documented defaults for their kind.

mod class;
mod equipment;
mod monster;
mod race;
mod spell;

pub use class::map_class;
pub use equipment::{map_armor, map_equipment, map_weapon, EquipmentCategory};
pub use monster::map_monster;
pub use race::map_race;
pub use spell::map_spell;

use crate::extract::Record;
use crate::types::{Collection, Row};

/// Map a detail record fetched from `collection`.
///
/// Returns `None` only for equipment whose category is neither weapon nor
/// armor.
pub fn map_record(collection: Collection, record: Record<'_>) -> Option<Row> {
    match collection {
        Collection::Monsters => Some(Row::Monster(map_monster(record))),
        Collection::Spells => Some(Row::Spell(map_spell(record))),
        Collection::Classes => Some(Row::Class(map_class(record))),
        Collection::Races => Some(Row::Race(map_race(record))),
        Collection::Equipment => map_equipment(record),
    }
}

/// Uppercased ability code from an `{index, name}` reference
fn ability_code(record: Record<'_>) -> Option<String> {
    record
        .str("/name")
        .or_field(|| record.str("/index"))
        .ok()
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
}
