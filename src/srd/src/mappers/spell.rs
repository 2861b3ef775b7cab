use serde_json::{Map, Value};

use crate::extract::{join, truncate_chars, Field, Record, TEXT_LIMIT};
use crate::types::Spell;

/// Cantrips are level 0; the highest spell slot is 9
const SPELL_LEVELS: std::ops::RangeInclusive<i32> = 0..=9;

pub fn map_spell(record: Record<'_>) -> Spell {
    let description = record
        .first("/desc")
        .ok()
        .and_then(|p| p.str("").ok())
        .map(|text| truncate_chars(text, TEXT_LIMIT).to_string())
        .unwrap_or_default();

    Spell {
        slug: record.text("/index"),
        name: record.text("/name"),
        level: record
            .int("/level")
            .ok()
            .filter(|level| SPELL_LEVELS.contains(level))
            .unwrap_or(0),
        school: record.text("/school/name").to_lowercase(),
        casting_time: record.text("/casting_time"),
        range: record.text("/range"),
        components: join(&record.names("/components").or_default()),
        duration: record.text("/duration"),
        description,
        damage_dice: scaled_dice(record, "/damage/damage_at_slot_level")
            .or_field(|| scaled_dice(record, "/damage/damage_at_character_level"))
            .or_default(),
        damage_type: record.text("/damage/damage_type/name").to_lowercase(),
        saving_throw: record
            .str("/dc/dc_type/name")
            .or_field(|| record.str("/dc/dc_type/index"))
            .or("")
            .to_uppercase(),
        healing_dice: scaled_dice(record, "/heal_at_slot_level").or_default(),
    }
}

/// One representative value from a per-level dice mapping such as
/// `{"3": "8d6", "4": "9d6"}`.
///
/// Only a single level is kept: the lowest numeric key, so repeated runs
/// pick the same entry. Other levels are dropped.
fn scaled_dice(record: Record<'_>, path: &str) -> Field<String> {
    match record.object(path) {
        Field::Present(map) => lowest_level_entry(map)
            .map_or(Field::Absent, |dice| Field::Present(dice.to_string())),
        Field::Absent => Field::Absent,
        Field::Mistyped => Field::Mistyped,
    }
}

fn lowest_level_entry(map: &Map<String, Value>) -> Option<&str> {
    map.iter()
        .filter_map(|(level, dice)| Some((level.trim().parse::<u32>().ok()?, dice.as_str()?)))
        .min_by_key(|(level, _)| *level)
        .map(|(_, dice)| dice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fireball() {
        let doc = json!({
            "index": "fireball",
            "name": "Fireball",
            "level": 3,
            "school": {"index": "evocation", "name": "Evocation"},
            "casting_time": "1 action",
            "range": "150 feet",
            "components": ["V", "S", "M"],
            "duration": "Instantaneous",
            "desc": ["A bright streak flashes...", "The fire spreads..."],
            "damage": {
                "damage_type": {"index": "fire", "name": "Fire"},
                "damage_at_slot_level": {"3": "8d6", "4": "9d6", "10": "15d6"}
            },
            "dc": {"dc_type": {"index": "dex", "name": "DEX"}, "dc_success": "half"}
        });
        let s = map_spell(Record::new(&doc));
        assert_eq!(s.slug, "fireball");
        assert_eq!(s.level, 3);
        assert_eq!(s.school, "evocation");
        assert_eq!(s.components, "V, S, M");
        assert_eq!(s.description, "A bright streak flashes...");
        assert_eq!(s.damage_dice, "8d6");
        assert_eq!(s.damage_type, "fire");
        assert_eq!(s.saving_throw, "DEX");
        assert_eq!(s.healing_dice, "");
    }

    #[test]
    fn test_description_truncated_to_500_chars() {
        let long = "x".repeat(600);
        let doc = json!({"desc": [long]});
        let s = map_spell(Record::new(&doc));
        assert_eq!(s.description, "x".repeat(500));
    }

    #[test]
    fn test_healing_and_cantrip_damage() {
        let doc = json!({
            "heal_at_slot_level": {"2": "2d8 + MOD", "1": "1d8 + MOD"}
        });
        assert_eq!(map_spell(Record::new(&doc)).healing_dice, "1d8 + MOD");

        let doc = json!({
            "damage": {
                "damage_type": {"name": "Fire"},
                "damage_at_character_level": {"5": "2d10", "1": "1d10"}
            }
        });
        let s = map_spell(Record::new(&doc));
        assert_eq!(s.damage_dice, "1d10");
        assert_eq!(s.damage_type, "fire");
    }

    #[test]
    fn test_all_defaults() {
        let s = map_spell(Record::empty());
        assert_eq!(
            s,
            Spell {
                slug: String::new(),
                name: String::new(),
                level: 0,
                school: String::new(),
                casting_time: String::new(),
                range: String::new(),
                components: String::new(),
                duration: String::new(),
                description: String::new(),
                damage_dice: String::new(),
                damage_type: String::new(),
                saving_throw: String::new(),
                healing_dice: String::new(),
            }
        );
    }

    #[test]
    fn test_level_out_of_range_defaults_to_zero() {
        for (raw, expected) in [(json!(42), 0), (json!(-3), 0), (json!(9), 9), (json!("3"), 0)] {
            let doc = json!({"level": raw});
            assert_eq!(map_spell(Record::new(&doc)).level, expected, "level {}", raw);
        }
    }

    #[test]
    fn test_mistyped_slot_mapping() {
        let doc = json!({"damage": {"damage_at_slot_level": "8d6"}, "desc": "not a list"});
        let s = map_spell(Record::new(&doc));
        assert_eq!(s.damage_dice, "");
        assert_eq!(s.description, "");
    }
}
