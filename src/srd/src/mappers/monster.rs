use crate::extract::Record;
use crate::types::{Action, Monster};

const DEFAULT_ARMOR_CLASS: i32 = 10;
const DEFAULT_SPEED: i32 = 30;
const DEFAULT_ABILITY_SCORE: i32 = 10;
const DEFAULT_DAMAGE_DICE: &str = "1d6";
const DEFAULT_DAMAGE_TYPE: &str = "bludgeoning";

pub fn map_monster(record: Record<'_>) -> Monster {
    Monster {
        slug: record.text("/index"),
        name: record.text("/name"),
        size: record.text("/size"),
        creature_type: record.text("/type"),
        armor_class: armor_class(record),
        hit_points: record.int("/hit_points").or(0),
        hit_dice: record.text("/hit_dice"),
        speed: record.leading_int("/speed/walk").or(DEFAULT_SPEED),
        strength: record.int("/strength").or(DEFAULT_ABILITY_SCORE),
        dexterity: record.int("/dexterity").or(DEFAULT_ABILITY_SCORE),
        constitution: record.int("/constitution").or(DEFAULT_ABILITY_SCORE),
        intelligence: record.int("/intelligence").or(DEFAULT_ABILITY_SCORE),
        wisdom: record.int("/wisdom").or(DEFAULT_ABILITY_SCORE),
        charisma: record.int("/charisma").or(DEFAULT_ABILITY_SCORE),
        challenge_rating: record.decimal_text("/challenge_rating").or_else(|| "0".to_string()),
        xp: record.int("/xp").map(i64::from).or(0),
        actions: record
            .list("/actions")
            .or_default()
            .into_iter()
            .map(map_action)
            .collect(),
    }
}

/// Armor class is a list of `{type, value}` entries; only the first counts.
/// Older documents carry a bare number instead.
fn armor_class(record: Record<'_>) -> i32 {
    record
        .first("/armor_class")
        .ok()
        .map(|entry| entry.int("/value"))
        .unwrap_or_else(|| record.int("/armor_class"))
        .or(DEFAULT_ARMOR_CLASS)
}

fn map_action(action: Record<'_>) -> Action {
    let damage = action.first("/damage").or_else(Record::empty);
    Action {
        name: action.text("/name"),
        attack_bonus: action.int("/attack_bonus").or(0),
        damage_dice: damage
            .str("/damage_dice")
            .or(DEFAULT_DAMAGE_DICE)
            .to_string(),
        damage_type: damage
            .str("/damage_type/name")
            .or(DEFAULT_DAMAGE_TYPE)
            .to_string(),
    }
}
