use crate::extract::{join, Record};
use crate::types::{Armor, Row, Weapon};

const DEFAULT_BASE_AC: i32 = 10;

/// Equipment category discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentCategory {
    Weapon,
    Armor,
    Other,
}

impl EquipmentCategory {
    /// Read `equipment_category.index`, falling back to its name, then to
    /// a bare category string
    pub fn of(record: Record<'_>) -> Self {
        let category = record
            .str("/equipment_category/index")
            .or_field(|| record.str("/equipment_category/name"))
            .or_field(|| record.str("/equipment_category"))
            .or("");
        match category.trim().to_ascii_lowercase().as_str() {
            "weapon" => Self::Weapon,
            "armor" => Self::Armor,
            _ => Self::Other,
        }
    }
}

/// Dispatch an equipment record to the weapon or armor mapper.
/// Other categories (gear, tools, mounts...) yield `None`.
pub fn map_equipment(record: Record<'_>) -> Option<Row> {
    match EquipmentCategory::of(record) {
        EquipmentCategory::Weapon => Some(Row::Weapon(map_weapon(record))),
        EquipmentCategory::Armor => Some(Row::Armor(map_armor(record))),
        EquipmentCategory::Other => None,
    }
}

pub fn map_weapon(record: Record<'_>) -> Weapon {
    Weapon {
        slug: record.text("/index"),
        name: record.text("/name"),
        weapon_type: record.text("/weapon_category").to_lowercase(),
        damage_dice: record.text("/damage/damage_dice"),
        damage_type: record.text("/damage/damage_type/name").to_lowercase(),
        weight: record.float("/weight").or(0.0),
        properties: join(&record.names("/properties").or_default()),
    }
}

pub fn map_armor(record: Record<'_>) -> Armor {
    Armor {
        slug: record.text("/index"),
        name: record.text("/name"),
        armor_type: record.text("/armor_category").to_lowercase(),
        base_ac: record.int("/armor_class/base").or(DEFAULT_BASE_AC),
        dex_bonus: dex_bonus(record),
        str_minimum: record.int("/str_minimum").or(0),
        stealth_disadvantage: record.bool("/stealth_disadvantage").or(false),
        weight: record.float("/weight").or(0.0),
    }
}

fn dex_bonus(record: Record<'_>) -> String {
    if !record.bool("/armor_class/dex_bonus").or(false) {
        return String::new();
    }
    match record.int("/armor_class/max_bonus").ok() {
        Some(max) => format!("+DEX (max {})", max),
        None => "+DEX".to_string(),
    }
}
