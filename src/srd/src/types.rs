//! Typed rows produced by the entity mappers.
//!
//! Every row is keyed by its slug, the stable identifier assigned by the
//! source. Field order in each struct matches the column order of the
//! corresponding table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of stored entity; one table per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Monster,
    Spell,
    Class,
    Race,
    Weapon,
    Armor,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        Self::Monster,
        Self::Spell,
        Self::Class,
        Self::Race,
        Self::Weapon,
        Self::Armor,
    ];

    /// Table name in the store
    pub fn table(&self) -> &'static str {
        match self {
            Self::Monster => "monsters",
            Self::Spell => "spells",
            Self::Class => "classes",
            Self::Race => "races",
            Self::Weapon => "weapons",
            Self::Armor => "armor",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monster => write!(f, "monster"),
            Self::Spell => write!(f, "spell"),
            Self::Class => write!(f, "class"),
            Self::Race => write!(f, "race"),
            Self::Weapon => write!(f, "weapon"),
            Self::Armor => write!(f, "armor"),
        }
    }
}

/// Error for unrecognized entity kind names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown entity kind: {0}")]
pub struct UnknownKind(pub String);

impl std::str::FromStr for EntityKind {
    type Err = UnknownKind;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monster" | "monsters" => Ok(Self::Monster),
            "spell" | "spells" => Ok(Self::Spell),
            "class" | "classes" => Ok(Self::Class),
            "race" | "races" => Ok(Self::Race),
            "weapon" | "weapons" => Ok(Self::Weapon),
            "armor" | "armour" => Ok(Self::Armor),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// Source list endpoint. Processed in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Monsters,
    Spells,
    Classes,
    Races,
    Equipment,
}

impl Collection {
    /// Fixed processing order
    pub const ORDER: [Collection; 5] = [
        Self::Monsters,
        Self::Spells,
        Self::Classes,
        Self::Races,
        Self::Equipment,
    ];

    /// Path segment of the list endpoint
    pub fn path(&self) -> &'static str {
        match self {
            Self::Monsters => "monsters",
            Self::Spells => "spells",
            Self::Classes => "classes",
            Self::Races => "races",
            Self::Equipment => "equipment",
        }
    }

    /// Entity kinds this collection can produce
    pub fn kinds(&self) -> &'static [EntityKind] {
        match self {
            Self::Monsters => &[EntityKind::Monster],
            Self::Spells => &[EntityKind::Spell],
            Self::Classes => &[EntityKind::Class],
            Self::Races => &[EntityKind::Race],
            Self::Equipment => &[EntityKind::Weapon, EntityKind::Armor],
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// One monster action, kept in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub attack_bonus: i32,
    pub damage_dice: String,
    pub damage_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub slug: String,
    pub name: String,
    pub size: String,
    pub creature_type: String,
    pub armor_class: i32,
    pub hit_points: i32,
    pub hit_dice: String,
    pub speed: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub challenge_rating: String,
    pub xp: i64,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub slug: String,
    pub name: String,
    pub level: i32,
    pub school: String,
    pub casting_time: String,
    pub range: String,
    pub components: String,
    pub duration: String,
    pub description: String,
    pub damage_dice: String,
    pub damage_type: String,
    pub saving_throw: String,
    pub healing_dice: String,
}

/// Character class (`class` is reserved, hence the longer name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterClass {
    pub slug: String,
    pub name: String,
    pub hit_die: i32,
    /// Always empty; the source carries no primary ability
    pub primary_ability: String,
    pub saving_throws: String,
    pub spellcasting_ability: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    pub slug: String,
    pub name: String,
    pub size: String,
    pub speed: i32,
    /// Ability code to bonus; abilities without a bonus are left out
    pub ability_mods: BTreeMap<String, i32>,
    pub traits: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub slug: String,
    pub name: String,
    pub weapon_type: String,
    pub damage_dice: String,
    pub damage_type: String,
    pub weight: f64,
    pub properties: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub slug: String,
    pub name: String,
    pub armor_type: String,
    pub base_ac: i32,
    pub dex_bonus: String,
    pub str_minimum: i32,
    pub stealth_disadvantage: bool,
    pub weight: f64,
}

/// A mapped row of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Row {
    Monster(Monster),
    Spell(Spell),
    Class(CharacterClass),
    Race(Race),
    Weapon(Weapon),
    Armor(Armor),
}

impl Row {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Monster(_) => EntityKind::Monster,
            Self::Spell(_) => EntityKind::Spell,
            Self::Class(_) => EntityKind::Class,
            Self::Race(_) => EntityKind::Race,
            Self::Weapon(_) => EntityKind::Weapon,
            Self::Armor(_) => EntityKind::Armor,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Self::Monster(r) => &r.slug,
            Self::Spell(r) => &r.slug,
            Self::Class(r) => &r.slug,
            Self::Race(r) => &r.slug,
            Self::Weapon(r) => &r.slug,
            Self::Armor(r) => &r.slug,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Monster(r) => &r.name,
            Self::Spell(r) => &r.name,
            Self::Class(r) => &r.name,
            Self::Race(r) => &r.name,
            Self::Weapon(r) => &r.name,
            Self::Armor(r) => &r.name,
        }
    }

    /// Replace the slug, used when the detail document lacks one
    pub fn set_slug(&mut self, slug: &str) {
        let target = match self {
            Self::Monster(r) => &mut r.slug,
            Self::Spell(r) => &mut r.slug,
            Self::Class(r) => &mut r.slug,
            Self::Race(r) => &mut r.slug,
            Self::Weapon(r) => &mut r.slug,
            Self::Armor(r) => &mut r.slug,
        };
        *target = slug.to_string();
    }
}
