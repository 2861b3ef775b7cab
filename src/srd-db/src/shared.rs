//! Table definitions and SQL builders.
//!
//! Column lists are ordered to match the field order of the row structs in
//! `srd::types`; the positional indices in the row mapping functions depend
//! on it.

use srd::EntityKind;

pub const MONSTER_COLUMNS: &[&str] = &[
    "slug",
    "name",
    "size",
    "type",
    "armor_class",
    "hit_points",
    "hit_dice",
    "speed",
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
    "challenge_rating",
    "xp",
    "actions",
];

pub const SPELL_COLUMNS: &[&str] = &[
    "slug",
    "name",
    "level",
    "school",
    "casting_time",
    "range",
    "components",
    "duration",
    "description",
    "damage_dice",
    "damage_type",
    "saving_throw",
    "healing_dice",
];

pub const CLASS_COLUMNS: &[&str] = &[
    "slug",
    "name",
    "hit_die",
    "primary_ability",
    "saving_throws",
    "spellcasting_ability",
];

pub const RACE_COLUMNS: &[&str] = &["slug", "name", "size", "speed", "ability_mods", "traits"];

pub const WEAPON_COLUMNS: &[&str] = &[
    "slug",
    "name",
    "weapon_type",
    "damage_dice",
    "damage_type",
    "weight",
    "properties",
];

pub const ARMOR_COLUMNS: &[&str] = &[
    "slug",
    "name",
    "armor_type",
    "base_ac",
    "dex_bonus",
    "str_minimum",
    "stealth_disadvantage",
    "weight",
];

/// Column list for a kind; the first column is always the slug key
pub fn columns(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Monster => MONSTER_COLUMNS,
        EntityKind::Spell => SPELL_COLUMNS,
        EntityKind::Class => CLASS_COLUMNS,
        EntityKind::Race => RACE_COLUMNS,
        EntityKind::Weapon => WEAPON_COLUMNS,
        EntityKind::Armor => ARMOR_COLUMNS,
    }
}

fn quoted(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Insert-or-replace statement keyed on slug.
///
/// Every non-key column is overwritten from the incoming row, so the last
/// write for a slug wins in full.
pub fn upsert_sql(kind: EntityKind) -> String {
    let cols = columns(kind);
    let placeholders = (1..=cols.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    let updates = cols
        .iter()
        .skip(1)
        .map(|c| format!("\"{c}\" = excluded.\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT(slug) DO UPDATE SET {}",
        kind.table(),
        quoted(cols),
        placeholders,
        updates
    )
}

pub fn select_sql(kind: EntityKind) -> String {
    format!(
        "SELECT {} FROM {} WHERE slug = ?1",
        quoted(columns(kind)),
        kind.table()
    )
}

pub fn list_sql(kind: EntityKind) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY slug",
        quoted(columns(kind)),
        kind.table()
    )
}

pub fn count_sql(kind: EntityKind) -> String {
    format!("SELECT COUNT(*) FROM {}", kind.table())
}

/// SQLite schema definitions
pub mod schema {
    pub const MONSTERS_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS monsters (
            slug TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            size TEXT NOT NULL DEFAULT '',
            type TEXT NOT NULL DEFAULT '',
            armor_class INTEGER NOT NULL DEFAULT 10,
            hit_points INTEGER NOT NULL DEFAULT 0,
            hit_dice TEXT NOT NULL DEFAULT '',
            speed INTEGER NOT NULL DEFAULT 30,
            strength INTEGER NOT NULL DEFAULT 10,
            dexterity INTEGER NOT NULL DEFAULT 10,
            constitution INTEGER NOT NULL DEFAULT 10,
            intelligence INTEGER NOT NULL DEFAULT 10,
            wisdom INTEGER NOT NULL DEFAULT 10,
            charisma INTEGER NOT NULL DEFAULT 10,
            challenge_rating TEXT NOT NULL DEFAULT '0',
            xp INTEGER NOT NULL DEFAULT 0,
            actions TEXT NOT NULL DEFAULT '[]'
        )
    "#;

    pub const SPELLS_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS spells (
            slug TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            level INTEGER NOT NULL DEFAULT 0,
            school TEXT NOT NULL DEFAULT '',
            casting_time TEXT NOT NULL DEFAULT '',
            "range" TEXT NOT NULL DEFAULT '',
            components TEXT NOT NULL DEFAULT '',
            duration TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            damage_dice TEXT NOT NULL DEFAULT '',
            damage_type TEXT NOT NULL DEFAULT '',
            saving_throw TEXT NOT NULL DEFAULT '',
            healing_dice TEXT NOT NULL DEFAULT ''
        )
    "#;

    pub const CLASSES_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS classes (
            slug TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            hit_die INTEGER NOT NULL DEFAULT 8,
            primary_ability TEXT NOT NULL DEFAULT '',
            saving_throws TEXT NOT NULL DEFAULT '',
            spellcasting_ability TEXT NOT NULL DEFAULT ''
        )
    "#;

    pub const RACES_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS races (
            slug TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            size TEXT NOT NULL DEFAULT '',
            speed INTEGER NOT NULL DEFAULT 30,
            ability_mods TEXT NOT NULL DEFAULT '{}',
            traits TEXT NOT NULL DEFAULT ''
        )
    "#;

    pub const WEAPONS_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS weapons (
            slug TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            weapon_type TEXT NOT NULL DEFAULT '',
            damage_dice TEXT NOT NULL DEFAULT '',
            damage_type TEXT NOT NULL DEFAULT '',
            weight REAL NOT NULL DEFAULT 0,
            properties TEXT NOT NULL DEFAULT ''
        )
    "#;

    pub const ARMOR_TABLE: &str = r#"
        CREATE TABLE IF NOT EXISTS armor (
            slug TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            armor_type TEXT NOT NULL DEFAULT '',
            base_ac INTEGER NOT NULL DEFAULT 10,
            dex_bonus TEXT NOT NULL DEFAULT '',
            str_minimum INTEGER NOT NULL DEFAULT 0,
            stealth_disadvantage BOOLEAN NOT NULL DEFAULT FALSE,
            weight REAL NOT NULL DEFAULT 0
        )
    "#;

    /// All table definitions, in processing order
    pub const ALL_TABLES: &[&str] = &[
        MONSTERS_TABLE,
        SPELLS_TABLE,
        CLASSES_TABLE,
        RACES_TABLE,
        WEAPONS_TABLE,
        ARMOR_TABLE,
    ];
}
