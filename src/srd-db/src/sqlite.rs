//! SQLite implementation using rusqlite (synchronous).

use crate::repository::*;
use crate::shared::{self, schema};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Statement};
use serde::de::DeserializeOwned;
use srd::{
    Armor, CharacterClass, EntityKind, Monster, Race, Row, RowWriter, SinkError, Spell,
    UpsertSink, Weapon,
};
use std::path::Path;

/// Default database location
pub const DEFAULT_DB_PATH: &str = "share/srd.db";

/// SQLite-backed rules database
pub struct SqliteDb {
    conn: Connection,
}

fn db_err(e: rusqlite::Error) -> RepoError {
    RepoError::Database(e.to_string())
}

/// Decode a JSON text column
fn json_column<T: DeserializeOwned>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_monster(row: &rusqlite::Row<'_>) -> rusqlite::Result<Monster> {
    Ok(Monster {
        slug: row.get(0)?,
        name: row.get(1)?,
        size: row.get(2)?,
        creature_type: row.get(3)?,
        armor_class: row.get(4)?,
        hit_points: row.get(5)?,
        hit_dice: row.get(6)?,
        speed: row.get(7)?,
        strength: row.get(8)?,
        dexterity: row.get(9)?,
        constitution: row.get(10)?,
        intelligence: row.get(11)?,
        wisdom: row.get(12)?,
        charisma: row.get(13)?,
        challenge_rating: row.get(14)?,
        xp: row.get(15)?,
        actions: json_column(row, 16)?,
    })
}

fn row_to_spell(row: &rusqlite::Row<'_>) -> rusqlite::Result<Spell> {
    Ok(Spell {
        slug: row.get(0)?,
        name: row.get(1)?,
        level: row.get(2)?,
        school: row.get(3)?,
        casting_time: row.get(4)?,
        range: row.get(5)?,
        components: row.get(6)?,
        duration: row.get(7)?,
        description: row.get(8)?,
        damage_dice: row.get(9)?,
        damage_type: row.get(10)?,
        saving_throw: row.get(11)?,
        healing_dice: row.get(12)?,
    })
}

fn row_to_class(row: &rusqlite::Row<'_>) -> rusqlite::Result<CharacterClass> {
    Ok(CharacterClass {
        slug: row.get(0)?,
        name: row.get(1)?,
        hit_die: row.get(2)?,
        primary_ability: row.get(3)?,
        saving_throws: row.get(4)?,
        spellcasting_ability: row.get(5)?,
    })
}

fn row_to_race(row: &rusqlite::Row<'_>) -> rusqlite::Result<Race> {
    Ok(Race {
        slug: row.get(0)?,
        name: row.get(1)?,
        size: row.get(2)?,
        speed: row.get(3)?,
        ability_mods: json_column(row, 4)?,
        traits: row.get(5)?,
    })
}

fn row_to_weapon(row: &rusqlite::Row<'_>) -> rusqlite::Result<Weapon> {
    Ok(Weapon {
        slug: row.get(0)?,
        name: row.get(1)?,
        weapon_type: row.get(2)?,
        damage_dice: row.get(3)?,
        damage_type: row.get(4)?,
        weight: row.get(5)?,
        properties: row.get(6)?,
    })
}

fn row_to_armor(row: &rusqlite::Row<'_>) -> rusqlite::Result<Armor> {
    Ok(Armor {
        slug: row.get(0)?,
        name: row.get(1)?,
        armor_type: row.get(2)?,
        base_ac: row.get(3)?,
        dex_bonus: row.get(4)?,
        str_minimum: row.get(5)?,
        stealth_disadvantage: row.get(6)?,
        weight: row.get(7)?,
    })
}

fn read_row(kind: EntityKind, row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    match kind {
        EntityKind::Monster => row_to_monster(row).map(Row::Monster),
        EntityKind::Spell => row_to_spell(row).map(Row::Spell),
        EntityKind::Class => row_to_class(row).map(Row::Class),
        EntityKind::Race => row_to_race(row).map(Row::Race),
        EntityKind::Weapon => row_to_weapon(row).map(Row::Weapon),
        EntityKind::Armor => row_to_armor(row).map(Row::Armor),
    }
}

/// Bind every column of `row` to the upsert statement and run it
fn execute_upsert(stmt: &mut Statement<'_>, row: &Row) -> Result<(), SinkError> {
    let result = match row {
        Row::Monster(m) => {
            let actions = serde_json::to_string(&m.actions)?;
            stmt.execute(params![
                m.slug,
                m.name,
                m.size,
                m.creature_type,
                m.armor_class,
                m.hit_points,
                m.hit_dice,
                m.speed,
                m.strength,
                m.dexterity,
                m.constitution,
                m.intelligence,
                m.wisdom,
                m.charisma,
                m.challenge_rating,
                m.xp,
                actions,
            ])
        }
        Row::Spell(s) => stmt.execute(params![
            s.slug,
            s.name,
            s.level,
            s.school,
            s.casting_time,
            s.range,
            s.components,
            s.duration,
            s.description,
            s.damage_dice,
            s.damage_type,
            s.saving_throw,
            s.healing_dice,
        ]),
        Row::Class(c) => stmt.execute(params![
            c.slug,
            c.name,
            c.hit_die,
            c.primary_ability,
            c.saving_throws,
            c.spellcasting_ability,
        ]),
        Row::Race(r) => {
            let ability_mods = serde_json::to_string(&r.ability_mods)?;
            stmt.execute(params![r.slug, r.name, r.size, r.speed, ability_mods, r.traits])
        }
        Row::Weapon(w) => stmt.execute(params![
            w.slug,
            w.name,
            w.weapon_type,
            w.damage_dice,
            w.damage_type,
            w.weight,
            w.properties,
        ]),
        Row::Armor(a) => stmt.execute(params![
            a.slug,
            a.name,
            a.armor_type,
            a.base_ac,
            a.dex_bonus,
            a.str_minimum,
            a.stealth_disadvantage,
            a.weight,
        ]),
    };
    result
        .map(|_| ())
        .map_err(|e| SinkError::Database(e.to_string()))
}

/// Prepared upsert statement for one kind, borrowed from the connection
pub struct SqliteWriter<'conn> {
    kind: EntityKind,
    stmt: Statement<'conn>,
}

impl RowWriter for SqliteWriter<'_> {
    fn upsert(&mut self, row: &Row) -> Result<(), SinkError> {
        if row.kind() != self.kind {
            return Err(SinkError::KindMismatch {
                writer: self.kind,
                row: row.kind(),
            });
        }
        execute_upsert(&mut self.stmt, row)
    }
}

impl SqliteDb {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path.as_ref())?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Prepare the upsert statement for a kind
    pub fn writer(&self, kind: EntityKind) -> Result<SqliteWriter<'_>, SinkError> {
        let stmt = self
            .conn
            .prepare(&shared::upsert_sql(kind))
            .map_err(|e| SinkError::Database(e.to_string()))?;
        Ok(SqliteWriter { kind, stmt })
    }
}

impl UpsertSink for SqliteDb {
    fn prepare(&self, kind: EntityKind) -> Result<Box<dyn RowWriter + '_>, SinkError> {
        Ok(Box::new(self.writer(kind)?))
    }
}

impl RulesRepository for SqliteDb {
    fn init(&self) -> RepoResult<()> {
        for ddl in schema::ALL_TABLES {
            self.conn.execute(ddl, []).map_err(db_err)?;
        }
        Ok(())
    }

    fn upsert(&self, row: &Row) -> RepoResult<()> {
        let mut writer = self.writer(row.kind())?;
        writer.upsert(row)?;
        Ok(())
    }

    fn get(&self, kind: EntityKind, slug: &str) -> RepoResult<Option<Row>> {
        self.conn
            .query_row(&shared::select_sql(kind), params![slug], |row| {
                read_row(kind, row)
            })
            .optional()
            .map_err(db_err)
    }

    fn list(&self, kind: EntityKind) -> RepoResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(&shared::list_sql(kind)).map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| read_row(kind, row))
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(rows)
    }

    fn count(&self, kind: EntityKind) -> RepoResult<i64> {
        self.conn
            .query_row(&shared::count_sql(kind), [], |row| row.get(0))
            .map_err(db_err)
    }

    fn stats(&self) -> RepoResult<DbStats> {
        let mut stats = DbStats::default();
        for kind in EntityKind::ALL {
            stats.counts.insert(kind, self.count(kind)?);
        }
        Ok(stats)
    }
}
