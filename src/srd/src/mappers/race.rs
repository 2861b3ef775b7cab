use std::collections::BTreeMap;

use super::ability_code;
use crate::extract::{join, Record};
use crate::types::Race;

const DEFAULT_SPEED: i32 = 30;

pub fn map_race(record: Record<'_>) -> Race {
    Race {
        slug: record.text("/index"),
        name: record.text("/name"),
        size: record.text("/size"),
        speed: record.leading_int("/speed").or(DEFAULT_SPEED),
        ability_mods: ability_mods(record),
        traits: join(&record.names("/traits").or_default()),
    }
}

/// Only abilities the source explicitly bonuses become keys
fn ability_mods(record: Record<'_>) -> BTreeMap<String, i32> {
    let mut mods = BTreeMap::new();
    for bonus in record.list("/ability_bonuses").or_default() {
        let Some(code) = bonus
            .raw("/ability_score")
            .ok()
            .and_then(|v| ability_code(Record::new(v)))
        else {
            continue;
        };
        *mods.entry(code).or_insert(0) += bonus.int("/bonus").or(0);
    }
    mods
}
