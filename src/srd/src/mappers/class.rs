use super::ability_code;
use crate::extract::{join, Record};
use crate::types::CharacterClass;

const DEFAULT_HIT_DIE: i32 = 8;

pub fn map_class(record: Record<'_>) -> CharacterClass {
    let saving_throws: Vec<String> = record
        .list("/saving_throws")
        .or_default()
        .into_iter()
        .filter_map(ability_code)
        .collect();

    let spellcasting_ability = record
        .raw("/spellcasting/spellcasting_ability")
        .ok()
        .and_then(|v| ability_code(Record::new(v)))
        .unwrap_or_default();

    CharacterClass {
        slug: record.text("/index"),
        name: record.text("/name"),
        hit_die: record.int("/hit_die").or(DEFAULT_HIT_DIE),
        primary_ability: String::new(),
        saving_throws: join(&saving_throws),
        spellcasting_ability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wizard() {
        let doc = json!({
            "index": "wizard",
            "name": "Wizard",
            "hit_die": 6,
            "saving_throws": [
                {"index": "int", "name": "INT"},
                {"index": "wis", "name": "WIS"}
            ],
            "spellcasting": {
                "level": 1,
                "spellcasting_ability": {"index": "int", "name": "INT"}
            }
        });
        let c = map_class(Record::new(&doc));
        assert_eq!(c.slug, "wizard");
        assert_eq!(c.hit_die, 6);
        assert_eq!(c.primary_ability, "");
        assert_eq!(c.saving_throws, "INT, WIS");
        assert_eq!(c.spellcasting_ability, "INT");
    }

    #[test]
    fn test_non_caster_and_lowercase_codes() {
        let doc = json!({
            "index": "barbarian",
            "name": "Barbarian",
            "hit_die": 12,
            "saving_throws": [{"index": "con", "name": "con"}, {"index": "str"}]
        });
        let c = map_class(Record::new(&doc));
        assert_eq!(c.saving_throws, "CON, STR");
        assert_eq!(c.spellcasting_ability, "");
    }

    #[test]
    fn test_all_defaults() {
        let c = map_class(Record::empty());
        assert_eq!(
            c,
            CharacterClass {
                slug: String::new(),
                name: String::new(),
                hit_die: 8,
                primary_ability: String::new(),
                saving_throws: String::new(),
                spellcasting_ability: String::new(),
            }
        );
    }
}
