//! Flat row model shared between the transform and load phases.
//!
//! Species and pokemon records arrive from separate endpoints as deeply
//! nested JSON; the normalizers flatten them into these rows, and the
//! reconciler joins them on `pokemon_id = species_id` with the species side
//! driving cardinality.

use serde::{Deserialize, Serialize};

/// One species record flattened from the generation staging artifacts.
///
/// `species_id` is the join identity and must be unique within a run's
/// loaded set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRow {
    pub species_id: i64,
    pub name: String,
    pub color: String,
    pub habitat: Option<String>,
    pub generation: String,
    pub previous_evolution: Option<String>,
    pub is_mythical: bool,
    pub is_baby: bool,
    pub is_legendary: bool,
    pub nat_pokedex_entry: Option<i64>,
}

/// One pokemon record flattened from the page staging artifacts.
///
/// Stats are looked up by name in the upstream `stats` list; a stat missing
/// from the list stays `None`. Types are positional, not slot-numbered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRow {
    pub pokemon_id: i64,
    pub name: String,
    pub hp_base_stat: Option<i64>,
    pub attack_base_stat: Option<i64>,
    pub defense_base_stat: Option<i64>,
    pub special_attack_base_stat: Option<i64>,
    pub special_defense_base_stat: Option<i64>,
    pub speed_base_stat: Option<i64>,
    pub type_1: Option<String>,
    pub type_2: Option<String>,
}

/// Right join of [`PokemonRow`] onto [`SpeciesRow`]: one row per species,
/// pokemon columns all `None` when no matching pokemon was retrieved.
///
/// The pokemon-side `name` is collapsed into the species `name`; the two are
/// the same entity by join identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedRow {
    pub species_id: i64,
    pub name: String,
    pub color: String,
    pub habitat: Option<String>,
    pub generation: String,
    pub previous_evolution: Option<String>,
    pub is_mythical: bool,
    pub is_baby: bool,
    pub is_legendary: bool,
    pub nat_pokedex_entry: Option<i64>,
    pub pokemon_id: Option<i64>,
    pub hp_base_stat: Option<i64>,
    pub attack_base_stat: Option<i64>,
    pub defense_base_stat: Option<i64>,
    pub special_attack_base_stat: Option<i64>,
    pub special_defense_base_stat: Option<i64>,
    pub speed_base_stat: Option<i64>,
    pub type_1: Option<String>,
    pub type_2: Option<String>,
}

impl CombinedRow {
    /// Merge one species with its matching pokemon, if any.
    pub fn from_parts(species: SpeciesRow, pokemon: Option<PokemonRow>) -> Self {
        let (
            pokemon_id,
            hp_base_stat,
            attack_base_stat,
            defense_base_stat,
            special_attack_base_stat,
            special_defense_base_stat,
            speed_base_stat,
            type_1,
            type_2,
        ) = match pokemon {
            Some(p) => (
                Some(p.pokemon_id),
                p.hp_base_stat,
                p.attack_base_stat,
                p.defense_base_stat,
                p.special_attack_base_stat,
                p.special_defense_base_stat,
                p.speed_base_stat,
                p.type_1,
                p.type_2,
            ),
            None => (None, None, None, None, None, None, None, None, None),
        };

        Self {
            species_id: species.species_id,
            name: species.name,
            color: species.color,
            habitat: species.habitat,
            generation: species.generation,
            previous_evolution: species.previous_evolution,
            is_mythical: species.is_mythical,
            is_baby: species.is_baby,
            is_legendary: species.is_legendary,
            nat_pokedex_entry: species.nat_pokedex_entry,
            pokemon_id,
            hp_base_stat,
            attack_base_stat,
            defense_base_stat,
            special_attack_base_stat,
            special_defense_base_stat,
            speed_base_stat,
            type_1,
            type_2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species_fixture() -> SpeciesRow {
        SpeciesRow {
            species_id: 25,
            name: "pikachu".to_string(),
            color: "yellow".to_string(),
            habitat: Some("forest".to_string()),
            generation: "generation-i".to_string(),
            previous_evolution: Some("pichu".to_string()),
            is_mythical: false,
            is_baby: false,
            is_legendary: false,
            nat_pokedex_entry: Some(25),
        }
    }

    #[test]
    fn test_from_parts_with_pokemon() {
        let pokemon = PokemonRow {
            pokemon_id: 25,
            name: "pikachu".to_string(),
            hp_base_stat: Some(35),
            attack_base_stat: Some(55),
            defense_base_stat: Some(40),
            special_attack_base_stat: Some(50),
            special_defense_base_stat: Some(50),
            speed_base_stat: Some(90),
            type_1: Some("electric".to_string()),
            type_2: None,
        };

        let row = CombinedRow::from_parts(species_fixture(), Some(pokemon));
        assert_eq!(row.species_id, 25);
        assert_eq!(row.pokemon_id, Some(25));
        assert_eq!(row.speed_base_stat, Some(90));
        assert_eq!(row.type_1.as_deref(), Some("electric"));
        assert_eq!(row.type_2, None);
    }

    #[test]
    fn test_from_parts_without_pokemon() {
        let row = CombinedRow::from_parts(species_fixture(), None);
        assert_eq!(row.species_id, 25);
        assert_eq!(row.name, "pikachu");
        assert_eq!(row.pokemon_id, None);
        assert_eq!(row.hp_base_stat, None);
        assert_eq!(row.type_1, None);
    }

    #[test]
    fn test_combined_row_serde_round_trip() {
        let row = CombinedRow::from_parts(species_fixture(), None);
        let json = serde_json::to_string(&row).unwrap();
        let back: CombinedRow = serde_json::from_str(&json).unwrap();
        assert_eq!(row, back);
    }
}
