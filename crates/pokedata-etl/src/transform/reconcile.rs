//! Reconciliation of the species and pokemon sides

use pokedata_common::{CombinedRow, PokemonRow, SpeciesRow};
use std::collections::HashMap;
use tracing::info;

/// Right outer join of pokemon onto species, keyed on
/// `pokemon_id = species_id`.
///
/// The species side drives cardinality: every species yields exactly one
/// output row (pokemon columns all `None` when unmatched), and pokemon
/// without a matching species are dropped. Species input order is preserved.
pub fn reconcile(species_rows: Vec<SpeciesRow>, pokemon_rows: Vec<PokemonRow>) -> Vec<CombinedRow> {
    let mut pokemon_by_id: HashMap<i64, PokemonRow> = pokemon_rows
        .into_iter()
        .map(|row| (row.pokemon_id, row))
        .collect();

    let combined: Vec<CombinedRow> = species_rows
        .into_iter()
        .map(|species| {
            let matched = pokemon_by_id.remove(&species.species_id);
            CombinedRow::from_parts(species, matched)
        })
        .collect();

    info!(
        phase = "transform",
        rows = combined.len(),
        unmatched_pokemon = pokemon_by_id.len(),
        "reconciled species and pokemon"
    );

    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(id: i64) -> SpeciesRow {
        SpeciesRow {
            species_id: id,
            name: format!("species-{id}"),
            color: "green".to_string(),
            habitat: None,
            generation: "generation-i".to_string(),
            previous_evolution: None,
            is_mythical: false,
            is_baby: false,
            is_legendary: false,
            nat_pokedex_entry: Some(id),
        }
    }

    fn pokemon(id: i64) -> PokemonRow {
        PokemonRow {
            pokemon_id: id,
            name: format!("species-{id}"),
            hp_base_stat: Some(10 * id),
            attack_base_stat: None,
            defense_base_stat: None,
            special_attack_base_stat: None,
            special_defense_base_stat: None,
            speed_base_stat: None,
            type_1: Some("normal".to_string()),
            type_2: None,
        }
    }

    #[test]
    fn test_right_join_cardinality() {
        let combined = reconcile(
            vec![species(1), species(2), species(3)],
            vec![pokemon(2), pokemon(3), pokemon(4)],
        );

        // species drives: rows 1, 2, 3; pokemon 4 dropped
        assert_eq!(combined.len(), 3);
        let ids: Vec<_> = combined.iter().map(|row| row.species_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert_eq!(combined[0].pokemon_id, None);
        assert_eq!(combined[0].hp_base_stat, None);
        assert_eq!(combined[0].type_1, None);

        assert_eq!(combined[1].pokemon_id, Some(2));
        assert_eq!(combined[1].hp_base_stat, Some(20));
        assert_eq!(combined[2].pokemon_id, Some(3));
    }

    #[test]
    fn test_empty_pokemon_side_keeps_all_species() {
        let combined = reconcile(vec![species(1), species(2)], Vec::new());
        assert_eq!(combined.len(), 2);
        assert!(combined.iter().all(|row| row.pokemon_id.is_none()));
    }

    #[test]
    fn test_empty_species_side_drops_everything() {
        let combined = reconcile(Vec::new(), vec![pokemon(1)]);
        assert!(combined.is_empty());
    }

    #[test]
    fn test_species_order_preserved() {
        let combined = reconcile(
            vec![species(9), species(3), species(7)],
            vec![pokemon(3), pokemon(7), pokemon(9)],
        );
        let ids: Vec<_> = combined.iter().map(|row| row.species_id).collect();
        assert_eq!(ids, vec![9, 3, 7]);
    }
}
