//! Transform phase
//!
//! Loads the staged artifacts back into memory, flattens each side into its
//! row model with null-safe nested lookups, and joins them into the combined
//! table. All functions here are filesystem-and-CPU only; the network never
//! appears past extraction.

pub mod pokemon;
pub mod reconcile;
pub mod species;

pub use pokemon::{normalize_pokemon, transform_pokemon};
pub use reconcile::reconcile;
pub use species::{normalize_species, transform_species};
