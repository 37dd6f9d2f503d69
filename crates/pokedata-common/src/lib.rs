//! Pokedata Common Library
//!
//! Shared functionality for the pokedata workspace members:
//!
//! - **Logging**: tracing bootstrap with console/file targets
//! - **Types**: the flat row model produced by the transform phase

pub mod logging;
pub mod types;

pub use types::{CombinedRow, PokemonRow, SpeciesRow};
