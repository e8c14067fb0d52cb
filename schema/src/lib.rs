// pokemon-duel schema - shared type definitions
// This crate holds the static data types shared between the main crate and
// its build script, so the roster can be compiled into postcard bytes at
// build time and decoded with the same definitions at runtime.

pub use pokemon_types::*;
pub use species_data::*;

pub mod pokemon_types;
pub mod species_data;
