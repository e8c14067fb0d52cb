use crate::PokemonType;
use serde::{Deserialize, Serialize};

/// Every Pokemon in a duel knows exactly this many moves.
pub const MOVES_PER_POKEMON: usize = 3;

fn default_accuracy() -> u8 {
    100
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: PokemonType,
    pub power: u16,
    /// Hit chance in percent (1..=100).
    #[serde(default = "default_accuracy")]
    pub accuracy: u8,
}

impl MoveData {
    pub fn new(name: &str, move_type: PokemonType, power: u16, accuracy: u8) -> Self {
        Self {
            name: name.to_string(),
            move_type,
            power,
            accuracy,
        }
    }

    /// The filler move used to pad incomplete movesets.
    pub fn tackle() -> Self {
        Self::new("Tackle", PokemonType::Normal, 10, 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub name: String,
    pub pokemon_type: PokemonType,
    pub max_hp: u16,
    pub moves: Vec<MoveData>,
}

/// The full roster file as authored in `data/roster.ron`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterData {
    pub species: Vec<SpeciesData>,
}

impl RosterData {
    /// Checks the invariants the battle engine relies on, returning a description
    /// of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.species.is_empty() {
            return Err("roster has no species".to_string());
        }
        for species in &self.species {
            if species.max_hp == 0 {
                return Err(format!("{} has zero max HP", species.name));
            }
            if species.moves.len() != MOVES_PER_POKEMON {
                return Err(format!(
                    "{} has {} moves, expected {}",
                    species.name,
                    species.moves.len(),
                    MOVES_PER_POKEMON
                ));
            }
            for move_data in &species.moves {
                if move_data.accuracy == 0 || move_data.accuracy > 100 {
                    return Err(format!(
                        "{}'s {} has accuracy {} outside 1..=100",
                        species.name, move_data.name, move_data.accuracy
                    ));
                }
            }
        }
        Ok(())
    }
}
