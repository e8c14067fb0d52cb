use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Grass,
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Returned when a type name does not match any known type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl fmt::Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type '{}'", self.0)
    }
}

impl std::error::Error for UnknownType {}

impl FromStr for PokemonType {
    type Err = UnknownType;

    /// Type names are matched case-insensitively ("fire", "FIRE" and "Fire" are all Fire).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(PokemonType::Normal),
            "fire" => Ok(PokemonType::Fire),
            "water" => Ok(PokemonType::Water),
            "grass" => Ok(PokemonType::Grass),
            _ => Err(UnknownType(s.to_string())),
        }
    }
}

impl PokemonType {
    /// Calculate type effectiveness multiplier for attacking type vs defending type.
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective
    ///
    /// The elemental types form a cycle: Fire beats Grass, Grass beats Water,
    /// Water beats Fire. Normal and same-type matchups are neutral.
    pub fn type_effectiveness(attacking: PokemonType, defending: PokemonType) -> f32 {
        use PokemonType::*;

        match (attacking, defending) {
            (Fire, Grass) | (Grass, Water) | (Water, Fire) => 2.0,
            (Grass, Fire) | (Water, Grass) | (Fire, Water) => 0.5,
            _ => 1.0,
        }
    }
}
