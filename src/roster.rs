//! Static roster data and the optional external pokedex.
//!
//! The built-in roster is authored in `data/roster.ron`, validated and encoded
//! with postcard by the build script, and decoded here exactly once.

use crate::errors::{RosterError, RosterResult};
use crate::pokemon::PokemonInst;
use rand::Rng;
use schema::{MoveData, PokemonType, RosterData, SpeciesData, MOVES_PER_POKEMON};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

// Generated by build.rs: ROSTER_BYTES and ROSTER_INDEX.
include!(concat!(env!("OUT_DIR"), "/roster_data.rs"));

static BUILTIN_ROSTER: LazyLock<Result<Vec<SpeciesData>, String>> = LazyLock::new(|| {
    postcard::from_bytes::<RosterData>(ROSTER_BYTES)
        .map(|roster| roster.species)
        .map_err(|e| e.to_string())
});

fn builtin_species() -> RosterResult<&'static [SpeciesData]> {
    BUILTIN_ROSTER
        .as_ref()
        .map(|species| species.as_slice())
        .map_err(|e| RosterError::MalformedData(e.clone()))
}

/// Look up a built-in species by name (case-insensitive).
pub fn get_species_data(name: &str) -> RosterResult<SpeciesData> {
    let index = ROSTER_INDEX
        .get(name.to_ascii_lowercase().as_str())
        .copied()
        .ok_or_else(|| RosterError::SpeciesNotFound(name.to_string()))?;
    builtin_species()?
        .get(index)
        .cloned()
        .ok_or(RosterError::InvalidIndex(index))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    BuiltIn,
    Pokedex(PathBuf),
}

/// An immutable list of species a battle can draw from.
#[derive(Debug, Clone)]
pub struct Roster {
    species: Vec<SpeciesData>,
    source: RosterSource,
}

impl Roster {
    /// The roster compiled into the binary.
    pub fn builtin() -> RosterResult<Self> {
        Ok(Self {
            species: builtin_species()?.to_vec(),
            source: RosterSource::BuiltIn,
        })
    }

    /// Load a roster from a JSON pokedex file.
    pub fn from_pokedex_file(path: &Path) -> RosterResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let species = parse_pokedex(&content)?;
        Ok(Self {
            species,
            source: RosterSource::Pokedex(path.to_path_buf()),
        })
    }

    /// Use the pokedex at `path` when it loads and holds at least `min_species`
    /// entries, otherwise fall back to the built-in roster.
    pub fn load(path: Option<&Path>, min_species: usize) -> RosterResult<Self> {
        if let Some(path) = path {
            match Self::from_pokedex_file(path) {
                Ok(roster) if roster.len() >= min_species => {
                    log::info!(
                        "Loaded {} species from pokedex {}",
                        roster.len(),
                        path.display()
                    );
                    return Ok(roster);
                }
                Ok(roster) => log::warn!(
                    "Pokedex {} has only {} species ({} needed), using built-in roster",
                    path.display(),
                    roster.len(),
                    min_species
                ),
                Err(e) => log::warn!("{}, using built-in roster", e),
            }
        }

        let roster = Self::builtin()?;
        if roster.len() < min_species {
            return Err(RosterError::TooFewSpecies {
                available: roster.len(),
                needed: min_species,
            });
        }
        Ok(roster)
    }

    pub fn from_species(species: Vec<SpeciesData>) -> Self {
        Self {
            species,
            source: RosterSource::BuiltIn,
        }
    }

    pub fn source(&self) -> &RosterSource {
        &self.source
    }

    pub fn species(&self) -> &[SpeciesData] {
        &self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn get(&self, index: usize) -> RosterResult<&SpeciesData> {
        self.species.get(index).ok_or(RosterError::InvalidIndex(index))
    }

    /// Find a species by name, ignoring case.
    pub fn find(&self, name: &str) -> RosterResult<&SpeciesData> {
        self.species
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RosterError::SpeciesNotFound(name.to_string()))
    }

    /// Create a fresh, full-HP combatant from the species at `index`.
    pub fn instantiate(&self, index: usize) -> RosterResult<PokemonInst> {
        self.get(index).map(PokemonInst::from_species)
    }

    /// Draw `count` distinct roster indices.
    pub fn draw<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> RosterResult<Vec<usize>> {
        if count > self.len() {
            return Err(RosterError::TooFewSpecies {
                available: self.len(),
                needed: count,
            });
        }
        Ok(rand::seq::index::sample(rng, self.len(), count).into_vec())
    }

    /// Draw `count` distinct indices, avoiding `exclude` while enough other
    /// species remain.
    pub fn draw_excluding<R: Rng + ?Sized>(
        &self,
        exclude: &[usize],
        count: usize,
        rng: &mut R,
    ) -> RosterResult<Vec<usize>> {
        let candidates: Vec<usize> = (0..self.len()).filter(|i| !exclude.contains(i)).collect();
        if candidates.len() < count {
            return self.draw(count, rng);
        }
        Ok(rand::seq::index::sample(rng, candidates.len(), count)
            .into_iter()
            .map(|i| candidates[i])
            .collect())
    }
}

// --- External pokedex (JSON) ---

#[derive(Deserialize)]
struct PokedexFile {
    pokemon: Vec<serde_json::Value>,
}

fn default_name() -> String {
    "Unknown".to_string()
}

fn default_move_name() -> String {
    "Tackle".to_string()
}

fn default_type() -> String {
    "Normal".to_string()
}

fn default_hp() -> u16 {
    60
}

fn default_power() -> u16 {
    10
}

fn default_accuracy() -> u8 {
    100
}

#[derive(Deserialize)]
struct PokedexEntry {
    #[serde(default = "default_name")]
    name: String,
    #[serde(rename = "type", default = "default_type")]
    type_name: String,
    #[serde(default = "default_hp")]
    hp: u16,
    #[serde(default)]
    moves: Vec<PokedexMove>,
}

#[derive(Deserialize)]
struct PokedexMove {
    #[serde(default = "default_move_name")]
    name: String,
    #[serde(rename = "type", default = "default_type")]
    type_name: String,
    #[serde(default = "default_power")]
    power: u16,
    #[serde(default = "default_accuracy")]
    accuracy: u8,
}

impl PokedexEntry {
    fn into_species(self) -> Result<SpeciesData, String> {
        if self.hp == 0 {
            return Err(format!("{} has zero HP", self.name));
        }
        let pokemon_type: PokemonType = self
            .type_name
            .parse()
            .map_err(|e| format!("{}: {}", self.name, e))?;

        let mut moves = Vec::with_capacity(MOVES_PER_POKEMON);
        for m in self.moves {
            let move_type: PokemonType = m
                .type_name
                .parse()
                .map_err(|e| format!("{}: {}", self.name, e))?;
            moves.push(MoveData::new(&m.name, move_type, m.power, m.accuracy.clamp(1, 100)));
        }
        while moves.len() < MOVES_PER_POKEMON {
            moves.push(MoveData::tackle());
        }
        moves.truncate(MOVES_PER_POKEMON);

        Ok(SpeciesData {
            name: self.name,
            pokemon_type,
            max_hp: self.hp,
            moves,
        })
    }
}

/// Parse a pokedex document. Malformed entries are skipped with a warning;
/// a document with no usable entries is an error.
pub fn parse_pokedex(json: &str) -> RosterResult<Vec<SpeciesData>> {
    let file: PokedexFile =
        serde_json::from_str(json).map_err(|e| RosterError::MalformedData(e.to_string()))?;

    let species: Vec<SpeciesData> = file
        .pokemon
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let parsed = serde_json::from_value::<PokedexEntry>(value)
                .map_err(|e| e.to_string())
                .and_then(PokedexEntry::into_species);
            match parsed {
                Ok(species) => Some(species),
                Err(e) => {
                    log::warn!("Skipping pokedex entry {}: {}", i, e);
                    None
                }
            }
        })
        .collect();

    if species.is_empty() {
        return Err(RosterError::MalformedData(
            "pokedex has no usable entries".to_string(),
        ));
    }
    Ok(species)
}
