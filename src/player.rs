use crate::pokemon::PokemonInst;
use serde::{Deserialize, Serialize};

/// Largest party a single player can bring.
pub const MAX_TEAM_SIZE: usize = 6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    // The index refers to the move's position in the active Pokémon's move list.
    UseMove { move_index: usize },

    // The index refers to the Pokémon's position in the player's team.
    SwitchPokemon { team_index: usize },

    UsePotion,

    Forfeit,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattlePlayer {
    // A unique identifier, e.g. "player" or "npc_rival".
    pub player_id: String,
    pub player_name: String,

    // The player's party, at most MAX_TEAM_SIZE Pokémon.
    pub team: Vec<PokemonInst>,

    // The index in `team` of the Pokémon that is currently active.
    pub active_pokemon_index: usize,

    pub potions: u8,
}

impl BattlePlayer {
    /// Create a new BattlePlayer. Teams larger than MAX_TEAM_SIZE are truncated.
    pub fn new(player_id: String, player_name: String, mut team: Vec<PokemonInst>) -> Self {
        team.truncate(MAX_TEAM_SIZE);
        BattlePlayer {
            player_id,
            player_name,
            team,
            active_pokemon_index: 0,
            potions: 0,
        }
    }

    pub fn with_potions(mut self, potions: u8) -> Self {
        self.potions = potions;
        self
    }

    /// Get the currently active Pokemon
    pub fn active_pokemon(&self) -> Option<&PokemonInst> {
        self.team.get(self.active_pokemon_index)
    }

    /// Get the currently active Pokemon mutably
    pub fn active_pokemon_mut(&mut self) -> Option<&mut PokemonInst> {
        self.team.get_mut(self.active_pokemon_index)
    }

    /// True when the active Pokemon exists and can still fight.
    pub fn has_active_standing(&self) -> bool {
        self.active_pokemon().is_some_and(|p| !p.is_fainted())
    }

    /// Check if a player has any non-fainted Pokemon in their team
    pub fn has_non_fainted_pokemon(&self) -> bool {
        self.team.iter().any(|p| !p.is_fainted())
    }

    /// Benched Pokemon that can be switched in.
    pub fn get_valid_switches(&self) -> Vec<PlayerAction> {
        self.team
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != self.active_pokemon_index && !p.is_fainted())
            .map(|(team_index, _)| PlayerAction::SwitchPokemon { team_index })
            .collect()
    }

    /// One UseMove action per move of the active Pokemon, or none if it cannot act.
    pub fn get_valid_moves(&self) -> Vec<PlayerAction> {
        match self.active_pokemon() {
            Some(pokemon) if !pokemon.is_fainted() => (0..pokemon.moves.len())
                .map(|move_index| PlayerAction::UseMove { move_index })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn fainted_count(&self) -> usize {
        self.team.iter().filter(|p| p.is_fainted()).count()
    }
}
