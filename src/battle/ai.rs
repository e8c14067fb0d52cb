//! A module for defining AI behaviors for battle opponents.

use crate::battle::engine::needs_replacement;
use crate::battle::state::{BattleState, TurnRng};
use crate::player::PlayerAction;
use crate::pokemon::PokemonInst;
use ordered_float::OrderedFloat;
use schema::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI difficulties or strategies.
pub trait Behavior: fmt::Debug {
    /// Pick the index of the move `attacker` should use against `defender`.
    /// Returns `None` only when the attacker has no moves at all.
    fn choose_move(
        &self,
        attacker: &PokemonInst,
        defender: &PokemonInst,
        rng: &mut TurnRng,
    ) -> Option<usize>;

    /// Inspects the battle state and decides on the next action for the given player.
    fn decide_action(
        &self,
        player_index: usize,
        battle_state: &BattleState,
        rng: &mut TurnRng,
    ) -> PlayerAction {
        let player = &battle_state.players[player_index];

        // A forced replacement can only be answered with a switch.
        if needs_replacement(battle_state, player_index) {
            return player
                .get_valid_switches()
                .into_iter()
                .next()
                .unwrap_or(PlayerAction::Forfeit);
        }

        let opponent = &battle_state.players[1 - player_index];
        match (player.active_pokemon(), opponent.active_pokemon()) {
            (Some(attacker), Some(defender)) if !attacker.is_fainted() => self
                .choose_move(attacker, defender, rng)
                .map(|move_index| PlayerAction::UseMove { move_index })
                .unwrap_or(PlayerAction::Forfeit),
            _ => PlayerAction::Forfeit,
        }
    }
}

/// Picks uniformly among the attacker's moves.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAI;

impl Behavior for RandomAI {
    fn choose_move(
        &self,
        attacker: &PokemonInst,
        _defender: &PokemonInst,
        rng: &mut TurnRng,
    ) -> Option<usize> {
        if attacker.moves.is_empty() {
            return None;
        }
        Some(rng.next_index(attacker.moves.len(), "AI Move Choice"))
    }
}

/// Prefers typed moves: every non-Normal move counts twice in the draw.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeightedAI;

impl WeightedAI {
    fn weight(move_type: PokemonType) -> usize {
        if move_type == PokemonType::Normal {
            1
        } else {
            2
        }
    }
}

impl Behavior for WeightedAI {
    fn choose_move(
        &self,
        attacker: &PokemonInst,
        _defender: &PokemonInst,
        rng: &mut TurnRng,
    ) -> Option<usize> {
        let total: usize = attacker.moves.iter().map(|m| Self::weight(m.move_type)).sum();
        if total == 0 {
            return None;
        }

        let mut ticket = rng.next_index(total, "AI Weighted Move Choice");
        for (index, move_data) in attacker.moves.iter().enumerate() {
            let weight = Self::weight(move_data.move_type);
            if ticket < weight {
                return Some(index);
            }
            ticket -= weight;
        }
        None
    }
}

/// Always takes the move with the best expected damage against the current
/// defender. Ties go to the earliest move.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyAI;

impl GreedyAI {
    fn score(attacker: &PokemonInst, defender: &PokemonInst, move_index: usize) -> f32 {
        let Some(move_data) = attacker.get_move(move_index) else {
            return 0.0;
        };
        let effectiveness =
            PokemonType::type_effectiveness(move_data.move_type, defender.pokemon_type);
        move_data.power as f32 * effectiveness * move_data.accuracy as f32 / 100.0
    }
}

impl Behavior for GreedyAI {
    fn choose_move(
        &self,
        attacker: &PokemonInst,
        defender: &PokemonInst,
        _rng: &mut TurnRng,
    ) -> Option<usize> {
        // max_by_key keeps the last maximum, so walk backwards to favour earlier moves.
        (0..attacker.moves.len())
            .rev()
            .max_by_key(|&index| OrderedFloat(Self::score(attacker, defender, index)))
    }
}

/// Selectable opponent strategies.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Random,
    Weighted,
    Greedy,
}

impl Strategy {
    pub fn behavior(self) -> Box<dyn Behavior> {
        match self {
            Strategy::Random => Box::new(RandomAI),
            Strategy::Weighted => Box::new(WeightedAI),
            Strategy::Greedy => Box::new(GreedyAI),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Random => "random",
            Strategy::Weighted => "weighted",
            Strategy::Greedy => "greedy",
        };
        f.write_str(name)
    }
}
