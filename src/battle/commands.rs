use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState};
use thiserror::Error;

/// Player target for commands - provides type safety over raw indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTarget {
    Player1,
    Player2,
}

impl PlayerTarget {
    pub fn to_index(self) -> usize {
        match self {
            PlayerTarget::Player1 => 0,
            PlayerTarget::Player2 => 1,
        }
    }

    pub fn opponent(self) -> PlayerTarget {
        match self {
            PlayerTarget::Player1 => PlayerTarget::Player2,
            PlayerTarget::Player2 => PlayerTarget::Player1,
        }
    }

    /// Any index other than 0 maps to Player2; callers validate indices first.
    pub fn from_index(index: usize) -> PlayerTarget {
        if index == 0 {
            PlayerTarget::Player1
        } else {
            PlayerTarget::Player2
        }
    }
}

/// Atomic commands representing final state changes
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Direct state changes
    SetGameState(GameState),
    IncrementTurnNumber,
    ClearActionQueue,

    // Pokemon modifications
    DealDamage { target: PlayerTarget, amount: u16 },
    HealPokemon { target: PlayerTarget, amount: u16 },
    SetBurn { target: PlayerTarget, turns: u8 },

    // Player state changes
    SpendPotion { target: PlayerTarget },
    SwitchPokemon { target: PlayerTarget, new_pokemon_index: usize },

    // Battle flow
    EmitEvent(BattleEvent),
}

/// Error types for command execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("no active Pokemon")]
    NoPokemon,
    #[error("invalid Pokemon index {0}")]
    InvalidPokemonIndex(usize),
    #[error("no potions remaining")]
    NoPotions,
}

/// Apply a single command to the battle state.
pub fn execute_command(
    command: BattleCommand,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    match command {
        BattleCommand::SetGameState(game_state) => {
            state.game_state = game_state;
        }
        BattleCommand::IncrementTurnNumber => {
            state.turn_number += 1;
        }
        BattleCommand::ClearActionQueue => {
            state.action_queue = [None, None];
        }
        BattleCommand::DealDamage { target, amount } => {
            let player_index = target.to_index();
            let pokemon = state.players[player_index]
                .active_pokemon_mut()
                .ok_or(ExecutionError::NoPokemon)?;
            if pokemon.take_damage(amount) {
                bus.push(BattleEvent::PokemonFainted {
                    player_index,
                    pokemon: pokemon.name.clone(),
                });
            }
        }
        BattleCommand::HealPokemon { target, amount } => {
            state.players[target.to_index()]
                .active_pokemon_mut()
                .ok_or(ExecutionError::NoPokemon)?
                .heal(amount);
        }
        BattleCommand::SetBurn { target, turns } => {
            state.players[target.to_index()]
                .active_pokemon_mut()
                .ok_or(ExecutionError::NoPokemon)?
                .burn_turns = turns;
        }
        BattleCommand::SpendPotion { target } => {
            let player = &mut state.players[target.to_index()];
            if player.potions == 0 {
                return Err(ExecutionError::NoPotions);
            }
            player.potions -= 1;
        }
        BattleCommand::SwitchPokemon {
            target,
            new_pokemon_index,
        } => {
            let player = &mut state.players[target.to_index()];
            if new_pokemon_index >= player.team.len() {
                return Err(ExecutionError::InvalidPokemonIndex(new_pokemon_index));
            }
            player.active_pokemon_index = new_pokemon_index;
        }
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
        }
    }
    Ok(())
}

/// Apply commands in order, stopping at the first failure.
pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    for command in commands {
        execute_command(command, state, bus)?;
    }
    Ok(())
}
