use crate::battle::calculators::{
    calculate_attack_outcome, calculate_burn_tick, calculate_potion_use,
};
use crate::battle::commands::{execute_command_batch, BattleCommand, PlayerTarget};
use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState, TurnRng};
use crate::errors::ActionError;
use crate::player::PlayerAction;

/// True if `player_index` owes a forced replacement in the current state.
pub fn needs_replacement(battle_state: &BattleState, player_index: usize) -> bool {
    match battle_state.game_state {
        GameState::WaitingForPlayer1Replacement => player_index == 0,
        GameState::WaitingForPlayer2Replacement => player_index == 1,
        GameState::WaitingForBothReplacements => true,
        _ => false,
    }
}

/// Validates a player action against the current battle state.
/// Never mutates the state.
pub fn validate_player_action(
    battle_state: &BattleState,
    player_index: usize,
    action: &PlayerAction,
) -> Result<(), ActionError> {
    if player_index >= 2 {
        return Err(ActionError::InvalidPlayerIndex(player_index));
    }
    if battle_state.game_state.is_terminal() {
        return Err(ActionError::InvalidAction("the battle is over".to_string()));
    }

    if battle_state.game_state.is_replacement_phase() {
        if !needs_replacement(battle_state, player_index) {
            return Err(ActionError::InvalidAction(
                "waiting for the other player to send out a Pokemon".to_string(),
            ));
        }
        if !matches!(action, PlayerAction::SwitchPokemon { .. }) {
            return Err(ActionError::InvalidAction(
                "a fainted Pokemon must be replaced first".to_string(),
            ));
        }
    } else if battle_state.game_state != GameState::WaitingForActions {
        return Err(ActionError::InvalidAction(format!(
            "cannot act while the battle is in state {:?}",
            battle_state.game_state
        )));
    }

    let player = &battle_state.players[player_index];

    match action {
        PlayerAction::UseMove { move_index } => {
            let pokemon = player
                .active_pokemon()
                .filter(|p| !p.is_fainted())
                .ok_or_else(|| ActionError::InvalidAction("no Pokemon able to fight".to_string()))?;
            if *move_index >= pokemon.moves.len() {
                return Err(ActionError::InvalidMoveIndex(*move_index));
            }
        }
        PlayerAction::SwitchPokemon { team_index } => {
            let target = player
                .team
                .get(*team_index)
                .ok_or(ActionError::InvalidPokemonIndex(*team_index))?;
            if target.is_fainted() || *team_index == player.active_pokemon_index {
                return Err(ActionError::InvalidPokemonIndex(*team_index));
            }
        }
        PlayerAction::UsePotion => {
            if player.potions == 0 {
                return Err(ActionError::NoPotionsRemaining);
            }
            if !player.has_active_standing() {
                return Err(ActionError::InvalidAction(
                    "a fainted Pokemon cannot be healed".to_string(),
                ));
            }
        }
        PlayerAction::Forfeit => {}
    }

    Ok(())
}

/// Every action `player_index` could legally submit right now.
pub fn get_valid_actions(battle_state: &BattleState, player_index: usize) -> Vec<PlayerAction> {
    let player = &battle_state.players[player_index];

    if needs_replacement(battle_state, player_index) {
        return player.get_valid_switches();
    }
    if battle_state.game_state != GameState::WaitingForActions {
        return Vec::new();
    }

    let mut actions = player.get_valid_moves();
    actions.extend(player.get_valid_switches());
    if player.potions > 0 && player.has_active_standing() {
        actions.push(PlayerAction::UsePotion);
    }
    actions.push(PlayerAction::Forfeit);
    actions
}

/// Check if battle is ready for turn resolution (all required actions queued)
pub fn ready_for_turn_resolution(battle_state: &BattleState) -> bool {
    match battle_state.game_state {
        GameState::WaitingForActions | GameState::WaitingForBothReplacements => {
            battle_state.action_queue[0].is_some() && battle_state.action_queue[1].is_some()
        }
        GameState::WaitingForPlayer1Replacement => battle_state.action_queue[0].is_some(),
        GameState::WaitingForPlayer2Replacement => battle_state.action_queue[1].is_some(),
        _ => false,
    }
}

/// Main entry point for turn resolution.
/// Takes a battle state and RNG oracle, executes one complete turn (or one
/// forced replacement) and returns every event that occurred.
pub fn resolve_turn(battle_state: &mut BattleState, mut rng: TurnRng) -> EventBus {
    let mut bus = EventBus::new();

    if !ready_for_turn_resolution(battle_state) {
        log::warn!(
            "resolve_turn called in state {:?} without the required actions queued",
            battle_state.game_state
        );
        return bus;
    }

    if battle_state.game_state.is_replacement_phase() {
        resolve_replacement_phase(battle_state, &mut bus);
        return bus;
    }

    initialize_turn(battle_state, &mut bus);

    // Player 1 always acts first.
    for player_index in 0..2 {
        if battle_state.game_state != GameState::TurnInProgress {
            break;
        }
        if !battle_state.players.iter().all(|p| p.has_active_standing()) {
            log::debug!("Player {} does not act: an active Pokemon is down", player_index + 1);
            break;
        }
        if let Some(action) = battle_state.action_queue[player_index].clone() {
            execute_player_action(player_index, action, battle_state, &mut bus, &mut rng);
        }
    }

    finalize_turn(battle_state, &mut bus);
    bus
}

fn apply(commands: Vec<BattleCommand>, battle_state: &mut BattleState, bus: &mut EventBus) {
    if let Err(err) = execute_command_batch(commands, battle_state, bus) {
        log::error!("Battle command failed: {}", err);
    }
}

fn initialize_turn(battle_state: &mut BattleState, bus: &mut EventBus) {
    apply(
        vec![BattleCommand::SetGameState(GameState::TurnInProgress)],
        battle_state,
        bus,
    );
    bus.push(BattleEvent::TurnStarted {
        turn_number: battle_state.turn_number,
    });
}

fn execute_player_action(
    player_index: usize,
    action: PlayerAction,
    battle_state: &mut BattleState,
    bus: &mut EventBus,
    rng: &mut TurnRng,
) {
    log::debug!("Player {} action: {:?}", player_index + 1, action);

    match action {
        PlayerAction::UseMove { move_index } => {
            let burn = calculate_burn_tick(battle_state, player_index);
            apply(burn, battle_state, bus);
            if !battle_state.players[player_index].has_active_standing() {
                return;
            }
            let commands = calculate_attack_outcome(battle_state, player_index, move_index, rng);
            apply(commands, battle_state, bus);
        }
        PlayerAction::SwitchPokemon { team_index } => {
            execute_switch(player_index, team_index, battle_state, bus);
        }
        PlayerAction::UsePotion => {
            let commands =
                calculate_potion_use(battle_state, player_index, battle_state.potion_heal);
            apply(commands, battle_state, bus);
        }
        PlayerAction::Forfeit => {
            execute_forfeit(player_index, battle_state, bus);
        }
    }
}

/// Execute forfeit action - player loses immediately
fn execute_forfeit(player_index: usize, battle_state: &mut BattleState, bus: &mut EventBus) {
    let winner = PlayerTarget::from_index(player_index).opponent().to_index();
    let new_state = if winner == 0 {
        GameState::Player1Win
    } else {
        GameState::Player2Win
    };
    apply(
        vec![
            BattleCommand::EmitEvent(BattleEvent::PlayerForfeited { player_index }),
            BattleCommand::SetGameState(new_state),
            BattleCommand::EmitEvent(BattleEvent::BattleEnded {
                winner: Some(winner),
            }),
        ],
        battle_state,
        bus,
    );
}

fn execute_switch(
    player_index: usize,
    team_index: usize,
    battle_state: &mut BattleState,
    bus: &mut EventBus,
) {
    let player = &battle_state.players[player_index];
    let (Some(old), Some(new)) = (player.active_pokemon(), player.team.get(team_index)) else {
        log::warn!("Player {} tried to switch to missing slot {}", player_index + 1, team_index);
        return;
    };
    let event = BattleEvent::PokemonSwitched {
        player_index,
        old_pokemon: old.name.clone(),
        new_pokemon: new.name.clone(),
    };
    apply(
        vec![
            BattleCommand::SwitchPokemon {
                target: PlayerTarget::from_index(player_index),
                new_pokemon_index: team_index,
            },
            BattleCommand::EmitEvent(event),
        ],
        battle_state,
        bus,
    );
}

/// Handle forced replacement phase without turn progression
fn resolve_replacement_phase(battle_state: &mut BattleState, bus: &mut EventBus) {
    for player_index in 0..2 {
        if !needs_replacement(battle_state, player_index) {
            continue;
        }
        if let Some(PlayerAction::SwitchPokemon { team_index }) =
            battle_state.action_queue[player_index].clone()
        {
            execute_switch(player_index, team_index, battle_state, bus);
        }
    }

    check_win_conditions(battle_state, bus);

    let mut commands = Vec::new();
    if !battle_state.game_state.is_terminal() {
        commands.push(BattleCommand::SetGameState(GameState::WaitingForActions));
    }
    commands.push(BattleCommand::ClearActionQueue);
    apply(commands, battle_state, bus);
}

fn finalize_turn(battle_state: &mut BattleState, bus: &mut EventBus) {
    // Win conditions override everything else.
    check_win_conditions(battle_state, bus);

    if battle_state.game_state == GameState::TurnInProgress {
        apply(
            vec![
                BattleCommand::IncrementTurnNumber,
                BattleCommand::SetGameState(GameState::WaitingForActions),
            ],
            battle_state,
            bus,
        );
        check_for_pending_replacements(battle_state, bus);
    }

    apply(vec![BattleCommand::ClearActionQueue], battle_state, bus);
    bus.push(BattleEvent::TurnEnded);
}

/// At the end of the turn, checks if any active Pokemon have fainted and if
/// replacements are needed.
fn check_for_pending_replacements(battle_state: &mut BattleState, bus: &mut EventBus) {
    if battle_state.game_state.is_terminal() {
        return;
    }

    let needs = |index: usize| {
        let player = &battle_state.players[index];
        !player.has_active_standing() && player.has_non_fainted_pokemon()
    };

    let new_game_state = match (needs(0), needs(1)) {
        (true, true) => Some(GameState::WaitingForBothReplacements),
        (true, false) => Some(GameState::WaitingForPlayer1Replacement),
        (false, true) => Some(GameState::WaitingForPlayer2Replacement),
        (false, false) => None,
    };

    if let Some(state) = new_game_state {
        apply(vec![BattleCommand::SetGameState(state)], battle_state, bus);
    }
}

/// Check win conditions and update battle state accordingly.
/// When neither side has a Pokemon left standing the battle is a draw.
fn check_win_conditions(battle_state: &mut BattleState, bus: &mut EventBus) {
    if battle_state.game_state.is_terminal() {
        return;
    }

    let player1_has_pokemon = battle_state.players[0].has_non_fainted_pokemon();
    let player2_has_pokemon = battle_state.players[1].has_non_fainted_pokemon();

    let commands = match (player1_has_pokemon, player2_has_pokemon) {
        (false, false) => vec![
            BattleCommand::SetGameState(GameState::Draw),
            BattleCommand::EmitEvent(BattleEvent::BattleEnded { winner: None }),
        ],
        (false, true) => vec![
            BattleCommand::SetGameState(GameState::Player2Win),
            BattleCommand::EmitEvent(BattleEvent::PlayerDefeated { player_index: 0 }),
            BattleCommand::EmitEvent(BattleEvent::BattleEnded { winner: Some(1) }),
        ],
        (true, false) => vec![
            BattleCommand::SetGameState(GameState::Player1Win),
            BattleCommand::EmitEvent(BattleEvent::PlayerDefeated { player_index: 1 }),
            BattleCommand::EmitEvent(BattleEvent::BattleEnded { winner: Some(0) }),
        ],
        (true, true) => return,
    };

    log::debug!("Battle {} decided: {:?}", battle_state.battle_id, commands[0]);
    apply(commands, battle_state, bus);
}
