use crate::battle::ai::Behavior;
use crate::battle::engine::{ready_for_turn_resolution, resolve_turn, validate_player_action};
use crate::battle::state::{BattleEvent, BattleOutcome, BattleState, GameState, TurnRng};
use crate::errors::ActionError;
use crate::player::{BattlePlayer, PlayerAction};
use rand::rngs::StdRng;
use schema::PokemonType;
use thiserror::Error;

/// High-level battle management interface that hides turn resolution details.
/// Human players submit actions; players with an attached `Behavior` are
/// driven automatically.
#[derive(Debug)]
pub struct BattleRunner {
    battle_state: BattleState,
    rng: StdRng,
    npc_behaviors: [Option<Box<dyn Behavior>>; 2],
    accumulated_events: Vec<BattleEvent>,
}

/// Information about the current battle state for display
#[derive(Debug, Clone)]
pub struct BattleInfo {
    pub battle_id: String,
    pub turn_number: u32,
    pub game_state: GameState,
    pub players: Vec<PlayerInfo>,
}

#[derive(Debug, Clone)]
pub struct PlayerInfo {
    pub player_id: String,
    pub player_name: String,
    pub active_pokemon: Option<PokemonInfo>,
    pub team: Vec<PokemonInfo>,
    pub fainted_count: usize,
    pub potions: u8,
}

#[derive(Debug, Clone)]
pub struct PokemonInfo {
    pub name: String,
    pub pokemon_type: PokemonType,
    pub current_hp: u16,
    pub max_hp: u16,
    pub is_fainted: bool,
    pub is_burned: bool,
}

/// Result of executing a battle turn or forced replacement
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub events: Vec<BattleEvent>,
    pub new_game_state: GameState,
    pub battle_ended: bool,
    pub winner: Option<usize>,
    pub outcome: BattleOutcome,
}

/// Errors that can occur when using the battle runner
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleRunnerError {
    #[error("Invalid player index: {0}")]
    InvalidPlayerIndex(usize),
    #[error("Player index {0} already submitted an action")]
    PlayerAlreadySubmitted(usize),
    #[error("Game is not currently accepting actions")]
    GameNotAcceptingActions,
    #[error("Invalid player action: {0}")]
    InvalidAction(#[from] ActionError),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl BattleRunner {
    pub fn new(
        battle_id: String,
        player1: BattlePlayer,
        player2: BattlePlayer,
        rng: StdRng,
    ) -> Self {
        Self {
            battle_state: BattleState::new(battle_id, player1, player2),
            rng,
            npc_behaviors: [None, None],
            accumulated_events: Vec::new(),
        }
    }

    pub fn with_potion_heal(mut self, potion_heal: u16) -> Self {
        self.battle_state.potion_heal = potion_heal;
        self
    }

    /// Let `behavior` pick every action for `player_index`.
    pub fn with_npc(mut self, player_index: usize, behavior: Box<dyn Behavior>) -> Self {
        if let Some(slot) = self.npc_behaviors.get_mut(player_index) {
            *slot = Some(behavior);
        }
        self
    }

    pub fn battle_state(&self) -> &BattleState {
        &self.battle_state
    }

    pub fn is_npc(&self, player_index: usize) -> bool {
        self.npc_behaviors
            .get(player_index)
            .is_some_and(|b| b.is_some())
    }

    pub fn get_battle_info(&self) -> BattleInfo {
        let players = self
            .battle_state
            .players
            .iter()
            .map(|player| {
                let team: Vec<PokemonInfo> = player
                    .team
                    .iter()
                    .map(|p| PokemonInfo {
                        name: p.name.clone(),
                        pokemon_type: p.pokemon_type,
                        current_hp: p.current_hp(),
                        max_hp: p.max_hp(),
                        is_fainted: p.is_fainted(),
                        is_burned: p.is_burned(),
                    })
                    .collect();
                PlayerInfo {
                    player_id: player.player_id.clone(),
                    player_name: player.player_name.clone(),
                    active_pokemon: team.get(player.active_pokemon_index).cloned(),
                    fainted_count: player.fainted_count(),
                    potions: player.potions,
                    team,
                }
            })
            .collect();

        BattleInfo {
            battle_id: self.battle_state.battle_id.clone(),
            turn_number: self.battle_state.turn_number,
            game_state: self.battle_state.game_state,
            players,
        }
    }

    pub fn is_battle_ended(&self) -> bool {
        self.battle_state.is_ended()
    }

    pub fn get_winner(&self) -> Option<usize> {
        self.battle_state.winner()
    }

    pub fn outcome(&self) -> BattleOutcome {
        self.battle_state.outcome()
    }

    pub fn get_game_state(&self) -> GameState {
        self.battle_state.game_state
    }

    pub fn get_turn_number(&self) -> u32 {
        self.battle_state.turn_number
    }

    /// Submit an action for a player.
    /// NPC actions are filled in and the turn executes as soon as every
    /// required action is available.
    pub fn submit_action(
        &mut self,
        player_index: usize,
        action: PlayerAction,
    ) -> Result<Option<ExecutionResult>, BattleRunnerError> {
        if player_index >= 2 {
            return Err(BattleRunnerError::InvalidPlayerIndex(player_index));
        }
        if self.is_battle_ended() {
            return Err(BattleRunnerError::GameNotAcceptingActions);
        }
        if self.battle_state.action_queue[player_index].is_some() {
            return Err(BattleRunnerError::PlayerAlreadySubmitted(player_index));
        }

        validate_player_action(&self.battle_state, player_index, &action)?;
        self.battle_state.action_queue[player_index] = Some(action);

        self.auto_execute_if_ready()
    }

    /// Which players still owe an action in the current state.
    pub fn players_needing_actions(&self) -> Vec<usize> {
        let required: &[usize] = match self.battle_state.game_state {
            GameState::WaitingForActions | GameState::WaitingForBothReplacements => &[0, 1],
            GameState::WaitingForPlayer1Replacement => &[0],
            GameState::WaitingForPlayer2Replacement => &[1],
            _ => &[],
        };
        required
            .iter()
            .copied()
            .filter(|&i| self.battle_state.action_queue[i].is_none())
            .collect()
    }

    /// Generate actions for NPCs and execute if all actions are available.
    pub fn auto_execute_if_ready(&mut self) -> Result<Option<ExecutionResult>, BattleRunnerError> {
        self.collect_npc_actions()?;
        if ready_for_turn_resolution(&self.battle_state) {
            Ok(Some(self.execute_internal()))
        } else {
            Ok(None)
        }
    }

    /// Execute both player actions immediately, ignoring any NPC behaviors.
    pub fn execute_single_turn(
        &mut self,
        player1_action: PlayerAction,
        player2_action: PlayerAction,
    ) -> Result<ExecutionResult, BattleRunnerError> {
        if self.is_battle_ended() {
            return Err(BattleRunnerError::GameNotAcceptingActions);
        }
        validate_player_action(&self.battle_state, 0, &player1_action)?;
        validate_player_action(&self.battle_state, 1, &player2_action)?;
        self.battle_state.action_queue = [Some(player1_action), Some(player2_action)];

        if !ready_for_turn_resolution(&self.battle_state) {
            return Err(BattleRunnerError::InternalError(
                "Expected execution after submitting both actions".to_string(),
            ));
        }
        Ok(self.execute_internal())
    }

    /// Play NPC against NPC until the battle ends or `max_turns` is reached.
    pub fn run_to_completion(
        &mut self,
        max_turns: u32,
    ) -> Result<BattleOutcome, BattleRunnerError> {
        while !self.is_battle_ended() && self.battle_state.turn_number <= max_turns {
            if self.auto_execute_if_ready()?.is_none() {
                return Err(BattleRunnerError::InternalError(format!(
                    "players {:?} have no behavior attached",
                    self.players_needing_actions()
                )));
            }
        }
        Ok(self.outcome())
    }

    pub fn get_all_events(&self) -> &[BattleEvent] {
        &self.accumulated_events
    }

    pub fn get_events_since(&self, index: usize) -> &[BattleEvent] {
        self.accumulated_events.get(index..).unwrap_or(&[])
    }

    /// Render events as battle log lines against the current state.
    pub fn format_events(&self, events: &[BattleEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| event.format(&self.battle_state))
            .collect()
    }

    fn collect_npc_actions(&mut self) -> Result<(), BattleRunnerError> {
        for player_index in self.players_needing_actions() {
            let Some(behavior) = self.npc_behaviors[player_index].as_ref() else {
                continue;
            };
            let mut rng = TurnRng::from_rng(&mut self.rng);
            let action = behavior.decide_action(player_index, &self.battle_state, &mut rng);
            log::debug!("NPC player {} chose {:?}", player_index + 1, action);
            validate_player_action(&self.battle_state, player_index, &action).map_err(|e| {
                BattleRunnerError::InternalError(format!("NPC chose an invalid action: {}", e))
            })?;
            self.battle_state.action_queue[player_index] = Some(action);
        }
        Ok(())
    }

    fn execute_internal(&mut self) -> ExecutionResult {
        let rng = TurnRng::from_rng(&mut self.rng);
        let events = resolve_turn(&mut self.battle_state, rng).into_events();
        self.accumulated_events.extend(events.iter().cloned());

        ExecutionResult {
            events,
            new_game_state: self.battle_state.game_state,
            battle_ended: self.is_battle_ended(),
            winner: self.get_winner(),
            outcome: self.outcome(),
        }
    }
}
