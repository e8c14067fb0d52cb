use crate::player::{BattlePlayer, PlayerAction};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How many rolls a randomly seeded `TurnRng` carries. A turn consumes at
/// most a dozen.
pub const TURN_RNG_OUTCOMES: usize = 100;

/// HP restored by one potion unless the battle is configured otherwise.
pub const DEFAULT_POTION_HEAL: u16 = 15;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    WaitingForActions,
    TurnInProgress,
    WaitingForPlayer1Replacement, // Player 1 needs to send out a new Pokemon after faint
    WaitingForPlayer2Replacement, // Player 2 needs to send out a new Pokemon after faint
    WaitingForBothReplacements,   // Both players need to send out new Pokemon after faints
    Player1Win,
    Player2Win,
    Draw,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameState::Player1Win | GameState::Player2Win | GameState::Draw
        )
    }

    pub fn is_replacement_phase(self) -> bool {
        matches!(
            self,
            GameState::WaitingForPlayer1Replacement
                | GameState::WaitingForPlayer2Replacement
                | GameState::WaitingForBothReplacements
        )
    }
}

/// The battle result from the human player's (player 1's) point of view.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattleOutcome {
    Ongoing,
    PlayerWin,
    OpponentWin,
    Tie,
}

impl From<GameState> for BattleOutcome {
    fn from(state: GameState) -> Self {
        match state {
            GameState::Player1Win => BattleOutcome::PlayerWin,
            GameState::Player2Win => BattleOutcome::OpponentWin,
            GameState::Draw => BattleOutcome::Tie,
            _ => BattleOutcome::Ongoing,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ActionFailureReason {
    PokemonFainted, // The acting Pokemon fainted before it could move
    NoEnemyPresent, // The target fainted before the move could land
    NoPotionsRemaining,
    InvalidAction,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded,

    // Pokemon Actions
    PokemonSwitched {
        player_index: usize,
        old_pokemon: String,
        new_pokemon: String,
    },
    MoveUsed {
        player_index: usize,
        pokemon: String,
        move_name: String,
    },
    MoveMissed {
        attacker: String,
        defender: String,
        move_name: String,
    },
    MoveHit {
        attacker: String,
        defender: String,
        move_name: String,
    },
    CriticalHit {
        attacker: String,
        defender: String,
        move_name: String,
    },
    AttackTypeEffectiveness {
        multiplier: f32,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    RecoilDamage {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    PotionUsed {
        player_index: usize,
        target: String,
        amount: u16,
        new_hp: u16,
        potions_left: u8,
    },
    PokemonFainted {
        player_index: usize,
        pokemon: String,
    },

    // Burn
    PokemonBurned {
        target: String,
    },
    BurnDamage {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    BurnHealed {
        target: String,
    },

    // Action Failures
    ActionFailed {
        reason: ActionFailureReason,
    },

    // Battle End
    PlayerForfeited {
        player_index: usize,
    },
    PlayerDefeated {
        player_index: usize,
    },
    BattleEnded {
        winner: Option<usize>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        let player_name = |index: usize| battle_state.players[index].player_name.as_str();

        match self {
            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("=== Turn {} ===", turn_number))
            }
            BattleEvent::TurnEnded => None,

            BattleEvent::PokemonSwitched {
                player_index,
                old_pokemon,
                new_pokemon,
            } => Some(format!(
                "{} recalled {} and sent out {}!",
                player_name(*player_index),
                old_pokemon,
                new_pokemon
            )),

            BattleEvent::MoveUsed {
                pokemon, move_name, ..
            } => Some(format!("{} used {}!", pokemon, move_name)),
            BattleEvent::MoveMissed { attacker, .. } => {
                Some(format!("{}'s attack missed!", attacker))
            }
            BattleEvent::MoveHit { .. } => None,
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 => Some("It's not very effective...".to_string()),
                _ => None,
            },

            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::RecoilDamage { target, damage, .. } => {
                Some(format!("{} is hit with recoil! ({} damage)", target, damage))
            }
            BattleEvent::PotionUsed {
                player_index,
                target,
                amount,
                ..
            } => Some(format!(
                "{} used a Potion! {} recovered {} HP.",
                player_name(*player_index),
                target,
                amount
            )),
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),

            BattleEvent::PokemonBurned { target } => Some(format!("{} was burned!", target)),
            BattleEvent::BurnDamage { target, damage, .. } => {
                Some(format!("{} is hurt by its burn! ({} damage)", target, damage))
            }
            BattleEvent::BurnHealed { target } => {
                Some(format!("{}'s burn wore off.", target))
            }

            BattleEvent::ActionFailed { reason } => Some(match reason {
                ActionFailureReason::PokemonFainted => "It can't move!".to_string(),
                ActionFailureReason::NoEnemyPresent => "But there was no target...".to_string(),
                ActionFailureReason::NoPotionsRemaining => "No potions left!".to_string(),
                ActionFailureReason::InvalidAction => "But it failed!".to_string(),
            }),

            BattleEvent::PlayerForfeited { player_index } => {
                Some(format!("{} forfeited the battle!", player_name(*player_index)))
            }
            BattleEvent::PlayerDefeated { player_index } => Some(format!(
                "{} is out of usable Pokémon!",
                player_name(*player_index)
            )),
            BattleEvent::BattleEnded { winner } => match winner {
                Some(index) => Some(format!("{} has won the battle!", player_name(*index))),
                None => Some("Both sides fainted! The battle ended in a draw!".to_string()),
            },
        }
    }
}

/// Event bus for collecting battle events in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Human-readable lines for every non-silent event.
    pub fn formatted_lines(&self, battle_state: &BattleState) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| event.format(battle_state))
            .collect()
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    /// Shows the debug format of all events, one per line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// The random oracle for one turn: a fixed list of percentile rolls (1..=100).
///
/// In play the rolls are drawn from a seeded generator, in tests they are
/// scripted, so any turn can be replayed exactly.
#[derive(Debug, Clone)]
pub struct TurnRng {
    outcomes: Vec<u8>,
    index: usize,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self { outcomes, index: 0 }
    }

    /// Pre-generate a turn's worth of rolls from `rng`.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let outcomes: Vec<u8> = (0..TURN_RNG_OUTCOMES)
            .map(|_| rng.random_range(1..=100))
            .collect();
        Self { outcomes, index: 0 }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        if self.index >= self.outcomes.len() {
            panic!(
                "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = self.outcomes[self.index];
        log::trace!("[RNG] Consumed {} for: {}", outcome, reason);
        self.index += 1;
        outcome
    }

    /// Map rolls onto `0..len` uniformly. Rolls above the largest multiple
    /// of `len` within 100 are discarded and redrawn.
    pub fn next_index(&mut self, len: usize, reason: &str) -> usize {
        if len <= 1 {
            return 0;
        }
        let limit = if len <= 100 { 100 - 100 % len } else { 100 };
        loop {
            let roll = self.next_outcome(reason) as usize;
            if roll <= limit {
                return ((roll - 1) * len / limit).min(len - 1);
            }
            log::trace!("[RNG] Redrawing {} for: {}", roll, reason);
        }
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.len() - self.index
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub battle_id: String,
    pub players: [BattlePlayer; 2],
    pub turn_number: u32,
    pub game_state: GameState,
    pub action_queue: [Option<PlayerAction>; 2],
    pub potion_heal: u16,
}

impl BattleState {
    pub fn new(id: String, player1: BattlePlayer, player2: BattlePlayer) -> Self {
        Self {
            battle_id: id,
            players: [player1, player2],
            turn_number: 1,
            game_state: GameState::WaitingForActions,
            action_queue: [None, None],
            potion_heal: DEFAULT_POTION_HEAL,
        }
    }

    pub fn with_potion_heal(mut self, potion_heal: u16) -> Self {
        self.potion_heal = potion_heal;
        self
    }

    pub fn outcome(&self) -> BattleOutcome {
        self.game_state.into()
    }

    pub fn is_ended(&self) -> bool {
        self.game_state.is_terminal()
    }

    pub fn winner(&self) -> Option<usize> {
        match self.game_state {
            GameState::Player1Win => Some(0),
            GameState::Player2Win => Some(1),
            _ => None,
        }
    }
}
