//! Pokemon Duel Battle Engine
//!
//! A small turn-based Pokemon battle game: type matchups on the
//! Fire > Grass > Water > Fire cycle, critical hits, recoil and burns,
//! a computer opponent, best-of-three matches and a persistent record.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod game;
pub mod logger;
pub mod player;
pub mod pokemon;
pub mod roster;
pub mod session;

// --- PUBLIC API RE-EXPORTS ---

// Core data definitions from the `schema` crate.
pub use schema::{MoveData, PokemonType, RosterData, SpeciesData, MOVES_PER_POKEMON};

// Core battle engine functions and state.
pub use battle::ai::{Behavior, GreedyAI, RandomAI, Strategy, WeightedAI};
pub use battle::calculators::{calculate_attack_outcome, resolve_attack, AttackOutcome};
pub use battle::engine::{ready_for_turn_resolution, resolve_turn, validate_player_action};
pub use battle::runner::{BattleRunner, BattleRunnerError, ExecutionResult};
pub use battle::state::{BattleEvent, BattleOutcome, BattleState, EventBus, GameState, TurnRng};

// Core runtime types for a battle.
pub use player::{BattlePlayer, PlayerAction};
pub use pokemon::PokemonInst;

// Data access, configuration and bookkeeping.
pub use config::GameConfig;
pub use game::Game;
pub use roster::{get_species_data, Roster, RosterSource};
pub use session::{MatchScore, RecordStore, SessionStats, SessionTracker};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, ConfigError, RecordError, RosterError,
    RosterResult,
};
