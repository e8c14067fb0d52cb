use crate::battle::runner::BattleRunnerError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the battle engine
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// Error related to roster lookup or loading
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error related to game configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Error related to the persistent win/loss record
    #[error("Record error: {0}")]
    Record(#[from] RecordError),
    /// Error raised while driving a battle
    #[error("Battle error: {0}")]
    Battle(#[from] BattleRunnerError),
}

/// Errors related to roster data
#[derive(Debug, Error)]
pub enum RosterError {
    /// No species with this name exists in the roster
    #[error("Species not found: {0}")]
    SpeciesNotFound(String),
    /// Roster index is out of bounds
    #[error("Invalid roster index: {0}")]
    InvalidIndex(usize),
    /// The roster does not hold enough species for the requested draw
    #[error("Roster has {available} species, {needed} needed")]
    TooFewSpecies { available: usize, needed: usize },
    /// Roster data is malformed or incomplete
    #[error("Malformed roster data: {0}")]
    MalformedData(String),
    /// The roster file could not be read
    #[error("Failed to read roster file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to player actions. None of these mutate the battle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Move index is out of bounds
    #[error("Invalid move index: {0}")]
    InvalidMoveIndex(usize),
    /// Pokemon index is out of bounds, empty, fainted or already active
    #[error("Invalid Pokemon index: {0}")]
    InvalidPokemonIndex(usize),
    /// Player index is not 0 or 1
    #[error("Invalid player index: {0}")]
    InvalidPlayerIndex(usize),
    /// No potions left to use
    #[error("No potions remaining")]
    NoPotionsRemaining,
    /// Action is not valid in the current battle state
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

/// Errors related to loading game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Errors related to the persistent record file
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to write record file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using RosterError
pub type RosterResult<T> = Result<T, RosterError>;
