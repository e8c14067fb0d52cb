//! Win/loss/tie bookkeeping: per-run totals, best-of-N match scoring and
//! the persisted record file.

use crate::battle::state::BattleOutcome;
use crate::errors::RecordError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SessionStats {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl SessionStats {
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}W/{}L/{}T", self.wins, self.losses, self.ties)
    }
}

/// Accumulates outcomes for the lifetime of a run.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    stats: SessionStats,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume counting from previously saved totals.
    pub fn with_stats(stats: SessionStats) -> Self {
        Self { stats }
    }

    /// Increment the counter matching `outcome`. Unfinished battles are ignored.
    pub fn record_outcome(&mut self, outcome: BattleOutcome) {
        match outcome {
            BattleOutcome::PlayerWin => self.stats.wins += 1,
            BattleOutcome::OpponentWin => self.stats.losses += 1,
            BattleOutcome::Tie => self.stats.ties += 1,
            BattleOutcome::Ongoing => {
                log::warn!("Ignoring an unfinished battle in the session record");
            }
        }
    }

    pub fn get_stats(&self) -> SessionStats {
        self.stats
    }
}

/// Score of a best-of-N match: first to `rounds_to_win` round wins, with
/// at most `max_rounds` rounds played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    pub player_wins: u32,
    pub opponent_wins: u32,
    pub drawn_rounds: u32,
    pub rounds_played: u32,
    rounds_to_win: u32,
    max_rounds: u32,
}

impl MatchScore {
    pub fn new(rounds_to_win: u32, max_rounds: u32) -> Self {
        Self {
            player_wins: 0,
            opponent_wins: 0,
            drawn_rounds: 0,
            rounds_played: 0,
            rounds_to_win: rounds_to_win.max(1),
            max_rounds: max_rounds.max(1),
        }
    }

    pub fn record_round(&mut self, outcome: BattleOutcome) {
        match outcome {
            BattleOutcome::PlayerWin => self.player_wins += 1,
            BattleOutcome::OpponentWin => self.opponent_wins += 1,
            BattleOutcome::Tie => self.drawn_rounds += 1,
            BattleOutcome::Ongoing => return,
        }
        self.rounds_played += 1;
    }

    pub fn is_decided(&self) -> bool {
        self.player_wins >= self.rounds_to_win
            || self.opponent_wins >= self.rounds_to_win
            || self.rounds_played >= self.max_rounds
    }

    /// The match result, or `Ongoing` while rounds remain.
    pub fn result(&self) -> BattleOutcome {
        if !self.is_decided() {
            return BattleOutcome::Ongoing;
        }
        match self.player_wins.cmp(&self.opponent_wins) {
            std::cmp::Ordering::Greater => BattleOutcome::PlayerWin,
            std::cmp::Ordering::Less => BattleOutcome::OpponentWin,
            std::cmp::Ordering::Equal => BattleOutcome::Tie,
        }
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "You {} - {} Foe", self.player_wins, self.opponent_wins)
    }
}

/// JSON file holding the all-time record, e.g. `{"wins":3,"losses":1,"ties":0}`.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved record. A missing or unreadable file starts from zero.
    pub fn load(&self) -> SessionStats {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No record at {}, starting fresh", self.path.display());
                return SessionStats::default();
            }
            Err(err) => {
                log::warn!("Could not read record {}: {}", self.path.display(), err);
                return SessionStats::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|err| {
            log::warn!("Ignoring corrupt record {}: {}", self.path.display(), err);
            SessionStats::default()
        })
    }

    pub fn save(&self, stats: &SessionStats) -> Result<(), RecordError> {
        let json = serde_json::to_string(stats)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RecordError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| RecordError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
