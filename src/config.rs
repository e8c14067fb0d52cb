use crate::battle::ai::Strategy;
use crate::battle::state::DEFAULT_POTION_HEAL;
use crate::errors::ConfigError;
use crate::player::MAX_TEAM_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Game settings, read from a RON file. Every field is optional in the file.
///
/// ```ron
/// (
///     party_size: 3,
///     strategy: greedy,
///     seed: Some(42),
/// )
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Optional JSON pokedex replacing the built-in roster.
    pub roster_path: Option<PathBuf>,
    pub record_path: PathBuf,
    pub party_size: usize,
    pub opponent_party_size: usize,
    pub potions_per_round: u8,
    pub potion_heal: u16,
    pub rounds_to_win: u32,
    pub max_rounds: u32,
    pub strategy: Strategy,
    /// Fixed seed for reproducible games; OS entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            roster_path: None,
            record_path: PathBuf::from("data/record.json"),
            party_size: 2,
            opponent_party_size: 1,
            potions_per_round: 2,
            potion_heal: DEFAULT_POTION_HEAL,
            rounds_to_win: 2,
            max_rounds: 5,
            strategy: Strategy::Random,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, size) in [
            ("party_size", self.party_size),
            ("opponent_party_size", self.opponent_party_size),
        ] {
            if size == 0 || size > MAX_TEAM_SIZE {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_TEAM_SIZE, size
                )));
            }
        }
        if self.rounds_to_win == 0 {
            return Err(ConfigError::Invalid("rounds_to_win must be at least 1".to_string()));
        }
        if self.max_rounds < self.rounds_to_win {
            return Err(ConfigError::Invalid(format!(
                "max_rounds ({}) cannot be less than rounds_to_win ({})",
                self.max_rounds, self.rounds_to_win
            )));
        }
        Ok(())
    }

    /// Change the wins needed, stretching `max_rounds` so the match can
    /// still be won even after ties.
    pub fn set_rounds_to_win(&mut self, rounds_to_win: u32) {
        self.rounds_to_win = rounds_to_win;
        self.max_rounds = self
            .max_rounds
            .max(rounds_to_win.saturating_mul(2).saturating_add(1));
    }

    /// Species needed to field both parties without repeats.
    pub fn species_needed(&self) -> usize {
        self.party_size + self.opponent_party_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempdir::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new("config").unwrap();
        let path = dir.path().join("game.ron");
        fs::write(&path, "(party_size: 3, strategy: greedy, seed: Some(42))").unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(
            config,
            GameConfig {
                party_size: 3,
                strategy: Strategy::Greedy,
                seed: Some(42),
                ..GameConfig::default()
            }
        );
        assert_eq!(config.species_needed(), 4);
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new("config").unwrap();

        let missing = dir.path().join("missing.ron");
        assert!(matches!(GameConfig::load(&missing), Err(ConfigError::Io { .. })));

        let garbled = dir.path().join("garbled.ron");
        fs::write(&garbled, "(party_size: \"two\")").unwrap();
        assert!(matches!(GameConfig::load(&garbled), Err(ConfigError::Parse { .. })));

        let invalid = dir.path().join("invalid.ron");
        fs::write(&invalid, "(rounds_to_win: 3, max_rounds: 2)").unwrap();
        assert!(matches!(GameConfig::load(&invalid), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rounds_to_win_override_stretches_max_rounds() {
        let mut config = GameConfig::default();
        config.set_rounds_to_win(1);
        assert_eq!((config.rounds_to_win, config.max_rounds), (1, 5));

        config.set_rounds_to_win(4);
        assert_eq!((config.rounds_to_win, config.max_rounds), (4, 9));

        config.set_rounds_to_win(u32::MAX);
        assert_eq!(config.max_rounds, u32::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert_eq!(GameConfig::load_or_default(None).unwrap(), GameConfig::default());

        let too_big = GameConfig {
            party_size: MAX_TEAM_SIZE + 1,
            ..GameConfig::default()
        };
        assert!(too_big.validate().is_err());
    }
}
