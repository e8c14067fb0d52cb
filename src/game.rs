//! Match orchestration: one party drawn per match, a fresh opponent each
//! round, and round results folded into a best-of-N score.

use crate::battle::runner::BattleRunner;
use crate::battle::state::BattleOutcome;
use crate::config::GameConfig;
use crate::errors::{BattleResult, RosterResult};
use crate::player::BattlePlayer;
use crate::roster::Roster;
use crate::session::MatchScore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::SpeciesData;

/// Simulated rounds give up after this many turns.
pub const MAX_SIMULATED_TURNS: u32 = 500;

pub struct Game {
    config: GameConfig,
    roster: Roster,
    rng: StdRng,
    party: Vec<usize>,
    score: MatchScore,
    round: u32,
}

impl Game {
    /// Seed the game and draw the player's party for the first match.
    pub fn new(config: GameConfig, roster: Roster) -> RosterResult<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let party = roster.draw(config.party_size, &mut rng)?;
        let score = MatchScore::new(config.rounds_to_win, config.max_rounds);

        Ok(Self {
            config,
            roster,
            rng,
            party,
            score,
            round: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn party(&self) -> Vec<&SpeciesData> {
        self.party
            .iter()
            .filter_map(|&index| self.roster.get(index).ok())
            .collect()
    }

    pub fn score(&self) -> &MatchScore {
        &self.score
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_match_over(&self) -> bool {
        self.score.is_decided()
    }

    /// Set up the next round: the party at full health with `lead` in
    /// front, restocked potions, and a newly drawn opponent.
    pub fn start_round(&mut self, player_name: &str, lead: usize) -> RosterResult<BattleRunner> {
        self.round += 1;

        let team = self
            .party
            .iter()
            .map(|&index| self.roster.instantiate(index))
            .collect::<RosterResult<Vec<_>>>()?;
        let mut player = BattlePlayer::new("player".to_string(), player_name.to_string(), team)
            .with_potions(self.config.potions_per_round);
        if lead < player.team.len() {
            player.active_pokemon_index = lead;
        }

        let opponent_picks =
            self.roster
                .draw_excluding(&self.party, self.config.opponent_party_size, &mut self.rng)?;
        let opponent_team = opponent_picks
            .iter()
            .map(|&index| self.roster.instantiate(index))
            .collect::<RosterResult<Vec<_>>>()?;
        let opponent = BattlePlayer::new("npc_wild".to_string(), "Foe".to_string(), opponent_team);

        log::info!(
            "Round {}: {:?} vs {:?}",
            self.round,
            player.team.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            opponent.team.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
        );

        let battle_rng = StdRng::seed_from_u64(self.rng.random());
        Ok(BattleRunner::new(
            format!("round_{}", self.round),
            player,
            opponent,
            battle_rng,
        )
        .with_potion_heal(self.config.potion_heal)
        .with_npc(1, self.config.strategy.behavior()))
    }

    /// Fold a finished round into the match score.
    /// Returns the match result, `Ongoing` while rounds remain.
    pub fn finish_round(&mut self, outcome: BattleOutcome) -> BattleOutcome {
        self.score.record_round(outcome);
        self.score.result()
    }

    /// Start a new match with the same party.
    pub fn restart(&mut self) {
        self.score = MatchScore::new(self.config.rounds_to_win, self.config.max_rounds);
        self.round = 0;
    }

    /// Start a new match with a freshly drawn party.
    pub fn new_match(&mut self) -> RosterResult<()> {
        self.party = self.roster.draw(self.config.party_size, &mut self.rng)?;
        self.restart();
        Ok(())
    }

    /// Play a round with the configured strategy on both sides.
    pub fn simulate_round(&mut self) -> BattleResult<BattleOutcome> {
        let mut runner = self
            .start_round("Player", 0)?
            .with_npc(0, self.config.strategy.behavior());
        let outcome = runner.run_to_completion(MAX_SIMULATED_TURNS)?;
        if outcome == BattleOutcome::Ongoing {
            log::warn!("Round {} hit the turn limit, scoring it as a tie", self.round);
            return Ok(BattleOutcome::Tie);
        }
        Ok(outcome)
    }

    /// Play out a whole match without input and return its result.
    pub fn simulate_match(&mut self) -> BattleResult<BattleOutcome> {
        self.new_match()?;
        loop {
            let outcome = self.simulate_round()?;
            let result = self.finish_round(outcome);
            if result != BattleOutcome::Ongoing {
                return Ok(result);
            }
        }
    }
}
