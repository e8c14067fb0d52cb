use crate::battle::engine::resolve_turn;
use crate::battle::state::{BattleState, EventBus, TurnRng};
use crate::player::{BattlePlayer, PlayerAction};
use crate::pokemon::PokemonInst;
use crate::roster::get_species_data;
use schema::MoveData;

/// A builder for creating test Pokemon instances from the built-in roster.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new("Charmander")
///     .with_moves(vec![MoveData::tackle()])
///     .with_hp(10)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    name: String,
    moves: Option<Vec<MoveData>>,
    current_hp: Option<u16>,
    burn_turns: u8,
}

impl TestPokemonBuilder {
    /// Creates a new builder for a roster species.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            moves: None,
            current_hp: None,
            burn_turns: 0,
        }
    }

    /// Replaces the species' moves.
    pub fn with_moves(mut self, moves: Vec<MoveData>) -> Self {
        self.moves = Some(moves);
        self
    }

    /// Sets the current HP for the test Pokemon. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_burn(mut self, turns: u8) -> Self {
        self.burn_turns = turns;
        self
    }

    pub fn build(self) -> PokemonInst {
        let species_data = match get_species_data(&self.name) {
            Ok(data) => data,
            Err(err) => panic!("Failed to load species data for {}: {}", self.name, err),
        };

        let mut pokemon = PokemonInst::from_species(&species_data);
        if let Some(moves) = self.moves {
            pokemon.moves = moves;
        }
        if let Some(hp) = self.current_hp {
            pokemon.set_hp(hp);
        }
        pokemon.burn_turns = self.burn_turns;
        pokemon
    }
}

/// Creates a default test player with a given ID, name, and team.
pub fn create_test_player(id: &str, name: &str, team: Vec<PokemonInst>) -> BattlePlayer {
    BattlePlayer::new(id.to_string(), name.to_string(), team)
}

/// Creates a standard 1v1 battle state for testing.
pub fn create_test_battle(p1_pokemon: PokemonInst, p2_pokemon: PokemonInst) -> BattleState {
    create_team_battle(vec![p1_pokemon], vec![p2_pokemon])
}

/// Creates a battle between two full teams.
pub fn create_team_battle(p1_team: Vec<PokemonInst>, p2_team: Vec<PokemonInst>) -> BattleState {
    let player1 = create_test_player("p1", "Player 1", p1_team);
    let player2 = create_test_player("p2", "Player 2", p2_team);

    BattleState::new("test_battle".to_string(), player1, player2)
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// A roll of 50 always hits for power + 2, never crits and never triggers
/// recoil or burn.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Queue both actions and resolve the turn.
pub fn run_turn(
    state: &mut BattleState,
    p1: PlayerAction,
    p2: PlayerAction,
    rng: TurnRng,
) -> EventBus {
    state.action_queue = [Some(p1), Some(p2)];
    resolve_turn(state, rng)
}
