#[cfg(test)]
mod tests {
    use crate::battle::engine::get_valid_actions;
    use crate::battle::state::{BattleEvent, GameState};
    use crate::battle::tests::common::{
        create_team_battle, create_test_battle, predictable_rng, run_turn, TestPokemonBuilder,
    };
    use crate::player::PlayerAction;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_potion_heals_then_opponent_attacks() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Charmander").with_hp(40).build(),
            TestPokemonBuilder::new("Bulbasaur").build(),
        );
        battle_state.players[0].potions = 2;

        let bus = run_turn(
            &mut battle_state,
            PlayerAction::UsePotion,
            PlayerAction::UseMove { move_index: 2 },
            predictable_rng(),
        );

        assert_eq!(battle_state.players[0].potions, 1);
        assert_eq!(battle_state.players[0].team[0].current_hp(), 40 + 15 - 8);
        assert!(bus.events().contains(&BattleEvent::PotionUsed {
            player_index: 0,
            target: "Charmander".to_string(),
            amount: 15,
            new_hp: 55,
            potions_left: 1,
        }));
    }

    #[test]
    fn test_potion_never_overheals() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Charmander").with_hp(55).build(),
            TestPokemonBuilder::new("Bulbasaur").build(),
        )
        .with_potion_heal(20);
        battle_state.players[0].potions = 1;

        let bus = run_turn(
            &mut battle_state,
            PlayerAction::UsePotion,
            PlayerAction::Forfeit,
            predictable_rng(),
        );

        assert_eq!(battle_state.players[0].team[0].current_hp(), 60);
        assert_eq!(
            bus.formatted_lines(&battle_state)[1],
            "Player 1 used a Potion! Charmander recovered 5 HP."
        );
    }

    #[test]
    fn test_switch_takes_the_hit_for_the_benched_pokemon() {
        let mut battle_state = create_team_battle(
            vec![
                TestPokemonBuilder::new("Charmander").build(),
                TestPokemonBuilder::new("Squirtle").build(),
            ],
            vec![TestPokemonBuilder::new("Bulbasaur").build()],
        );

        let bus = run_turn(
            &mut battle_state,
            PlayerAction::SwitchPokemon { team_index: 1 },
            PlayerAction::UseMove { move_index: 1 },
            predictable_rng(),
        );

        assert_eq!(battle_state.players[0].active_pokemon_index, 1);
        assert_eq!(battle_state.players[0].team[0].current_hp(), 60);
        // Vine Whip on Squirtle: (14 + 2) * 2
        assert_eq!(battle_state.players[0].team[1].current_hp(), 62 - 32);
        assert_eq!(
            bus.formatted_lines(&battle_state)[1],
            "Player 1 recalled Charmander and sent out Squirtle!"
        );
    }

    #[test]
    fn test_forfeit_ends_the_battle_immediately() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Charmander").build(),
            TestPokemonBuilder::new("Bulbasaur").build(),
        );

        let bus = run_turn(
            &mut battle_state,
            PlayerAction::Forfeit,
            PlayerAction::UseMove { move_index: 1 },
            predictable_rng(),
        );

        assert_eq!(battle_state.game_state, GameState::Player2Win);
        assert_eq!(battle_state.players[0].team[0].current_hp(), 60);
        assert_eq!(
            bus.events(),
            &[
                BattleEvent::TurnStarted { turn_number: 1 },
                BattleEvent::PlayerForfeited { player_index: 0 },
                BattleEvent::BattleEnded { winner: Some(1) },
                BattleEvent::TurnEnded,
            ]
        );
    }

    #[test]
    fn test_valid_actions_follow_the_battle_state() {
        let mut battle_state = create_team_battle(
            vec![
                TestPokemonBuilder::new("Charmander").build(),
                TestPokemonBuilder::new("Squirtle").with_hp(0).build(),
                TestPokemonBuilder::new("Oddish").build(),
            ],
            vec![TestPokemonBuilder::new("Bulbasaur").build()],
        );
        battle_state.players[0].potions = 1;

        assert_eq!(
            get_valid_actions(&battle_state, 0),
            vec![
                PlayerAction::UseMove { move_index: 0 },
                PlayerAction::UseMove { move_index: 1 },
                PlayerAction::UseMove { move_index: 2 },
                PlayerAction::SwitchPokemon { team_index: 2 },
                PlayerAction::UsePotion,
                PlayerAction::Forfeit,
            ]
        );
        // No bench and no potions.
        assert_eq!(
            get_valid_actions(&battle_state, 1),
            vec![
                PlayerAction::UseMove { move_index: 0 },
                PlayerAction::UseMove { move_index: 1 },
                PlayerAction::UseMove { move_index: 2 },
                PlayerAction::Forfeit,
            ]
        );

        battle_state.players[0].team[0].set_hp(0);
        battle_state.game_state = GameState::WaitingForPlayer1Replacement;
        assert_eq!(
            get_valid_actions(&battle_state, 0),
            vec![PlayerAction::SwitchPokemon { team_index: 2 }]
        );
        assert!(get_valid_actions(&battle_state, 1).is_empty());
    }
}
