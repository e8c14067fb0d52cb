#[cfg(test)]
mod tests {
    use crate::battle::state::{BattleEvent, GameState, TurnRng};
    use crate::battle::tests::common::{
        create_team_battle, create_test_battle, predictable_rng, run_turn, TestPokemonBuilder,
    };
    use crate::player::PlayerAction;
    use crate::pokemon::{BURN_DAMAGE, BURN_TURNS};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ember_burns_and_burn_ticks_before_the_next_move() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Charmander").build(),
            TestPokemonBuilder::new("Squirtle").build(),
        );

        let rng = TurnRng::new_for_test(vec![
            1, 3, 50, 99, 20, // Ember: 7 damage, no recoil, burn
            50, 50, 50, // Tackle
        ]);
        let bus = run_turn(
            &mut battle_state,
            PlayerAction::UseMove { move_index: 1 },
            PlayerAction::UseMove { move_index: 0 },
            rng,
        );

        let squirtle = &battle_state.players[1].team[0];
        assert_eq!(squirtle.burn_turns, BURN_TURNS - 1);
        assert_eq!(squirtle.current_hp(), 62 - 7 - BURN_DAMAGE);
        assert_eq!(battle_state.players[0].team[0].current_hp(), 60 - 12);

        let burned_at = bus
            .events()
            .iter()
            .position(|e| matches!(e, BattleEvent::PokemonBurned { .. }))
            .unwrap();
        let tick_at = bus
            .events()
            .iter()
            .position(|e| matches!(e, BattleEvent::BurnDamage { .. }))
            .unwrap();
        let tackle_at = bus
            .events()
            .iter()
            .position(|e| matches!(e, BattleEvent::MoveUsed { player_index: 1, .. }))
            .unwrap();
        assert!(burned_at < tick_at && tick_at < tackle_at);
    }

    #[test]
    fn test_burn_misses_its_window() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Charmander").build(),
            TestPokemonBuilder::new("Squirtle").build(),
        );

        let rng = TurnRng::new_for_test(vec![1, 3, 50, 99, 21, 50, 50, 50]);
        run_turn(
            &mut battle_state,
            PlayerAction::UseMove { move_index: 1 },
            PlayerAction::UseMove { move_index: 0 },
            rng,
        );

        assert!(!battle_state.players[1].team[0].is_burned());
    }

    #[test]
    fn test_burn_wears_off_after_three_moves() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Bulbasaur").with_burn(BURN_TURNS).build(),
            TestPokemonBuilder::new("Squirtle").build(),
        );

        let mut healed = 0;
        for _ in 0..BURN_TURNS {
            let bus = run_turn(
                &mut battle_state,
                PlayerAction::UseMove { move_index: 2 }, // Growl
                PlayerAction::UseMove { move_index: 2 }, // Tail Whip
                predictable_rng(),
            );
            healed += bus
                .events()
                .iter()
                .filter(|e| matches!(e, BattleEvent::BurnHealed { .. }))
                .count();
        }

        let bulbasaur = &battle_state.players[0].team[0];
        assert!(!bulbasaur.is_burned());
        assert_eq!(healed, 1);
        // Each turn: one burn tick plus an 8 damage Tail Whip.
        assert_eq!(bulbasaur.current_hp(), 58 - 3 * (BURN_DAMAGE + 8));
        assert_eq!(battle_state.players[1].team[0].current_hp(), 62 - 3 * 8);
    }

    #[test]
    fn test_burn_knockout_prevents_the_move() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Bulbasaur").with_hp(2).with_burn(2).build(),
            TestPokemonBuilder::new("Charmander").build(),
        );

        let bus = run_turn(
            &mut battle_state,
            PlayerAction::UseMove { move_index: 1 },
            PlayerAction::UseMove { move_index: 1 },
            TurnRng::new_for_test(vec![]),
        );

        assert_eq!(battle_state.game_state, GameState::Player2Win);
        assert_eq!(battle_state.players[1].team[0].current_hp(), 60);
        assert!(!bus
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::MoveUsed { .. })));
        assert!(bus
            .formatted_lines(&battle_state)
            .contains(&"Bulbasaur is hurt by its burn! (2 damage)".to_string()));
    }

    #[test]
    fn test_switching_keeps_the_burn_on_the_benched_pokemon() {
        let mut battle_state = create_team_battle(
            vec![
                TestPokemonBuilder::new("Bulbasaur").with_burn(2).build(),
                TestPokemonBuilder::new("Oddish").build(),
            ],
            vec![TestPokemonBuilder::new("Squirtle").build()],
        );

        run_turn(
            &mut battle_state,
            PlayerAction::SwitchPokemon { team_index: 1 },
            PlayerAction::UseMove { move_index: 2 },
            predictable_rng(),
        );

        assert_eq!(battle_state.players[0].team[0].burn_turns, 2);
        assert_eq!(battle_state.players[0].team[0].current_hp(), 58);
        assert!(!battle_state.players[0].team[1].is_burned());
        assert_eq!(battle_state.players[0].team[1].current_hp(), 58 - 8);
    }
}
