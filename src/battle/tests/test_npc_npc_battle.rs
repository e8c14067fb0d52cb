#[cfg(test)]
mod tests {
    use crate::battle::ai::Strategy;
    use crate::battle::runner::{BattleRunner, BattleRunnerError};
    use crate::battle::state::{BattleOutcome, GameState};
    use crate::battle::tests::common::{create_test_player, TestPokemonBuilder};
    use crate::errors::ActionError;
    use crate::player::PlayerAction;
    use crate::roster::Roster;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn npc_runner(p1: &str, p2: &str, seed: u64, strategy: Strategy) -> BattleRunner {
        let player1 = create_test_player("npc_1", "Red", vec![TestPokemonBuilder::new(p1).build()]);
        let player2 =
            create_test_player("npc_2", "Blue", vec![TestPokemonBuilder::new(p2).build()]);
        BattleRunner::new("npc_battle".to_string(), player1, player2, StdRng::seed_from_u64(seed))
            .with_npc(0, strategy.behavior())
            .with_npc(1, strategy.behavior())
    }

    #[test]
    fn test_every_roster_pairing_terminates() {
        let roster = Roster::builtin().unwrap();
        let names: Vec<&str> = roster.species().iter().map(|s| s.name.as_str()).collect();

        for (i, p1) in names.iter().enumerate() {
            for p2 in &names {
                let mut runner = npc_runner(p1, p2, i as u64, Strategy::Random);
                let outcome = runner.run_to_completion(200).unwrap();
                assert_ne!(outcome, BattleOutcome::Ongoing, "{} vs {} never finished", p1, p2);

                for player in &runner.battle_state().players {
                    for pokemon in &player.team {
                        assert!(pokemon.current_hp() <= pokemon.max_hp());
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_seed_replays_the_same_battle() {
        let mut a = npc_runner("Ponyta", "Poliwag", 7, Strategy::Weighted);
        let mut b = npc_runner("Ponyta", "Poliwag", 7, Strategy::Weighted);

        assert_eq!(a.run_to_completion(200), b.run_to_completion(200));
        assert_eq!(a.get_all_events(), b.get_all_events());
        assert_eq!(a.get_turn_number(), b.get_turn_number());
    }

    #[test]
    fn test_human_against_npc_through_submit_action() {
        let player1 = create_test_player(
            "player",
            "Ash",
            vec![TestPokemonBuilder::new("Charmander").build()],
        );
        let player2 =
            create_test_player("npc", "Gary", vec![TestPokemonBuilder::new("Bulbasaur").build()]);
        let mut runner =
            BattleRunner::new("vs_npc".to_string(), player1, player2, StdRng::seed_from_u64(1))
                .with_npc(1, Strategy::Greedy.behavior());

        assert!(runner.is_npc(1));
        assert!(!runner.is_npc(0));

        // Invalid input is rejected without touching the battle.
        assert_eq!(
            runner.submit_action(0, PlayerAction::UseMove { move_index: 7 }).unwrap_err(),
            BattleRunnerError::InvalidAction(ActionError::InvalidMoveIndex(7))
        );
        assert_eq!(runner.get_turn_number(), 1);
        assert!(runner.get_all_events().is_empty());

        let result = runner
            .submit_action(0, PlayerAction::UseMove { move_index: 1 })
            .unwrap()
            .expect("the NPC answers immediately, so the turn resolves");
        assert!(!result.events.is_empty());
        assert_eq!(runner.get_events_since(0).len(), result.events.len());
        assert!(runner.format_events(&result.events)[0].starts_with("=== Turn 1"));

        while !runner.is_battle_ended() {
            runner
                .submit_action(0, PlayerAction::UseMove { move_index: 1 })
                .unwrap();
        }
        assert!(matches!(
            runner.get_game_state(),
            GameState::Player1Win | GameState::Player2Win | GameState::Draw
        ));
        assert_eq!(
            runner.submit_action(0, PlayerAction::Forfeit).unwrap_err(),
            BattleRunnerError::GameNotAcceptingActions
        );

        let info = runner.get_battle_info();
        assert_eq!(info.players[0].player_name, "Ash");
        assert_eq!(info.players[1].team.len(), 1);
    }

    #[test]
    fn test_execute_single_turn_runs_both_given_actions() {
        let player1 =
            create_test_player("a", "Red", vec![TestPokemonBuilder::new("Charmander").build()]);
        let player2 =
            create_test_player("b", "Blue", vec![TestPokemonBuilder::new("Bulbasaur").build()]);
        let mut runner =
            BattleRunner::new("direct".to_string(), player1, player2, StdRng::seed_from_u64(4))
                .with_npc(1, Strategy::Greedy.behavior());

        assert_eq!(
            runner
                .execute_single_turn(
                    PlayerAction::UseMove { move_index: 0 },
                    PlayerAction::UsePotion
                )
                .unwrap_err(),
            BattleRunnerError::InvalidAction(ActionError::NoPotionsRemaining)
        );
        assert_eq!(runner.get_turn_number(), 1);

        // Scratch and Pound never miss and cannot end the battle in one hit.
        let result = runner
            .execute_single_turn(
                PlayerAction::UseMove { move_index: 0 },
                PlayerAction::UseMove { move_index: 0 },
            )
            .unwrap();
        assert_eq!(result.new_game_state, GameState::WaitingForActions);
        assert!(!result.battle_ended);
        assert_eq!(result.outcome, BattleOutcome::Ongoing);
        assert_eq!(runner.get_turn_number(), 2);

        let lines = runner.format_events(&result.events);
        assert!(lines.iter().any(|l| l == "Charmander used Scratch!"));
        assert!(lines.iter().any(|l| l == "Bulbasaur used Pound!"));

        let state = runner.battle_state();
        assert!(state.players[0].team[0].current_hp() < 60);
        assert!(state.players[1].team[0].current_hp() < 58);

        let result = runner
            .execute_single_turn(PlayerAction::Forfeit, PlayerAction::UseMove { move_index: 0 })
            .unwrap();
        assert!(result.battle_ended);
        assert_eq!(result.winner, Some(1));
        assert_eq!(
            runner
                .execute_single_turn(PlayerAction::Forfeit, PlayerAction::Forfeit)
                .unwrap_err(),
            BattleRunnerError::GameNotAcceptingActions
        );
    }

    #[test]
    fn test_run_without_behaviors_reports_error() {
        let player1 = create_test_player("a", "A", vec![TestPokemonBuilder::new("Vulpix").build()]);
        let player2 = create_test_player("b", "B", vec![TestPokemonBuilder::new("Staryu").build()]);
        let mut runner =
            BattleRunner::new("no_npc".to_string(), player1, player2, StdRng::seed_from_u64(3));

        assert!(matches!(
            runner.run_to_completion(10),
            Err(BattleRunnerError::InternalError(_))
        ));
    }
}
