use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pokemon_duel::battle::engine::needs_replacement;
use pokemon_duel::{
    BattleEvent, BattleOutcome, BattlePlayer, BattleRunner, Game, GameConfig, PlayerAction,
    RecordStore, Roster, RosterSource, SessionTracker, Strategy,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pokemon-duel", version, about = "Turn-based Pokemon battles in the terminal")]
struct Cli {
    /// RON file with game settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON pokedex to use instead of the built-in roster
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Where the win/loss record is kept
    #[arg(long, global = true)]
    record: Option<PathBuf>,

    /// RNG seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// How the opponent picks its moves
    #[arg(long, value_enum, global = true)]
    strategy: Option<Strategy>,

    /// Round wins needed to take a match
    #[arg(long, global = true)]
    rounds_to_win: Option<u32>,

    /// More output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play best-of-three matches against the computer (default)
    Play,
    /// List the available Pokemon
    Roster,
    /// Show the saved win/loss record
    Stats,
    /// Let two computer players fight it out
    Simulate {
        /// Number of matches to play
        #[arg(long, default_value_t = 10)]
        battles: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    pokemon_duel::logger::init(cli.verbose).context("failed to install logger")?;

    let config = build_config(&cli)?;
    log::debug!("Using config: {:?}", config);

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => play(config),
        Command::Roster => show_roster(&config),
        Command::Stats => show_stats(&config),
        Command::Simulate { battles } => simulate(config, battles),
    }
}

/// Config file first, then command-line overrides.
fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = GameConfig::load_or_default(cli.config.as_deref())
        .context("could not load the game configuration")?;

    if let Some(roster) = &cli.roster {
        config.roster_path = Some(roster.clone());
    }
    if let Some(record) = &cli.record {
        config.record_path = record.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(rounds_to_win) = cli.rounds_to_win {
        config.set_rounds_to_win(rounds_to_win);
    }

    config.validate().context("invalid game configuration")?;
    Ok(config)
}

fn load_roster(config: &GameConfig) -> Result<Roster> {
    Roster::load(config.roster_path.as_deref(), config.species_needed())
        .context("no usable roster")
}

fn show_roster(config: &GameConfig) -> Result<()> {
    let roster = load_roster(config)?;
    match roster.source() {
        RosterSource::BuiltIn => println!("Built-in roster ({} Pokemon):", roster.len()),
        RosterSource::Pokedex(path) => {
            println!("Pokedex {} ({} Pokemon):", path.display(), roster.len())
        }
    }
    for species in roster.species() {
        let moves: Vec<String> = species
            .moves
            .iter()
            .map(|m| format!("{} ({} {}, {}%)", m.name, m.move_type, m.power, m.accuracy))
            .collect();
        println!(
            "  {:<12} {:<6} HP {:>3}  {}",
            species.name,
            species.pokemon_type.to_string(),
            species.max_hp,
            moves.join(", ")
        );
    }
    Ok(())
}

fn show_stats(config: &GameConfig) -> Result<()> {
    let stats = RecordStore::new(&config.record_path).load();
    println!("Record: {}", stats);
    Ok(())
}

fn simulate(config: GameConfig, battles: u32) -> Result<()> {
    let roster = load_roster(&config)?;
    let mut game = Game::new(config, roster)?;
    let mut tracker = SessionTracker::new();

    for match_number in 1..=battles {
        let result = game.simulate_match()?;
        tracker.record_outcome(result);
        let party: Vec<&str> = game.party().iter().map(|s| s.name.as_str()).collect();
        println!(
            "Match {:>3}: {:<24} {} ({})",
            match_number,
            party.join(" & "),
            describe(result),
            game.score()
        );
    }

    println!("Simulated record: {}", tracker.get_stats());
    Ok(())
}

fn describe(outcome: BattleOutcome) -> &'static str {
    match outcome {
        BattleOutcome::PlayerWin => "won",
        BattleOutcome::OpponentWin => "lost",
        BattleOutcome::Tie => "tied",
        BattleOutcome::Ongoing => "unfinished",
    }
}

fn play(config: GameConfig) -> Result<()> {
    let store = RecordStore::new(&config.record_path);
    let mut tracker = SessionTracker::with_stats(store.load());
    let roster = load_roster(&config)?;
    let mut game = Game::new(config, roster)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Record: {}", tracker.get_stats());
    loop {
        let Some(result) = play_match(&mut game, &mut input)? else {
            println!("Goodbye!");
            return Ok(());
        };

        tracker.record_outcome(result);
        store
            .save(&tracker.get_stats())
            .with_context(|| format!("could not save record to {}", store.path().display()))?;
        println!("Record: {}", tracker.get_stats());

        match prompt(&mut input, "Play another match? [y/N] ")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => game.new_match()?,
            _ => {
                println!("Goodbye!");
                return Ok(());
            }
        }
    }
}

/// Play rounds until the match is decided. `None` means the player quit.
fn play_match(game: &mut Game, input: &mut impl BufRead) -> Result<Option<BattleOutcome>> {
    loop {
        println!();
        println!("--- Round {} | {} ---", game.round() + 1, game.score());

        let party: Vec<String> = game
            .party()
            .iter()
            .map(|s| format!("{} [{}] HP {}", s.name, s.pokemon_type, s.max_hp))
            .collect();
        let Some(lead) = choose_index(input, "Choose your lead Pokemon:", &party)? else {
            return Ok(None);
        };

        let mut runner = game.start_round("You", lead)?;
        if let Some(foe) = runner.get_battle_info().players[1].active_pokemon.clone() {
            println!("A wild {} appeared! Go {}!", foe.name, party_name(&runner, 0));
        }

        let Some(outcome) = play_round(&mut runner, input)? else {
            return Ok(None);
        };
        println!(
            "{}",
            match outcome {
                BattleOutcome::PlayerWin => "You win the round!",
                BattleOutcome::OpponentWin => "You lose the round!",
                _ => "The round is a draw!",
            }
        );

        let result = game.finish_round(outcome);
        if result != BattleOutcome::Ongoing {
            println!("Match over ({}): you {}!", game.score(), describe(result));
            return Ok(Some(result));
        }
    }
}

fn party_name(runner: &BattleRunner, player_index: usize) -> String {
    runner.get_battle_info().players[player_index]
        .active_pokemon
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_default()
}

fn play_round(
    runner: &mut BattleRunner,
    input: &mut impl BufRead,
) -> Result<Option<BattleOutcome>> {
    while !runner.is_battle_ended() {
        // Only the opponent owes a replacement.
        if !runner.players_needing_actions().contains(&0) {
            match runner.auto_execute_if_ready()? {
                Some(result) => print_events(runner, &result.events),
                None => anyhow::bail!("the opponent has no way to act"),
            }
            continue;
        }

        print_status(runner);
        let Some(action) = read_action(runner, input)? else {
            return Ok(None);
        };
        match runner.submit_action(0, action) {
            Ok(Some(result)) => print_events(runner, &result.events),
            Ok(None) => {}
            Err(err) => println!("{}", err),
        }
    }
    Ok(Some(runner.outcome()))
}

fn print_events(runner: &BattleRunner, events: &[BattleEvent]) {
    for line in runner.format_events(events) {
        println!("{}", line);
    }
}

fn print_status(runner: &BattleRunner) {
    let state = runner.battle_state();
    println!();
    for (label, player) in [("Foe", &state.players[1]), ("You", &state.players[0])] {
        if let Some(p) = player.active_pokemon() {
            let burn = if p.is_burned() { " BRN" } else { "" };
            println!(
                "{:<4} {:<12} [{}] HP {:>3}/{:<3} {}{}",
                label,
                p.name,
                p.pokemon_type,
                p.current_hp(),
                p.max_hp(),
                p.hp_bar(20),
                burn
            );
        }
    }
}

/// Ask the human for their next action. `None` means they quit.
fn read_action(runner: &BattleRunner, input: &mut impl BufRead) -> Result<Option<PlayerAction>> {
    let state = runner.battle_state();
    let player = &state.players[0];

    if needs_replacement(state, 0) {
        let benched = switch_options(player);
        let labels: Vec<String> = benched.iter().map(|(_, label)| label.clone()).collect();
        return Ok(choose_index(input, "Send out which Pokemon?", &labels)?
            .map(|choice| PlayerAction::SwitchPokemon { team_index: benched[choice].0 }));
    }

    let Some(active) = player.active_pokemon() else {
        return Ok(Some(PlayerAction::Forfeit));
    };
    for (i, m) in active.moves.iter().enumerate() {
        println!("  {}) {} ({} {})", i + 1, m.name, m.move_type, m.power);
    }
    println!("  p) Potion (+{} HP) [{}]", state.potion_heal, player.potions);
    if player.team.len() > 1 {
        println!("  s) Switch");
    }
    println!("  f) Forfeit   q) Quit");

    loop {
        let Some(answer) = prompt(input, "> ")? else {
            return Ok(None);
        };
        let action = match answer.to_ascii_lowercase().as_str() {
            "q" => return Ok(None),
            "p" => PlayerAction::UsePotion,
            "f" => PlayerAction::Forfeit,
            "s" => {
                let options = switch_options(player);
                if options.is_empty() {
                    println!("No available Pokemon to switch to!");
                    continue;
                }
                let labels: Vec<String> = options.iter().map(|(_, label)| label.clone()).collect();
                match choose_index(input, "Switch to:", &labels)? {
                    Some(choice) => PlayerAction::SwitchPokemon {
                        team_index: options[choice].0,
                    },
                    None => return Ok(None),
                }
            }
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 => PlayerAction::UseMove { move_index: n - 1 },
                _ => {
                    println!("Enter a move number, p, s, f or q.");
                    continue;
                }
            },
        };

        match pokemon_duel::validate_player_action(state, 0, &action) {
            Ok(()) => return Ok(Some(action)),
            Err(err) => println!("{}", err),
        }
    }
}

/// Benched Pokemon that can still fight, with menu labels.
fn switch_options(player: &BattlePlayer) -> Vec<(usize, String)> {
    player
        .get_valid_switches()
        .into_iter()
        .filter_map(|action| match action {
            PlayerAction::SwitchPokemon { team_index } => {
                let p = &player.team[team_index];
                Some((team_index, format!("{} HP {}/{}", p.name, p.current_hp(), p.max_hp())))
            }
            _ => None,
        })
        .collect()
}

/// Numbered menu. Re-prompts until a valid choice; `None` on end of input.
fn choose_index(
    input: &mut impl BufRead,
    title: &str,
    options: &[String],
) -> Result<Option<usize>> {
    if options.is_empty() {
        return Ok(None);
    }
    println!("{}", title);
    for (i, option) in options.iter().enumerate() {
        println!("  {}) {}", i + 1, option);
    }
    loop {
        let Some(answer) = prompt(input, "> ")? else {
            return Ok(None);
        };
        match answer.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
            _ => println!("Pick a number from 1 to {}.", options.len()),
        }
    }
}

/// Print `message` and read one trimmed line. `None` on end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
