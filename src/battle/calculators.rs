//! Pure battle calculations. Nothing here mutates the battle; every function
//! reads the state, consumes rolls from the `TurnRng`, and describes the
//! result as `BattleCommand`s for the engine to execute.

use crate::battle::commands::{BattleCommand, PlayerTarget};
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, TurnRng};
use crate::pokemon::{PokemonInst, BURN_DAMAGE, BURN_TURNS};
use schema::{MoveData, PokemonType};

/// Percent chance of a critical hit on any move that lands.
pub const CRIT_CHANCE: u8 = 10;
pub const CRIT_MULTIPLIER: f32 = 1.5;
/// Moves at least this strong can cause recoil.
pub const RECOIL_POWER_THRESHOLD: u16 = 14;
pub const RECOIL_CHANCE: u8 = 15;
/// Recoil is this percentage of the damage dealt.
pub const RECOIL_PERCENT: u32 = 20;
/// Percent chance for a damaging Fire move to burn.
pub const BURN_CHANCE: u8 = 20;
/// Damage rolls vary the move's power by up to this much either way.
pub const DAMAGE_VARIANCE: i32 = 2;

/// Everything that happened when one move was aimed at one defender.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    pub hit: bool,
    pub critical: bool,
    pub multiplier: f32,
    /// Damage before clamping to the defender's remaining HP.
    pub damage: u16,
    /// HP actually removed from the defender.
    pub damage_dealt: u16,
    /// HP the attacker loses to recoil, already clamped to its current HP.
    pub recoil: u16,
    pub burned: bool,
}

impl AttackOutcome {
    fn miss() -> Self {
        Self {
            hit: false,
            critical: false,
            multiplier: 1.0,
            damage: 0,
            damage_dealt: 0,
            recoil: 0,
            burned: false,
        }
    }
}

/// Spread a percentile roll over `-DAMAGE_VARIANCE..=DAMAGE_VARIANCE`.
pub fn variance_from_roll(roll: u8) -> i32 {
    let span = (2 * DAMAGE_VARIANCE + 1) as u32;
    ((roll.max(1) - 1) as u32 % span) as i32 - DAMAGE_VARIANCE
}

/// The damage formula.
///
/// Both combatants share the same fixed attack and defense, so they cancel
/// and only power, the variance roll, a critical and type effectiveness
/// remain. A damaging move always does at least 1; a zero-power move none.
pub fn calculate_damage(power: u16, variance: i32, critical: bool, multiplier: f32) -> u16 {
    if power == 0 {
        return 0;
    }
    let mut base = (power as i32 + variance).max(0);
    if critical {
        base = (base as f32 * CRIT_MULTIPLIER) as i32;
    }
    let damage = (base as f32 * multiplier) as i32;
    damage.clamp(1, u16::MAX as i32) as u16
}

/// Recoil owed for `damage_dealt`, before clamping to the attacker's HP.
pub fn recoil_for(damage_dealt: u16) -> u16 {
    if damage_dealt == 0 {
        return 0;
    }
    ((damage_dealt as u32 * RECOIL_PERCENT / 100) as u16).max(1)
}

/// Resolve one move against one defender.
///
/// Rolls are consumed in a fixed order: accuracy, then (on a hit) variance
/// and critical, then recoil for strong moves, then burn for Fire moves that
/// left the defender standing.
pub fn resolve_attack(
    attacker: &PokemonInst,
    defender: &PokemonInst,
    move_data: &MoveData,
    rng: &mut TurnRng,
) -> AttackOutcome {
    let accuracy_roll = rng.next_outcome("Accuracy Check");
    if accuracy_roll > move_data.accuracy {
        return AttackOutcome::miss();
    }

    let variance = variance_from_roll(rng.next_outcome("Damage Variance"));
    let critical = rng.next_outcome("Critical Hit Check") <= CRIT_CHANCE;
    let multiplier = PokemonType::type_effectiveness(move_data.move_type, defender.pokemon_type);

    let damage = calculate_damage(move_data.power, variance, critical, multiplier);
    let damage_dealt = damage.min(defender.current_hp());
    let defender_survives = damage_dealt < defender.current_hp();

    let mut recoil = 0;
    if move_data.power >= RECOIL_POWER_THRESHOLD
        && damage_dealt > 0
        && rng.next_outcome("Recoil Check") <= RECOIL_CHANCE
    {
        recoil = recoil_for(damage_dealt).min(attacker.current_hp());
    }

    let burned = move_data.move_type == PokemonType::Fire
        && damage_dealt > 0
        && defender_survives
        && !defender.is_burned()
        && rng.next_outcome("Burn Check") <= BURN_CHANCE;

    AttackOutcome {
        hit: true,
        critical,
        multiplier,
        damage,
        damage_dealt,
        recoil,
        burned,
    }
}

/// Calculate the outcome of `attacker_index`'s active Pokemon using the move
/// in `move_index` against the opposing active Pokemon.
pub fn calculate_attack_outcome(
    state: &BattleState,
    attacker_index: usize,
    move_index: usize,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let attacker_target = PlayerTarget::from_index(attacker_index);
    let defender_target = attacker_target.opponent();

    let attacker = match state.players[attacker_index].active_pokemon() {
        Some(pokemon) if !pokemon.is_fainted() => pokemon,
        _ => {
            return vec![BattleCommand::EmitEvent(BattleEvent::ActionFailed {
                reason: ActionFailureReason::PokemonFainted,
            })];
        }
    };

    let Some(move_data) = attacker.get_move(move_index) else {
        return vec![BattleCommand::EmitEvent(BattleEvent::ActionFailed {
            reason: ActionFailureReason::InvalidAction,
        })];
    };

    let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        player_index: attacker_index,
        pokemon: attacker.name.clone(),
        move_name: move_data.name.clone(),
    })];

    let defender = match state.players[defender_target.to_index()].active_pokemon() {
        Some(pokemon) if !pokemon.is_fainted() => pokemon,
        _ => {
            commands.push(BattleCommand::EmitEvent(BattleEvent::ActionFailed {
                reason: ActionFailureReason::NoEnemyPresent,
            }));
            return commands;
        }
    };

    let outcome = resolve_attack(attacker, defender, move_data, rng);

    if !outcome.hit {
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveMissed {
            attacker: attacker.name.clone(),
            defender: defender.name.clone(),
            move_name: move_data.name.clone(),
        }));
        return commands;
    }

    commands.push(BattleCommand::EmitEvent(BattleEvent::MoveHit {
        attacker: attacker.name.clone(),
        defender: defender.name.clone(),
        move_name: move_data.name.clone(),
    }));

    if outcome.damage_dealt > 0 {
        if outcome.critical {
            commands.push(BattleCommand::EmitEvent(BattleEvent::CriticalHit {
                attacker: attacker.name.clone(),
                defender: defender.name.clone(),
                move_name: move_data.name.clone(),
            }));
        }
        commands.push(BattleCommand::EmitEvent(BattleEvent::AttackTypeEffectiveness {
            multiplier: outcome.multiplier,
        }));
        commands.push(BattleCommand::EmitEvent(BattleEvent::DamageDealt {
            target: defender.name.clone(),
            damage: outcome.damage_dealt,
            remaining_hp: defender.current_hp() - outcome.damage_dealt,
        }));
        commands.push(BattleCommand::DealDamage {
            target: defender_target,
            amount: outcome.damage_dealt,
        });
    }

    if outcome.burned {
        commands.push(BattleCommand::SetBurn {
            target: defender_target,
            turns: BURN_TURNS,
        });
        commands.push(BattleCommand::EmitEvent(BattleEvent::PokemonBurned {
            target: defender.name.clone(),
        }));
    }

    if outcome.recoil > 0 {
        commands.push(BattleCommand::EmitEvent(BattleEvent::RecoilDamage {
            target: attacker.name.clone(),
            damage: outcome.recoil,
            remaining_hp: attacker.current_hp() - outcome.recoil,
        }));
        commands.push(BattleCommand::DealDamage {
            target: attacker_target,
            amount: outcome.recoil,
        });
    }

    commands
}

/// Burn damage a burned Pokemon takes before it uses a move.
/// Returns no commands when the active Pokemon is not burned.
pub fn calculate_burn_tick(state: &BattleState, player_index: usize) -> Vec<BattleCommand> {
    let target = PlayerTarget::from_index(player_index);
    let pokemon = match state.players[player_index].active_pokemon() {
        Some(pokemon) if pokemon.is_burned() && !pokemon.is_fainted() => pokemon,
        _ => return Vec::new(),
    };

    let damage = BURN_DAMAGE.min(pokemon.current_hp());
    let turns_left = pokemon.burn_turns - 1;
    let mut commands = vec![
        BattleCommand::EmitEvent(BattleEvent::BurnDamage {
            target: pokemon.name.clone(),
            damage,
            remaining_hp: pokemon.current_hp() - damage,
        }),
        BattleCommand::DealDamage {
            target,
            amount: damage,
        },
        BattleCommand::SetBurn {
            target,
            turns: turns_left,
        },
    ];
    if turns_left == 0 && damage < pokemon.current_hp() {
        commands.push(BattleCommand::EmitEvent(BattleEvent::BurnHealed {
            target: pokemon.name.clone(),
        }));
    }
    commands
}

/// Potion heal for the active Pokemon, clamped so HP never exceeds max.
pub fn calculate_potion_use(
    state: &BattleState,
    player_index: usize,
    heal_amount: u16,
) -> Vec<BattleCommand> {
    let target = PlayerTarget::from_index(player_index);
    let player = &state.players[player_index];

    if player.potions == 0 {
        return vec![BattleCommand::EmitEvent(BattleEvent::ActionFailed {
            reason: ActionFailureReason::NoPotionsRemaining,
        })];
    }
    let pokemon = match player.active_pokemon() {
        Some(pokemon) if !pokemon.is_fainted() => pokemon,
        _ => {
            return vec![BattleCommand::EmitEvent(BattleEvent::ActionFailed {
                reason: ActionFailureReason::PokemonFainted,
            })];
        }
    };

    let amount = heal_amount.min(pokemon.max_hp() - pokemon.current_hp());
    vec![
        BattleCommand::SpendPotion { target },
        BattleCommand::HealPokemon { target, amount },
        BattleCommand::EmitEvent(BattleEvent::PotionUsed {
            player_index,
            target: pokemon.name.clone(),
            amount,
            new_hp: pokemon.current_hp() + amount,
            potions_left: player.potions - 1,
        }),
    ]
}
