use schema::{MoveData, PokemonType, SpeciesData};
use serde::{Deserialize, Serialize};

/// Burn damage taken before each move while burned.
pub const BURN_DAMAGE: u16 = 2;
/// How many of its own moves a burned Pokemon suffers before the burn ends.
pub const BURN_TURNS: u8 = 3;

/// A live combatant. HP is always kept within `0..=max_hp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub name: String,
    pub pokemon_type: PokemonType,
    pub moves: Vec<MoveData>,
    /// Remaining burn turns (0 = not burned)
    pub burn_turns: u8,
    current_hp: u16,
    max_hp: u16,
}

impl PokemonInst {
    /// Create a full-HP, status-free Pokemon from species data.
    pub fn from_species(species: &SpeciesData) -> Self {
        Self::new(
            &species.name,
            species.pokemon_type,
            species.max_hp,
            species.moves.clone(),
        )
    }

    pub fn new(name: &str, pokemon_type: PokemonType, max_hp: u16, moves: Vec<MoveData>) -> Self {
        Self {
            name: name.to_string(),
            pokemon_type,
            moves,
            burn_turns: 0,
            current_hp: max_hp,
            max_hp,
        }
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.max_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_burned(&self) -> bool {
        self.burn_turns > 0
    }

    pub fn get_move(&self, move_index: usize) -> Option<&MoveData> {
        self.moves.get(move_index)
    }

    /// Remove up to `amount` HP. Returns true if this faints the Pokemon.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        let was_fainted = self.is_fainted();
        self.current_hp = self.current_hp.saturating_sub(amount);
        !was_fainted && self.is_fainted()
    }

    /// Restore up to `amount` HP without exceeding max HP. Fainted Pokemon
    /// cannot be healed. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.is_fainted() {
            return 0;
        }
        let new_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
        let healed = new_hp - self.current_hp;
        self.current_hp = new_hp;
        healed
    }

    /// Set HP directly, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp);
    }

    /// HP bar for text displays, e.g. `██████░░░░`.
    pub fn hp_bar(&self, width: usize) -> String {
        let filled = if self.max_hp == 0 {
            0
        } else {
            width * self.current_hp as usize / self.max_hp as usize
        };
        format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn charmander() -> PokemonInst {
        PokemonInst::new(
            "Charmander",
            PokemonType::Fire,
            60,
            vec![MoveData::new("Ember", PokemonType::Fire, 14, 95)],
        )
    }

    #[test]
    fn test_damage_clamps_at_zero_and_reports_faint_once() {
        let mut pokemon = charmander();
        assert!(!pokemon.take_damage(59));
        assert_eq!(pokemon.current_hp(), 1);
        assert!(pokemon.take_damage(500));
        assert_eq!(pokemon.current_hp(), 0);
        assert!(!pokemon.take_damage(10), "already fainted");
    }

    #[test]
    fn test_heal_clamps_at_max_and_skips_fainted() {
        let mut pokemon = charmander();
        pokemon.set_hp(50);
        assert_eq!(pokemon.heal(15), 10);
        assert_eq!(pokemon.current_hp(), 60);

        pokemon.set_hp(0);
        assert_eq!(pokemon.heal(15), 0);
        assert!(pokemon.is_fainted());
    }

    #[test]
    fn test_set_hp_clamps_to_max() {
        let mut pokemon = charmander();
        pokemon.set_hp(1000);
        assert_eq!(pokemon.current_hp(), 60);
    }

    #[test]
    fn test_hp_bar() {
        let mut pokemon = charmander();
        pokemon.set_hp(30);
        assert_eq!(pokemon.hp_bar(10), "█████░░░░░");
        pokemon.set_hp(0);
        assert_eq!(pokemon.hp_bar(4), "░░░░");
    }
}
