use crate::state::CharacterClass;

/// Per-class spell progression.
pub trait ClassOracle: Send + Sync {
    /// Spells a new character of `class` starts with.
    fn starter_spells(&self, class: CharacterClass) -> &[String];

    /// Spell unlocked on reaching `level`, if any.
    fn unlock_at(&self, class: CharacterClass, level: u32) -> Option<&str>;

    /// Every spell a character of `class` knows at `level`.
    fn spells_at_level(&self, class: CharacterClass, level: u32) -> Vec<String> {
        let mut spells = self.starter_spells(class).to_vec();
        for lvl in 2..=level {
            if let Some(spell) = self.unlock_at(class, lvl) {
                spells.push(spell.to_owned());
            }
        }
        spells
    }
}
