//! Numeric stat block shared by characters and monsters.

/// Health, mana and combat stats of a combatant.
///
/// `health <= max_health` and `mana <= max_mana` hold after every
/// mutation made through the helpers below.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Stats {
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl Stats {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Applies a signed health change, clamped to `[0, max_health]`.
    ///
    /// Returns the change actually applied.
    pub fn apply_health_delta(&mut self, delta: i64) -> i64 {
        let before = i64::from(self.health);
        let after = (before + delta).clamp(0, i64::from(self.max_health));
        self.health = after as u32;
        after - before
    }

    /// Subtracts damage, never going below zero. Returns the health lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.health);
        self.health -= lost;
        lost
    }

    /// Restores health up to the maximum. Returns the health gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_health - self.health.min(self.max_health));
        self.health += gained;
        gained
    }

    /// Restores mana up to the maximum. Returns the mana gained.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_mana - self.mana.min(self.max_mana));
        self.mana += gained;
        gained
    }

    /// Spends mana if enough is available.
    pub fn spend_mana(&mut self, amount: u32) -> bool {
        if self.mana < amount {
            return false;
        }
        self.mana -= amount;
        true
    }

    /// Current health as a fraction of maximum, `0.0` when max is zero.
    pub fn health_fraction(&self) -> f64 {
        if self.max_health == 0 {
            return 0.0;
        }
        f64::from(self.health) / f64::from(self.max_health)
    }

    pub fn restore_full(&mut self) {
        self.health = self.max_health;
        self.mana = self.max_mana;
    }
}
