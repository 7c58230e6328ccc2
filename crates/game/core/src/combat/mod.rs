//! Combat resolution math.
//!
//! This module provides pure functions for resolving combat numbers.
//! Everything that rolls takes an [`RngState`](crate::env::RngState) and
//! returns the advanced state next to its result.
//!
//! # Core Functions
//!
//! - `calculate_damage`: Damage with defense, crit, element and variance
//! - `calculate_basic_attack`: Weapon-less attack (power 0, no element)
//! - `calculate_healing` / `calculate_shield`: Stat-ratio formulas
//! - `scale_monster_stat` / `monster_xp_reward`: Severity scaling

pub mod damage;
pub mod formula;

pub use damage::{
    DamageInput, DamageRoll, calculate_basic_attack, calculate_damage, crit_chance,
    effective_attack, effective_defense,
};
pub use formula::{
    calculate_healing, calculate_shield, monster_xp_reward, scale_monster_stat, stat_at_level,
    total_xp_for_level,
};
