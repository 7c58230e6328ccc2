use crate::state::{BattlePhase, BattleState, CombatantRef, LogKind};

use super::BattleRewards;

/// Lifetime battle totals for a save file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct BattleStatistics {
    pub total_battles: u32,
    pub victories: u32,
    pub defeats: u32,
    pub total_damage_dealt: u64,
    pub total_damage_received: u64,
    pub total_healing: u64,
    pub total_spells_cast: u32,
    pub total_turns: u64,
    pub monsters_defeated: u32,
    pub bosses_defeated: u32,
    pub critical_hits: u32,
    /// Turns of the longest battle.
    pub longest_battle: u32,
    /// Turns of the quickest victory; `None` before the first win.
    pub fastest_victory: Option<u32>,
}

impl BattleStatistics {
    /// Folds a finished battle into the totals.
    ///
    /// Only terminal states count; anything else is ignored.
    pub fn record(&mut self, state: &BattleState, rewards: Option<&BattleRewards>) {
        let victory = match state.phase {
            BattlePhase::Victory { .. } => true,
            BattlePhase::Defeat { .. } => false,
            _ => return,
        };
        let turns = state.turn;

        for entry in &state.log {
            match (&entry.kind, entry.actor) {
                (LogKind::Damage { amount, critical, .. }, CombatantRef::Player) => {
                    self.total_damage_dealt += u64::from(*amount);
                    self.critical_hits += u32::from(*critical);
                }
                (
                    LogKind::Damage {
                        target: CombatantRef::Player,
                        amount,
                        ..
                    },
                    CombatantRef::Enemy(_),
                ) => self.total_damage_received += u64::from(*amount),
                (
                    LogKind::Heal {
                        target: CombatantRef::Player,
                        amount,
                    },
                    CombatantRef::Player,
                ) => self.total_healing += u64::from(*amount),
                (LogKind::SpellCast { .. }, CombatantRef::Player) => self.total_spells_cast += 1,
                _ => {}
            }
        }

        self.total_battles += 1;
        self.total_turns += u64::from(turns);
        self.longest_battle = self.longest_battle.max(turns);
        if victory {
            self.victories += 1;
            self.fastest_victory = Some(self.fastest_victory.map_or(turns, |t| t.min(turns)));
        } else {
            self.defeats += 1;
        }
        if let Some(rewards) = rewards {
            self.monsters_defeated += rewards.monsters_defeated;
            self.bosses_defeated += u32::from(rewards.boss_defeated);
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_battles == 0 {
            0.0
        } else {
            f64::from(self.victories) / f64::from(self.total_battles)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::RngState;
    use crate::state::{Character, CharacterClass, LogEntry, Stats, StatusEffects};

    fn finished(phase: BattlePhase, turn: u32, log: Vec<LogEntry>) -> BattleState {
        BattleState {
            turn,
            phase,
            player: Character {
                id: "p".into(),
                name: "P".into(),
                class: CharacterClass::Tank,
                level: 1,
                experience: 0,
                stats: Stats::default(),
                spells: vec![],
                status_effects: StatusEffects::empty(),
                cooldowns: Default::default(),
            },
            enemies: vec![],
            log,
            rng: RngState::from_seed(1),
            events: vec![],
        }
    }

    fn entry(actor: CombatantRef, kind: LogKind) -> LogEntry {
        LogEntry {
            turn: 0,
            actor,
            message: String::new(),
            kind,
        }
    }

    #[test]
    fn aggregates_typed_log_entries() {
        let log = vec![
            entry(CombatantRef::Player, LogKind::SpellCast { spell_id: "s".into() }),
            entry(
                CombatantRef::Player,
                LogKind::Damage {
                    target: CombatantRef::Enemy(0),
                    amount: 12,
                    critical: true,
                    absorbed: 0,
                },
            ),
            entry(
                CombatantRef::Enemy(0),
                LogKind::Damage {
                    target: CombatantRef::Player,
                    amount: 7,
                    critical: false,
                    absorbed: 3,
                },
            ),
            entry(
                CombatantRef::Player,
                LogKind::Heal {
                    target: CombatantRef::Player,
                    amount: 9,
                },
            ),
        ];
        let state = finished(
            BattlePhase::Victory {
                xp_gained: 25,
                loot: vec![],
            },
            4,
            log,
        );

        let mut stats = BattleStatistics::default();
        stats.record(&state, None);

        assert_eq!(stats.total_damage_dealt, 12);
        assert_eq!(stats.total_damage_received, 7);
        assert_eq!(stats.total_healing, 9);
        assert_eq!(stats.total_spells_cast, 1);
        assert_eq!(stats.critical_hits, 1);
        assert_eq!(stats.fastest_victory, Some(4));
    }

    #[test]
    fn fastest_victory_ignores_defeats() {
        let mut stats = BattleStatistics::default();
        stats.record(&finished(BattlePhase::Defeat { cause: "x".into() }, 2, vec![]), None);
        assert_eq!(stats.fastest_victory, None);
        stats.record(
            &finished(
                BattlePhase::Victory {
                    xp_gained: 1,
                    loot: vec![],
                },
                9,
                vec![],
            ),
            None,
        );
        stats.record(
            &finished(
                BattlePhase::Victory {
                    xp_gained: 1,
                    loot: vec![],
                },
                5,
                vec![],
            ),
            None,
        );
        assert_eq!(stats.fastest_victory, Some(5));
        assert_eq!(stats.longest_battle, 9);
        assert_eq!(stats.total_battles, 3);
        assert!((stats.win_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn non_terminal_state_is_ignored() {
        let mut stats = BattleStatistics::default();
        stats.record(&finished(BattlePhase::PlayerTurn, 3, vec![]), None);
        assert_eq!(stats, BattleStatistics::default());
    }
}
