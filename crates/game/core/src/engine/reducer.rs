use crate::combat::{DamageInput, DamageRoll, calculate_damage};
use crate::config::BalanceConfig;
use crate::env::RngState;
use crate::state::{
    BattlePhase, BattleState, CombatEvent, Combatant, CombatantRef, Element, LogEntry, LogKind,
    StatusEffect, TickEffect,
};

/// How the start of a combatant's turn went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStart {
    /// The combatant may act.
    Ready,
    /// Poison brought health to zero.
    DiedFromStatus,
    /// A stun was active when the turn began; the action is forfeit.
    Stunned,
}

/// Outcome of one damage roll applied to a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    pub roll: DamageRoll,
    /// Health actually removed after shields and clamping.
    pub dealt: u32,
    pub absorbed: u32,
}

/// Wraps mutable access to [`BattleState`] with the primitive steps every
/// action is built from.
pub struct BattleReducer<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleReducer<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut BattleState {
        self.state
    }

    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    pub fn set_phase(&mut self, phase: BattlePhase) {
        self.state.phase = phase;
    }

    pub fn log(&mut self, actor: CombatantRef, kind: LogKind, message: impl Into<String>) {
        self.state.log.push(LogEntry {
            turn: self.state.turn,
            actor,
            message: message.into(),
            kind,
        });
    }

    pub fn info(&mut self, actor: CombatantRef, message: impl Into<String>) {
        self.log(actor, LogKind::Info, message);
    }

    pub fn emit(&mut self, event: CombatEvent) {
        self.state.events.push(event);
    }

    /// Runs a draw against the battle RNG and stores the advanced state.
    pub fn roll<T>(&mut self, draw: impl FnOnce(RngState) -> (T, RngState)) -> T {
        let (value, next) = draw(self.state.rng);
        self.state.rng = next;
        value
    }

    fn combatant_mut(&mut self, who: CombatantRef) -> Option<&mut dyn Combatant> {
        self.state.combatant_mut(who)
    }

    pub fn name_of(&self, who: CombatantRef) -> String {
        self.state.name_of(who).to_owned()
    }

    /// Emits the turn-start event and resolves the combatant's status
    /// effects.
    ///
    /// A stun counts if it was active before the tick, so a one-turn stun
    /// costs exactly one turn.
    pub fn start_turn(&mut self, who: CombatantRef) -> TurnStart {
        let turn = self.state.turn;
        self.emit(CombatEvent::TurnStarted { turn, actor: who });

        let Some(combatant) = self.combatant_mut(who) else {
            debug_assert!(false, "start_turn on missing combatant {who}");
            return TurnStart::DiedFromStatus;
        };
        let report = combatant.status_effects_mut().tick();
        combatant.stats_mut().apply_health_delta(report.health_delta);
        let alive = combatant.is_alive();
        let name = combatant.name().to_owned();

        let mut stunned = false;
        for effect in report.resolved {
            match effect {
                TickEffect::Poison { amount, .. } => self.log(
                    who,
                    LogKind::StatusTick {
                        health_delta: -i64::from(amount),
                    },
                    format!("{name} takes {amount} poison damage"),
                ),
                TickEffect::Regen { amount, .. } => self.log(
                    who,
                    LogKind::StatusTick {
                        health_delta: i64::from(amount),
                    },
                    format!("{name} regenerates {amount} HP"),
                ),
                TickEffect::Stunned => stunned = true,
            }
        }
        for expired in report.expired {
            self.info(who, format!("{name}'s {} expired", expired.name));
            self.emit(CombatEvent::StatusExpired {
                target: who,
                kind: expired.kind,
                name: expired.name,
            });
        }

        if !alive {
            TurnStart::DiedFromStatus
        } else if stunned {
            TurnStart::Stunned
        } else {
            TurnStart::Ready
        }
    }

    /// Ends a combatant's turn.
    pub fn end_turn(&mut self, who: CombatantRef) {
        let turn = self.state.turn;
        self.emit(CombatEvent::TurnEnded { turn, actor: who });
    }

    /// Applies a status effect and emits the matching event.
    pub fn apply_status(&mut self, target: CombatantRef, effect: StatusEffect) {
        let Some(combatant) = self.combatant_mut(target) else {
            return;
        };
        combatant.status_effects_mut().apply(effect.clone());
        let remaining_turns = combatant
            .status_effects()
            .get(effect.kind)
            .map_or(effect.remaining_turns, |e| e.remaining_turns);
        self.emit(CombatEvent::StatusApplied {
            target,
            kind: effect.kind,
            name: effect.name,
            remaining_turns,
        });
    }

    /// Removes harmful effects from `target`, emitting one expiry per effect.
    pub fn cleanse(&mut self, target: CombatantRef) -> usize {
        let Some(combatant) = self.combatant_mut(target) else {
            return 0;
        };
        let removed = combatant.status_effects_mut().cleanse();
        let count = removed.len();
        for effect in removed {
            self.emit(CombatEvent::StatusExpired {
                target,
                kind: effect.kind,
                name: effect.name,
            });
        }
        count
    }

    /// Rolls damage from `source` against `target` and applies it through
    /// the target's shields.
    ///
    /// `power` is 0 for a basic attack. The damage event carries the health
    /// actually removed.
    pub fn strike(
        &mut self,
        source: CombatantRef,
        target: CombatantRef,
        power: u32,
        element: Element,
        config: &BalanceConfig,
    ) -> Option<Strike> {
        let attacker = self.state.combatant(source)?;
        let defender = self.state.combatant(target)?;
        let input = DamageInput {
            power,
            attack: attacker.effective_attack(),
            speed: attacker.stats().speed,
            defense: defender.effective_defense(),
            attack_element: element,
            defense_element: defender.element(),
        };

        let roll = self.roll(|rng| calculate_damage(&input, config, rng));
        let strike = self.apply_damage(target, roll)?;
        self.emit(CombatEvent::Damage {
            source,
            target,
            amount: strike.dealt,
            critical: roll.critical,
            element,
            absorbed: strike.absorbed,
        });
        Some(strike)
    }

    fn apply_damage(&mut self, target: CombatantRef, roll: DamageRoll) -> Option<Strike> {
        let defender = self.combatant_mut(target)?;
        let absorption = defender.status_effects_mut().absorb_damage(roll.damage);
        let dealt = defender.stats_mut().take_damage(absorption.remaining);
        for shield in absorption.depleted {
            self.emit(CombatEvent::StatusExpired {
                target,
                kind: shield.kind,
                name: shield.name,
            });
        }
        Some(Strike {
            roll,
            dealt,
            absorbed: absorption.absorbed,
        })
    }

    /// Removes health without a roll and without shields.
    pub fn direct_damage(&mut self, source: CombatantRef, target: CombatantRef, amount: u32, element: Element) -> u32 {
        let Some(combatant) = self.combatant_mut(target) else {
            return 0;
        };
        let dealt = combatant.stats_mut().take_damage(amount);
        self.emit(CombatEvent::Damage {
            source,
            target,
            amount: dealt,
            critical: false,
            element,
            absorbed: 0,
        });
        dealt
    }

    /// Restores health, returning the amount actually gained.
    pub fn heal(&mut self, target: CombatantRef, amount: u32) -> u32 {
        let Some(combatant) = self.combatant_mut(target) else {
            return 0;
        };
        let gained = combatant.stats_mut().heal(amount);
        self.emit(CombatEvent::Healed { target, amount: gained });
        gained
    }

    /// Decrements every player cooldown; entries at 1 or below are dropped.
    pub fn tick_player_cooldowns(&mut self) {
        self.state.player.cooldowns.retain(|_, remaining| {
            if *remaining > 1 {
                *remaining -= 1;
                true
            } else {
                false
            }
        });
    }

    /// Moves to victory, crediting XP and rolling loot from every enemy.
    pub fn declare_victory(&mut self) {
        let xp_gained = self.state.enemies.iter().map(|e| e.xp_reward).sum();
        let tables: Vec<_> = self.state.enemies.iter().map(|e| e.loot_table.clone()).collect();
        let mut loot = Vec::new();
        for table in &tables {
            loot.extend(self.roll(|rng| crate::progression::resolve_loot(table, rng)));
        }
        self.info(CombatantRef::Player, format!("Victory! Gained {xp_gained} XP"));
        self.set_phase(BattlePhase::Victory { xp_gained, loot });
    }

    pub fn declare_defeat(&mut self, cause: impl Into<String>) {
        let cause = cause.into();
        self.info(CombatantRef::Player, format!("Defeat: {cause}"));
        self.set_phase(BattlePhase::Defeat { cause });
    }
}
