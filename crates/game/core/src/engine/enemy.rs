//! Enemy turn resolution.

use super::reducer::{BattleReducer, TurnStart};
use crate::ai::{EnemyContext, EnemyDecision, EnemyPolicy};
use crate::combat::calculate_shield;
use crate::env::{GameEnv, SpellEffectKind};
use crate::state::{CombatEvent, Combatant, CombatantRef, Element, LogKind, StatusEffect, StatusEffectKind};

const PLAYER: CombatantRef = CombatantRef::Player;

/// Self-buffs cast by monsters last for the rest of the fight.
const ENEMY_BUFF_TURNS: u32 = 99;
const ENEMY_STUN_TURNS: u32 = 1;
const ENEMY_DEBUFF_TURNS: u32 = 3;
const ENEMY_DOT_TURNS: u32 = 3;

/// Runs one enemy's turn. Dead enemies are skipped without events.
///
/// Sets the phase to defeat when the player falls; victory is left to the
/// caller.
pub(super) fn run_enemy_turn(
    r: &mut BattleReducer<'_>,
    env: &GameEnv<'_>,
    policy: &dyn EnemyPolicy,
    index: usize,
) {
    let me = CombatantRef::Enemy(index);
    let Some(enemy) = r.state().enemy(index) else {
        return;
    };
    if !enemy.is_alive() {
        return;
    }
    let name = enemy.name.clone();

    match r.start_turn(me) {
        TurnStart::DiedFromStatus => {
            r.info(me, format!("{name} was defeated by status effects!"));
            r.end_turn(me);
            return;
        }
        TurnStart::Stunned => {
            r.info(me, format!("{name} is stunned and cannot act!"));
            r.end_turn(me);
            return;
        }
        TurnStart::Ready => {}
    }

    let choice = {
        let state = r.state();
        let Some(monster) = state.enemy(index) else {
            return;
        };
        let ctx = EnemyContext {
            monster,
            player: &state.player,
            turn: state.turn,
        };
        let (choice, next) = policy.decide(&ctx, state.rng);
        r.state_mut().rng = next;
        choice
    };
    r.info(me, choice.narration);

    match choice.decision {
        EnemyDecision::Skip => {}
        EnemyDecision::HealPlayer { amount } => {
            r.heal(PLAYER, amount);
        }
        EnemyDecision::HitSelf { amount } => {
            let element = r.state().enemy(index).map_or(Element::None, |e| e.element);
            r.direct_damage(me, me, amount, element);
        }
        EnemyDecision::Attack => {
            let element = r.state().enemy(index).map_or(Element::None, |e| e.element);
            hit_player(r, env, me, 0, element);
        }
        EnemyDecision::Special { spell_id } => cast(r, env, me, &spell_id),
    }

    r.end_turn(me);
    if !r.state().player.is_alive() {
        r.declare_defeat(format!("Killed by {name}"));
    }
}

fn cast(r: &mut BattleReducer<'_>, env: &GameEnv<'_>, me: CombatantRef, spell_id: &str) {
    let Some(spell) = env.spell(spell_id) else {
        let element = r.state().combatant(me).map_or(Element::None, |c| c.element());
        hit_player(r, env, me, 0, element);
        return;
    };
    let effect = spell.effect;
    r.emit(CombatEvent::SpellResolved {
        caster: me,
        spell_id: spell.id.clone(),
        target: match effect.kind {
            SpellEffectKind::Buff | SpellEffectKind::Heal | SpellEffectKind::Shield => me,
            _ => PLAYER,
        },
        effect: effect.kind,
        value: effect.value,
    });

    match effect.kind {
        SpellEffectKind::Buff => r.apply_status(
            me,
            StatusEffect::new(
                StatusEffectKind::AttackUp,
                spell.name.clone(),
                effect.value,
                effect.duration.unwrap_or(ENEMY_BUFF_TURNS),
            ),
        ),
        SpellEffectKind::Debuff if effect.value == 0 => r.apply_status(
            PLAYER,
            StatusEffect::new(
                StatusEffectKind::Stun,
                spell.name.clone(),
                0,
                effect.duration.unwrap_or(ENEMY_STUN_TURNS),
            ),
        ),
        SpellEffectKind::Debuff => r.apply_status(
            PLAYER,
            StatusEffect::new(
                StatusEffectKind::DefenseDown,
                spell.name.clone(),
                effect.value,
                effect.duration.unwrap_or(ENEMY_DEBUFF_TURNS),
            ),
        ),
        SpellEffectKind::Dot => r.apply_status(
            PLAYER,
            StatusEffect::new(
                StatusEffectKind::Poison,
                spell.name.clone(),
                effect.value,
                effect.duration.unwrap_or(ENEMY_DOT_TURNS),
            ),
        ),
        SpellEffectKind::Heal => {
            let gained = r.heal(me, effect.value);
            r.log(
                me,
                LogKind::Heal {
                    target: me,
                    amount: gained,
                },
                format!("{} recovers {gained} HP", r.name_of(me)),
            );
        }
        SpellEffectKind::Shield => {
            let defense = r.state().combatant(me).map_or(0, |c| c.stats().defense);
            let amount = calculate_shield(effect.value, defense, env.balance);
            r.apply_status(
                me,
                StatusEffect::new(
                    StatusEffectKind::Shield,
                    spell.name.clone(),
                    amount,
                    env.balance.combat.shield_duration,
                ),
            );
        }
        _ => hit_player(r, env, me, effect.value, spell.element),
    }
}

fn hit_player(r: &mut BattleReducer<'_>, env: &GameEnv<'_>, me: CombatantRef, power: u32, element: Element) {
    let Some(strike) = r.strike(me, PLAYER, power, element, env.balance) else {
        return;
    };
    let mut message = format!(
        "{} deals {} to {}",
        r.name_of(me),
        strike.roll.describe(),
        r.name_of(PLAYER)
    );
    if strike.absorbed > 0 {
        message.push_str(&format!(" ({} absorbed by shield)", strike.absorbed));
    }
    r.log(
        me,
        LogKind::Damage {
            target: PLAYER,
            amount: strike.dealt,
            critical: strike.roll.critical,
            absorbed: strike.absorbed,
        },
        message,
    );
}
