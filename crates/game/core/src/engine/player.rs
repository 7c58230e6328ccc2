//! Player turn resolution.

use super::reducer::{BattleReducer, TurnStart};
use crate::action::BattleAction;
use crate::combat::{calculate_healing, calculate_shield};
use crate::env::{GameEnv, SpellDefinition, SpellEffectKind};
use crate::state::{
    CombatEvent, Combatant, CombatantRef, LogKind, StatusEffect, StatusEffectKind,
};

const PLAYER: CombatantRef = CombatantRef::Player;

/// Default turns for effects whose spell leaves the duration unset.
const DEFAULT_BUFF_TURNS: u32 = 3;
const DEFAULT_DEBUFF_TURNS: u32 = 3;
const DEFAULT_STUN_TURNS: u32 = 1;
const DEFAULT_DOT_TURNS: u32 = 3;

/// Runs the player's half of a round for an already validated action.
///
/// Leaves the phase terminal when the player dies from a status effect or
/// the last enemy falls; otherwise the phase is untouched and the caller
/// proceeds to the enemies.
pub(super) fn run_player_turn(r: &mut BattleReducer<'_>, env: &GameEnv<'_>, action: &BattleAction) {
    let name = r.name_of(PLAYER);
    match r.start_turn(PLAYER) {
        TurnStart::DiedFromStatus => {
            r.declare_defeat("Killed by status effect");
            return;
        }
        TurnStart::Stunned => {
            r.info(PLAYER, format!("{name} is stunned and cannot act!"));
            r.end_turn(PLAYER);
            return;
        }
        TurnStart::Ready => {}
    }

    r.tick_player_cooldowns();

    match action {
        BattleAction::Attack { target_index } => attack(r, env, *target_index),
        BattleAction::CastSpell {
            spell_id,
            target_index,
        } => {
            if let Some(spell) = env.spell(spell_id) {
                cast_spell(r, env, spell, target_index.unwrap_or(0));
            }
        }
        BattleAction::Defend => defend(r, env),
        BattleAction::UseItem { item_id } => use_item(r, env, item_id),
        BattleAction::EnemyAct { .. } => {
            debug_assert!(false, "enemy step routed to the player turn");
        }
    }

    r.end_turn(PLAYER);
    if r.state().all_enemies_defeated() {
        r.declare_victory();
    }
}

fn attack(r: &mut BattleReducer<'_>, env: &GameEnv<'_>, requested: usize) {
    let Some(index) = r.state().resolve_target(requested) else {
        return;
    };
    let target = CombatantRef::Enemy(index);
    let Some(strike) = r.strike(PLAYER, target, 0, crate::state::Element::None, env.balance) else {
        return;
    };

    let mut message = format!(
        "{} attacks {} for {}",
        r.name_of(PLAYER),
        r.name_of(target),
        strike.roll.describe()
    );
    if strike.absorbed > 0 {
        message.push_str(&format!(" ({} absorbed by shield)", strike.absorbed));
    }
    r.log(
        PLAYER,
        LogKind::Damage {
            target,
            amount: strike.dealt,
            critical: strike.roll.critical,
            absorbed: strike.absorbed,
        },
        message,
    );
}

fn defend(r: &mut BattleReducer<'_>, env: &GameEnv<'_>) {
    let bonus = env.balance.combat.defend_defense_bonus;
    let duration = env.balance.combat.defend_duration;
    r.apply_status(
        PLAYER,
        StatusEffect::new(StatusEffectKind::DefenseUp, "Defend", bonus, duration),
    );
    r.info(
        PLAYER,
        format!("{} takes a defensive stance! DEF +{bonus} this turn", r.name_of(PLAYER)),
    );
}

fn use_item(r: &mut BattleReducer<'_>, env: &GameEnv<'_>, item_id: &str) {
    let Some(item) = env.item(item_id) else {
        return;
    };
    let name = r.name_of(PLAYER);
    r.log(
        PLAYER,
        LogKind::ItemUsed {
            item_id: item.id.clone(),
        },
        format!("{name} uses {}", item.name),
    );
    r.emit(CombatEvent::ItemUsed {
        item_id: item.id.clone(),
    });

    let outcome = item.effect.apply_to(&mut r.state_mut().player, &item.name);
    if outcome.healed > 0 {
        r.emit(CombatEvent::Healed {
            target: PLAYER,
            amount: outcome.healed,
        });
        r.log(
            PLAYER,
            LogKind::Heal {
                target: PLAYER,
                amount: outcome.healed,
            },
            format!("{name} recovers {} HP", outcome.healed),
        );
    }
    if outcome.mana_restored > 0 {
        r.info(PLAYER, format!("{name} recovers {} mana", outcome.mana_restored));
    }
    if let Some(effect) = outcome.applied {
        r.emit(CombatEvent::StatusApplied {
            target: PLAYER,
            kind: effect.kind,
            name: effect.name,
            remaining_turns: effect.remaining_turns,
        });
    }
    for effect in outcome.cleansed {
        r.emit(CombatEvent::StatusExpired {
            target: PLAYER,
            kind: effect.kind,
            name: effect.name,
        });
    }
}

fn cast_spell(r: &mut BattleReducer<'_>, env: &GameEnv<'_>, spell: &SpellDefinition, requested: usize) {
    let name = r.name_of(PLAYER);
    {
        let player = &mut r.state_mut().player;
        player.stats.spend_mana(spell.mana_cost);
        if spell.cooldown > 0 {
            player.cooldowns.insert(spell.id.clone(), spell.cooldown);
        }
    }
    r.log(
        PLAYER,
        LogKind::SpellCast {
            spell_id: spell.id.clone(),
        },
        format!("{name} casts {}", spell.name),
    );

    let effect = spell.effect;

    match effect.kind {
        SpellEffectKind::Damage => {
            let Some(index) = r.state().resolve_target(requested) else {
                return;
            };
            spell_hit(r, env, spell, index);
        }
        SpellEffectKind::AoeDamage => {
            let targets: Vec<usize> = r.state().living_enemies().map(|(i, _)| i).collect();
            for index in targets {
                spell_hit(r, env, spell, index);
            }
        }
        SpellEffectKind::Heal => {
            let amount = calculate_healing(effect.value, r.state().player.effective_attack(), env.balance);
            let gained = r.heal(PLAYER, amount);
            r.log(
                PLAYER,
                LogKind::Heal {
                    target: PLAYER,
                    amount: gained,
                },
                format!("{} heals {name} for {gained} HP", spell.name),
            );
            resolved(r, spell, PLAYER, gained);
            if let Some(duration) = effect.duration.filter(|d| *d > 1) {
                r.apply_status(
                    PLAYER,
                    StatusEffect::new(
                        StatusEffectKind::Regen,
                        format!("{} HoT", spell.name),
                        effect.value / 2,
                        duration,
                    ),
                );
            }
        }
        SpellEffectKind::Shield => {
            let amount = calculate_shield(effect.value, r.state().player.stats.defense, env.balance);
            r.apply_status(
                PLAYER,
                StatusEffect::new(
                    StatusEffectKind::Shield,
                    spell.name.clone(),
                    amount,
                    env.balance.combat.shield_duration,
                ),
            );
            r.info(PLAYER, format!("{name} gains a {amount} point shield"));
            resolved(r, spell, PLAYER, amount);
        }
        SpellEffectKind::Buff => {
            r.apply_status(
                PLAYER,
                StatusEffect::new(
                    StatusEffectKind::AttackUp,
                    spell.name.clone(),
                    effect.value,
                    effect.duration.unwrap_or(DEFAULT_BUFF_TURNS),
                ),
            );
            r.info(PLAYER, format!("{name} gains ATK +{}", effect.value));
            resolved(r, spell, PLAYER, effect.value);
        }
        SpellEffectKind::Debuff => {
            let Some(index) = r.state().resolve_target(requested) else {
                return;
            };
            let target = CombatantRef::Enemy(index);
            let target_name = r.name_of(target);
            if effect.value == 0 {
                r.apply_status(
                    target,
                    StatusEffect::new(
                        StatusEffectKind::Stun,
                        spell.name.clone(),
                        0,
                        effect.duration.unwrap_or(DEFAULT_STUN_TURNS),
                    ),
                );
                r.info(PLAYER, format!("{target_name} is stunned!"));
            } else {
                r.apply_status(
                    target,
                    StatusEffect::new(
                        StatusEffectKind::DefenseDown,
                        spell.name.clone(),
                        effect.value,
                        effect.duration.unwrap_or(DEFAULT_DEBUFF_TURNS),
                    ),
                );
                r.info(PLAYER, format!("{target_name} loses DEF -{}", effect.value));
            }
            resolved(r, spell, target, effect.value);
        }
        SpellEffectKind::Dot => {
            let Some(index) = r.state().resolve_target(requested) else {
                return;
            };
            let target = CombatantRef::Enemy(index);
            r.apply_status(
                target,
                StatusEffect::new(
                    StatusEffectKind::Poison,
                    spell.name.clone(),
                    effect.value,
                    effect.duration.unwrap_or(DEFAULT_DOT_TURNS),
                ),
            );
            r.info(
                PLAYER,
                format!("{} is poisoned for {}/turn", r.name_of(target), effect.value),
            );
            resolved(r, spell, target, effect.value);
        }
        SpellEffectKind::Cleanse => {
            let removed = r.cleanse(PLAYER);
            r.info(PLAYER, format!("{name} removes {removed} debuff(s)"));
            resolved(r, spell, PLAYER, 0);
        }
        SpellEffectKind::Revive => {
            let gained = r.heal(PLAYER, effect.value);
            r.log(
                PLAYER,
                LogKind::Heal {
                    target: PLAYER,
                    amount: gained,
                },
                format!("{name} restores {gained} HP"),
            );
            resolved(r, spell, PLAYER, gained);
        }
        SpellEffectKind::Taunt => {
            r.info(PLAYER, format!("{name} draws the enemies' attention!"));
            resolved(r, spell, PLAYER, 0);
        }
    }
}

fn spell_hit(
    r: &mut BattleReducer<'_>,
    env: &GameEnv<'_>,
    spell: &SpellDefinition,
    index: usize,
) {
    let target = CombatantRef::Enemy(index);
    let Some(strike) = r.strike(PLAYER, target, spell.effect.value, spell.element, env.balance) else {
        return;
    };
    let mut message = format!("{} hits {} for {}", spell.name, r.name_of(target), strike.roll.describe());
    if strike.absorbed > 0 {
        message.push_str(&format!(" ({} absorbed)", strike.absorbed));
    }
    r.log(
        PLAYER,
        LogKind::Damage {
            target,
            amount: strike.dealt,
            critical: strike.roll.critical,
            absorbed: strike.absorbed,
        },
        message,
    );
    resolved(r, spell, target, strike.dealt);
}

fn resolved(r: &mut BattleReducer<'_>, spell: &SpellDefinition, target: CombatantRef, value: u32) {
    r.emit(CombatEvent::SpellResolved {
        caster: PLAYER,
        spell_id: spell.id.clone(),
        target,
        effect: spell.effect.kind,
        value,
    });
}
