//! Timed modifiers: player buffs, hazard slow, and weapon-inflicted enemy
//! status effects
//!
//! Derived player stats are always rebuilt from base values, never scaled
//! in place.

use super::combat::apply_damage;
use super::entity::{Buff, BuffSpec, EffectTag, Enemy, Player, SlowEffect, Stat, StatusEffect, Weapon, WeaponEffect};
use crate::tuning::Tuning;

/// Product of active buff multipliers for one stat
fn buff_multiplier(player: &Player, stat: Stat) -> f32 {
    player
        .buffs
        .iter()
        .filter(|b| b.stat == stat)
        .map(|b| b.multiplier)
        .product()
}

/// Rebuild speed, damage and defense from base values and active modifiers
pub fn recompute_stats(player: &mut Player) {
    let slow = player.hazard_slow.map(|s| s.multiplier).unwrap_or(1.0);
    player.speed = player.base_speed * buff_multiplier(player, Stat::Speed) * slow;
    player.damage = (player.base_damage as f32 * buff_multiplier(player, Stat::Damage)).round() as u32;
    player.defense = buff_multiplier(player, Stat::Defense);
}

/// Replace any buff on the same stat, then recompute
pub fn apply_buff(player: &mut Player, spec: &BuffSpec, now: f64) {
    player.buffs.retain(|b| b.stat != spec.stat);
    player.buffs.push(Buff {
        stat: spec.stat,
        multiplier: spec.multiplier,
        expires_at: now + spec.duration_ms,
        name: spec.name.clone(),
    });
    recompute_stats(player);
    log::debug!("Buff {} applied (x{} {:?})", spec.name, spec.multiplier, spec.stat);
}

/// Drop expired buffs and hazard slow. Returns true (and recomputes) only
/// when something expired.
pub fn tick_buffs(player: &mut Player, now: f64) -> bool {
    let before = player.buffs.len();
    player.buffs.retain(|b| b.expires_at > now);
    let mut changed = player.buffs.len() != before;

    if player.hazard_slow.is_some_and(|s| s.expires_at <= now) {
        player.hazard_slow = None;
        changed = true;
    }

    if changed {
        recompute_stats(player);
    }
    changed
}

/// Slow the player (poison pools); refreshes rather than stacks
pub fn apply_hazard_slow(player: &mut Player, multiplier: f32, duration_ms: f64, now: f64) {
    if player.body.is_dead() {
        return;
    }
    player.hazard_slow = Some(SlowEffect {
        multiplier,
        expires_at: now + duration_ms,
    });
    recompute_stats(player);
}

/// Equip a weapon, replacing any previous one and its base damage
pub fn equip_weapon(player: &mut Player, weapon: Weapon) {
    player.base_damage = weapon.damage;
    player.weapon = Some(weapon);
    recompute_stats(player);
}

/// Set (or refresh) a slow on an enemy and apply its speed immediately
pub fn apply_slow(enemy: &mut Enemy, multiplier: f32, duration_ms: f64, now: f64) {
    if enemy.is_dead() {
        return;
    }
    enemy.effects.retain(|e| e.tag() != EffectTag::Slow);
    enemy.effects.push(StatusEffect::Slow {
        multiplier,
        expires_at: now + duration_ms,
    });
    enemy.speed = enemy.base_speed * multiplier;
}

/// Inflict a weapon's elemental effect. Burn and slow replace an existing
/// effect of the same tag; chain is resolved by the combat resolver.
pub fn apply_weapon_effect(enemy: &mut Enemy, effect: &WeaponEffect, now: f64) {
    if enemy.is_dead() {
        return;
    }
    match *effect {
        WeaponEffect::Burn {
            damage_per_tick,
            tick_interval_ms,
            duration_ms,
        } => {
            enemy.effects.retain(|e| e.tag() != EffectTag::Burn);
            enemy.effects.push(StatusEffect::Burn {
                damage_per_tick,
                tick_interval_ms,
                next_tick_at: now + tick_interval_ms,
                expires_at: now + duration_ms,
            });
        }
        WeaponEffect::Slow {
            multiplier,
            duration_ms,
        } => apply_slow(enemy, multiplier, duration_ms, now),
        WeaponEffect::Chain { .. } | WeaponEffect::None => {}
    }
}

/// Expire effects and run due burn ticks. Returns the burn damage dealt this
/// call, applied through the regular damage path.
pub fn tick_status_effects(enemy: &mut Enemy, now: f64, tuning: &Tuning) -> u32 {
    if enemy.is_dead() || enemy.effects.is_empty() {
        return 0;
    }

    let mut damage = 0;
    let mut ticked = false;
    let mut slow_expired = false;

    enemy.effects.retain_mut(|effect| {
        if now >= effect.expires_at() {
            if effect.tag() == EffectTag::Slow {
                slow_expired = true;
            }
            return false;
        }
        if let StatusEffect::Burn {
            damage_per_tick,
            tick_interval_ms,
            next_tick_at,
            ..
        } = effect
        {
            if now >= *next_tick_at {
                damage += *damage_per_tick;
                *next_tick_at += *tick_interval_ms;
                ticked = true;
            }
        }
        true
    });

    if slow_expired {
        enemy.speed = enemy.base_speed;
    }
    if ticked {
        apply_damage(&mut enemy.body, damage, tuning);
        if enemy.is_dead() {
            enemy.effects.clear();
        }
    }
    damage
}
