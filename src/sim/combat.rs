//! Hit resolution: damage application, the player's swing (including chain
//! lightning) and enemy contact attacks
//!
//! Nothing is removed here. Dead enemies stay in the list until progression
//! books the kill and the grace window passes.

use std::collections::BTreeSet;

use super::entity::{Body, Bounds, Enemy, EnemyKind, EntityId, Player, WeaponEffect};
use super::geometry::{circle_overlap, enemies_near, within_attack_range};
use super::status::apply_weapon_effect;
use crate::tuning::Tuning;

/// `health = max(0, health - amount)` and start the hit flash
///
/// Already-dead bodies are left untouched. Whether a zero-magnitude hit
/// flashes is controlled by `combat.flash_on_zero_damage`.
pub fn apply_damage(body: &mut Body, amount: u32, tuning: &Tuning) {
    if body.is_dead() {
        return;
    }
    if amount == 0 && !tuning.combat.flash_on_zero_damage {
        return;
    }
    body.health = body.health.saturating_sub(amount);
    body.hit_timer.start(tuning.timing.hit_flash_frames);
}

/// Incoming damage after the player's defense multiplier
pub fn mitigated(amount: u32, defense: f32) -> u32 {
    (amount as f32 * defense).round().max(0.0) as u32
}

/// Swing at every living enemy in range, apply the weapon's effect to each
/// struck enemy, then resolve chain lightning one level deep.
///
/// Returns the ids of enemies struck by the primary swing.
pub fn resolve_player_attack(player: &Player, enemies: &mut [Enemy], now: f64, tuning: &Tuning) -> Vec<EntityId> {
    let range = tuning.player.attack_range;
    let effect = player.weapon.as_ref().map(|w| w.effect).unwrap_or_default();

    let mut struck = Vec::new();
    for enemy in enemies.iter_mut() {
        if enemy.is_dead() || !within_attack_range(player, &*enemy, range) {
            continue;
        }
        apply_damage(&mut enemy.body, player.damage, tuning);
        apply_weapon_effect(enemy, &effect, now);
        struck.push(enemy.body.id);
    }

    if let WeaponEffect::Chain {
        range: chain_range,
        damage,
        max_targets,
    } = effect
    {
        resolve_chain(&struck, enemies, chain_range, damage, max_targets, tuning);
    }

    struck
}

/// Arc from the primary targets to at most `max_targets` other enemies per
/// swing, each within `chain_range` of the target it arcs from. Each enemy
/// is chained at most once and chained hits do not propagate further.
fn resolve_chain(
    struck: &[EntityId],
    enemies: &mut [Enemy],
    chain_range: f32,
    damage: u32,
    max_targets: usize,
    tuning: &Tuning,
) {
    let mut chained: BTreeSet<EntityId> = BTreeSet::new();

    for &source_id in struck {
        let remaining = max_targets.saturating_sub(chained.len());
        if remaining == 0 {
            break;
        }
        let Some(source_center) = enemies.iter().find(|e| e.body.id == source_id).map(|e| e.center()) else {
            continue;
        };

        let targets: Vec<usize> = enemies_near(enemies, source_center, chain_range)
            .into_iter()
            .filter(|&i| {
                let e = &enemies[i];
                e.body.id != source_id
                    && !struck.contains(&e.body.id)
                    && !chained.contains(&e.body.id)
                    && !e.is_dead()
            })
            .take(remaining)
            .collect();

        for idx in targets {
            let target = &mut enemies[idx];
            apply_damage(&mut target.body, damage, tuning);
            chained.insert(target.body.id);
            log::debug!("Chain lightning {} -> {} for {}", source_id, target.body.id, damage);
        }
    }
}

/// Every living enemy touching the player whose own cooldown has elapsed
/// lands one hit. Returns total damage dealt.
pub fn resolve_enemy_attacks(player: &mut Player, enemies: &mut [Enemy], now: f64, tuning: &Tuning) -> u32 {
    let mut total = 0;
    for enemy in enemies.iter_mut() {
        if enemy.is_dead() || player.body.is_dead() || !circle_overlap(&*player, &*enemy) {
            continue;
        }
        let cooldown = match enemy.kind {
            EnemyKind::Boss => tuning.boss.attack_cooldown_ms,
            EnemyKind::Regular => tuning.enemy.attack_cooldown_ms,
        };
        let ready = enemy.last_attack_at.is_none_or(|at| now - at > cooldown);
        if !ready {
            continue;
        }

        let amount = mitigated(enemy.damage, player.defense);
        apply_damage(&mut player.body, amount, tuning);
        enemy.last_attack_at = Some(now);
        total += amount;
    }
    total
}
