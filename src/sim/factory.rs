//! Entity construction with room-scaled stats and placement search
//!
//! None of these can fail: when the placement search runs out of attempts the
//! last candidate is accepted as-is.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::entity::{
    Body, Bounds, Enemy, EnemyKind, EntityId, Facing, FrameTimer, Item, Obstacle, Player, Sprite,
};
use crate::tuning::{ArenaTuning, ItemDef, ObstacleDef, Tuning};

/// Player centred in the arena with base stats, no weapon and no buffs
pub fn make_player(id: EntityId, tuning: &Tuning) -> Player {
    let cfg = &tuning.player;
    let pos = Vec2::new(
        tuning.arena.width / 2.0 - cfg.size / 2.0,
        tuning.arena.height / 2.0 - cfg.size / 2.0,
    );
    Player {
        body: Body::new(id, pos, cfg.size, cfg.max_health),
        facing: Facing::Right,
        attack_timer: FrameTimer::default(),
        attack_cooldown_ms: 0.0,
        base_speed: cfg.speed,
        base_damage: cfg.attack_damage,
        speed: cfg.speed,
        damage: cfg.attack_damage,
        defense: 1.0,
        weapon: None,
        buffs: Vec::new(),
        hazard_slow: None,
    }
}

/// Health/damage multiplier for a room: `1 + (room - 1) * step`
pub fn difficulty_multiplier(room: u32, step: f32) -> f32 {
    1.0 + room.saturating_sub(1) as f32 * step
}

/// Regular enemy scaled to `room`, spawned on an arena edge away from the player
pub fn make_enemy(id: EntityId, player_center: Vec2, room: u32, tuning: &Tuning, rng: &mut impl Rng) -> Enemy {
    let cfg = &tuning.enemy;
    let mult = difficulty_multiplier(room, cfg.difficulty_step);
    let health = (cfg.base_health as f32 * mult).round() as u32;
    let damage = (cfg.base_damage as f32 * mult).round() as u32;
    let speed = cfg.base_speed + room.saturating_sub(1) as f32 * cfg.speed_per_room;
    let pos = edge_spawn_position(
        player_center,
        cfg.size,
        cfg.min_spawn_distance,
        cfg.spawn_attempts,
        &tuning.arena,
        rng,
    );

    Enemy {
        body: Body::new(id, pos, cfg.size, health.max(1)),
        kind: EnemyKind::Regular,
        base_speed: speed,
        speed,
        damage,
        last_attack_at: None,
        effects: Vec::new(),
        died_at: None,
        sprite: Sprite::for_room(room),
    }
}

/// The boss: fixed stats, spawned further from the player
pub fn make_boss(id: EntityId, player_center: Vec2, tuning: &Tuning, rng: &mut impl Rng) -> Enemy {
    let cfg = &tuning.boss;
    let pos = edge_spawn_position(
        player_center,
        cfg.size,
        cfg.min_spawn_distance,
        tuning.enemy.spawn_attempts,
        &tuning.arena,
        rng,
    );

    Enemy {
        body: Body::new(id, pos, cfg.size, cfg.health.max(1)),
        kind: EnemyKind::Boss,
        base_speed: cfg.speed,
        speed: cfg.speed,
        damage: cfg.damage,
        last_attack_at: None,
        effects: Vec::new(),
        died_at: None,
        sprite: Sprite::Boss,
    }
}

/// Pick a point on a random arena edge whose centre is at least
/// `min_distance` from `player_center`
pub fn edge_spawn_position(
    player_center: Vec2,
    size: f32,
    min_distance: f32,
    attempts: u32,
    arena: &ArenaTuning,
    rng: &mut impl Rng,
) -> Vec2 {
    let max_x = (arena.width - size).max(0.0);
    let max_y = (arena.height - size).max(0.0);
    let mut candidate = Vec2::ZERO;

    for _ in 0..attempts.max(1) {
        candidate = match rng.random_range(0..4) {
            0 => Vec2::new(rng.random::<f32>() * max_x, 0.0),
            1 => Vec2::new(max_x, rng.random::<f32>() * max_y),
            2 => Vec2::new(rng.random::<f32>() * max_x, max_y),
            _ => Vec2::new(0.0, rng.random::<f32>() * max_y),
        };
        let center = candidate + Vec2::splat(size / 2.0);
        if center.distance(player_center) >= min_distance {
            return candidate;
        }
    }

    log::warn!(
        "Spawn placement exhausted {} attempts, accepting ({:.0}, {:.0})",
        attempts,
        candidate.x,
        candidate.y
    );
    candidate
}

/// Ground item from a drop-table entry, stamped with its expiry
pub fn make_item(id: EntityId, def: &ItemDef, pos: Vec2, now: f64, tuning: &Tuning) -> Item {
    Item {
        id,
        name: def.name.clone(),
        pos,
        size: tuning.items.size,
        payload: def.payload.clone(),
        spawned_at: now,
        expires_at: now + tuning.items.ttl_ms,
    }
}

/// Random hazard placed clear of the player and of `existing` hazards
pub fn make_obstacle(
    id: EntityId,
    existing: &[Obstacle],
    player_center: Vec2,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Obstacle {
    let cfg = &tuning.obstacles;
    let def: ObstacleDef = cfg.kinds.choose(rng).copied().unwrap_or_default();
    let span_x = (tuning.arena.width - def.size - cfg.padding * 2.0).max(0.0);
    let span_y = (tuning.arena.height - def.size - cfg.padding * 2.0).max(0.0);
    let half = Vec2::splat(def.size / 2.0);

    let mut candidate = Vec2::splat(cfg.padding);
    let mut placed = false;
    for _ in 0..cfg.placement_attempts.max(1) {
        candidate = Vec2::new(
            cfg.padding + rng.random::<f32>() * span_x,
            cfg.padding + rng.random::<f32>() * span_y,
        );
        let center = candidate + half;
        let clear_of_player = center.distance(player_center) >= cfg.min_player_distance;
        let clear_of_others = existing
            .iter()
            .all(|o| center.distance(o.center()) >= cfg.min_separation);
        if clear_of_player && clear_of_others {
            placed = true;
            break;
        }
    }
    if !placed {
        log::warn!("{} placement exhausted its attempts, accepting best effort", def.kind.name());
    }

    Obstacle {
        id,
        kind: def.kind,
        pos: candidate,
        size: def.size,
        damage: def.damage,
        interval_ms: def.interval_ms,
        slow: def.slow,
        affects_player: def.affects_player,
        affects_enemies: def.affects_enemies,
        last_hit: BTreeMap::new(),
    }
}
