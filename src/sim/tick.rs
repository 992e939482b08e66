//! Fixed timestep simulation step
//!
//! `step` advances PLAYING by one logical frame; `frame` is what a driver
//! calls and also runs the transition, message and pickup-notice timers.

use glam::Vec2;

use super::combat::{apply_damage, mitigated, resolve_enemy_attacks, resolve_player_attack};
use super::entity::{Bounds, Enemy, Facing, ItemPayload, Obstacle, Player};
use super::geometry::{circle_overlap, clamp_to_arena, rect_overlap};
use super::progression::{advance_room, expire_items, reap_corpses, record_kills, try_spawn_enemy};
use super::state::{GamePhase, InputIntent, PickupNotice, World};
use super::status::{apply_buff, apply_hazard_slow, apply_slow, equip_weapon, tick_buffs, tick_status_effects};
use crate::tuning::Tuning;

/// Advance one logical frame of gameplay
///
/// No-op outside PLAYING or without a player. Order: expire timed modifiers,
/// move, hazards, pickup, enemy attacks, death check, player attack, kill
/// bookkeeping and spawning, then frame-counted timers.
pub fn step(mut world: World, input: &InputIntent, dt_ms: f64) -> World {
    if world.phase != GamePhase::Playing {
        return world;
    }
    let Some(mut player) = world.player.take() else {
        return world;
    };

    world.input = *input;
    world.now_ms += dt_ms;
    let now = world.now_ms;

    // Expire timed modifiers before anything reads them
    tick_buffs(&mut player, now);
    for enemy in &mut world.enemies {
        tick_status_effects(enemy, now, &world.tuning);
    }
    expire_items(&mut world);

    move_player(&mut player, input, &world.tuning);
    let target = player.center();
    for enemy in &mut world.enemies {
        move_enemy(enemy, target, &world.tuning);
    }

    for obstacle in &mut world.obstacles {
        apply_obstacle(obstacle, &mut player, &mut world.enemies, now, &world.tuning);
    }

    pickup_item(&mut world, &mut player);

    resolve_enemy_attacks(&mut player, &mut world.enemies, now, &world.tuning);

    if player.body.is_dead() {
        log::info!("Player died in room {} (score {})", world.room, world.score);
        world.phase = GamePhase::GameOver;
        world.set_message("Game Over!");
        world.play_time_ms += dt_ms;
        world.player = Some(player);
        // Enemies that fell earlier this step still score, but cannot clear the room
        record_kills(&mut world);
        return world;
    }

    if input.attack && player.attack_cooldown_ms <= 0.0 {
        player.attack_timer.start(world.tuning.player.attack_frames);
        let struck = resolve_player_attack(&player, &mut world.enemies, now, &world.tuning);
        if !struck.is_empty() {
            log::trace!("Swing hit {:?}", struck);
        }
        player.attack_cooldown_ms = world.tuning.player.attack_cooldown_ms;
    }

    player.body.hit_timer.decay();
    player.attack_timer.decay();
    player.attack_cooldown_ms = (player.attack_cooldown_ms - dt_ms).max(0.0);
    for enemy in &mut world.enemies {
        enemy.body.hit_timer.decay();
    }

    world.player = Some(player);
    world.play_time_ms += dt_ms;

    record_kills(&mut world);
    reap_corpses(&mut world);
    try_spawn_enemy(&mut world);

    world
}

/// One driver frame: gameplay in PLAYING, the transition countdown in
/// ROOM_TRANSITION, and display timers in both. Other phases are frozen.
pub fn frame(mut world: World, dt_ms: f64) -> World {
    match world.phase {
        GamePhase::Playing => {
            let input = world.input;
            world = step(world, &input, dt_ms);
        }
        GamePhase::RoomTransition => {
            world.now_ms += dt_ms;
            if world.transition_at.is_some_and(|at| world.now_ms >= at) {
                advance_room(&mut world);
            }
        }
        GamePhase::Start | GamePhase::Paused | GamePhase::GameOver | GamePhase::Victory => {
            return world;
        }
    }
    expire_notices(&mut world);
    world
}

/// Auto-clear the message banner and pickup notice once due
fn expire_notices(world: &mut World) {
    let now = world.now_ms;
    if world.message_expires_at.is_some_and(|at| now >= at) {
        world.clear_message();
    }
    if world.pickup_expires_at.is_some_and(|at| now >= at) {
        world.clear_recent_pickup();
    }
}

/// Eight-way movement; diagonals are normalised so they are no faster.
/// Facing is overwritten in the order up, down, left, right.
pub fn move_player(player: &mut Player, input: &InputIntent, tuning: &Tuning) {
    let mut delta = Vec2::ZERO;
    if input.up {
        delta.y -= 1.0;
        player.facing = Facing::Up;
    }
    if input.down {
        delta.y += 1.0;
        player.facing = Facing::Down;
    }
    if input.left {
        delta.x -= 1.0;
        player.facing = Facing::Left;
    }
    if input.right {
        delta.x += 1.0;
        player.facing = Facing::Right;
    }
    if delta == Vec2::ZERO {
        return;
    }

    let step = delta.normalize_or_zero() * player.speed;
    player.body.pos = clamp_to_arena(
        player.body.pos + step,
        player.body.size,
        tuning.arena.width,
        tuning.arena.height,
    );
}

/// Walk a living enemy straight at `target` at its current speed
pub fn move_enemy(enemy: &mut Enemy, target: Vec2, tuning: &Tuning) {
    if enemy.is_dead() {
        return;
    }
    let to_target = target - enemy.center();
    if to_target.length_squared() == 0.0 {
        return;
    }
    enemy.body.pos = clamp_to_arena(
        enemy.body.pos + to_target.normalize() * enemy.speed,
        enemy.body.size,
        tuning.arena.width,
        tuning.arena.height,
    );
}

/// Hurt (and possibly slow) every affected entity standing in the hazard
/// whose per-entity cooldown for it has elapsed. Player first.
fn apply_obstacle(obstacle: &mut Obstacle, player: &mut Player, enemies: &mut [Enemy], now: f64, tuning: &Tuning) {
    if obstacle.affects_player
        && !player.body.is_dead()
        && rect_overlap(&*obstacle, &*player)
        && obstacle.ready_for(player.body.id, now)
    {
        apply_damage(&mut player.body, mitigated(obstacle.damage, player.defense), tuning);
        if let Some((multiplier, duration_ms)) = obstacle.slow {
            apply_hazard_slow(player, multiplier, duration_ms, now);
        }
        obstacle.stamp(player.body.id, now);
    }

    if !obstacle.affects_enemies {
        return;
    }
    for enemy in enemies.iter_mut() {
        if enemy.is_dead() || !rect_overlap(&*obstacle, &*enemy) || !obstacle.ready_for(enemy.body.id, now) {
            continue;
        }
        apply_damage(&mut enemy.body, obstacle.damage, tuning);
        if let Some((multiplier, duration_ms)) = obstacle.slow {
            apply_slow(enemy, multiplier, duration_ms, now);
        }
        obstacle.stamp(enemy.body.id, now);
    }
}

/// Pick up the first item touching a living player, if any
fn pickup_item(world: &mut World, player: &mut Player) {
    if player.body.is_dead() {
        return;
    }
    let Some(index) = world.items.iter().position(|item| circle_overlap(item, &*player)) else {
        return;
    };
    let item = world.items.remove(index);
    let now = world.now_ms;

    match &item.payload {
        ItemPayload::Heal(amount) => {
            player.body.health = (player.body.health + amount).min(player.body.max_health);
        }
        ItemPayload::Buff(spec) => apply_buff(player, spec, now),
        ItemPayload::Weapon(weapon) => equip_weapon(player, weapon.clone()),
    }

    log::debug!("Picked up {}", item.name);
    world.set_recent_pickup(PickupNotice {
        name: item.name.clone(),
        category: item.category(),
    });
}
