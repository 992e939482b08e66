//! Spawning and room progression
//!
//! Kill bookkeeping happens the step an enemy reaches zero health; the corpse
//! lingers for the death grace window and is reaped afterwards.

use glam::Vec2;
use rand::Rng;

use super::entity::{Bounds, EntityId};
use super::factory::{make_boss, make_enemy, make_item, make_obstacle};
use super::state::{GamePhase, World};
use crate::tuning::ItemDef;

/// Where spawns and hazards keep their distance from
fn player_center(world: &World) -> Vec2 {
    match &world.player {
        Some(player) => player.center(),
        None => Vec2::new(world.tuning.arena.width / 2.0, world.tuning.arena.height / 2.0),
    }
}

/// Reset every per-room counter and collection for `world.room`
pub fn enter_room(world: &mut World) {
    world.enemies_spawned = 0;
    world.enemies_killed = 0;
    world.enemies_required = world.tuning.rooms.enemy_count(world.room);
    world.enemies.clear();
    world.items.clear();
    world.last_spawn_at = None;
    world.transition_at = None;
    generate_obstacles(world);

    let message = if world.is_boss_room() {
        format!("Room {} - BOSS FIGHT!", world.room)
    } else {
        format!("Room {} - Fight!", world.room)
    };
    log::info!("Entering room {} ({} enemies)", world.room, world.enemies_required);
    world.set_message(message);
    world.phase = GamePhase::Playing;
}

/// Replace the room's hazards
pub fn generate_obstacles(world: &mut World) {
    world.obstacles.clear();
    let count = world.tuning.rooms.obstacle_count(world.room);
    let center = player_center(world);
    for _ in 0..count {
        let id = world.next_entity_id();
        let obstacle = make_obstacle(id, &world.obstacles, center, &world.tuning, &mut world.rng);
        log::debug!("Placed {} at ({:.0}, {:.0})", obstacle.kind.name(), obstacle.pos.x, obstacle.pos.y);
        world.obstacles.push(obstacle);
    }
}

/// Spawn one enemy (or the boss) when the room still owes enemies, the
/// concurrency cap allows it and the spawn delay has elapsed.
///
/// Returns the new enemy's id.
pub fn try_spawn_enemy(world: &mut World) -> Option<EntityId> {
    if world.phase != GamePhase::Playing || world.player.is_none() {
        return None;
    }
    if world.enemies_spawned >= world.enemies_required {
        return None;
    }
    if world.enemies.len() >= world.tuning.rooms.concurrency_cap(world.room) {
        return None;
    }
    let now = world.now_ms;
    let delay = world.tuning.timing.spawn_delay_ms;
    if world.last_spawn_at.is_some_and(|at| now - at <= delay) {
        return None;
    }

    let id = world.next_entity_id();
    let center = player_center(world);
    let enemy = if world.is_boss_room() {
        make_boss(id, center, &world.tuning, &mut world.rng)
    } else {
        make_enemy(id, center, world.room, &world.tuning, &mut world.rng)
    };

    log::debug!(
        "Spawned {:?} {} at ({:.0}, {:.0}) [{}/{}]",
        enemy.kind,
        id,
        enemy.body.pos.x,
        enemy.body.pos.y,
        world.enemies_spawned + 1,
        world.enemies_required
    );
    world.enemies.push(enemy);
    world.enemies_spawned += 1;
    world.last_spawn_at = Some(now);
    Some(id)
}

/// First successful independent roll in table order
pub fn roll_drop<'a>(table: &'a [ItemDef], rng: &mut impl Rng) -> Option<&'a ItemDef> {
    table.iter().find(|def| rng.random::<f64>() < def.drop_chance)
}

/// Book every enemy that died since the last call: kill counter, score,
/// item drop, then the room-clear check. Returns the number of new kills.
pub fn record_kills(world: &mut World) -> u32 {
    let now = world.now_ms;
    let newly_dead: Vec<(EntityId, bool, Vec2)> = world
        .enemies
        .iter_mut()
        .filter(|e| e.is_dead() && e.died_at.is_none())
        .map(|e| {
            e.died_at = Some(now);
            e.effects.clear();
            (e.body.id, e.is_boss(), e.body.pos)
        })
        .collect();

    for &(id, is_boss, pos) in &newly_dead {
        let base = world.tuning.rooms.score_per_kill;
        let value = if is_boss { base * world.tuning.boss.score_multiplier } else { base };
        world.enemies_killed += 1;
        world.score += value;
        log::debug!(
            "Enemy {} killed (+{}) [{}/{}]",
            id,
            value,
            world.enemies_killed,
            world.enemies_required
        );
        drop_item(world, pos);
    }

    let kills = newly_dead.len() as u32;
    if kills > 0 && world.phase == GamePhase::Playing && world.enemies_killed >= world.enemies_required {
        clear_room(world);
    }
    kills
}

fn drop_item(world: &mut World, pos: Vec2) {
    let Some(def) = roll_drop(&world.tuning.items.table, &mut world.rng).cloned() else {
        return;
    };
    let id = world.next_entity_id();
    let item = make_item(id, &def, pos, world.now_ms, &world.tuning);
    log::debug!("{} dropped at ({:.0}, {:.0})", item.name, pos.x, pos.y);
    world.items.push(item);
}

/// Boss room: victory. Otherwise start the transition countdown.
fn clear_room(world: &mut World) {
    if world.is_boss_room() {
        log::info!("Boss defeated in room {}, victory (score {})", world.room, world.score);
        world.phase = GamePhase::Victory;
        world.transition_at = None;
        world.set_message("Victory! You defeated the boss!");
        return;
    }

    log::info!("Room {} cleared (score {})", world.room, world.score);
    world.phase = GamePhase::RoomTransition;
    world.transition_at = Some(world.now_ms + world.tuning.timing.room_clear_delay_ms);
    world.set_message(format!("Room {} Cleared!", world.room));
}

/// Move to the next room, or to victory past the last one
pub fn advance_room(world: &mut World) {
    world.room += 1;
    if world.room > world.tuning.rooms.total {
        log::info!("All rooms cleared, victory");
        world.room = world.tuning.rooms.total;
        world.phase = GamePhase::Victory;
        world.transition_at = None;
        world.set_message("Victory!");
        return;
    }
    enter_room(world);
}

/// Drop corpses whose grace window has passed
pub fn reap_corpses(world: &mut World) {
    let now = world.now_ms;
    let grace = world.tuning.timing.death_grace_ms;
    world
        .enemies
        .retain(|e| e.died_at.is_none_or(|at| now - at < grace));
}

/// Drop unclaimed items whose TTL has elapsed. Returns how many expired.
pub fn expire_items(world: &mut World) -> usize {
    let now = world.now_ms;
    let before = world.items.len();
    world.items.retain(|item| !item.is_expired(now));
    before - world.items.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::factory::make_player;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_world() -> World {
        let mut world = World::new(Tuning::default(), 7);
        let id = world.next_entity_id();
        world.player = Some(make_player(id, &world.tuning));
        enter_room(&mut world);
        world
    }

    #[test]
    fn test_enter_room_resets_counters() {
        let world = playing_world();
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.enemies_required, 3);
        assert_eq!(world.obstacles.len(), 1);
        assert_eq!(world.message.as_deref(), Some("Room 1 - Fight!"));
    }

    #[test]
    fn test_spawn_respects_delay_and_total() {
        let mut world = playing_world();
        assert!(try_spawn_enemy(&mut world).is_some());
        // Delay has not elapsed
        assert!(try_spawn_enemy(&mut world).is_none());

        world.now_ms += 1000.0;
        assert!(try_spawn_enemy(&mut world).is_none(), "delay must be exceeded, not met");
        world.now_ms += 1.0;
        assert!(try_spawn_enemy(&mut world).is_some());
        world.now_ms += 1001.0;
        assert!(try_spawn_enemy(&mut world).is_some());
        world.now_ms += 1001.0;
        assert!(try_spawn_enemy(&mut world).is_none(), "room only owes three");
        assert_eq!(world.enemies_spawned, 3);
    }

    #[test]
    fn test_spawn_respects_concurrency_cap() {
        let mut world = playing_world();
        world.enemies_required = 20;
        for _ in 0..10 {
            world.now_ms += 1001.0;
            try_spawn_enemy(&mut world);
        }
        assert_eq!(world.enemies.len(), 5);
    }

    #[test]
    fn test_boss_room_spawns_boss() {
        let mut world = playing_world();
        world.room = 5;
        enter_room(&mut world);
        assert_eq!(world.message.as_deref(), Some("Room 5 - BOSS FIGHT!"));
        try_spawn_enemy(&mut world);
        assert_eq!(world.enemies.len(), 1);
        assert!(world.enemies[0].is_boss());
    }

    #[test]
    fn test_kill_scores_and_clears_room_same_call() {
        let mut world = playing_world();
        world.enemies_required = 1;
        try_spawn_enemy(&mut world);
        world.enemies[0].body.health = 0;

        assert_eq!(record_kills(&mut world), 1);
        assert_eq!(world.enemies_killed, 1);
        assert_eq!(world.score, 100);
        assert_eq!(world.phase, GamePhase::RoomTransition);
        assert_eq!(world.message.as_deref(), Some("Room 1 Cleared!"));
        assert_eq!(world.transition_at, Some(world.now_ms + 2000.0));

        // Already booked
        assert_eq!(record_kills(&mut world), 0);
        assert_eq!(world.score, 100);
    }

    #[test]
    fn test_boss_kill_is_victory() {
        let mut world = playing_world();
        world.room = 5;
        enter_room(&mut world);
        try_spawn_enemy(&mut world);
        world.enemies[0].body.health = 0;

        record_kills(&mut world);
        assert_eq!(world.score, 500);
        assert_eq!(world.phase, GamePhase::Victory);
        assert_eq!(world.message.as_deref(), Some("Victory! You defeated the boss!"));
    }

    #[test]
    fn test_corpse_reaped_after_grace() {
        let mut world = playing_world();
        try_spawn_enemy(&mut world);
        world.enemies[0].body.health = 0;
        record_kills(&mut world);

        world.now_ms += 99.0;
        reap_corpses(&mut world);
        assert_eq!(world.enemies.len(), 1);
        world.now_ms += 1.0;
        reap_corpses(&mut world);
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn test_advance_room_and_past_last() {
        let mut world = playing_world();
        world.items.push(make_item(99, &world.tuning.items.table[0], Vec2::ZERO, 0.0, &world.tuning));
        advance_room(&mut world);
        assert_eq!(world.room, 2);
        assert_eq!(world.enemies_required, 5);
        assert_eq!(world.obstacles.len(), 2);
        assert!(world.items.is_empty());
        assert_eq!(world.phase, GamePhase::Playing);

        world.room = 5;
        advance_room(&mut world);
        assert_eq!(world.phase, GamePhase::Victory);
    }

    #[test]
    fn test_roll_drop_takes_first_success_in_order() {
        let tuning = Tuning::default();
        let mut certain = tuning.items.table.clone();
        for def in &mut certain {
            def.drop_chance = 1.0;
        }
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(roll_drop(&certain, &mut rng).map(|d| d.name.as_str()), Some("Health Potion"));

        for def in &mut certain {
            def.drop_chance = 0.0;
        }
        assert!(roll_drop(&certain, &mut rng).is_none());
    }

    #[test]
    fn test_item_ttl_boundary() {
        let mut world = playing_world();
        world.now_ms = 0.0;
        let item = make_item(50, &world.tuning.items.table[0], Vec2::new(10.0, 10.0), 0.0, &world.tuning);
        world.items.push(item);

        world.now_ms = 14_999.0;
        assert_eq!(expire_items(&mut world), 0);
        assert_eq!(world.items.len(), 1);

        world.now_ms = 15_001.0;
        assert_eq!(expire_items(&mut world), 1);
        assert!(world.items.is_empty());
    }
}
