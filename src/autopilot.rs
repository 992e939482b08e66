//! Demo AI
//!
//! Produces the input a player would hold this frame: grab loot while no
//! enemy is close, otherwise close in on the nearest enemy and swing.

use glam::Vec2;

use crate::sim::geometry::{closest_enemy, enemies_in_attack_range};
use crate::sim::{Bounds, GamePhase, InputIntent, World};

/// Loot is only worth walking to when the nearest enemy is this far away
const SAFE_DISTANCE: f32 = 200.0;
/// Axis offsets smaller than this are treated as aligned (stops jitter)
const DEADZONE: f32 = 4.0;

pub fn intent_for(world: &World) -> InputIntent {
    let Some(player) = world.player.as_ref() else {
        return InputIntent::default();
    };
    if world.phase != GamePhase::Playing {
        return InputIntent::default();
    }

    let origin = player.center();
    let range = world.tuning.player.attack_range;
    let threat = closest_enemy(player, &world.enemies);
    let in_range = !enemies_in_attack_range(player, &world.enemies, range).is_empty();

    let safe = threat.is_none_or(|enemy| enemy.center().distance(origin) > SAFE_DISTANCE);
    let loot = if safe {
        world
            .items
            .iter()
            .map(|item| item.center())
            .min_by(|a, b| {
                a.distance(origin)
                    .partial_cmp(&b.distance(origin))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    } else {
        None
    };

    let target = match (loot, threat) {
        (Some(item), _) => Some(item),
        // Hold ground once something is in reach
        (None, Some(_)) if in_range => None,
        (None, Some(enemy)) => Some(enemy.center()),
        (None, None) => None,
    };

    let mut input = target.map_or_else(InputIntent::default, |target| steer(origin, target));
    input.attack = in_range;
    input
}

/// Held directions that move `from` toward `to`
fn steer(from: Vec2, to: Vec2) -> InputIntent {
    let delta = to - from;
    InputIntent {
        up: delta.y < -DEADZONE,
        down: delta.y > DEADZONE,
        left: delta.x < -DEADZONE,
        right: delta.x > DEADZONE,
        attack: false,
    }
}
