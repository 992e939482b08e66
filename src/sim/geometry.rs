//! Distance, overlap and range tests
//!
//! Entities are squares anchored at their top-left corner; circle tests use
//! the inscribed circle (centre = pos + size/2, radius = size/2).

use glam::Vec2;

use super::entity::{Bounds, Enemy, EntityId};

/// Euclidean distance between two points
#[inline]
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    Vec2::new(ax, ay).distance(Vec2::new(bx, by))
}

/// Axis-aligned box overlap; touching edges do not count
pub fn rect_overlap(a: &impl Bounds, b: &impl Bounds) -> bool {
    let (pa, pb) = (a.pos(), b.pos());
    pa.x < pb.x + b.size()
        && pa.x + a.size() > pb.x
        && pa.y < pb.y + b.size()
        && pa.y + a.size() > pb.y
}

/// Centre distance strictly less than the sum of radii
pub fn circle_overlap(a: &impl Bounds, b: &impl Bounds) -> bool {
    a.center().distance(b.center()) < a.radius() + b.radius()
}

/// Centre distance within `range` plus the target's radius
pub fn within_attack_range(attacker: &impl Bounds, target: &impl Bounds, range: f32) -> bool {
    attacker.center().distance(target.center()) <= range + target.radius()
}

/// Clamp a top-left position so a `size` square stays inside the arena
#[inline]
pub fn clamp_to_arena(pos: Vec2, size: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, (width - size).max(0.0)),
        pos.y.clamp(0.0, (height - size).max(0.0)),
    )
}

/// Ids of living enemies the attacker would hit with `range`
pub fn enemies_in_attack_range(attacker: &impl Bounds, enemies: &[Enemy], range: f32) -> Vec<EntityId> {
    enemies
        .iter()
        .filter(|e| !e.is_dead() && within_attack_range(attacker, *e, range))
        .map(|e| e.body.id)
        .collect()
}

/// Closest living enemy by centre distance
pub fn closest_enemy<'a>(from: &impl Bounds, enemies: &'a [Enemy]) -> Option<&'a Enemy> {
    let origin = from.center();
    enemies
        .iter()
        .filter(|e| !e.is_dead())
        .min_by(|a, b| {
            a.center()
                .distance(origin)
                .partial_cmp(&b.center().distance(origin))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Indices of enemies whose centre lies within `range` of `point`
pub fn enemies_near(enemies: &[Enemy], point: Vec2, range: f32) -> Vec<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.center().distance(point) <= range)
        .map(|(i, _)| i)
        .collect()
}
