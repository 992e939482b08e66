//! Entity value types: player, enemies, items, hazards and the timed
//! modifiers attached to them.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique entity identifier (allocated by the world, never reused in a session)
pub type EntityId = u32;

/// Countdown measured in logical frames
///
/// Shared by every "show this for N frames" flag (hit flash, attack swing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTimer(u32);

impl FrameTimer {
    pub fn start(&mut self, frames: u32) {
        self.0 = frames;
    }

    /// Count down one frame, saturating at zero
    pub fn decay(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.0 > 0
    }

    pub fn remaining(&self) -> u32 {
        self.0
    }
}

/// Anything with a top-left position and a square footprint
pub trait Bounds {
    fn pos(&self) -> Vec2;
    fn size(&self) -> f32;

    fn center(&self) -> Vec2 {
        self.pos() + Vec2::splat(self.size() / 2.0)
    }

    fn radius(&self) -> f32 {
        self.size() / 2.0
    }
}

/// Sprite reference handed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sprite {
    Player,
    Slime,
    Skeleton,
    Ghost,
    Demon,
    Boss,
}

impl Sprite {
    const ENEMY_TIERS: [Sprite; 4] = [Sprite::Slime, Sprite::Skeleton, Sprite::Ghost, Sprite::Demon];

    /// Tougher-looking sprites for later rooms
    pub fn for_room(room: u32) -> Self {
        let tier = (room.max(1) as usize - 1).min(Self::ENEMY_TIERS.len() - 1);
        Self::ENEMY_TIERS[tier]
    }
}

/// Shared shape of every combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    /// Top-left corner
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    pub health: u32,
    pub max_health: u32,
    pub hit_timer: FrameTimer,
}

impl Body {
    pub fn new(id: EntityId, pos: Vec2, size: f32, health: u32) -> Self {
        Self {
            id,
            pos,
            size,
            health,
            max_health: health,
            hit_timer: FrameTimer::default(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn is_hit(&self) -> bool {
        self.hit_timer.is_active()
    }
}

impl Bounds for Body {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> f32 {
        self.size
    }
}

/// Facing direction (last movement key pressed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

/// Player stat a buff can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Speed,
    Damage,
    Defense,
}

/// Buff template carried by powerup items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffSpec {
    pub stat: Stat,
    pub multiplier: f32,
    pub duration_ms: f64,
    pub name: String,
}

/// Active timed player buff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub stat: Stat,
    pub multiplier: f32,
    pub expires_at: f64,
    pub name: String,
}

/// Speed reduction with an expiry (hazard slow on the player)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    pub multiplier: f32,
    pub expires_at: f64,
}

/// Elemental effect of a weapon
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum WeaponEffect {
    #[default]
    None,
    Burn {
        damage_per_tick: u32,
        tick_interval_ms: f64,
        duration_ms: f64,
    },
    Slow {
        multiplier: f32,
        duration_ms: f64,
    },
    Chain {
        range: f32,
        damage: u32,
        max_targets: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// Replaces the player's base damage while equipped
    pub damage: u32,
    pub effect: WeaponEffect,
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    pub attack_timer: FrameTimer,
    /// Milliseconds until the next swing is allowed
    pub attack_cooldown_ms: f64,
    pub base_speed: f32,
    pub base_damage: u32,
    /// Derived: base_speed x speed buff x hazard slow
    pub speed: f32,
    /// Derived: base_damage x damage buff
    pub damage: u32,
    /// Derived incoming-damage multiplier (1.0 = none)
    pub defense: f32,
    pub weapon: Option<Weapon>,
    pub buffs: Vec<Buff>,
    pub hazard_slow: Option<SlowEffect>,
}

impl Player {
    pub fn is_attacking(&self) -> bool {
        self.attack_timer.is_active()
    }

    pub fn buff(&self, stat: Stat) -> Option<&Buff> {
        self.buffs.iter().find(|b| b.stat == stat)
    }

    pub fn sprite(&self) -> Sprite {
        Sprite::Player
    }
}

impl Bounds for Player {
    fn pos(&self) -> Vec2 {
        self.body.pos
    }

    fn size(&self) -> f32 {
        self.body.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Regular,
    Boss,
}

/// Discriminant of [`StatusEffect`], used for the one-per-tag rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTag {
    Burn,
    Slow,
}

/// Timed condition inflicted on an enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StatusEffect {
    Burn {
        damage_per_tick: u32,
        tick_interval_ms: f64,
        next_tick_at: f64,
        expires_at: f64,
    },
    Slow {
        multiplier: f32,
        expires_at: f64,
    },
}

impl StatusEffect {
    pub fn tag(&self) -> EffectTag {
        match self {
            StatusEffect::Burn { .. } => EffectTag::Burn,
            StatusEffect::Slow { .. } => EffectTag::Slow,
        }
    }

    pub fn expires_at(&self) -> f64 {
        match *self {
            StatusEffect::Burn { expires_at, .. } | StatusEffect::Slow { expires_at, .. } => {
                expires_at
            }
        }
    }
}

/// A regular enemy or the boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub base_speed: f32,
    /// Current speed (base_speed unless slowed)
    pub speed: f32,
    pub damage: u32,
    pub last_attack_at: Option<f64>,
    pub effects: Vec<StatusEffect>,
    /// Simulation time the enemy reached zero health
    pub died_at: Option<f64>,
    pub sprite: Sprite,
}

impl Enemy {
    pub fn is_dead(&self) -> bool {
        self.body.is_dead()
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    pub fn has_effect(&self, tag: EffectTag) -> bool {
        self.effects.iter().any(|e| e.tag() == tag)
    }
}

impl Bounds for Enemy {
    fn pos(&self) -> Vec2 {
        self.body.pos
    }

    fn size(&self) -> f32 {
        self.body.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    Healing,
    Powerup,
    Weapon,
}

/// What an item does when picked up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemPayload {
    Heal(u32),
    Buff(BuffSpec),
    Weapon(Weapon),
}

impl ItemPayload {
    pub fn category(&self) -> ItemCategory {
        match self {
            ItemPayload::Heal(_) => ItemCategory::Healing,
            ItemPayload::Buff(_) => ItemCategory::Powerup,
            ItemPayload::Weapon(_) => ItemCategory::Weapon,
        }
    }
}

/// Ground pickup dropped by a defeated enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: EntityId,
    pub name: String,
    pub pos: Vec2,
    pub size: f32,
    pub payload: ItemPayload,
    pub spawned_at: f64,
    pub expires_at: f64,
}

impl Item {
    pub fn category(&self) -> ItemCategory {
        self.payload.category()
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.expires_at
    }
}

impl Bounds for Item {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> f32 {
        self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    FirePit,
    SpikeTrap,
    PoisonPool,
}

impl ObstacleKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::FirePit => "Fire Pit",
            ObstacleKind::SpikeTrap => "Spike Trap",
            ObstacleKind::PoisonPool => "Poison Pool",
        }
    }
}

/// Room hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: f32,
    pub damage: u32,
    pub interval_ms: f64,
    /// Speed multiplier and duration applied on contact
    pub slow: Option<(f32, f64)>,
    pub affects_player: bool,
    pub affects_enemies: bool,
    /// Last time this hazard hurt each entity
    pub last_hit: BTreeMap<EntityId, f64>,
}

impl Obstacle {
    /// Whether this hazard's per-entity cooldown has elapsed for `id`
    pub fn ready_for(&self, id: EntityId, now: f64) -> bool {
        match self.last_hit.get(&id) {
            Some(&at) => now - at >= self.interval_ms,
            None => true,
        }
    }

    pub fn stamp(&mut self, id: EntityId, now: f64) {
        self.last_hit.insert(id, now);
    }
}

impl Bounds for Obstacle {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> f32 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timer_decays_to_zero() {
        let mut timer = FrameTimer::default();
        assert!(!timer.is_active());
        timer.start(2);
        assert!(timer.is_active());
        timer.decay();
        assert_eq!(timer.remaining(), 1);
        timer.decay();
        timer.decay();
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_sprite_tiers() {
        assert_eq!(Sprite::for_room(1), Sprite::Slime);
        assert_eq!(Sprite::for_room(3), Sprite::Ghost);
        assert_eq!(Sprite::for_room(9), Sprite::Demon);
    }

    #[test]
    fn test_obstacle_cooldown_is_per_entity() {
        let mut obstacle = Obstacle {
            id: 1,
            kind: ObstacleKind::FirePit,
            pos: Vec2::ZERO,
            size: 50.0,
            damage: 5,
            interval_ms: 500.0,
            slow: None,
            affects_player: true,
            affects_enemies: true,
            last_hit: BTreeMap::new(),
        };
        obstacle.stamp(7, 1000.0);
        assert!(!obstacle.ready_for(7, 1200.0));
        assert!(obstacle.ready_for(8, 1200.0));
        assert!(obstacle.ready_for(7, 1500.0));
    }

    #[test]
    fn test_center_and_radius() {
        let body = Body::new(1, Vec2::new(10.0, 20.0), 30.0, 100);
        assert_eq!(body.center(), Vec2::new(25.0, 35.0));
        assert_eq!(body.radius(), 15.0);
    }
}
