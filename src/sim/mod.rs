//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (stored in the world)
//! - Stable iteration order (insertion order, ids never reused)
//! - No rendering or platform dependencies

pub mod combat;
pub mod command;
pub mod entity;
pub mod factory;
pub mod geometry;
pub mod progression;
pub mod state;
pub mod status;
pub mod tick;

pub use command::{Command, apply, apply_json, parse};
pub use entity::{
    Body, Bounds, Buff, BuffSpec, Enemy, EnemyKind, EntityId, Facing, Item, ItemCategory, ItemPayload, Obstacle,
    ObstacleKind, Player, Sprite, Stat, StatusEffect, Weapon, WeaponEffect,
};
pub use state::{GamePhase, InputIntent, PickupNotice, World};
pub use tick::{frame, step};
