//! HUD snapshot
//!
//! Everything a heads-up display needs, computed from a world without
//! touching it.

use serde::{Deserialize, Serialize};

use crate::format_time;
use crate::sim::geometry::enemies_in_attack_range;
use crate::sim::{GamePhase, PickupNotice, Stat, World};

/// Colour band of the health bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    High,
    Medium,
    Low,
}

impl HealthBand {
    /// Above 60 % is high, above 30 % medium
    pub fn for_percent(percent: f32) -> Self {
        if percent > 60.0 {
            HealthBand::High
        } else if percent > 30.0 {
            HealthBand::Medium
        } else {
            HealthBand::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffStatus {
    pub name: String,
    pub stat: Stat,
    /// Whole seconds left, rounded up
    pub seconds_left: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub health: u32,
    pub max_health: u32,
    pub health_percent: f32,
    pub health_band: HealthBand,
    pub room: u32,
    pub total_rooms: u32,
    pub is_boss_room: bool,
    pub enemies_killed: u32,
    pub enemies_required: u32,
    pub score: u64,
    /// Play time as `MM:SS`
    pub time: String,
    pub message: Option<String>,
    pub weapon: Option<String>,
    pub buffs: Vec<BuffStatus>,
    pub enemies_in_range: usize,
    pub recent_pickup: Option<PickupNotice>,
}

impl HudSnapshot {
    pub fn room_label(&self) -> String {
        format!("{}/{}", self.room, self.total_rooms)
    }
}

/// Health as a percentage of max, clamped to 0-100
pub fn health_percent(health: u32, max_health: u32) -> f32 {
    if max_health == 0 {
        return 0.0;
    }
    (health as f32 / max_health as f32 * 100.0).clamp(0.0, 100.0)
}

pub fn snapshot(world: &World) -> HudSnapshot {
    let (health, max_health) = world
        .player
        .as_ref()
        .map_or((0, 0), |p| (p.body.health, p.body.max_health));
    let percent = health_percent(health, max_health);

    let buffs = world.player.as_ref().map_or_else(Vec::new, |player| {
        player
            .buffs
            .iter()
            .map(|buff| BuffStatus {
                name: buff.name.clone(),
                stat: buff.stat,
                seconds_left: ((buff.expires_at - world.now_ms).max(0.0) / 1000.0).ceil() as u32,
            })
            .collect()
    });

    let enemies_in_range = world.player.as_ref().map_or(0, |player| {
        enemies_in_attack_range(player, &world.enemies, world.tuning.player.attack_range).len()
    });

    HudSnapshot {
        phase: world.phase,
        health,
        max_health,
        health_percent: percent,
        health_band: HealthBand::for_percent(percent),
        room: world.room,
        total_rooms: world.tuning.rooms.total,
        is_boss_room: world.is_boss_room(),
        enemies_killed: world.enemies_killed,
        enemies_required: world.enemies_required,
        score: world.score,
        time: format_time(world.play_time_secs()),
        message: world.message.clone(),
        weapon: world
            .player
            .as_ref()
            .and_then(|p| p.weapon.as_ref())
            .map(|w| w.name.clone()),
        buffs,
        enemies_in_range,
        recent_pickup: world.recent_pickup.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Command, apply};
    use crate::sim::status::apply_buff;
    use crate::sim::BuffSpec;

    #[test]
    fn test_health_bands() {
        assert_eq!(HealthBand::for_percent(100.0), HealthBand::High);
        assert_eq!(HealthBand::for_percent(60.0), HealthBand::Medium);
        assert_eq!(HealthBand::for_percent(31.0), HealthBand::Medium);
        assert_eq!(HealthBand::for_percent(30.0), HealthBand::Low);
        assert_eq!(health_percent(5, 0), 0.0);
        assert_eq!(health_percent(45, 90), 50.0);
    }

    #[test]
    fn test_snapshot_of_start_screen() {
        let hud = snapshot(&World::default());
        assert_eq!(hud.phase, GamePhase::Start);
        assert_eq!(hud.health, 0);
        assert_eq!(hud.health_band, HealthBand::Low);
        assert_eq!(hud.enemies_in_range, 0);
    }

    #[test]
    fn test_snapshot_mid_game() {
        let mut world = apply(World::default(), Command::StartGame);
        world.play_time_ms = 75_500.0;
        world.now_ms = 1000.0;
        if let Some(player) = world.player.as_mut() {
            player.body.health = 40;
            apply_buff(
                player,
                &BuffSpec {
                    stat: Stat::Speed,
                    multiplier: 1.5,
                    duration_ms: 8000.0,
                    name: "Speed Boost".to_string(),
                },
                500.0,
            );
        }

        let hud = snapshot(&world);
        assert_eq!(hud.health_band, HealthBand::Medium);
        assert_eq!(hud.room_label(), "1/5");
        assert!(!hud.is_boss_room);
        assert_eq!(hud.time, "01:15");
        assert_eq!(hud.buffs.len(), 1);
        assert_eq!(hud.buffs[0].seconds_left, 8);
        assert_eq!(hud.message.as_deref(), Some("Room 1 - Fight!"));
        assert!(hud.weapon.is_none());
    }
}
