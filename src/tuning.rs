//! Data-driven game balance
//!
//! Every number the simulation reads lives here. Defaults reproduce the stock
//! game; any subset can be overridden from JSON since every table carries
//! `#[serde(default)]`.

use serde::{Deserialize, Serialize};

use crate::sim::entity::{BuffSpec, ItemCategory, ItemPayload, ObstacleKind, Stat, Weapon, WeaponEffect};

/// Arena dimensions (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: f32,
    /// Pixels per logical frame
    pub speed: f32,
    pub max_health: u32,
    pub attack_damage: u32,
    pub attack_range: f32,
    pub attack_cooldown_ms: f64,
    /// Frames the attack swing stays visible
    pub attack_frames: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: 30.0,
            speed: 5.0,
            max_health: 100,
            attack_damage: 25,
            attack_range: 50.0,
            attack_cooldown_ms: 300.0,
            attack_frames: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub size: f32,
    pub base_speed: f32,
    /// Linear speed gain per room past the first
    pub speed_per_room: f32,
    pub base_health: u32,
    pub base_damage: u32,
    /// Health/damage multiplier step per room past the first
    pub difficulty_step: f32,
    pub attack_cooldown_ms: f64,
    pub min_spawn_distance: f32,
    pub spawn_attempts: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            size: 25.0,
            base_speed: 2.0,
            speed_per_room: 0.3,
            base_health: 30,
            base_damage: 10,
            difficulty_step: 0.25,
            attack_cooldown_ms: 1000.0,
            min_spawn_distance: 150.0,
            spawn_attempts: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub size: f32,
    pub speed: f32,
    pub health: u32,
    pub damage: u32,
    pub attack_cooldown_ms: f64,
    pub min_spawn_distance: f32,
    /// Kill score multiplier relative to a regular enemy
    pub score_multiplier: u64,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            size: 60.0,
            speed: 1.5,
            health: 300,
            damage: 25,
            attack_cooldown_ms: 800.0,
            min_spawn_distance: 200.0,
            score_multiplier: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomTuning {
    pub total: u32,
    pub boss_room: u32,
    /// Required kills, indexed by room - 1
    pub enemies_per_room: Vec<u32>,
    /// Hazards placed at room start, indexed by room - 1
    pub obstacles_per_room: Vec<u32>,
    pub max_on_screen: usize,
    pub boss_max_on_screen: usize,
    pub score_per_kill: u64,
}

impl Default for RoomTuning {
    fn default() -> Self {
        Self {
            total: 5,
            boss_room: 5,
            enemies_per_room: vec![3, 5, 7, 10, 1],
            obstacles_per_room: vec![1, 2, 3, 3, 2],
            max_on_screen: 5,
            boss_max_on_screen: 1,
            score_per_kill: 100,
        }
    }
}

impl RoomTuning {
    /// Required kills for a room (0 outside 1..=total)
    pub fn enemy_count(&self, room: u32) -> u32 {
        if room < 1 || room > self.total {
            return 0;
        }
        self.enemies_per_room
            .get(room as usize - 1)
            .copied()
            .unwrap_or(0)
    }

    pub fn obstacle_count(&self, room: u32) -> u32 {
        if room < 1 || room > self.total {
            return 0;
        }
        self.obstacles_per_room
            .get(room as usize - 1)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_boss_room(&self, room: u32) -> bool {
        room == self.boss_room
    }

    pub fn concurrency_cap(&self, room: u32) -> usize {
        if self.is_boss_room(room) {
            self.boss_max_on_screen
        } else {
            self.max_on_screen
        }
    }
}

/// Wall-clock-free timing, all in simulation milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    pub spawn_delay_ms: f64,
    pub room_clear_delay_ms: f64,
    pub death_grace_ms: f64,
    pub message_display_ms: f64,
    pub pickup_notice_ms: f64,
    /// Frames the hit flash stays on
    pub hit_flash_frames: u32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            spawn_delay_ms: 1000.0,
            room_clear_delay_ms: 2000.0,
            death_grace_ms: 100.0,
            message_display_ms: 3000.0,
            pickup_notice_ms: 2000.0,
            hit_flash_frames: 10,
        }
    }
}

/// One entry of the drop table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub name: String,
    /// Independent roll probability (0-1)
    pub drop_chance: f64,
    pub payload: ItemPayload,
}

impl ItemDef {
    pub fn category(&self) -> ItemCategory {
        self.payload.category()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTuning {
    pub size: f32,
    pub ttl_ms: f64,
    /// Evaluated in order; the first successful roll drops
    pub table: Vec<ItemDef>,
}

impl Default for ItemTuning {
    fn default() -> Self {
        let buff = |stat, multiplier, duration_ms, name: &str| ItemPayload::Buff(BuffSpec {
            stat,
            multiplier,
            duration_ms,
            name: name.to_string(),
        });
        let def = |name: &str, drop_chance, payload| ItemDef {
            name: name.to_string(),
            drop_chance,
            payload,
        };

        Self {
            size: 20.0,
            ttl_ms: 15_000.0,
            table: vec![
                def("Health Potion", 0.20, ItemPayload::Heal(25)),
                def("Large Health Potion", 0.05, ItemPayload::Heal(50)),
                def("Speed Boost", 0.06, buff(Stat::Speed, 1.5, 8000.0, "Speed Boost")),
                def("Strength Potion", 0.06, buff(Stat::Damage, 1.5, 8000.0, "Strength")),
                def("Iron Skin", 0.05, buff(Stat::Defense, 0.5, 8000.0, "Iron Skin")),
                def(
                    "Fire Sword",
                    0.03,
                    ItemPayload::Weapon(Weapon {
                        name: "Fire Sword".to_string(),
                        damage: 35,
                        effect: WeaponEffect::Burn {
                            damage_per_tick: 5,
                            tick_interval_ms: 500.0,
                            duration_ms: 3000.0,
                        },
                    }),
                ),
                def(
                    "Frost Blade",
                    0.03,
                    ItemPayload::Weapon(Weapon {
                        name: "Frost Blade".to_string(),
                        damage: 30,
                        effect: WeaponEffect::Slow {
                            multiplier: 0.5,
                            duration_ms: 2500.0,
                        },
                    }),
                ),
                def(
                    "Lightning Staff",
                    0.02,
                    ItemPayload::Weapon(Weapon {
                        name: "Lightning Staff".to_string(),
                        damage: 28,
                        effect: WeaponEffect::Chain {
                            range: 120.0,
                            damage: 15,
                            max_targets: 2,
                        },
                    }),
                ),
            ],
        }
    }
}

impl ItemTuning {
    pub fn find(&self, name: &str) -> Option<&ItemDef> {
        self.table.iter().find(|d| d.name == name)
    }
}

/// Static parameters of one hazard type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDef {
    pub kind: ObstacleKind,
    pub size: f32,
    pub damage: u32,
    pub interval_ms: f64,
    /// Speed multiplier and its duration, for hazards that slow
    pub slow: Option<(f32, f64)>,
    pub affects_player: bool,
    pub affects_enemies: bool,
}

impl Default for ObstacleDef {
    fn default() -> Self {
        Self {
            kind: ObstacleKind::FirePit,
            size: 50.0,
            damage: 5,
            interval_ms: 500.0,
            slow: None,
            affects_player: true,
            affects_enemies: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub kinds: Vec<ObstacleDef>,
    pub padding: f32,
    pub min_player_distance: f32,
    pub min_separation: f32,
    pub placement_attempts: u32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            kinds: vec![
                ObstacleDef::default(),
                ObstacleDef {
                    kind: ObstacleKind::SpikeTrap,
                    size: 40.0,
                    damage: 10,
                    interval_ms: 1000.0,
                    slow: None,
                    affects_player: true,
                    affects_enemies: false,
                },
                ObstacleDef {
                    kind: ObstacleKind::PoisonPool,
                    size: 60.0,
                    damage: 2,
                    interval_ms: 500.0,
                    slow: Some((0.6, 1000.0)),
                    affects_player: true,
                    affects_enemies: true,
                },
            ],
            padding: 50.0,
            min_player_distance: 100.0,
            min_separation: 80.0,
            placement_attempts: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Whether a zero-magnitude hit still starts the hit flash
    pub flash_on_zero_damage: bool,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            flash_on_zero_damage: true,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub boss: BossTuning,
    pub rooms: RoomTuning,
    pub timing: TimingTuning,
    pub items: ItemTuning,
    pub obstacles: ObstacleTuning,
    pub combat: CombatTuning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_tables() {
        let rooms = RoomTuning::default();
        assert_eq!(rooms.enemy_count(1), 3);
        assert_eq!(rooms.enemy_count(5), 1);
        assert_eq!(rooms.enemy_count(0), 0);
        assert_eq!(rooms.enemy_count(6), 0);
        assert!(rooms.is_boss_room(5));
        assert_eq!(rooms.concurrency_cap(5), 1);
        assert_eq!(rooms.concurrency_cap(2), 5);
    }

    #[test]
    fn test_partial_json_override() {
        let tuning: Tuning =
            serde_json::from_str(r#"{ "player": { "speed": 7.5 }, "rooms": { "total": 3, "boss_room": 3 } }"#)
                .unwrap();
        assert_eq!(tuning.player.speed, 7.5);
        assert_eq!(tuning.player.max_health, 100);
        assert_eq!(tuning.rooms.boss_room, 3);
        assert_eq!(tuning.enemy.base_health, 30);
        assert_eq!(tuning.items.table.len(), 8);
    }

    #[test]
    fn test_drop_table_order() {
        let items = ItemTuning::default();
        let names: Vec<_> = items.table.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names[0], "Health Potion");
        assert_eq!(names[7], "Lightning Staff");
        assert_eq!(items.find("Fire Sword").map(|d| d.category()), Some(ItemCategory::Weapon));
    }
}
