//! World state and top-level game phase
//!
//! One `World` exists per session. It is the only unit of mutation: every
//! frame and every command consumes the previous value and returns the next.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, EntityId, Item, ItemCategory, Obstacle, Player};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing ticks
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Frozen; all timers stop
    Paused,
    /// Room cleared, waiting for the next room
    RoomTransition,
    /// Player died
    GameOver,
    /// Boss defeated
    Victory,
}

impl GamePhase {
    /// Phases in which the simulation clock advances
    pub fn is_live(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::RoomTransition)
    }
}

/// Level-triggered input sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub attack: bool,
}

/// Most recent pickup, for the notification banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupNotice {
    pub name: String,
    pub category: ItemCategory,
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub phase: GamePhase,
    /// Current room (1-based)
    pub room: u32,
    pub player: Option<Player>,
    /// Active enemies, including corpses inside their grace window
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub obstacles: Vec<Obstacle>,
    pub enemies_spawned: u32,
    pub enemies_killed: u32,
    /// Kills required to clear this room
    pub enemies_required: u32,
    pub score: u64,
    /// Time spent in PLAYING (ms)
    pub play_time_ms: f64,
    /// Simulation clock (ms); advances only in live phases
    pub now_ms: f64,
    pub message: Option<String>,
    pub message_expires_at: Option<f64>,
    pub recent_pickup: Option<PickupNotice>,
    pub pickup_expires_at: Option<f64>,
    /// Input applied by the last step
    pub input: InputIntent,
    pub last_spawn_at: Option<f64>,
    /// When the pending room transition completes
    pub transition_at: Option<f64>,
    pub tuning: Tuning,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    next_id: EntityId,
}

impl Default for World {
    fn default() -> Self {
        Self::new(Tuning::default(), 0)
    }
}

impl World {
    /// Fresh session on the start screen
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            phase: GamePhase::Start,
            room: 1,
            player: None,
            enemies: Vec::new(),
            items: Vec::new(),
            obstacles: Vec::new(),
            enemies_spawned: 0,
            enemies_killed: 0,
            enemies_required: 0,
            score: 0,
            play_time_ms: 0.0,
            now_ms: 0.0,
            message: None,
            message_expires_at: None,
            recent_pickup: None,
            pickup_expires_at: None,
            input: InputIntent::default(),
            last_spawn_at: None,
            transition_at: None,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Start-screen world that keeps this session's tuning, RNG stream and id
    /// counter, so a restart does not replay the same random draws.
    pub fn fresh_session(&self) -> Self {
        Self {
            rng: self.rng.clone(),
            next_id: self.next_id,
            ..Self::new(self.tuning.clone(), self.seed)
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_boss_room(&self) -> bool {
        self.tuning.rooms.is_boss_room(self.room)
    }

    /// Show a message until the display timeout elapses
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.message_expires_at = Some(self.now_ms + self.tuning.timing.message_display_ms);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_expires_at = None;
    }

    pub fn set_recent_pickup(&mut self, notice: PickupNotice) {
        self.recent_pickup = Some(notice);
        self.pickup_expires_at = Some(self.now_ms + self.tuning.timing.pickup_notice_ms);
    }

    pub fn clear_recent_pickup(&mut self) {
        self.recent_pickup = None;
        self.pickup_expires_at = None;
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| !e.is_dead())
    }

    pub fn play_time_secs(&self) -> f64 {
        self.play_time_ms / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_is_on_start_screen() {
        let world = World::default();
        assert_eq!(world.phase, GamePhase::Start);
        assert!(world.player.is_none());
        assert_eq!(world.room, 1);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut world = World::default();
        let a = world.next_entity_id();
        let b = world.next_entity_id();
        assert_ne!(a, b);

        let fresh = world.fresh_session();
        let mut fresh = fresh;
        assert!(fresh.next_entity_id() > b);
    }

    #[test]
    fn test_message_expiry_uses_sim_clock() {
        let mut world = World::default();
        world.now_ms = 500.0;
        world.set_message("hello");
        assert_eq!(world.message.as_deref(), Some("hello"));
        assert_eq!(world.message_expires_at, Some(3500.0));
        world.clear_message();
        assert!(world.message.is_none());
    }

    #[test]
    fn test_live_phases() {
        assert!(GamePhase::Playing.is_live());
        assert!(GamePhase::RoomTransition.is_live());
        assert!(!GamePhase::Paused.is_live());
        assert!(!GamePhase::Victory.is_live());
    }
}
