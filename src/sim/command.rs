//! Commands from the UI shell
//!
//! Every command is a total `World -> World` function. A command that makes
//! no sense in the current phase returns the world unchanged, and malformed
//! JSON commands are dropped at the boundary.

use serde::{Deserialize, Serialize};

use super::factory::make_player;
use super::progression::{advance_room, enter_room};
use super::state::{GamePhase, InputIntent, World};
use super::tick::frame;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// New run from room 1 (start screen, game over or victory)
    StartGame,
    Pause,
    Resume,
    TogglePause,
    /// Back to the start screen
    Reset,
    /// Finish a pending room transition immediately
    NextRoom,
    ClearMessage,
    ClearRecentPickup,
    /// Replace the held input
    SetInput(InputIntent),
    /// Advance one frame of `dt_ms`
    Tick { dt_ms: f64 },
}

/// Apply one command
pub fn apply(mut world: World, command: Command) -> World {
    match command {
        Command::StartGame => match world.phase {
            GamePhase::Start | GamePhase::GameOver | GamePhase::Victory => start_game(&world),
            _ => world,
        },
        Command::Pause => {
            if world.phase == GamePhase::Playing {
                log::info!("Paused at {:.0} ms", world.now_ms);
                world.phase = GamePhase::Paused;
            }
            world
        }
        Command::Resume => {
            if world.phase == GamePhase::Paused {
                log::info!("Resumed");
                world.phase = GamePhase::Playing;
            }
            world
        }
        Command::TogglePause => match world.phase {
            GamePhase::Playing => apply(world, Command::Pause),
            GamePhase::Paused => apply(world, Command::Resume),
            _ => world,
        },
        Command::Reset => {
            log::info!("Session reset");
            world.fresh_session()
        }
        Command::NextRoom => {
            if world.phase == GamePhase::RoomTransition {
                advance_room(&mut world);
            }
            world
        }
        Command::ClearMessage => {
            world.clear_message();
            world
        }
        Command::ClearRecentPickup => {
            world.clear_recent_pickup();
            world
        }
        Command::SetInput(input) => {
            world.input = input;
            world
        }
        Command::Tick { dt_ms } => {
            if dt_ms.is_finite() && dt_ms > 0.0 {
                frame(world, dt_ms)
            } else {
                log::debug!("Ignoring tick with dt {dt_ms}");
                world
            }
        }
    }
}

fn start_game(previous: &World) -> World {
    let mut world = previous.fresh_session();
    let id = world.next_entity_id();
    world.player = Some(make_player(id, &world.tuning));
    world.room = 1;
    enter_room(&mut world);
    log::info!("Game started (seed {})", world.seed);
    world
}

/// Parse a JSON command such as `{"type": "pause"}`
pub fn parse(json: &str) -> Option<Command> {
    match serde_json::from_str(json) {
        Ok(command) => Some(command),
        Err(err) => {
            log::debug!("Ignoring malformed command {json:?}: {err}");
            None
        }
    }
}

/// Apply a JSON command; anything unparseable leaves the world unchanged
pub fn apply_json(world: World, json: &str) -> World {
    match parse(json) {
        Some(command) => apply(world, command),
        None => world,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;

    fn snapshot(world: &World) -> String {
        serde_json::to_string(world).unwrap()
    }

    fn started() -> World {
        apply(World::new(Default::default(), 11), Command::StartGame)
    }

    #[test]
    fn test_start_game() {
        let world = started();
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.room, 1);
        assert!(world.player.is_some());
        assert_eq!(world.enemies_required, 3);
        assert_eq!(world.message.as_deref(), Some("Room 1 - Fight!"));
    }

    #[test]
    fn test_start_ignored_mid_game() {
        let mut world = started();
        world.score = 700;
        let world = apply(world, Command::StartGame);
        assert_eq!(world.score, 700);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let world = apply(started(), Command::Pause);
        assert_eq!(world.phase, GamePhase::Paused);
        let before = snapshot(&world);
        let world = apply(world, Command::Pause);
        assert_eq!(snapshot(&world), before);
    }

    #[test]
    fn test_pause_freezes_clock() {
        let world = apply(started(), Command::Pause);
        let before = snapshot(&world);
        let world = apply(world, Command::Tick { dt_ms: FRAME_MS });
        assert_eq!(snapshot(&world), before);

        let world = apply(world, Command::TogglePause);
        assert_eq!(world.phase, GamePhase::Playing);
        let world = apply(world, Command::Tick { dt_ms: FRAME_MS });
        assert!(world.now_ms > 0.0);
    }

    #[test]
    fn test_next_room_only_from_transition() {
        let world = apply(started(), Command::NextRoom);
        assert_eq!(world.room, 1);

        let mut world = world;
        world.phase = GamePhase::RoomTransition;
        let world = apply(world, Command::NextRoom);
        assert_eq!(world.room, 2);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let world = apply(started(), Command::Reset);
        assert_eq!(world.phase, GamePhase::Start);
        assert!(world.player.is_none());
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_json_commands() {
        assert_eq!(parse(r#"{"type":"pause"}"#), Some(Command::Pause));
        assert_eq!(parse(r#"{"type":"tick","dt_ms":16.0}"#), Some(Command::Tick { dt_ms: 16.0 }));
        assert_eq!(
            parse(r#"{"type":"set_input","up":true,"down":false,"left":false,"right":false,"attack":true}"#),
            Some(Command::SetInput(InputIntent {
                up: true,
                attack: true,
                ..Default::default()
            }))
        );
        assert_eq!(parse(r#"{"type":"fly_away"}"#), None);
        assert_eq!(parse("not json"), None);
    }

    #[test]
    fn test_unknown_command_leaves_world_unchanged() {
        let world = started();
        let before = snapshot(&world);
        let world = apply_json(world, r#"{"type":"explode"}"#);
        assert_eq!(snapshot(&world), before);
    }

    #[test]
    fn test_clear_commands() {
        let world = apply(started(), Command::ClearMessage);
        assert!(world.message.is_none());
        assert!(world.message_expires_at.is_none());
        let world = apply(world, Command::ClearRecentPickup);
        assert!(world.recent_pickup.is_none());
    }
}
