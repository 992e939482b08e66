//! Arena Brawl - a room-by-room 2D arena fighter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, status effects, progression)
//! - `driver`: Fixed-rate loop with capped catch-up
//! - `hud`: Read-only HUD snapshot for renderers
//! - `autopilot`: Demo AI that produces input intents
//! - `settings`: Session configuration file
//! - `tuning`: Data-driven game balance

pub mod autopilot;
pub mod driver;
pub mod hud;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::{Clock, ManualClock, Session, SystemClock};
pub use settings::{ConfigError, Settings};
pub use sim::{Command, GamePhase, InputIntent, World};
pub use tuning::Tuning;

/// Loop timing constants
pub mod consts {
    /// Logical frames per second
    pub const SIM_HZ: f64 = 60.0;
    /// Duration of one logical frame (ms)
    pub const FRAME_MS: f64 = 1000.0 / SIM_HZ;
    /// Maximum frames run per pump to prevent spiral of death
    pub const MAX_CATCH_UP_FRAMES: u32 = 5;
}

/// `MM:SS` for a duration in seconds (negative clamps to zero)
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(61.0), "01:01");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(-3.0), "00:00");
    }
}
