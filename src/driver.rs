//! Fixed-rate driver
//!
//! Accumulates clock time and runs whole logical frames, at most
//! `max_catch_up_frames` per pump. Time only accumulates while the world is
//! live; leaving pause re-anchors the clock so resume never fast-forwards.

use std::cell::Cell;
use std::time::Instant;

use crate::settings::Settings;
use crate::sim::{Command, InputIntent, World, apply, frame};

/// Slack for float error when comparing the accumulator with a frame
const ACCUMULATOR_EPSILON: f64 = 1e-6;

/// Monotonic milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms.max(0.0));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// One running game: the world plus its loop bookkeeping
pub struct Session<C: Clock> {
    world: World,
    clock: C,
    accumulator: f64,
    last_time: Option<f64>,
    frame_ms: f64,
    max_catch_up_frames: u32,
}

impl<C: Clock> Session<C> {
    pub fn new(settings: &Settings, clock: C) -> Self {
        Self {
            world: World::new(settings.tuning.clone(), settings.seed),
            clock,
            accumulator: 0.0,
            last_time: None,
            frame_ms: settings.frame_ms(),
            max_catch_up_frames: settings.max_catch_up_frames.max(1),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Apply a command between frames
    pub fn dispatch(&mut self, command: Command) {
        let was_live = self.world.phase.is_live();
        let world = std::mem::take(&mut self.world);
        self.world = apply(world, command);

        if !self.world.phase.is_live() {
            self.accumulator = 0.0;
        } else if !was_live {
            self.last_time = Some(self.clock.now_ms());
        }
    }

    pub fn set_input(&mut self, input: InputIntent) {
        self.dispatch(Command::SetInput(input));
    }

    /// Run the frames owed since the last pump. Returns how many ran.
    pub fn pump(&mut self) -> u32 {
        let now = self.clock.now_ms();
        let elapsed = self.last_time.map_or(0.0, |last| (now - last).max(0.0));
        self.last_time = Some(now);

        if !self.world.phase.is_live() {
            self.accumulator = 0.0;
            return 0;
        }

        let cap = self.frame_ms * self.max_catch_up_frames as f64;
        self.accumulator = (self.accumulator + elapsed).min(cap);

        let mut frames = 0;
        while self.accumulator + ACCUMULATOR_EPSILON >= self.frame_ms && frames < self.max_catch_up_frames {
            let world = std::mem::take(&mut self.world);
            self.world = frame(world, self.frame_ms);
            self.accumulator = (self.accumulator - self.frame_ms).max(0.0);
            frames += 1;

            if !self.world.phase.is_live() {
                self.accumulator = 0.0;
                break;
            }
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn session() -> Session<ManualClock> {
        let mut session = Session::new(&Settings::default(), ManualClock::default());
        session.dispatch(Command::StartGame);
        session.pump();
        session
    }

    #[test]
    fn test_runs_whole_frames_and_keeps_remainder() {
        let mut session = session();
        session.clock().advance(40.0);
        assert_eq!(session.pump(), 2);
        session.clock().advance(10.0);
        assert_eq!(session.pump(), 1);
        assert!((session.world().now_ms - 3.0 * session.frame_ms()).abs() < 1e-6);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut session = session();
        session.clock().advance(1000.0);
        assert_eq!(session.pump(), 5);
        // The excess was dropped, not carried over
        assert_eq!(session.pump(), 0);
    }

    #[test]
    fn test_resume_does_not_fast_forward() {
        let mut session = session();
        session.dispatch(Command::Pause);
        session.clock().advance(10_000.0);
        assert_eq!(session.pump(), 0);
        session.clock().advance(10_000.0);
        session.dispatch(Command::Resume);
        assert_eq!(session.world().phase, GamePhase::Playing);
        assert_eq!(session.pump(), 0);

        session.clock().advance(20.0);
        assert_eq!(session.pump(), 1);
    }

    #[test]
    fn test_start_screen_does_not_tick() {
        let mut session = Session::new(&Settings::default(), ManualClock::default());
        session.clock().advance(500.0);
        assert_eq!(session.pump(), 0);
        assert_eq!(session.world().now_ms, 0.0);
    }
}
