//! Game loop controller
//!
//! Owns the run state, the held pedals and the frame clock. The platform layer
//! forwards key events and animation-frame timestamps here and renders the
//! snapshots that come back.

use crate::sim::{FrameSnapshot, GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Reset,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "R" | "r" => Key::Reset,
            _ => Key::Other,
        }
    }
}

/// Frame-driven wrapper around [`GameState`]
#[derive(Debug, Clone)]
pub struct GameLoop {
    pub state: GameState,
    input: TickInput,
    /// Timestamp (ms) of the previous frame; None until the first frame after start
    last_timestamp: Option<f64>,
}

impl GameLoop {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::with_tuning(seed, tuning),
            input: TickInput::default(),
            last_timestamp: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn input(&self) -> TickInput {
        self.input
    }

    /// Whether the platform should keep requesting animation frames
    pub fn is_running(&self) -> bool {
        self.state.phase == GamePhase::Running
    }

    /// Back to the start line, with a snapshot to draw the cleared scene
    pub fn reset(&mut self) -> FrameSnapshot {
        self.state.reset();
        self.last_timestamp = None;
        log::info!("Run reset");
        self.state.snapshot()
    }

    /// Begin ticking; only valid while Idle
    pub fn start(&mut self) -> bool {
        let started = self.state.start();
        if started {
            self.last_timestamp = None;
            log::info!("Run started");
        }
        started
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::ArrowUp => {
                self.start();
                self.input.accelerate = true;
            }
            Key::ArrowDown => self.input.decelerate = true,
            Key::Reset => {
                self.reset();
            }
            Key::Other => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::ArrowUp => self.input.accelerate = false,
            Key::ArrowDown => self.input.decelerate = false,
            Key::Reset | Key::Other => {}
        }
    }

    /// Handle one animation frame at `timestamp` milliseconds.
    ///
    /// The first frame after start only records the clock. Returns a snapshot
    /// when the simulation advanced.
    pub fn frame(&mut self, timestamp: f64) -> Option<FrameSnapshot> {
        if !self.is_running() {
            return None;
        }

        let Some(last) = self.last_timestamp.filter(|t| t.is_finite()) else {
            self.last_timestamp = Some(timestamp);
            return None;
        };

        let dt = timestamp - last;
        tick(&mut self.state, &self.input, dt as f32);
        self.last_timestamp = Some(timestamp);
        Some(self.state.snapshot())
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.state.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_loop() -> GameLoop {
        GameLoop::with_tuning(
            1,
            Tuning {
                max_traffic: Some(0),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_dom("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::from_dom("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_dom("r"), Key::Reset);
        assert_eq!(Key::from_dom("R"), Key::Reset);
        assert_eq!(Key::from_dom("Enter"), Key::Other);
    }

    #[test]
    fn test_arrow_up_starts_and_accelerates() {
        let mut game = quiet_loop();
        assert_eq!(game.phase(), GamePhase::Idle);
        game.key_down(Key::ArrowUp);
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(game.input().accelerate);
        game.key_up(Key::ArrowUp);
        assert!(!game.input().accelerate);
    }

    #[test]
    fn test_arrow_down_does_not_start() {
        let mut game = quiet_loop();
        game.key_down(Key::ArrowDown);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(game.input().decelerate);
        game.key_up(Key::ArrowDown);
        assert!(!game.input().decelerate);
    }

    #[test]
    fn test_first_frame_sets_baseline() {
        let mut game = quiet_loop();
        game.start();
        assert!(game.frame(5000.0).is_none());
        assert_eq!(game.state.player.angle_moved, 0.0);

        let snap = game.frame(6000.0).expect("advanced");
        assert!((game.state.player.angle_moved + 1.7).abs() < 1e-5);
        assert_eq!(snap.score, 1);
    }

    #[test]
    fn test_frames_ignored_while_idle() {
        let mut game = quiet_loop();
        assert!(game.frame(0.0).is_none());
        assert!(game.frame(1000.0).is_none());
        assert_eq!(game.state.player.angle_moved, 0.0);
    }

    #[test]
    fn test_backwards_clock_is_zero_delta() {
        let mut game = quiet_loop();
        game.start();
        game.frame(1000.0);
        game.frame(500.0);
        assert_eq!(game.state.player.angle_moved, 0.0);
    }

    #[test]
    fn test_reset_from_any_phase() {
        let mut game = GameLoop::new(11);
        game.key_down(Key::ArrowUp);
        game.frame(0.0);
        for i in 1..200 {
            game.frame(i as f64 * 16.0);
        }

        let snap = game.reset();
        assert_eq!(game.drain_events(), vec![GameEvent::ScoreChanged { score: 0 }]);
        assert_eq!(snap.score, 0);
        assert!(snap.traffic.is_empty());
        assert_eq!(snap.phase, GamePhase::Idle);
        assert_eq!(game.state.score, 0);
        assert!(game.state.traffic.is_empty());

        // A fresh start re-baselines the clock
        game.start();
        assert!(game.frame(10_000.0).is_none());
    }

    #[test]
    fn test_crash_requires_reset() {
        let mut game = quiet_loop();
        game.start();
        game.state.phase = GamePhase::Crashed;
        game.key_down(Key::ArrowUp);
        assert_eq!(game.phase(), GamePhase::Crashed);
        assert!(!game.is_running());

        game.key_down(Key::Reset);
        assert_eq!(game.phase(), GamePhase::Idle);
        game.key_down(Key::ArrowUp);
        assert!(game.is_running());
    }

    #[test]
    fn test_held_pedal_survives_reset() {
        let mut game = quiet_loop();
        game.key_down(Key::ArrowUp);
        game.key_down(Key::Reset);
        assert!(game.input().accelerate);
    }
}
