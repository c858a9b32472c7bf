//! Per-frame simulation step
//!
//! Order within a step: player, score, spawner, traffic, collision.

use super::collision::detect_collision;
use super::motion::{self, SpeedRegime};
use super::state::{GameEvent, GamePhase, GameState};
use super::traffic;

/// Pedal state sampled for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub accelerate: bool,
    pub decelerate: bool,
}

impl TickInput {
    pub fn regime(&self) -> SpeedRegime {
        SpeedRegime::from_input(self.accelerate, self.decelerate)
    }
}

/// Advance a running game by `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if state.phase != GamePhase::Running {
        return;
    }
    let dt_ms = motion::sanitize_dt(dt_ms);
    state.time_ticks += 1;

    // Player
    let speed = input.regime().speed(&state.tuning);
    state.player.angle_moved = motion::advance_player_angle(state.player.angle_moved, speed, dt_ms);

    // Score
    let laps = state.player.laps();
    if laps != state.score {
        state.score = laps;
        log::debug!("Lap {}", laps);
        state.push_event(GameEvent::ScoreChanged { score: laps });
    }

    // Traffic joins at the start and every few laps, at most one per tick
    if traffic::should_spawn(laps, state.traffic.len(), &state.tuning) {
        state.spawn_vehicle();
    }

    let base_speed = state.tuning.base_speed;
    for vehicle in &mut state.traffic {
        vehicle.advance(base_speed, dt_ms);
    }

    if let Some(vehicle_id) = detect_collision(&state.player, &state.traffic, &state.track, &state.tuning) {
        log::info!("Crashed into vehicle #{} with score {}", vehicle_id, state.score);
        state.phase = GamePhase::Crashed;
        state.push_event(GameEvent::Collision { vehicle_id });
        state.push_event(GameEvent::Stopped);
    }
}
