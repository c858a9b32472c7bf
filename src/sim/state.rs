//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; resetting it is the only way
//! to start over after a crash.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::motion::{self, Direction};
use super::track::TrackGeometry;
use super::traffic::{self, Vehicle, VehicleKind};
use crate::consts::PLAYER_START_ANGLE;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Reset and waiting for the accelerator
    Idle,
    /// Frames are advancing the simulation
    Running,
    /// Hit a car; nothing moves until reset
    Crashed,
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u32 },
    TrafficSpawned { id: u32, kind: VehicleKind, direction: Direction },
    Collision { vehicle_id: u32 },
    /// The render loop can stop scheduling frames
    Stopped,
}

/// The player's car
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Signed angle travelled since reset (clockwise, so never positive)
    pub angle_moved: f32,
}

impl Player {
    /// Angle on the left circle
    pub fn total_angle(&self) -> f32 {
        PLAYER_START_ANGLE + self.angle_moved
    }

    pub fn position(&self, track: &TrackGeometry) -> Vec2 {
        motion::position(self.total_angle(), track.track_radius, -track.arc_center_x)
    }

    pub fn heading(&self) -> f32 {
        motion::heading(self.total_angle(), Direction::Clockwise)
    }

    /// Completed quarter turns
    pub fn laps(&self) -> u32 {
        (self.angle_moved.abs() / std::f32::consts::FRAC_PI_2).floor() as u32
    }
}

/// Where to draw a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub rotation_z: f32,
}

impl Pose {
    fn new(pos: Vec2, rotation_z: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            rotation_z,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficPose {
    pub id: u32,
    pub kind: VehicleKind,
    pub pose: Pose,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub player: Pose,
    pub traffic: Vec<TrafficPose>,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the run RNG started from
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub track: TrackGeometry,
    pub phase: GamePhase,
    /// Lap count shown on the HUD
    pub score: u32,
    pub player: Player,
    /// Traffic in spawn order
    pub traffic: Vec<Vehicle>,
    /// Frames advanced since the last reset
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            track: TrackGeometry::from_tuning(&tuning),
            tuning,
            phase: GamePhase::Idle,
            score: 0,
            player: Player::default(),
            traffic: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Put the player back on the start line and clear the road.
    ///
    /// The RNG keeps its stream so the next run rolls different traffic.
    pub fn reset(&mut self) {
        self.player = Player::default();
        self.score = 0;
        self.traffic.clear();
        self.time_ticks = 0;
        self.events.clear();
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.phase = GamePhase::Idle;
    }

    /// Leave Idle; returns false from any other phase
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Running;
        true
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Roll and add one traffic vehicle
    pub fn spawn_vehicle(&mut self) -> &Vehicle {
        let id = self.next_entity_id();
        let vehicle = traffic::spawn(&mut self.rng, id, &self.tuning);
        log::debug!(
            "Spawned {:?} #{} ({:?}, speed x{:.2})",
            vehicle.kind,
            vehicle.id,
            vehicle.direction,
            vehicle.speed_factor
        );
        self.events.push(GameEvent::TrafficSpawned {
            id: vehicle.id,
            kind: vehicle.kind,
            direction: vehicle.direction,
        });
        self.traffic.push(vehicle);
        &self.traffic[self.traffic.len() - 1]
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            phase: self.phase,
            score: self.score,
            player: Pose::new(self.player.position(&self.track), self.player.heading()),
            traffic: self
                .traffic
                .iter()
                .map(|v| TrafficPose {
                    id: v.id,
                    kind: v.kind,
                    pose: Pose::new(v.position(&self.track), v.heading()),
                })
                .collect(),
        }
    }
}
