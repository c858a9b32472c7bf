//! Oval Rush - A top-down oval track arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track, motion, traffic, collisions, run state)
//! - `controller`: Frame clock, keyboard input and start/reset handling
//! - `tuning`: Data-driven game balance

pub mod controller;
pub mod sim;
pub mod tuning;

pub use controller::{GameLoop, Key};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Centerline radius of both track circles
    pub const TRACK_RADIUS: f32 = 225.0;
    /// Half-width of the driving lane band (inner = radius - width, outer = radius + width)
    pub const TRACK_WIDTH: f32 = 45.0;

    /// Player angular speed in radians per millisecond
    pub const BASE_SPEED: f32 = 0.0017;
    /// Speed multiplier while accelerating
    pub const ACCELERATE_FACTOR: f32 = 2.0;
    /// Speed multiplier while braking
    pub const DECELERATE_FACTOR: f32 = 0.5;

    /// Player starts on the far left of the left circle
    pub const PLAYER_START_ANGLE: f32 = std::f32::consts::PI;

    /// Distance of each hit zone from the vehicle center
    pub const HIT_ZONE_OFFSET: f32 = 15.0;
    /// Hit zones closer than this collide
    pub const COLLISION_DISTANCE: f32 = 40.0;

    /// A new vehicle joins every N laps
    pub const LAPS_PER_SPAWN: u32 = 5;

    /// Traffic speed factor ranges (multiplied with BASE_SPEED)
    pub const CAR_SPEED_RANGE: (f32, f32) = (1.0, 2.0);
    pub const TRUCK_SPEED_RANGE: (f32, f32) = (0.6, 1.5);
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector pointing along `theta`
#[inline]
pub fn heading_vector(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
