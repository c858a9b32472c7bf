//! Polar motion model
//!
//! Every vehicle is pinned to a circle of the track. Its only state is an
//! angle; position and heading are recomputed from that angle so they can
//! never drift apart.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Direction a vehicle travels around its circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// +1 for counter-clockwise (increasing angle), -1 for clockwise
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Clockwise => -1.0,
            Direction::CounterClockwise => 1.0,
        }
    }

    /// Angle from the radial direction to the direction of travel
    #[inline]
    pub fn tangent_offset(self) -> f32 {
        self.sign() * FRAC_PI_2
    }
}

/// Speed multiplier picked from the held pedals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedRegime {
    Accelerate,
    Decelerate,
    #[default]
    Cruise,
}

impl SpeedRegime {
    /// Accelerate wins when both pedals are held
    pub fn from_input(accelerate: bool, decelerate: bool) -> Self {
        if accelerate {
            SpeedRegime::Accelerate
        } else if decelerate {
            SpeedRegime::Decelerate
        } else {
            SpeedRegime::Cruise
        }
    }

    /// Angular speed in radians per millisecond
    pub fn speed(self, tuning: &Tuning) -> f32 {
        match self {
            SpeedRegime::Accelerate => tuning.base_speed * tuning.accelerate_factor,
            SpeedRegime::Decelerate => tuning.base_speed * tuning.decelerate_factor,
            SpeedRegime::Cruise => tuning.base_speed,
        }
    }
}

/// Point on a circle of `radius` whose center sits at (`center_offset`, 0)
#[inline]
pub fn position(angle: f32, radius: f32, center_offset: f32) -> Vec2 {
    Vec2::new(angle.cos() * radius + center_offset, angle.sin() * radius)
}

/// Facing angle (rotation about Z) of a vehicle at `angle` moving in `direction`
#[inline]
pub fn heading(angle: f32, direction: Direction) -> f32 {
    angle + direction.tangent_offset()
}

/// Clamp a frame delta to something safe to integrate
#[inline]
pub fn sanitize_dt(dt_ms: f32) -> f32 {
    if dt_ms.is_finite() && dt_ms > 0.0 { dt_ms } else { 0.0 }
}

/// The player always drives clockwise, so its angle only ever decreases
pub fn advance_player_angle(angle_moved: f32, speed: f32, dt_ms: f32) -> f32 {
    angle_moved - speed * sanitize_dt(dt_ms)
}

pub fn advance_traffic_angle(
    angle: f32,
    direction: Direction,
    base_speed: f32,
    speed_factor: f32,
    dt_ms: f32,
) -> f32 {
    angle + direction.sign() * base_speed * speed_factor * sanitize_dt(dt_ms)
}
