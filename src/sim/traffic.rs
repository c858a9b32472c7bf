//! Traffic vehicles and the spawner
//!
//! Traffic drives the right-hand circle in either direction. One vehicle is on
//! the road before the first lap, and another joins every `laps_per_spawn` laps.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::motion::{self, Direction};
use super::track::TrackGeometry;
use crate::tuning::Tuning;

/// Vehicle body types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleKind {
    Car,
    Truck,
}

/// A traffic vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u32,
    pub kind: VehicleKind,
    pub direction: Direction,
    /// Angle on the traffic circle (radians)
    pub angle: f32,
    /// Multiplier applied to the base speed
    pub speed_factor: f32,
}

impl Vehicle {
    /// Clockwise traffic enters at the top of the circle, counter-clockwise at the bottom
    pub fn new(id: u32, kind: VehicleKind, direction: Direction, speed_factor: f32) -> Self {
        let angle = match direction {
            Direction::Clockwise => FRAC_PI_2,
            Direction::CounterClockwise => -FRAC_PI_2,
        };
        Self {
            id,
            kind,
            direction,
            angle,
            speed_factor,
        }
    }

    pub fn position(&self, track: &TrackGeometry) -> Vec2 {
        motion::position(self.angle, track.track_radius, track.arc_center_x)
    }

    pub fn heading(&self) -> f32 {
        motion::heading(self.angle, self.direction)
    }

    /// Move along the circle for `dt_ms` milliseconds
    pub fn advance(&mut self, base_speed: f32, dt_ms: f32) {
        self.angle =
            motion::advance_traffic_angle(self.angle, self.direction, base_speed, self.speed_factor, dt_ms);
    }
}

/// Whether the roster is below its quota for the given lap count.
///
/// The quota is `(laps + 1) / laps_per_spawn` compared as a real number, so
/// the first vehicle is due immediately and the next at every interval.
pub fn should_spawn(laps: u32, traffic_count: usize, tuning: &Tuning) -> bool {
    if tuning.max_traffic.is_some_and(|max| traffic_count >= max) {
        return false;
    }
    let quota = (laps as f64 + 1.0) / tuning.laps_per_spawn.max(1) as f64;
    (traffic_count as f64) < quota
}

/// Roll a new vehicle: kind, direction and speed are all uniform
pub fn spawn<R: Rng + ?Sized>(rng: &mut R, id: u32, tuning: &Tuning) -> Vehicle {
    let kind = if rng.random_bool(0.5) {
        VehicleKind::Car
    } else {
        VehicleKind::Truck
    };
    let direction = if rng.random_bool(0.5) {
        Direction::Clockwise
    } else {
        Direction::CounterClockwise
    };

    let (min, max) = match kind {
        VehicleKind::Car => tuning.car_speed_range,
        VehicleKind::Truck => tuning.truck_speed_range,
    };
    let speed_factor = min + rng.random::<f32>() * (max - min);

    Vehicle::new(id, kind, direction, speed_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_first_vehicle_before_first_lap() {
        let tuning = Tuning::default();
        assert!(should_spawn(0, 0, &tuning));
        assert!(!should_spawn(0, 1, &tuning));
    }

    #[test]
    fn test_spawn_thresholds() {
        let tuning = Tuning::default();
        // (4 + 1) / 5 = 1.0, one vehicle is enough
        assert!(!should_spawn(4, 1, &tuning));
        // (5 + 1) / 5 = 1.2 > 1, second vehicle is due
        assert!(should_spawn(5, 1, &tuning));
        assert!(!should_spawn(9, 2, &tuning));
        assert!(should_spawn(10, 2, &tuning));
    }

    #[test]
    fn test_max_traffic_cap() {
        let tuning = Tuning {
            max_traffic: Some(2),
            ..Default::default()
        };
        assert!(should_spawn(100, 1, &tuning));
        assert!(!should_spawn(100, 2, &tuning));
    }

    #[test]
    fn test_spawn_ranges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut kinds = (0, 0);
        let mut directions = (0, 0);

        for id in 0..500 {
            let v = spawn(&mut rng, id, &tuning);
            match v.kind {
                VehicleKind::Car => {
                    kinds.0 += 1;
                    assert!((1.0..=2.0).contains(&v.speed_factor));
                }
                VehicleKind::Truck => {
                    kinds.1 += 1;
                    assert!((0.6..=1.5).contains(&v.speed_factor));
                }
            }
            match v.direction {
                Direction::Clockwise => {
                    directions.0 += 1;
                    assert_eq!(v.angle, FRAC_PI_2);
                }
                Direction::CounterClockwise => {
                    directions.1 += 1;
                    assert_eq!(v.angle, -FRAC_PI_2);
                }
            }
        }

        // Both outcomes show up with a fair coin
        assert!(kinds.0 > 150 && kinds.1 > 150);
        assert!(directions.0 > 150 && directions.1 > 150);
    }

    #[test]
    fn test_spawn_is_seeded() {
        let tuning = Tuning::default();
        let a = spawn(&mut Pcg32::seed_from_u64(42), 1, &tuning);
        let b = spawn(&mut Pcg32::seed_from_u64(42), 1, &tuning);
        assert_eq!(a, b);
    }

    #[test]
    fn test_vehicle_heading_and_position() {
        let track = TrackGeometry::default();
        let v = Vehicle::new(1, VehicleKind::Car, Direction::Clockwise, 1.0);
        let pos = v.position(&track);
        assert!((pos - Vec2::new(track.arc_center_x, track.track_radius)).length() < 1e-3);
        assert!(v.heading().abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_roster_tracks_quota(laps in 0u32..1000) {
            let tuning = Tuning::default();
            // Spawning one per check converges to ceil((laps + 1) / 5)
            let mut count = 0usize;
            while should_spawn(laps, count, &tuning) {
                count += 1;
            }
            prop_assert_eq!(count, (laps as usize + 1).div_ceil(5));
        }
    }
}
