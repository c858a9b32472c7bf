//! Data-driven game balance
//!
//! Every gameplay constant can be overridden from a JSON document. Missing
//! fields fall back to the arcade defaults in [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::track::TrackGeometry;

/// How hit zones are placed around a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitZoneModel {
    /// Zones sit ahead of and behind the vehicle along its heading; all four
    /// player/traffic zone pairs are compared.
    #[default]
    Heading,
    /// Zones are offset along the fixed -Y axis, the traffic back zone repeats
    /// its front zone, and only three pairs are compared. Kept so old replays
    /// and balance numbers can be reproduced.
    Legacy,
}

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub track_radius: f32,
    pub track_width: f32,

    /// Radians per millisecond at the normal speed regime
    pub base_speed: f32,
    pub accelerate_factor: f32,
    pub decelerate_factor: f32,

    pub hit_zone_offset: f32,
    pub collision_distance: f32,
    pub hit_zone_model: HitZoneModel,
    /// Trucks were never wired into collision checks; enable to include them
    pub truck_collisions: bool,

    pub laps_per_spawn: u32,
    /// Optional hard cap on the traffic roster (None = unbounded)
    pub max_traffic: Option<usize>,
    pub car_speed_range: (f32, f32),
    pub truck_speed_range: (f32, f32),
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            track_radius: TRACK_RADIUS,
            track_width: TRACK_WIDTH,

            base_speed: BASE_SPEED,
            accelerate_factor: ACCELERATE_FACTOR,
            decelerate_factor: DECELERATE_FACTOR,

            hit_zone_offset: HIT_ZONE_OFFSET,
            collision_distance: COLLISION_DISTANCE,
            hit_zone_model: HitZoneModel::Heading,
            truck_collisions: false,

            laps_per_spawn: LAPS_PER_SPAWN,
            max_traffic: None,
            car_speed_range: CAR_SPEED_RANGE,
            truck_speed_range: TRUCK_SPEED_RANGE,
        }
    }
}

/// Error loading or validating a tuning document
#[derive(Debug)]
pub enum TuningError {
    Json(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Json(e) => write!(f, "malformed tuning JSON: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning field `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Json(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Json(e)
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.track_radius) {
            return Err(invalid("track_radius", "must be a positive number"));
        }
        if !(self.track_width.is_finite() && self.track_width >= 0.0)
            || self.track_width >= self.track_radius
        {
            return Err(invalid("track_width", "must be in [0, track_radius)"));
        }
        // Too wide a lane pushes the circles apart until the island arcs stop meeting
        let track = TrackGeometry::from_tuning(self);
        let angles = [track.arc_angle_2, track.arc_angle_3, track.arc_angle_4];
        if !track.arc_center_x.is_finite() || angles.iter().any(|a| !a.is_finite()) {
            return Err(invalid("track_width", "too wide for the lane circles to overlap"));
        }
        if !positive(self.base_speed) {
            return Err(invalid("base_speed", "must be a positive number"));
        }
        if !positive(self.accelerate_factor) {
            return Err(invalid("accelerate_factor", "must be a positive number"));
        }
        if !positive(self.decelerate_factor) {
            return Err(invalid("decelerate_factor", "must be a positive number"));
        }
        if !(self.hit_zone_offset.is_finite() && self.hit_zone_offset >= 0.0) {
            return Err(invalid("hit_zone_offset", "must be a finite number >= 0"));
        }
        if !positive(self.collision_distance) {
            return Err(invalid("collision_distance", "must be a positive number"));
        }
        if self.laps_per_spawn == 0 {
            return Err(invalid("laps_per_spawn", "must be at least 1"));
        }
        check_range("car_speed_range", self.car_speed_range)?;
        check_range("truck_speed_range", self.truck_speed_range)?;
        Ok(())
    }

    /// Load tuning overrides from a file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

fn invalid(field: &'static str, reason: &'static str) -> TuningError {
    TuningError::Invalid { field, reason }
}

fn check_range(field: &'static str, (min, max): (f32, f32)) -> Result<(), TuningError> {
    if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive (min, max) pair with min <= max"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "truck_collisions": true, "max_traffic": 4 }"#)
            .expect("valid tuning");
        assert!(tuning.truck_collisions);
        assert_eq!(tuning.max_traffic, Some(4));
        assert_eq!(tuning.base_speed, BASE_SPEED);
        assert_eq!(tuning.hit_zone_model, HitZoneModel::Heading);
    }

    #[test]
    fn test_hit_zone_model_names() {
        let tuning = Tuning::from_json(r#"{ "hit_zone_model": "legacy" }"#).unwrap();
        assert_eq!(tuning.hit_zone_model, HitZoneModel::Legacy);
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Json(_)));
    }

    #[test]
    fn test_rejects_zero_spawn_interval() {
        let err = Tuning::from_json(r#"{ "laps_per_spawn": 0 }"#).unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "laps_per_spawn"),
            other => panic!("unexpected error: {other}"),
        }
    }

    fn rejected_field(json: &str) -> &'static str {
        match Tuning::from_json(json) {
            Err(TuningError::Invalid { field, .. }) => field,
            other => panic!("expected validation error for {json}, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_degenerate_track_width() {
        // Wide lanes put the circle centers beyond the inner radius; acos goes NaN
        assert_eq!(rejected_field(r#"{ "track_width": 150 }"#), "track_width");
        assert_eq!(rejected_field(r#"{ "track_width": 225 }"#), "track_width");
        assert!(Tuning::from_json(r#"{ "track_width": 0 }"#).is_ok());
    }

    #[test]
    fn test_accepted_widths_build_finite_geometry() {
        for width in [0.0, 10.0, 45.0, 80.0] {
            let tuning = Tuning {
                track_width: width,
                ..Default::default()
            };
            if tuning.validate().is_ok() {
                let track = TrackGeometry::from_tuning(&tuning);
                assert!(track.arc_angle_3.is_finite() && track.arc_angle_4.is_finite());
                assert!(track.middle_island().closing_gap() < 1e-3);
            }
        }
    }

    #[test]
    fn test_rejects_nonpositive_collision_distance() {
        assert_eq!(rejected_field(r#"{ "collision_distance": -5 }"#), "collision_distance");
        assert_eq!(rejected_field(r#"{ "collision_distance": 0 }"#), "collision_distance");
        assert_eq!(rejected_field(r#"{ "hit_zone_offset": -1 }"#), "hit_zone_offset");
        assert!(Tuning::from_json(r#"{ "hit_zone_offset": 0 }"#).is_ok());
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let err = Tuning::from_json(r#"{ "car_speed_range": [2.0, 1.0] }"#).unwrap_err();
        assert!(err.to_string().contains("car_speed_range"));
    }
}
