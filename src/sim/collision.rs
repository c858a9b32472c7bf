//! Hit-zone collision detection
//!
//! Vehicles are not given real hitboxes. Each one carries two points, one in
//! front of and one behind its center, and a crash happens when a player point
//! comes within `collision_distance` of a traffic point.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::motion::Direction;
use super::state::Player;
use super::track::TrackGeometry;
use super::traffic::{Vehicle, VehicleKind};
use crate::heading_vector;
use crate::tuning::{HitZoneModel, Tuning};

/// The two collision proxy points of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitZones {
    pub forward: Vec2,
    pub backward: Vec2,
}

/// Offset `center` by `distance` along the vehicle's direction of travel
pub fn hit_zone_position(center: Vec2, angle: f32, direction: Direction, distance: f32) -> Vec2 {
    center + heading_vector(angle + direction.tangent_offset()) * distance
}

/// Forward and backward hit zones of a vehicle at `center`
pub fn hit_zones(center: Vec2, angle: f32, direction: Direction, offset: f32) -> HitZones {
    HitZones {
        forward: hit_zone_position(center, angle, direction, offset),
        backward: hit_zone_position(center, angle, direction, -offset),
    }
}

/// Zones as the first release computed them: the direction angle always came
/// out as -π/2 and the second traffic zone repeated the first.
fn legacy_hit_zones(center: Vec2, offset: f32, is_player: bool) -> HitZones {
    let dir = heading_vector(-FRAC_PI_2);
    let forward = center + dir * offset;
    let backward = if is_player { center - dir * offset } else { forward };
    HitZones { forward, backward }
}

/// Check a player/traffic zone pair set against the threshold
fn zones_touch(player: &HitZones, other: &HitZones, threshold: f32, model: HitZoneModel) -> bool {
    let close = |a: Vec2, b: Vec2| a.distance(b) < threshold;

    match model {
        HitZoneModel::Heading => {
            close(player.forward, other.forward)
                || close(player.forward, other.backward)
                || close(player.backward, other.forward)
                || close(player.backward, other.backward)
        }
        // The original only tested three of the four pairs
        HitZoneModel::Legacy => {
            close(player.forward, other.forward)
                || close(player.forward, other.backward)
                || close(player.backward, other.forward)
        }
    }
}

fn player_zones(player: &Player, track: &TrackGeometry, tuning: &Tuning) -> HitZones {
    let center = player.position(track);
    match tuning.hit_zone_model {
        HitZoneModel::Heading => {
            hit_zones(center, player.total_angle(), Direction::Clockwise, tuning.hit_zone_offset)
        }
        HitZoneModel::Legacy => legacy_hit_zones(center, tuning.hit_zone_offset, true),
    }
}

fn vehicle_zones(vehicle: &Vehicle, track: &TrackGeometry, tuning: &Tuning) -> HitZones {
    let center = vehicle.position(track);
    match tuning.hit_zone_model {
        HitZoneModel::Heading => {
            hit_zones(center, vehicle.angle, vehicle.direction, tuning.hit_zone_offset)
        }
        HitZoneModel::Legacy => legacy_hit_zones(center, tuning.hit_zone_offset, false),
    }
}

/// Find the first traffic vehicle the player is touching.
///
/// Trucks are skipped unless `truck_collisions` is enabled. Returns the id of
/// the vehicle hit; later vehicles are not examined.
pub fn detect_collision(
    player: &Player,
    traffic: &[Vehicle],
    track: &TrackGeometry,
    tuning: &Tuning,
) -> Option<u32> {
    let player = player_zones(player, track, tuning);

    traffic
        .iter()
        .filter(|v| v.kind == VehicleKind::Car || tuning.truck_collisions)
        .find(|v| {
            let zones = vehicle_zones(v, track, tuning);
            zones_touch(&player, &zones, tuning.collision_distance, tuning.hit_zone_model)
        })
        .map(|v| v.id)
}
