//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the tick delta
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod motion;
pub mod state;
pub mod tick;
pub mod track;
pub mod traffic;

pub use collision::{HitZones, detect_collision, hit_zones};
pub use motion::{Direction, SpeedRegime};
pub use state::{FrameSnapshot, GameEvent, GamePhase, GameState, Player, Pose, TrafficPose};
pub use tick::{TickInput, tick};
pub use track::{ArcSegment, LaneMarking, PathSegment, Shape, TrackGeometry, TrackLayout};
pub use traffic::{Vehicle, VehicleKind};
