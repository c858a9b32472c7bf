//! Oval track geometry
//!
//! The track is two overlapping circles of equal radius. The player drives the
//! left circle, traffic drives the right one, and the lanes cross in the middle.
//! The island and field outlines are built from arcs on those circles and are
//! only needed by renderers; the simulation itself only uses the circle centers
//! and radius.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{TRACK_RADIUS, TRACK_WIDTH};
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Sweeps smaller than this are treated as zero-length
const SWEEP_EPSILON: f32 = 1e-6;

/// Fixed arc parameters of the two-circle oval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    /// Lane centerline radius
    pub track_radius: f32,
    pub track_width: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Angle where the inner edge of one circle meets the outer edge of the other
    pub arc_angle_1: f32,
    pub arc_angle_2: f32,
    /// Angle where the two inner edges cross (middle island tips)
    pub arc_angle_3: f32,
    /// Angle where the two outer edges cross (outer field notches)
    pub arc_angle_4: f32,
    /// Distance of each circle center from the origin along X
    pub arc_center_x: f32,
}

impl Default for TrackGeometry {
    fn default() -> Self {
        Self::new(TRACK_RADIUS, TRACK_WIDTH)
    }
}

impl TrackGeometry {
    pub fn new(track_radius: f32, track_width: f32) -> Self {
        let inner_radius = track_radius - track_width;
        let outer_radius = track_radius + track_width;

        let arc_angle_1 = PI / 3.0;
        let delta_y = arc_angle_1.sin() * inner_radius;
        let arc_angle_2 = (delta_y / outer_radius).asin();

        let arc_center_x =
            (arc_angle_1.cos() * inner_radius + arc_angle_2.cos() * outer_radius) / 2.0;
        let arc_angle_3 = (arc_center_x / inner_radius).acos();
        let arc_angle_4 = (arc_center_x / outer_radius).acos();

        Self {
            track_radius,
            track_width,
            inner_radius,
            outer_radius,
            arc_angle_1,
            arc_angle_2,
            arc_angle_3,
            arc_angle_4,
            arc_center_x,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.track_radius, tuning.track_width)
    }

    /// Center of the circle the player drives
    pub fn left_center(&self) -> Vec2 {
        Vec2::new(-self.arc_center_x, 0.0)
    }

    /// Center of the circle traffic drives
    pub fn right_center(&self) -> Vec2 {
        Vec2::new(self.arc_center_x, 0.0)
    }

    /// Grass island enclosed by the left circle's inner edge and the right circle's outer edge
    pub fn left_island(&self) -> Shape {
        let mut shape = Shape::default();
        shape.absarc(self.left_center(), self.inner_radius, self.arc_angle_1, -self.arc_angle_1, false);
        shape.absarc(
            self.right_center(),
            self.outer_radius,
            PI + self.arc_angle_2,
            PI - self.arc_angle_2,
            true,
        );
        shape
    }

    /// Mirror image of [`left_island`](Self::left_island)
    pub fn right_island(&self) -> Shape {
        let mut shape = Shape::default();
        shape.absarc(
            self.right_center(),
            self.inner_radius,
            PI - self.arc_angle_1,
            PI + self.arc_angle_1,
            true,
        );
        shape.absarc(self.left_center(), self.outer_radius, -self.arc_angle_2, self.arc_angle_2, false);
        shape
    }

    /// Lens-shaped island where both inner edges overlap
    pub fn middle_island(&self) -> Shape {
        let mut shape = Shape::default();
        shape.absarc(self.left_center(), self.inner_radius, self.arc_angle_3, -self.arc_angle_3, true);
        shape.absarc(
            self.right_center(),
            self.inner_radius,
            PI + self.arc_angle_3,
            PI - self.arc_angle_3,
            true,
        );
        shape
    }

    /// Rectangular map area with the outer edge of the oval cut out
    pub fn outer_field(&self, map_width: f32, map_height: f32) -> Shape {
        let half_w = map_width / 2.0;
        let half_h = map_height / 2.0;

        let mut shape = Shape::default();
        shape.move_to(Vec2::new(-half_w, -half_h));
        shape.line_to(Vec2::new(0.0, -half_h));
        shape.absarc(self.left_center(), self.outer_radius, -self.arc_angle_4, self.arc_angle_4, true);
        shape.absarc(
            self.right_center(),
            self.outer_radius,
            PI - self.arc_angle_4,
            PI + self.arc_angle_4,
            true,
        );
        shape.line_to(Vec2::new(0.0, -half_h));
        shape.line_to(Vec2::new(half_w, -half_h));
        shape.line_to(Vec2::new(half_w, half_h));
        shape.line_to(Vec2::new(-half_w, half_h));
        shape
    }

    /// Dashed centerlines of both lanes
    pub fn lane_markings(&self) -> [LaneMarking; 2] {
        [
            LaneMarking::new(self.left_center(), self.track_radius),
            LaneMarking::new(self.right_center(), self.track_radius),
        ]
    }

    /// Everything a renderer needs to build the static scene, flattened to polylines
    pub fn layout(&self, map_width: f32, map_height: f32, points_per_arc: usize) -> TrackLayout {
        TrackLayout {
            geometry: self.clone(),
            map_size: (map_width, map_height),
            outer_field: self.outer_field(map_width, map_height).sample(points_per_arc),
            left_island: self.left_island().sample(points_per_arc),
            right_island: self.right_island().sample(points_per_arc),
            middle_island: self.middle_island().sample(points_per_arc),
            lane_markings: self.lane_markings(),
        }
    }
}

/// Static scene description handed to the renderer once per page load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackLayout {
    pub geometry: TrackGeometry,
    pub map_size: (f32, f32),
    pub outer_field: Vec<Vec2>,
    pub left_island: Vec<Vec2>,
    pub right_island: Vec<Vec2>,
    pub middle_island: Vec<Vec2>,
    pub lane_markings: [LaneMarking; 2],
}

/// A dashed full circle painted on the road
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneMarking {
    pub center: Vec2,
    pub radius: f32,
    /// Dash length and gap length
    pub dash: (f32, f32),
}

impl LaneMarking {
    fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            dash: (10.0, 14.0),
        }
    }
}

/// A circular arc around an absolute center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub center: Vec2,
    pub radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    /// Direction of travel from start to end
    pub clockwise: bool,
}

impl ArcSegment {
    pub fn new(center: Vec2, radius: f32, start_angle: f32, end_angle: f32, clockwise: bool) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        }
    }

    /// Signed sweep from start to end (negative when clockwise), in (-2π, 2π]
    pub fn sweep(&self) -> f32 {
        let mut delta = self.end_angle - self.start_angle;
        let same_points = delta.abs() < SWEEP_EPSILON;

        delta = delta.rem_euclid(TAU);
        if delta < SWEEP_EPSILON {
            delta = if same_points { 0.0 } else { TAU };
        }

        if self.clockwise && !same_points {
            delta = if delta == TAU { -TAU } else { delta - TAU };
        }
        delta
    }

    /// Point at parameter t in [0, 1] along the sweep
    pub fn point_at(&self, t: f32) -> Vec2 {
        let theta = self.start_angle + self.sweep() * t;
        self.center + polar_to_cartesian(self.radius, theta)
    }

    pub fn start_point(&self) -> Vec2 {
        self.point_at(0.0)
    }

    pub fn end_point(&self) -> Vec2 {
        self.point_at(1.0)
    }

    /// Sample points along the arc, endpoints included
    pub fn sample(&self, num_points: usize) -> Vec<Vec2> {
        (0..num_points)
            .map(|i| {
                let t = i as f32 / (num_points - 1).max(1) as f32;
                self.point_at(t)
            })
            .collect()
    }
}

/// One piece of a shape outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    MoveTo(Vec2),
    LineTo(Vec2),
    Arc(ArcSegment),
}

/// A closed 2D outline built from lines and arcs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub segments: Vec<PathSegment>,
}

impl Shape {
    pub fn move_to(&mut self, point: Vec2) {
        self.segments.push(PathSegment::MoveTo(point));
    }

    pub fn line_to(&mut self, point: Vec2) {
        self.segments.push(PathSegment::LineTo(point));
    }

    /// Append an arc; the outline runs straight to its start point first
    pub fn absarc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32, clockwise: bool) {
        self.segments.push(PathSegment::Arc(ArcSegment::new(
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        )));
    }

    /// Flatten the outline into a polyline (the closing edge is implied)
    pub fn sample(&self, points_per_arc: usize) -> Vec<Vec2> {
        let mut points = Vec::new();
        for segment in &self.segments {
            match segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => points.push(*p),
                PathSegment::Arc(arc) => points.extend(arc.sample(points_per_arc)),
            }
        }
        points
    }

    /// Distance between the last outlined point and the first, i.e. the length
    /// of the implied closing edge
    pub fn closing_gap(&self) -> f32 {
        let points = self.sample(2);
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => first.distance(*last),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn arcs(shape: &Shape) -> Vec<ArcSegment> {
        shape
            .segments
            .iter()
            .filter_map(|s| match s {
                PathSegment::Arc(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_derived_radii() {
        let track = TrackGeometry::default();
        assert_eq!(track.inner_radius, 180.0);
        assert_eq!(track.outer_radius, 270.0);
        // Circles overlap: centers are closer together than one diameter
        assert!(track.arc_center_x > 0.0 && track.arc_center_x < track.track_radius);
    }

    #[test]
    fn test_islands_are_closed() {
        let track = TrackGeometry::default();
        for shape in [track.left_island(), track.right_island(), track.middle_island()] {
            assert!(shape.closing_gap() < EPS, "gap {}", shape.closing_gap());
        }
    }

    #[test]
    fn test_island_arcs_join() {
        let track = TrackGeometry::default();
        for shape in [track.left_island(), track.right_island(), track.middle_island()] {
            let a = arcs(&shape);
            assert_eq!(a.len(), 2);
            assert!(a[0].end_point().distance(a[1].start_point()) < EPS);
        }
    }

    #[test]
    fn test_middle_island_tips_on_y_axis() {
        let track = TrackGeometry::default();
        let a = arcs(&track.middle_island());
        assert!(a[0].start_point().x.abs() < EPS);
        assert!(a[0].end_point().x.abs() < EPS);
    }

    #[test]
    fn test_sweep_direction() {
        let ccw = ArcSegment::new(Vec2::ZERO, 1.0, PI / 3.0, -PI / 3.0, false);
        assert!((ccw.sweep() - 4.0 * PI / 3.0).abs() < EPS);

        let cw = ArcSegment::new(Vec2::ZERO, 1.0, PI + 0.2, PI - 0.2, true);
        assert!((cw.sweep() + 0.4).abs() < EPS);

        let full = ArcSegment::new(Vec2::ZERO, 1.0, 0.0, 0.0, false);
        assert_eq!(full.sweep(), 0.0);
    }

    #[test]
    fn test_left_island_passes_left_of_center() {
        let track = TrackGeometry::default();
        let a = arcs(&track.left_island());
        // Counter-clockwise from +60° to -60° goes around the far left side
        let mid = a[0].point_at(0.5);
        assert!((mid - Vec2::new(-track.arc_center_x - track.inner_radius, 0.0)).length() < EPS);
    }

    #[test]
    fn test_outer_field_contains_map_corners() {
        let track = TrackGeometry::default();
        let points = track.outer_field(960.0, 1080.0).sample(8);
        assert_eq!(points.first(), Some(&Vec2::new(-480.0, -540.0)));
        assert_eq!(points.last(), Some(&Vec2::new(-480.0, 540.0)));
    }

    #[test]
    fn test_layout_includes_every_outline() {
        let track = TrackGeometry::default();
        let layout = track.layout(960.0, 1080.0, 16);
        assert_eq!(layout.map_size, (960.0, 1080.0));
        // Six corner/edge points plus two sampled arcs
        assert_eq!(layout.outer_field.len(), 6 + 2 * 16);
        assert_eq!(layout.left_island.len(), 2 * 16);
        assert!(layout.middle_island.iter().all(|p| p.is_finite()));

        let json = serde_json::to_value(&layout).unwrap();
        assert!(json.get("outerField").is_some());
        assert!(json.get("laneMarkings").is_some());
    }

    #[test]
    fn test_lane_markings_follow_centerline() {
        let track = TrackGeometry::default();
        let [left, right] = track.lane_markings();
        assert_eq!(left.center, track.left_center());
        assert_eq!(right.center, track.right_center());
        assert_eq!(left.radius, TRACK_RADIUS);
    }
}
