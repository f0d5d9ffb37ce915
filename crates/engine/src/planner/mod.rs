// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engagement Planner (C2): computes a trajectory and waypoint timing from
//! telemetry and an editable waypoint list. One concrete implementation
//! per [`WeaponKind`] lives in [`kinds`]; this module owns the shared
//! contract and the [`EngagementPlan`] result type.

pub mod kinds;

use wcp_core::{bearing_deg, distance_m, GeoPoint2D, GeoPoint3D, TubeNumber, WeaponKind};
use wcp_wire::{AssignmentInfo, OwnShipNavInfo, TargetTrack, Waypoint};

/// Hard ceiling on cached trajectory samples (§4.2 EngagementPlan).
pub const MAX_TRAJECTORY_POINTS: usize = 128;
/// Hard ceiling on the editable waypoint list.
pub const MAX_WAYPOINTS: usize = 8;
/// Number of samples sprayed along a straight-line trajectory.
const TRAJECTORY_SAMPLE_COUNT: usize = 32;

/// The computed result of an [`EngagementPlanner`]. Validity implies the
/// trajectory is non-empty and waypoint arrival times are monotonically
/// non-decreasing (§4.2 invariant).
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementPlan {
    pub tube: TubeNumber,
    pub kind: WeaponKind,
    pub is_valid: bool,
    pub total_flight_time_s: f64,
    pub trajectory: Vec<GeoPoint3D>,
    pub waypoints: Vec<Waypoint>,
    pub current_position: Option<GeoPoint3D>,
    pub time_to_target_s: f64,
    pub next_waypoint_index: usize,
    pub time_to_next_waypoint_s: f64,
    pub launch_point: Option<GeoPoint3D>,
    pub drop_point: Option<GeoPoint3D>,
}

impl EngagementPlan {
    pub fn empty(tube: TubeNumber, kind: WeaponKind) -> Self {
        Self {
            tube,
            kind,
            is_valid: false,
            total_flight_time_s: 0.0,
            trajectory: Vec::new(),
            waypoints: Vec::new(),
            current_position: None,
            time_to_target_s: 0.0,
            next_waypoint_index: 0,
            time_to_next_waypoint_s: 0.0,
            launch_point: None,
            drop_point: None,
        }
    }
}

/// Checks the plan-validity predicate shared by every kind (§4.2):
/// waypoints non-empty, every waypoint in bounds, axis center set, and
/// own-ship info present.
pub fn is_plan_input_valid(
    waypoints: &[Waypoint],
    axis_center: Option<GeoPoint2D>,
    own_ship: Option<&OwnShipNavInfo>,
) -> bool {
    !waypoints.is_empty()
        && waypoints.iter().all(|w| w.position.in_bounds())
        && axis_center.is_some_and(|a| a.in_bounds())
        && own_ship.is_some()
}

/// The shared contract every per-kind planner realizes (§4.2).
pub trait EngagementPlanner: Send {
    fn kind(&self) -> WeaponKind;

    fn set_assignment(&mut self, assignment: AssignmentInfo);
    fn set_waypoints(&mut self, waypoints: Vec<Waypoint>);
    fn update_own_ship(&mut self, info: OwnShipNavInfo);
    fn update_target(&mut self, info: TargetTrack);
    fn set_axis_center(&mut self, center: GeoPoint2D);

    /// (Re)produces the cached [`EngagementPlan`] from current inputs.
    /// Idempotent — calling it twice without new inputs yields the same
    /// result. Returns the freshly computed validity flag.
    fn compute(&mut self) -> bool;

    fn result(&self) -> EngagementPlan;
    fn is_valid(&self) -> bool;

    fn set_launched(&mut self, launched: bool);

    /// Linear interpolation across the cached trajectory's cumulative
    /// timing, clamped to `[0, total_flight_time_s]` (§4.2, Open Question
    /// (c) decided in favor of linear interpolation — see DESIGN.md).
    fn current_position(&self, seconds_since_launch: f64) -> Option<GeoPoint3D>;

    /// Post-launch position/time-to-target advancement, called once per
    /// tick while the weapon is airborne.
    fn tick(&mut self, seconds_since_launch: f64);

    fn supports_waypoint_modification(&self) -> bool {
        true
    }

    fn requires_pre_planning(&self) -> bool {
        false
    }
}

/// Builds evenly spaced geodetic samples between two points, advancing
/// elapsed time proportionally to distance at a nominal cruise speed.
/// Shared by the straight-line planners (ALM/ASM/AAM/WGT); MMINE instead
/// samples from the selected mine plan's own waypoint list.
pub(crate) fn straight_line_trajectory(
    from: GeoPoint3D,
    to: GeoPoint3D,
    cruise_speed_mps: f64,
) -> (Vec<GeoPoint3D>, f64) {
    let total_distance_m = distance_m(from.to_2d(), to.to_2d());
    let total_time_s = if cruise_speed_mps > 0.0 { total_distance_m / cruise_speed_mps } else { 0.0 };

    let mut points = Vec::with_capacity(TRAJECTORY_SAMPLE_COUNT);
    for i in 0..TRAJECTORY_SAMPLE_COUNT {
        let t = i as f64 / (TRAJECTORY_SAMPLE_COUNT - 1) as f64;
        points.push(GeoPoint3D::lerp(from, to, t));
    }
    (points, total_time_s)
}

/// Samples `points` (assumed evenly time-spaced over `[0, total_time_s]`)
/// at `t`, clamping and linearly interpolating between the bracketing
/// pair. Returns `None` if `points` is empty.
pub(crate) fn interpolate_trajectory(
    points: &[GeoPoint3D],
    total_time_s: f64,
    t: f64,
) -> Option<GeoPoint3D> {
    if points.is_empty() {
        return None;
    }
    if points.len() == 1 || total_time_s <= 0.0 {
        return Some(points[0]);
    }
    let clamped = t.clamp(0.0, total_time_s);
    let fraction = clamped / total_time_s;
    let scaled = fraction * (points.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(points.len() - 1);
    let local_t = scaled - lower as f64;
    Some(GeoPoint3D::lerp(points[lower], points[upper], local_t))
}

/// Distance- and time-weighted progress toward the next unreached
/// waypoint, given elapsed seconds and each waypoint's scheduled arrival
/// time. Returns `(next_index, seconds_to_next)`.
pub(crate) fn next_waypoint_progress(waypoints: &[Waypoint], elapsed_s: f64) -> (usize, f64) {
    for (index, waypoint) in waypoints.iter().enumerate() {
        if waypoint.arrival_time_s > elapsed_s {
            return (index, waypoint.arrival_time_s - elapsed_s);
        }
    }
    (waypoints.len(), 0.0)
}

pub(crate) fn bearing_between(from: GeoPoint2D, to: GeoPoint2D) -> f64 {
    bearing_deg(from, to)
}

pub(crate) fn distance_between(from: GeoPoint2D, to: GeoPoint2D) -> f64 {
    distance_m(from, to)
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
