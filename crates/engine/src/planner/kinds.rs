// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-kind engagement planners (§4.2, supplemented from the source
//! lineage's `EngagementManagerBase` subclasses). ALM/ASM/AAM/WGT share
//! straight-line trajectory generation and differ only in cruise speed
//! and launch-sequence length (carried on [`WeaponSpecification`], not
//! here); MMINE overrides trajectory origin and `requires_pre_planning`.

use wcp_core::{GeoPoint2D, GeoPoint3D, TubeNumber, WeaponKind};
use wcp_wire::{AssignmentInfo, OwnShipNavInfo, TargetTrack, Waypoint};

use super::{
    interpolate_trajectory, is_plan_input_valid, next_waypoint_progress, straight_line_trajectory,
    EngagementPlan, EngagementPlanner,
};

/// Inputs shared by every planner implementation, gathered into one place
/// so kinds only need to differ in `compute`'s trajectory-origin choice.
struct PlannerState {
    tube: TubeNumber,
    assignment: AssignmentInfo,
    waypoints: Vec<Waypoint>,
    own_ship: Option<OwnShipNavInfo>,
    target: Option<TargetTrack>,
    axis_center: Option<GeoPoint2D>,
    launched: bool,
    elapsed_since_launch_s: f64,
    plan: EngagementPlan,
}

impl PlannerState {
    fn new(tube: TubeNumber, kind: WeaponKind) -> Self {
        Self {
            tube,
            assignment: AssignmentInfo::default(),
            waypoints: Vec::new(),
            own_ship: None,
            target: None,
            axis_center: None,
            launched: false,
            elapsed_since_launch_s: 0.0,
            plan: EngagementPlan::empty(tube, kind),
        }
    }
}

/// Default nominal cruise speed used to pick a trajectory sample cadence;
/// the authoritative flight timing comes from the commanded waypoints'
/// arrival times, not this constant.
const DEFAULT_CRUISE_SPEED_MPS: f64 = 250.0;

/// Shared straight-line implementation for ALM, ASM, AAM, and WGT: a
/// trajectory sampled between the launch point and the final commanded
/// waypoint, with flight timing taken from the waypoints themselves.
pub struct StraightLinePlanner {
    kind: WeaponKind,
    state: PlannerState,
}

impl StraightLinePlanner {
    pub fn new(tube: TubeNumber, kind: WeaponKind) -> Self {
        Self { kind, state: PlannerState::new(tube, kind) }
    }
}

impl EngagementPlanner for StraightLinePlanner {
    fn kind(&self) -> WeaponKind {
        self.kind
    }

    fn set_assignment(&mut self, assignment: AssignmentInfo) {
        self.state.assignment = assignment;
    }

    fn set_waypoints(&mut self, waypoints: Vec<Waypoint>) {
        self.state.waypoints = waypoints;
        self.compute();
    }

    fn update_own_ship(&mut self, info: OwnShipNavInfo) {
        self.state.own_ship = Some(info);
    }

    fn update_target(&mut self, info: TargetTrack) {
        self.state.target = Some(info);
    }

    fn set_axis_center(&mut self, center: GeoPoint2D) {
        self.state.axis_center = Some(center);
    }

    fn compute(&mut self) -> bool {
        let (own_ship, final_waypoint) =
            match (self.state.own_ship, self.state.waypoints.last().copied()) {
                (Some(o), Some(w)) => (o, w),
                _ => {
                    self.state.plan = EngagementPlan::empty(self.state.tube, self.kind);
                    return false;
                }
            };
        if !is_plan_input_valid(&self.state.waypoints, self.state.axis_center, Some(&own_ship)) {
            self.state.plan = EngagementPlan::empty(self.state.tube, self.kind);
            return false;
        }

        let launch_point = self.state.assignment.launch_point.unwrap_or(own_ship.position);
        let (trajectory, _) =
            straight_line_trajectory(launch_point, final_waypoint.position, DEFAULT_CRUISE_SPEED_MPS);
        let total_flight_time_s = final_waypoint.arrival_time_s;
        let (next_index, time_to_next) = next_waypoint_progress(&self.state.waypoints, 0.0);

        self.state.plan = EngagementPlan {
            tube: self.state.tube,
            kind: self.kind,
            is_valid: true,
            total_flight_time_s,
            trajectory,
            waypoints: self.state.waypoints.clone(),
            current_position: Some(launch_point),
            time_to_target_s: total_flight_time_s,
            next_waypoint_index: next_index,
            time_to_next_waypoint_s: time_to_next,
            launch_point: Some(launch_point),
            drop_point: self.state.assignment.drop_point,
        };
        true
    }

    fn result(&self) -> EngagementPlan {
        self.state.plan.clone()
    }

    fn is_valid(&self) -> bool {
        self.state.plan.is_valid
    }

    fn set_launched(&mut self, launched: bool) {
        self.state.launched = launched;
        self.state.elapsed_since_launch_s = 0.0;
    }

    fn current_position(&self, seconds_since_launch: f64) -> Option<GeoPoint3D> {
        interpolate_trajectory(
            &self.state.plan.trajectory,
            self.state.plan.total_flight_time_s,
            seconds_since_launch,
        )
    }

    fn tick(&mut self, seconds_since_launch: f64) {
        if !self.state.launched {
            return;
        }
        self.state.elapsed_since_launch_s = seconds_since_launch;
        let (next_index, time_to_next) =
            next_waypoint_progress(&self.state.waypoints, seconds_since_launch);
        self.state.plan.next_waypoint_index = next_index;
        self.state.plan.time_to_next_waypoint_s = time_to_next;
        self.state.plan.time_to_target_s =
            (self.state.plan.total_flight_time_s - seconds_since_launch).max(0.0);
        self.state.plan.current_position = self.current_position(seconds_since_launch);
    }
}

/// MMINE: requires a pre-selected drop plan before the interlock can hold
/// (§4.1, §4.2). Trajectory is sampled from the launch point to the
/// assignment's drop point rather than a live target track, and validity
/// additionally requires that drop point to be present.
pub struct MminePlanner {
    state: PlannerState,
}

impl MminePlanner {
    pub fn new(tube: TubeNumber) -> Self {
        Self { state: PlannerState::new(tube, WeaponKind::Mmine) }
    }

    /// Whether the assignment carries a resolved drop-plan reference —
    /// set only via [`EngagementPlanner::set_assignment`] when the
    /// incoming assignment carries a drop point.
    pub fn has_valid_drop_plan(&self) -> bool {
        self.state.assignment.drop_point.is_some()
    }
}

impl EngagementPlanner for MminePlanner {
    fn kind(&self) -> WeaponKind {
        WeaponKind::Mmine
    }

    fn set_assignment(&mut self, assignment: AssignmentInfo) {
        self.state.assignment = assignment;
    }

    fn set_waypoints(&mut self, waypoints: Vec<Waypoint>) {
        self.state.waypoints = waypoints;
        self.compute();
    }

    fn update_own_ship(&mut self, info: OwnShipNavInfo) {
        self.state.own_ship = Some(info);
    }

    fn update_target(&mut self, info: TargetTrack) {
        self.state.target = Some(info);
    }

    fn set_axis_center(&mut self, center: GeoPoint2D) {
        self.state.axis_center = Some(center);
    }

    fn compute(&mut self) -> bool {
        let (own_ship, drop_point) = match (self.state.own_ship, self.state.assignment.drop_point) {
            (Some(o), Some(d)) => (o, d),
            _ => {
                self.state.plan = EngagementPlan::empty(self.state.tube, WeaponKind::Mmine);
                return false;
            }
        };
        if !is_plan_input_valid(&self.state.waypoints, self.state.axis_center, Some(&own_ship)) {
            self.state.plan = EngagementPlan::empty(self.state.tube, WeaponKind::Mmine);
            return false;
        }

        let launch_point = self.state.assignment.launch_point.unwrap_or(own_ship.position);
        let (trajectory, _) =
            straight_line_trajectory(launch_point, drop_point, DEFAULT_CRUISE_SPEED_MPS);
        let total_flight_time_s =
            self.state.waypoints.last().map(|w| w.arrival_time_s).unwrap_or(0.0);
        let (next_index, time_to_next) = next_waypoint_progress(&self.state.waypoints, 0.0);

        self.state.plan = EngagementPlan {
            tube: self.state.tube,
            kind: WeaponKind::Mmine,
            is_valid: true,
            total_flight_time_s,
            trajectory,
            waypoints: self.state.waypoints.clone(),
            current_position: Some(launch_point),
            time_to_target_s: total_flight_time_s,
            next_waypoint_index: next_index,
            time_to_next_waypoint_s: time_to_next,
            launch_point: Some(launch_point),
            drop_point: Some(drop_point),
        };
        true
    }

    fn result(&self) -> EngagementPlan {
        self.state.plan.clone()
    }

    fn is_valid(&self) -> bool {
        self.state.plan.is_valid
    }

    fn set_launched(&mut self, launched: bool) {
        self.state.launched = launched;
        self.state.elapsed_since_launch_s = 0.0;
    }

    fn current_position(&self, seconds_since_launch: f64) -> Option<GeoPoint3D> {
        interpolate_trajectory(
            &self.state.plan.trajectory,
            self.state.plan.total_flight_time_s,
            seconds_since_launch,
        )
    }

    fn tick(&mut self, seconds_since_launch: f64) {
        if !self.state.launched {
            return;
        }
        self.state.elapsed_since_launch_s = seconds_since_launch;
        self.state.plan.time_to_target_s =
            (self.state.plan.total_flight_time_s - seconds_since_launch).max(0.0);
        self.state.plan.current_position = self.current_position(seconds_since_launch);
    }

    fn supports_waypoint_modification(&self) -> bool {
        false
    }

    fn requires_pre_planning(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "kinds_tests.rs"]
mod tests;
