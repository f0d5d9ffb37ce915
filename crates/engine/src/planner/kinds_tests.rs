// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wcp_core::TubeNumber;

fn pt(lat: f64, lon: f64, depth: f64) -> GeoPoint3D {
    GeoPoint3D::new(lat, lon, depth)
}

fn tube() -> TubeNumber {
    TubeNumber::new(1).expect("valid tube")
}

fn own_ship() -> OwnShipNavInfo {
    OwnShipNavInfo { position: pt(0.0, 0.0, 0.0), heading_deg: 0.0, speed_knots: 12.0 }
}

#[test]
fn straight_line_planner_invalid_without_inputs() {
    let mut planner = StraightLinePlanner::new(tube(), WeaponKind::Alm);
    assert!(!planner.compute());
    assert!(!planner.is_valid());
    assert!(planner.result().trajectory.is_empty());
}

#[test]
fn straight_line_planner_becomes_valid_once_inputs_complete() {
    let mut planner = StraightLinePlanner::new(tube(), WeaponKind::Asm);
    planner.set_axis_center(GeoPoint2D::new(0.0, 0.0));
    planner.update_own_ship(own_ship());
    planner.set_waypoints(vec![Waypoint::new(pt(1.0, 1.0, 0.0), 120.0)]);

    assert!(planner.is_valid());
    let plan = planner.result();
    assert_eq!(plan.total_flight_time_s, 120.0);
    assert!(!plan.trajectory.is_empty());
    assert_eq!(plan.launch_point, Some(pt(0.0, 0.0, 0.0)));
}

#[test]
fn straight_line_planner_rejects_out_of_bounds_waypoint() {
    let mut planner = StraightLinePlanner::new(tube(), WeaponKind::Aam);
    planner.set_axis_center(GeoPoint2D::new(0.0, 0.0));
    planner.update_own_ship(own_ship());
    planner.set_waypoints(vec![Waypoint::new(pt(200.0, 1.0, 0.0), 120.0)]);

    assert!(!planner.is_valid());
}

#[test]
fn straight_line_planner_current_position_advances_with_tick() {
    let mut planner = StraightLinePlanner::new(tube(), WeaponKind::Wgt);
    planner.set_axis_center(GeoPoint2D::new(0.0, 0.0));
    planner.update_own_ship(own_ship());
    planner.set_waypoints(vec![Waypoint::new(pt(0.0, 0.0, 100.0), 10.0)]);
    planner.set_launched(true);

    planner.tick(5.0);
    let halfway = planner.current_position(5.0).expect("mid-flight position");
    assert!((halfway.depth_m - 50.0).abs() < 1.0);
    assert!(planner.result().time_to_target_s <= 5.0);
}

#[test]
fn straight_line_planner_does_not_support_mine_requirements() {
    let planner = StraightLinePlanner::new(tube(), WeaponKind::Alm);
    assert!(!planner.requires_pre_planning());
    assert!(planner.supports_waypoint_modification());
}

#[test]
fn mmine_planner_requires_pre_planning_and_drop_point() {
    let mut planner = MminePlanner::new(tube());
    assert!(planner.requires_pre_planning());
    assert!(!planner.supports_waypoint_modification());

    planner.set_axis_center(GeoPoint2D::new(0.0, 0.0));
    planner.update_own_ship(own_ship());
    planner.set_waypoints(vec![Waypoint::new(pt(1.0, 1.0, 50.0), 60.0)]);
    assert!(!planner.is_valid(), "no drop point assigned yet");
    assert!(!planner.has_valid_drop_plan());

    planner.set_assignment(AssignmentInfo {
        drop_point: Some(pt(1.0, 1.0, 50.0)),
        ..AssignmentInfo::default()
    });
    assert!(planner.has_valid_drop_plan());
    planner.compute();
    assert!(planner.is_valid());
    assert_eq!(planner.result().drop_point, Some(pt(1.0, 1.0, 50.0)));
}
