// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waypoint and assignment payload shapes shared across bus message
//! families. Plain, serializable — the bus transport codec is out of scope
//! (§1); these are just the shapes the core validates and consumes.

use serde::{Deserialize, Serialize};
use wcp_core::GeoPoint3D;

/// A single weapon waypoint: a 3D position plus the commanded arrival time,
/// in seconds since launch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: GeoPoint3D,
    pub arrival_time_s: f64,
}

impl Waypoint {
    pub fn new(position: GeoPoint3D, arrival_time_s: f64) -> Self {
        Self { position, arrival_time_s }
    }
}

/// Assignment payload carried by `AssignCommand` (§6): target, drop point,
/// and the initial waypoint list for a newly-bound weapon. Grounded in the
/// original `TEWA_ASSIGN_CMD` shape (target id, drop point, waypoint list).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssignmentInfo {
    pub target_id: Option<u32>,
    pub drop_point: Option<GeoPoint3D>,
    pub launch_point: Option<GeoPoint3D>,
    pub waypoints: Vec<Waypoint>,
}
