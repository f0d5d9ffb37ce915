// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Own-ship navigation, target track, and prohibited-area payloads (§6).

use serde::{Deserialize, Serialize};
use wcp_core::{GeoPoint2D, GeoPoint3D};

/// Own-ship navigation snapshot, updated by `OwnShipNav` bus events and read
/// by every planner during tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OwnShipNavInfo {
    pub position: GeoPoint3D,
    pub heading_deg: f64,
    pub speed_knots: f64,
}

/// A tracked target's kinematics, keyed by `target_id` in the bank's
/// environment snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetTrack {
    pub target_id: u32,
    pub position: GeoPoint3D,
    pub course_deg: f64,
    pub speed_knots: f64,
}

/// One prohibited-area polygon boundary (vertex list). Validation of the
/// polygon shape itself is out of scope (§1); the core only carries the
/// vertex list through to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProhibitedArea {
    pub area_id: u32,
    pub vertices: Vec<GeoPoint2D>,
}
