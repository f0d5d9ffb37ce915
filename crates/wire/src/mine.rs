// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mine-drop-plan and AI waypoint-inference message shapes (§6). The
//! persisted plan store and the inference backend are both external
//! collaborators (§1); these are just the payload shapes the Controller
//! forwards to and from them.

use serde::{Deserialize, Serialize};
use wcp_core::TubeNumber;

use crate::waypoint::Waypoint;

/// Minimum/maximum mine plan-list number (§6: `1..15`).
pub const MIN_PLAN_LIST: u32 = 1;
pub const MAX_PLAN_LIST: u32 = 15;
/// Maximum plans stored per list (§6).
pub const MAX_PLANS_PER_LIST: usize = 15;

/// One stored mine-drop plan: an id plus its waypoint list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinePlan {
    pub plan_id: u32,
    pub waypoints: Vec<Waypoint>,
}

/// `MinePlanRequest(plan-list-number)` — request the persisted store return
/// a plan list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinePlanRequest {
    pub list_number: u32,
}

/// `MineEditedPlanList(list)` — operator-edited plan list pushed back to
/// the store, subject to the validation rules in §6 (plan id ≥ 1, waypoints
/// non-empty, positions in bounds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineEditedPlanList {
    pub list_number: u32,
    pub plans: Vec<MinePlan>,
}

/// `MineSelectedPlan(number)` — operator selects one plan from the active
/// list for a tube.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MineSelectedPlan {
    pub tube: TubeNumber,
    pub plan_id: u32,
}

/// Egress `MinePlanList` — plan list as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinePlanListMsg {
    pub list_number: u32,
    pub plans: Vec<MinePlan>,
}

/// Egress `MineEpResult` — engagement-plan result for a mine-laying tube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineEpResultMsg {
    pub tube: TubeNumber,
    pub is_valid: bool,
    pub drop_point: Option<wcp_core::GeoPoint3D>,
}

/// `AIWaypointInferenceRequest(params)` — request the external inference
/// backend propose a waypoint list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiWaypointInferenceRequest {
    pub tube: TubeNumber,
    pub target_id: Option<u32>,
    pub params: serde_json::Value,
}

/// Egress `InternalInferRequest` — the request as forwarded internally
/// after the Controller annotates it with bank context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalInferRequest {
    pub tube: TubeNumber,
    pub axis_center: Option<wcp_core::GeoPoint2D>,
    pub params: serde_json::Value,
}

/// `InferenceResult*(...)` family, collapsed to one payload shape: success
/// carries the proposed waypoints, failure carries a reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub tube: TubeNumber,
    pub waypoints: Vec<Waypoint>,
    pub error: Option<String>,
}

/// Egress `AIWaypointInferResult` — the result as published back to the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiWaypointInferResultMsg {
    pub tube: TubeNumber,
    pub waypoints: Vec<Waypoint>,
    pub error: Option<String>,
}
