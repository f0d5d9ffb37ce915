// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus ingress message families (§6). The wire-protocol adapter (sockets,
//! DDS participants, the actual byte codec) is out of scope; this enum is
//! the shape the adapter is expected to decode into before handing a
//! message to the Controller.

use serde::{Deserialize, Serialize};
use wcp_core::{TubeNumber, WeaponCtrlState, WeaponKind};

use crate::mine::{
    AiWaypointInferenceRequest, MineEditedPlanList, MinePlanRequest, MineSelectedPlan,
};
use crate::nav::{OwnShipNavInfo, ProhibitedArea, TargetTrack};
use crate::waypoint::{AssignmentInfo, Waypoint};

/// `AssignCommand(tube, kind, assignment-info)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignCommandMsg {
    pub tube: TubeNumber,
    pub kind: WeaponKind,
    pub assignment: AssignmentInfo,
}

/// `WeaponControlCommand(tube, target-state)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponControlCommandMsg {
    pub tube: TubeNumber,
    pub target_state: WeaponCtrlState,
}

/// `WaypointUpdate(tube, list<waypoint>)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointUpdateMsg {
    pub tube: TubeNumber,
    pub waypoints: Vec<Waypoint>,
}

/// Batch control request across every assigned tube (§4.4 `request_all`).
/// Not named explicitly among the bus families in §6, but implied by the
/// `AllWeaponControl` command variant in §3 — the original source's CLI
/// menu exposes it as a single "all tubes" control action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllWeaponControlMsg {
    pub target_state: WeaponCtrlState,
}

/// Emergency-stop request. Always dispatched on the command pipeline's
/// priority queue (§4.5, §4.7), never the normal queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyStopMsg;

/// Every bus message family the Controller recognizes (§6). Named
/// `IngressMessage` rather than a literal transliteration of the bus
/// payload name, since the wire codec producing it is out of scope here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum IngressMessage {
    Assign(AssignCommandMsg),
    Unassign { tube: TubeNumber },
    WeaponControl(WeaponControlCommandMsg),
    AllWeaponControl(AllWeaponControlMsg),
    EmergencyStop(EmergencyStopMsg),
    WaypointUpdate(WaypointUpdateMsg),
    OwnShipNav(OwnShipNavInfo),
    TargetInfo(TargetTrack),
    ProhibitedAreaInfo(Vec<ProhibitedArea>),
    MinePlanRequest(MinePlanRequest),
    MineEditedPlanList(MineEditedPlanList),
    MineSelectedPlan(MineSelectedPlan),
    AiWaypointInferenceRequest(AiWaypointInferenceRequest),
    InferenceResult(crate::mine::InferenceResult),
}

#[cfg(test)]
#[path = "ingress_tests.rs"]
mod tests;
