// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus message shapes for the weapon-control processor (§6).
//!
//! The wire-protocol transport itself — sockets, DDS participants, the
//! binary codec — is out of scope (§1). This crate only carries the plain,
//! serializable payload shapes the Controller (C7) consumes and produces,
//! so the engine crate has no transport dependency at all.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod egress;
mod ingress;
mod mine;
mod nav;
mod waypoint;

pub use egress::{AssignResponseMsg, EgressMessage, EngagementResultMsg};
pub use ingress::{
    AllWeaponControlMsg, AssignCommandMsg, EmergencyStopMsg, IngressMessage,
    WaypointUpdateMsg, WeaponControlCommandMsg,
};
pub use mine::{
    AiWaypointInferResultMsg, AiWaypointInferenceRequest, InferenceResult, InternalInferRequest,
    MineEditedPlanList, MineEpResultMsg, MinePlan, MinePlanListMsg, MinePlanRequest,
    MineSelectedPlan, MAX_PLANS_PER_LIST, MAX_PLAN_LIST, MIN_PLAN_LIST,
};
pub use nav::{OwnShipNavInfo, ProhibitedArea, TargetTrack};
pub use waypoint::{AssignmentInfo, Waypoint};
