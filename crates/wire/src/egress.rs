// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus egress message families (§6): results and forwards the Controller
//! publishes back to the bus.

use serde::{Deserialize, Serialize};
use wcp_core::{TubeNumber, WeaponCtrlState, WeaponKind};

use crate::mine::{AiWaypointInferResultMsg, InternalInferRequest, MineEpResultMsg, MinePlanListMsg};

/// `AssignResponse` — success/failure reply to an `AssignCommand` ingress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignResponseMsg {
    pub tube: TubeNumber,
    pub kind: WeaponKind,
    pub success: bool,
    pub reason: Option<String>,
}

/// Engagement-result summary published after each refresh cycle (§4.7,
/// third periodic timer): per-tube control state plus plan validity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementResultMsg {
    pub tube: TubeNumber,
    pub state: WeaponCtrlState,
    pub is_plan_valid: bool,
    pub time_to_target_s: Option<f64>,
}

/// Every bus message family the Controller publishes (§6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum EgressMessage {
    MinePlanList(MinePlanListMsg),
    MineEpResult(MineEpResultMsg),
    AssignResponse(AssignResponseMsg),
    AiWaypointInferResult(AiWaypointInferResultMsg),
    InternalInferRequest(InternalInferRequest),
    EngagementResult(EngagementResultMsg),
}
