// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The weapon control-state enum and the tube-state enum derived from it.
//! Lives in `wcp-core` (rather than the engine crate) because the wire
//! protocol's `WeaponControlCommand` needs to name a target state without
//! pulling in the engine crate's state-machine implementation.

use serde::{Deserialize, Serialize};

/// Finite set of weapon lifecycle states (§3). `Poc` is internal: it is
/// entered only by the Turn-On procedure and is never a valid
/// `request_state` target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponCtrlState {
    Off,
    Poc,
    On,
    Rtl,
    Launch,
    PostLaunch,
    Abort,
}

crate::simple_display! {
    WeaponCtrlState {
        Off => "OFF",
        Poc => "POC",
        On => "ON",
        Rtl => "RTL",
        Launch => "LAUNCH",
        PostLaunch => "POST_LAUNCH",
        Abort => "ABORT",
    }
}

impl WeaponCtrlState {
    /// `POST_LAUNCH` is terminal for undo purposes (§3): once a weapon
    /// reaches it, the assignment command that put it in the tube is no
    /// longer a meaningful undo target.
    pub fn is_terminal_for_undo(self) -> bool {
        matches!(self, Self::PostLaunch)
    }
}

/// Derived tube state (§3), computed fresh on every tick from the bound
/// weapon's control state and launched flag. Never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TubeState {
    Empty,
    Assigned,
    Ready,
    Launched,
}

crate::simple_display! {
    TubeState {
        Empty => "EMPTY",
        Assigned => "ASSIGNED",
        Ready => "READY",
        Launched => "LAUNCHED",
    }
}

impl TubeState {
    /// §4.3 derived-state rule: EMPTY if unassigned; LAUNCHED if
    /// weapon.launched; READY if weapon state == RTL; else ASSIGNED.
    pub fn derive(assigned: bool, state: WeaponCtrlState, launched: bool) -> Self {
        if !assigned {
            Self::Empty
        } else if launched {
            Self::Launched
        } else if state == WeaponCtrlState::Rtl {
            Self::Ready
        } else {
            Self::Assigned
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
