// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete [`Command`] implementations (§3, §4.5): one per bus-triggered
//! intent. Each carries a [`Weak`] handle to the [`TubeBank`] it acts on,
//! per the redesign note in §9 — liveness is checked inside `execute`/
//! `undo`, never assumed by the pipeline that dispatches them.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use wcp_core::{Clock, Sleeper, TubeNumber, WeaponCtrlState, WeaponKind};
use wcp_wire::{AssignmentInfo, Waypoint};

use crate::bank::TubeBank;
use crate::error::{CommandError, ResourceError};

use super::Command;

fn upgrade<S: Sleeper + 'static, C: Clock + 'static>(
    bank: &Weak<TubeBank<S, C>>,
) -> Result<Arc<TubeBank<S, C>>, CommandError> {
    bank.upgrade().ok_or(CommandError::Resource(ResourceError::BankExpired))
}

/// `AssignCommand(tube, kind, assignment-info)` (§6). Undo clears the
/// assignment it made; a second undo (or undoing without a prior execute)
/// fails with `NotAssigned`, same as a direct `unassign` would.
pub struct AssignCommand<S: Sleeper + 'static, C: Clock + 'static> {
    bank: Weak<TubeBank<S, C>>,
    tube: TubeNumber,
    kind: WeaponKind,
    assignment: AssignmentInfo,
}

impl<S: Sleeper + 'static, C: Clock + 'static> AssignCommand<S, C> {
    pub fn new(bank: &Arc<TubeBank<S, C>>, tube: TubeNumber, kind: WeaponKind, assignment: AssignmentInfo) -> Self {
        Self { bank: Arc::downgrade(bank), tube, kind, assignment }
    }
}

impl<S: Sleeper + 'static, C: Clock + 'static> Command for AssignCommand<S, C> {
    fn execute(&self) -> Result<(), CommandError> {
        upgrade(&self.bank)?.assign(self.tube, self.kind, self.assignment.clone())?;
        Ok(())
    }

    fn undo(&self) -> Result<(), CommandError> {
        upgrade(&self.bank)?.unassign(self.tube)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Assign"
    }
}

/// `Unassign(tube)`. Undo restores the weapon kind captured at execute
/// time with an empty assignment — waypoints and target binding from
/// before the unassign are not recoverable from the bank alone, matching
/// the "undo only the top of the stack" decision (§9 Open Question a)
/// rather than reconstructing full history.
pub struct UnassignCommand<S: Sleeper + 'static, C: Clock + 'static> {
    bank: Weak<TubeBank<S, C>>,
    tube: TubeNumber,
    captured_kind: Mutex<Option<WeaponKind>>,
}

impl<S: Sleeper + 'static, C: Clock + 'static> UnassignCommand<S, C> {
    pub fn new(bank: &Arc<TubeBank<S, C>>, tube: TubeNumber) -> Self {
        Self { bank: Arc::downgrade(bank), tube, captured_kind: Mutex::new(None) }
    }
}

impl<S: Sleeper + 'static, C: Clock + 'static> Command for UnassignCommand<S, C> {
    fn execute(&self) -> Result<(), CommandError> {
        let bank = upgrade(&self.bank)?;
        *self.captured_kind.lock() = bank.status(self.tube).kind;
        bank.unassign(self.tube)?;
        Ok(())
    }

    fn undo(&self) -> Result<(), CommandError> {
        let bank = upgrade(&self.bank)?;
        let Some(kind) = self.captured_kind.lock().take() else {
            return Ok(());
        };
        bank.assign(self.tube, kind, AssignmentInfo::default())?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Unassign"
    }
}

/// `WeaponControlCommand(tube, target-state)` (§6). Undo restores the
/// weapon-control state observed immediately before execute.
pub struct WeaponControlCommand<S: Sleeper + 'static, C: Clock + 'static> {
    bank: Weak<TubeBank<S, C>>,
    tube: TubeNumber,
    target_state: WeaponCtrlState,
    previous_state: Mutex<Option<WeaponCtrlState>>,
}

impl<S: Sleeper + 'static, C: Clock + 'static> WeaponControlCommand<S, C> {
    pub fn new(bank: &Arc<TubeBank<S, C>>, tube: TubeNumber, target_state: WeaponCtrlState) -> Self {
        Self { bank: Arc::downgrade(bank), tube, target_state, previous_state: Mutex::new(None) }
    }
}

impl<S: Sleeper + 'static, C: Clock + 'static> Command for WeaponControlCommand<S, C> {
    fn execute(&self) -> Result<(), CommandError> {
        let bank = upgrade(&self.bank)?;
        *self.previous_state.lock() = bank.status(self.tube).weapon_state;
        if bank.request_state(self.tube, self.target_state) {
            Ok(())
        } else {
            Err(CommandError::Validation(crate::error::ValidationError::NotAssigned(self.tube.get())))
        }
    }

    fn undo(&self) -> Result<(), CommandError> {
        let bank = upgrade(&self.bank)?;
        let Some(previous) = self.previous_state.lock().take() else {
            return Ok(());
        };
        bank.request_state(self.tube, previous);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "WeaponControl"
    }
}

/// `AllWeaponControl(target-state)` (§3, implied by §6's CLI menu). Best
/// effort, consistent with `TubeBank::request_all` (§9 Open Question b):
/// undo attempts to restore every tube's previous state individually and
/// is itself best-effort.
pub struct AllWeaponControlCommand<S: Sleeper + 'static, C: Clock + 'static> {
    bank: Weak<TubeBank<S, C>>,
    target_state: WeaponCtrlState,
    previous_states: Mutex<Vec<(TubeNumber, WeaponCtrlState)>>,
}

impl<S: Sleeper + 'static, C: Clock + 'static> AllWeaponControlCommand<S, C> {
    pub fn new(bank: &Arc<TubeBank<S, C>>, target_state: WeaponCtrlState) -> Self {
        Self { bank: Arc::downgrade(bank), target_state, previous_states: Mutex::new(Vec::new()) }
    }
}

impl<S: Sleeper + 'static, C: Clock + 'static> Command for AllWeaponControlCommand<S, C> {
    fn execute(&self) -> Result<(), CommandError> {
        let bank = upgrade(&self.bank)?;
        let previous: Vec<_> = bank
            .assigned_tubes()
            .into_iter()
            .filter_map(|tube| bank.status(tube).weapon_state.map(|state| (tube, state)))
            .collect();
        *self.previous_states.lock() = previous;
        bank.request_all(self.target_state)?;
        Ok(())
    }

    fn undo(&self) -> Result<(), CommandError> {
        let bank = upgrade(&self.bank)?;
        for (tube, state) in self.previous_states.lock().drain(..) {
            bank.request_state(tube, state);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "AllWeaponControl"
    }
}

/// `EmergencyStop` (§6). Always dispatched on the priority queue (§4.5,
/// §4.7). Not undoable — reversing an emergency stop is outside the
/// system's safety model, so `undo` is a no-op success rather than a
/// fabricated restoration.
pub struct EmergencyStopCommand<S: Sleeper + 'static, C: Clock + 'static> {
    bank: Weak<TubeBank<S, C>>,
}

impl<S: Sleeper + 'static, C: Clock + 'static> EmergencyStopCommand<S, C> {
    pub fn new(bank: &Arc<TubeBank<S, C>>) -> Self {
        Self { bank: Arc::downgrade(bank) }
    }
}

impl<S: Sleeper + 'static, C: Clock + 'static> Command for EmergencyStopCommand<S, C> {
    fn execute(&self) -> Result<(), CommandError> {
        upgrade(&self.bank)?.emergency_stop()?;
        Ok(())
    }

    fn undo(&self) -> Result<(), CommandError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "EmergencyStop"
    }
}

/// `WaypointUpdate(tube, list<waypoint>)` (§6). Undo restores the waypoint
/// list captured from the tube's last computed plan before execute.
pub struct UpdateWaypointsCommand<S: Sleeper + 'static, C: Clock + 'static> {
    bank: Weak<TubeBank<S, C>>,
    tube: TubeNumber,
    waypoints: Vec<Waypoint>,
    previous: Mutex<Option<Vec<Waypoint>>>,
}

impl<S: Sleeper + 'static, C: Clock + 'static> UpdateWaypointsCommand<S, C> {
    pub fn new(bank: &Arc<TubeBank<S, C>>, tube: TubeNumber, waypoints: Vec<Waypoint>) -> Self {
        Self { bank: Arc::downgrade(bank), tube, waypoints, previous: Mutex::new(None) }
    }
}

impl<S: Sleeper + 'static, C: Clock + 'static> Command for UpdateWaypointsCommand<S, C> {
    fn execute(&self) -> Result<(), CommandError> {
        let bank = upgrade(&self.bank)?;
        *self.previous.lock() = bank.result(self.tube).map(|plan| plan.waypoints);
        bank.update_waypoints(self.tube, self.waypoints.clone())?;
        Ok(())
    }

    fn undo(&self) -> Result<(), CommandError> {
        let bank = upgrade(&self.bank)?;
        let Some(previous) = self.previous.lock().take() else {
            return Ok(());
        };
        bank.update_waypoints(self.tube, previous)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "UpdateWaypoints"
    }

    fn is_valid(&self) -> bool {
        !self.waypoints.is_empty()
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
