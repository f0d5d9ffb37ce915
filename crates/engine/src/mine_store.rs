// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted mine-drop-plan store (§6): the file-backed implementation is an
//! external collaborator out of scope here. This module owns the trait
//! contract, the validation rules the core enforces before accepting an
//! edited plan list, and an in-memory stub used by the core's own tests and
//! by scenario harnesses.

use std::collections::HashMap;

use parking_lot::Mutex;
use thiserror::Error;
use wcp_wire::{MinePlan, MAX_PLANS_PER_LIST, MAX_PLAN_LIST, MIN_PLAN_LIST};

/// Failure saving or loading a plan list. Validation failures are reported
/// before anything is written; everything else wraps the backing store's
/// own I/O failure as a string (the real file-backed implementation lives
/// in the daemon and owns the concrete I/O error type).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanStoreError {
    #[error("plan list number {0} out of range [{MIN_PLAN_LIST}, {MAX_PLAN_LIST}]")]
    ListNumberOutOfRange(u32),
    #[error("plan list holds {0} plans, exceeding the {MAX_PLANS_PER_LIST}-plan limit")]
    TooManyPlans(usize),
    #[error("plan {0} has id 0, which is reserved")]
    InvalidPlanId(usize),
    #[error("plan {0} has an empty waypoint list")]
    EmptyWaypoints(usize),
    #[error("plan {0} has a waypoint out of geodetic bounds")]
    WaypointOutOfBounds(usize),
    #[error("backing store failed: {0}")]
    Backend(String),
}

/// Validates a plan list against the rules in §6 before it's accepted by any
/// [`MinePlanStore::save`] implementation: the list number is in range,
/// no plan id is zero, no plan has an empty waypoint list, and every
/// waypoint is within the planner's geodetic bounds.
pub fn validate_plan_list(list_number: u32, plans: &[MinePlan]) -> Result<(), PlanStoreError> {
    if !(MIN_PLAN_LIST..=MAX_PLAN_LIST).contains(&list_number) {
        return Err(PlanStoreError::ListNumberOutOfRange(list_number));
    }
    if plans.len() > MAX_PLANS_PER_LIST {
        return Err(PlanStoreError::TooManyPlans(plans.len()));
    }
    for (index, plan) in plans.iter().enumerate() {
        if plan.plan_id == 0 {
            return Err(PlanStoreError::InvalidPlanId(index));
        }
        if plan.waypoints.is_empty() {
            return Err(PlanStoreError::EmptyWaypoints(index));
        }
        if plan.waypoints.iter().any(|w| !w.position.in_bounds()) {
            return Err(PlanStoreError::WaypointOutOfBounds(index));
        }
    }
    Ok(())
}

/// Persisted mine-drop-plan store (§6). The core and its tests use
/// [`InMemoryMinePlanStore`]; the daemon supplies a real file-backed
/// implementation.
pub trait MinePlanStore: Send + Sync {
    fn load(&self, list_number: u32) -> Option<Vec<MinePlan>>;
    fn save(&self, list_number: u32, plans: Vec<MinePlan>) -> Result<(), PlanStoreError>;
}

/// In-memory stub: validates on save, nothing persists across process
/// restarts. Used by the core's own test suite and by scenario harnesses
/// that don't need a real backing file.
#[derive(Default)]
pub struct InMemoryMinePlanStore {
    lists: Mutex<HashMap<u32, Vec<MinePlan>>>,
}

impl InMemoryMinePlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MinePlanStore for InMemoryMinePlanStore {
    fn load(&self, list_number: u32) -> Option<Vec<MinePlan>> {
        self.lists.lock().get(&list_number).cloned()
    }

    fn save(&self, list_number: u32, plans: Vec<MinePlan>) -> Result<(), PlanStoreError> {
        validate_plan_list(list_number, &plans)?;
        self.lists.lock().insert(list_number, plans);
        Ok(())
    }
}

#[cfg(test)]
#[path = "mine_store_tests.rs"]
mod tests;
