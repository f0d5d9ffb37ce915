// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch Tube (C3): binds one [`Weapon`]+[`EngagementPlanner`] pair to a
//! tube slot and projects state changes outward to the owning
//! [`crate::bank::TubeBank`] via three callbacks (state-change,
//! launch-status, plan-updated). A tube implements [`WeaponObserver`]
//! onto its own weapon so it can re-emit events upward (§4.3).

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use wcp_core::{Clock, GeoPoint2D, Sleeper, TubeNumber, TubeState, WeaponCtrlState, WeaponKind};
use wcp_wire::{AssignmentInfo, OwnShipNavInfo, TargetTrack, Waypoint};

use crate::planner::{EngagementPlan, EngagementPlanner};
use crate::weapon::{Weapon, WeaponObserver};

/// Observes a single tube's outward-facing edges. The bank implements
/// this onto itself and registers with every tube it creates.
pub trait TubeObserver: Send + Sync {
    fn on_state_changed(&self, tube: TubeNumber, old: WeaponCtrlState, new: WeaponCtrlState);
    fn on_launch_status_changed(&self, tube: TubeNumber, launched: bool);
    fn on_plan_updated(&self, tube: TubeNumber, is_valid: bool);
}

/// A point-in-time snapshot of a tube's bound weapon and plan, suitable
/// for bulk status queries (§4.4 `all_status`).
#[derive(Debug, Clone, PartialEq)]
pub struct TubeStatus {
    pub tube: TubeNumber,
    pub kind: Option<WeaponKind>,
    pub weapon_state: Option<WeaponCtrlState>,
    pub tube_state: TubeState,
    pub is_launched: bool,
    pub is_plan_valid: bool,
}

struct Binding<S: Sleeper> {
    weapon: Weapon<S>,
    planner: Box<dyn EngagementPlanner>,
}

/// Bound at bank-init time, one per `TubeNumber`, surviving the process
/// lifetime; only its `binding` is settable/clearable (§3 LaunchTube).
pub struct LaunchTube<S: Sleeper, C: Clock> {
    number: TubeNumber,
    clock: C,
    binding: Mutex<Option<Binding<S>>>,
    derived_state: Mutex<TubeState>,
    launched_at_ms: Mutex<Option<u64>>,
    last_plan_valid: Mutex<bool>,
    observer: Mutex<Option<Weak<dyn TubeObserver>>>,
}

impl<S: Sleeper + 'static, C: Clock + 'static> LaunchTube<S, C> {
    pub fn new(number: TubeNumber, clock: C) -> Arc<Self> {
        Arc::new(Self {
            number,
            clock,
            binding: Mutex::new(None),
            derived_state: Mutex::new(TubeState::Empty),
            launched_at_ms: Mutex::new(None),
            last_plan_valid: Mutex::new(false),
            observer: Mutex::new(None),
        })
    }

    pub fn number(&self) -> TubeNumber {
        self.number
    }

    /// Registers the bank (or a test double) as this tube's sole
    /// outward-facing observer. Stored weak — the tube never keeps its
    /// owner alive.
    pub fn set_observer(&self, observer: &Arc<dyn TubeObserver>) {
        *self.observer.lock() = Some(Arc::downgrade(observer));
    }

    pub fn is_assigned(&self) -> bool {
        self.binding.lock().is_some()
    }

    pub fn kind(&self) -> Option<WeaponKind> {
        self.binding.lock().as_ref().map(|b| b.weapon.kind())
    }

    /// Binds `weapon`+`planner` to this tube and subscribes the tube to
    /// the weapon's lifecycle. Fails (returns `false`) if already
    /// assigned.
    pub fn assign(self: &Arc<Self>, weapon: Weapon<S>, planner: Box<dyn EngagementPlanner>) -> bool {
        let mut binding = self.binding.lock();
        if binding.is_some() {
            return false;
        }
        let self_observer: Arc<dyn WeaponObserver> = self.clone();
        weapon.add_observer(&self_observer);
        *binding = Some(Binding { weapon, planner });
        *self.launched_at_ms.lock() = None;
        *self.last_plan_valid.lock() = false;
        *self.derived_state.lock() = TubeState::Assigned;
        true
    }

    /// Clears the binding, resetting the weapon first (§3: "clearing
    /// invokes Weapon.Reset and Planner.Reset before release" — the
    /// planner has no persistent resources to reset beyond being
    /// dropped, since a fresh one is constructed on the next assignment).
    pub fn clear(&self) {
        if let Some(binding) = self.binding.lock().take() {
            binding.weapon.reset();
        }
        *self.launched_at_ms.lock() = None;
        *self.last_plan_valid.lock() = false;
        *self.derived_state.lock() = TubeState::Empty;
    }

    pub fn set_assignment_info(&self, info: AssignmentInfo) -> bool {
        match self.binding.lock().as_mut() {
            Some(b) => {
                b.planner.set_assignment(info);
                true
            }
            None => false,
        }
    }

    pub fn update_waypoints(&self, waypoints: Vec<Waypoint>) -> bool {
        match self.binding.lock().as_mut() {
            Some(b) => {
                b.planner.set_waypoints(waypoints);
                true
            }
            None => false,
        }
    }

    pub fn update_own_ship(&self, info: OwnShipNavInfo) {
        if let Some(b) = self.binding.lock().as_mut() {
            b.planner.update_own_ship(info);
        }
    }

    pub fn update_target(&self, info: TargetTrack) {
        if let Some(b) = self.binding.lock().as_mut() {
            b.planner.update_target(info);
        }
    }

    pub fn set_axis_center(&self, center: GeoPoint2D) {
        if let Some(b) = self.binding.lock().as_mut() {
            b.planner.set_axis_center(center);
        }
    }

    pub fn request_state(&self, target: WeaponCtrlState) -> bool {
        match self.binding.lock().as_ref() {
            Some(b) => b.weapon.request_state(target),
            None => false,
        }
    }

    pub fn weapon_state(&self) -> Option<WeaponCtrlState> {
        self.binding.lock().as_ref().map(|b| b.weapon.current_state())
    }

    pub fn compute_plan(&self) -> bool {
        let mut binding = self.binding.lock();
        match binding.as_mut() {
            Some(b) => {
                let is_valid = b.planner.compute();
                b.weapon.set_fire_solution_ready(is_valid);
                b.weapon.set_drop_plan_ready(is_valid);
                drop(binding);
                self.note_plan_validity(is_valid);
                is_valid
            }
            None => false,
        }
    }

    pub fn result(&self) -> Option<EngagementPlan> {
        self.binding.lock().as_ref().map(|b| b.planner.result())
    }

    pub fn is_plan_valid(&self) -> bool {
        self.binding.lock().as_ref().is_some_and(|b| b.planner.is_valid())
    }

    /// Tick policy (§4.3): if assigned, tick the weapon, tick the planner
    /// (post-launch position advancement) or recompute the plan
    /// (pre-launch), refresh the derived [`TubeState`], then notify.
    pub fn tick(&self) {
        let mut binding = self.binding.lock();
        let Some(b) = binding.as_mut() else {
            *self.derived_state.lock() = TubeState::Empty;
            return;
        };

        b.weapon.tick();
        let launched = b.weapon.is_launched();
        if launched {
            let elapsed = self.elapsed_since_launch_s();
            b.planner.tick(elapsed);
        } else {
            let is_valid = b.planner.compute();
            b.weapon.set_fire_solution_ready(is_valid);
            b.weapon.set_drop_plan_ready(is_valid);
            drop(binding);
            self.note_plan_validity(is_valid);
            binding = self.binding.lock();
        }

        let Some(b) = binding.as_ref() else {
            *self.derived_state.lock() = TubeState::Empty;
            return;
        };
        let weapon_state = b.weapon.current_state();
        *self.derived_state.lock() = TubeState::derive(true, weapon_state, launched);
    }

    pub fn status(&self) -> TubeStatus {
        let binding = self.binding.lock();
        TubeStatus {
            tube: self.number,
            kind: binding.as_ref().map(|b| b.weapon.kind()),
            weapon_state: binding.as_ref().map(|b| b.weapon.current_state()),
            tube_state: *self.derived_state.lock(),
            is_launched: binding.as_ref().is_some_and(|b| b.weapon.is_launched()),
            is_plan_valid: binding.as_ref().is_some_and(|b| b.planner.is_valid()),
        }
    }

    fn elapsed_since_launch_s(&self) -> f64 {
        let now = self.clock.epoch_ms();
        match *self.launched_at_ms.lock() {
            Some(start) => now.saturating_sub(start) as f64 / 1000.0,
            None => 0.0,
        }
    }

    fn note_plan_validity(&self, is_valid: bool) {
        let mut last = self.last_plan_valid.lock();
        if *last != is_valid {
            *last = is_valid;
            drop(last);
            if let Some(observer) = self.live_observer() {
                observer.on_plan_updated(self.number, is_valid);
            }
        }
    }

    fn live_observer(&self) -> Option<Arc<dyn TubeObserver>> {
        self.observer.lock().as_ref().and_then(Weak::upgrade)
    }
}

impl<S: Sleeper + 'static, C: Clock + 'static> WeaponObserver for LaunchTube<S, C> {
    fn on_state_changed(&self, tube: TubeNumber, old: WeaponCtrlState, new: WeaponCtrlState) {
        if let Some(observer) = self.live_observer() {
            observer.on_state_changed(tube, old, new);
        }
    }

    fn on_launch_status_changed(&self, tube: TubeNumber, launched: bool) {
        if launched {
            *self.launched_at_ms.lock() = Some(self.clock.epoch_ms());
        }
        if let Some(observer) = self.live_observer() {
            observer.on_launch_status_changed(tube, launched);
        }
    }
}

#[cfg(test)]
#[path = "tube_tests.rs"]
mod tests;
