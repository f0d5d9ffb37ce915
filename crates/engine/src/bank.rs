// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tube Bank Manager (C4): the fixed 6-tube array, the shared environment
//! snapshot every planner reads during tick, and the assignment/broadcast
//! operations that drive them. The bank implements [`TubeObserver`] onto
//! itself and registers with every tube it creates, translating per-tube
//! edges into [`Event`]s on its [`EventPublisher`] — the publisher is the
//! bank's single sink for all four callback families named in §4.4
//! (state-change, launch-status, plan-updated map directly; assignment-change
//! maps to [`EventKind::WeaponAssigned`]/[`EventKind::WeaponUnassigned`]).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use wcp_core::{Clock, GeoPoint2D, Sleeper, TubeNumber, TubeNumberOutOfRange, WeaponCtrlState, WeaponKind};
use wcp_wire::{AssignmentInfo, OwnShipNavInfo, ProhibitedArea, TargetTrack, Waypoint};

use crate::error::{PartialBroadcastError, ValidationError};
use crate::planner::EngagementPlan;
use crate::publisher::{Event, EventKind, EventPublisher};
use crate::registry::WeaponRegistry;
use crate::tube::{LaunchTube, TubeObserver, TubeStatus};

/// Shared telemetry every assigned tube's planner consumes (§3 Environment
/// snapshot). Writers: the Controller on a bus event, via the bank's
/// `update_*`/`set_axis_center` methods. Readers: every tube during tick.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub axis_center: Option<GeoPoint2D>,
    pub own_ship: Option<OwnShipNavInfo>,
    pub targets: HashMap<u32, TargetTrack>,
    pub prohibited_areas: Vec<ProhibitedArea>,
}

/// The fixed 6-tube array plus shared environment (§3 TubeBank, §4.4).
/// Cheap to clone — an `Arc` handle — so the Controller and command bodies
/// can share it without threading a reference through every call site.
pub struct TubeBank<S: Sleeper + 'static, C: Clock + 'static> {
    tubes: [Arc<LaunchTube<S, C>>; 6],
    /// Guards the *assignment topology* — which tubes are bound to which
    /// weapon — independently of each tube's own binding mutex (§5
    /// concurrency discipline). Structural reads (status, broadcast,
    /// dispatch) take a shared guard; assign/unassign/shutdown take
    /// exclusive. Never nested inside `environment`'s guard or a tube's own
    /// lock — always acquired first, per the lock order in §5.
    topology: RwLock<()>,
    environment: RwLock<Environment>,
    registry: WeaponRegistry<S>,
    publisher: EventPublisher<C>,
    clock: C,
}

impl<S: Sleeper + 'static, C: Clock + 'static> TubeBank<S, C> {
    pub fn new(registry: WeaponRegistry<S>, clock: C, publisher: EventPublisher<C>) -> Arc<Self> {
        let tubes: [Arc<LaunchTube<S, C>>; 6] =
            std::array::from_fn(|i| LaunchTube::new(tube_number_at(i), clock.clone()));
        let bank = Arc::new(Self {
            tubes,
            topology: RwLock::new(()),
            environment: RwLock::new(Environment::default()),
            registry,
            publisher,
            clock,
        });
        let observer: Arc<dyn TubeObserver> = bank.clone();
        for tube in &bank.tubes {
            tube.set_observer(&observer);
        }
        bank
    }

    fn tube(&self, number: TubeNumber) -> &Arc<LaunchTube<S, C>> {
        &self.tubes[number.index()]
    }

    /// Constructs a `(Weapon, Planner)` pair via the registry, binds it to
    /// `tube`, applies the assignment info, and seeds the tube's view of
    /// the shared environment (§4.4 `assign`). Rolls back the binding if
    /// applying the assignment info fails.
    pub fn assign(
        &self,
        tube: TubeNumber,
        kind: WeaponKind,
        assignment: AssignmentInfo,
    ) -> Result<(), ValidationError> {
        let _topology = self.topology.write();
        let slot = self.tube(tube);
        if slot.is_assigned() {
            return Err(ValidationError::AlreadyAssigned(tube.get()));
        }
        let Some((weapon, planner)) = self.registry.create(kind, tube) else {
            return Err(ValidationError::UnsupportedKind(kind));
        };
        if !slot.assign(weapon, planner) {
            return Err(ValidationError::AlreadyAssigned(tube.get()));
        }
        let target_id = assignment.target_id;
        let initial_waypoints = assignment.waypoints.clone();
        if !slot.set_assignment_info(assignment) {
            slot.clear();
            return Err(ValidationError::AlreadyAssigned(tube.get()));
        }
        if !initial_waypoints.is_empty() {
            slot.update_waypoints(initial_waypoints);
        }
        self.seed_environment(slot, target_id);
        self.publisher.publish(self.event(Some(tube), EventKind::WeaponAssigned { kind }));
        Ok(())
    }

    fn seed_environment(&self, slot: &Arc<LaunchTube<S, C>>, target_id: Option<u32>) {
        let env = self.environment.read();
        if let Some(axis) = env.axis_center {
            slot.set_axis_center(axis);
        }
        if let Some(own_ship) = env.own_ship {
            slot.update_own_ship(own_ship);
        }
        if let Some(target) = target_id.and_then(|id| env.targets.get(&id)).copied() {
            slot.update_target(target);
        }
    }

    /// Clears `tube`'s binding (§4.4 `unassign`). Fails if the tube was not
    /// assigned.
    pub fn unassign(&self, tube: TubeNumber) -> Result<(), ValidationError> {
        let _topology = self.topology.write();
        let slot = self.tube(tube);
        let kind = slot.kind().ok_or(ValidationError::NotAssigned(tube.get()))?;
        slot.clear();
        self.publisher.publish(self.event(Some(tube), EventKind::WeaponUnassigned { kind }));
        Ok(())
    }

    pub fn request_state(&self, tube: TubeNumber, target: WeaponCtrlState) -> bool {
        let _topology = self.topology.read();
        self.tube(tube).request_state(target)
    }

    pub fn can_change_state(&self, tube: TubeNumber, target: WeaponCtrlState) -> bool {
        let _topology = self.topology.read();
        let slot = self.tube(tube);
        slot.weapon_state().is_some_and(|current| {
            current == target || crate::weapon::is_valid_transition(current, target)
        })
    }

    /// Requests `target` on every currently assigned tube. Best-effort
    /// (§9 Open Question b): failures on individual tubes are aggregated,
    /// not rolled back.
    pub fn request_all(&self, target: WeaponCtrlState) -> Result<(), PartialBroadcastError> {
        let _topology = self.topology.read();
        let assigned: Vec<_> = self.tubes.iter().filter(|t| t.is_assigned()).collect();
        let attempted = assigned.len();
        let mut failed = 0;
        let mut reasons = Vec::new();
        for tube in assigned {
            if !tube.request_state(target) {
                failed += 1;
                reasons.push(format!("tube {} rejected {target}", tube.number()));
            }
        }
        if failed > 0 {
            Err(PartialBroadcastError { attempted, failed, reasons })
        } else {
            Ok(())
        }
    }

    /// For every assigned tube: abort if mid-launch, otherwise turn off
    /// (§4.4). Best-effort broadcast, continues past per-tube failures.
    pub fn emergency_stop(&self) -> Result<(), PartialBroadcastError> {
        let _topology = self.topology.read();
        let assigned: Vec<_> = self.tubes.iter().filter(|t| t.is_assigned()).collect();
        let attempted = assigned.len();
        let mut failed = 0;
        let mut reasons = Vec::new();
        for tube in assigned {
            let target = match tube.weapon_state() {
                Some(WeaponCtrlState::Launch) => WeaponCtrlState::Abort,
                _ => WeaponCtrlState::Off,
            };
            if !tube.request_state(target) {
                failed += 1;
                reasons.push(format!("tube {} failed emergency {target}", tube.number()));
            }
        }
        if failed > 0 {
            Err(PartialBroadcastError { attempted, failed, reasons })
        } else {
            Ok(())
        }
    }

    /// Updates own-ship nav in the shared environment and broadcasts it to
    /// every currently assigned tube (§4.4).
    pub fn update_own_ship(&self, info: OwnShipNavInfo) {
        let _topology = self.topology.read();
        self.environment.write().own_ship = Some(info);
        for tube in self.tubes.iter().filter(|t| t.is_assigned()) {
            tube.update_own_ship(info);
        }
    }

    /// Updates one target's track in the shared environment, keyed by
    /// `target_id`, and broadcasts it to every tube currently assigned to
    /// that target (§4.4).
    pub fn update_target(&self, info: TargetTrack) {
        let _topology = self.topology.read();
        self.environment.write().targets.insert(info.target_id, info);
        for tube in self.tubes.iter().filter(|t| t.is_assigned()) {
            tube.update_target(info);
        }
    }

    pub fn set_axis_center(&self, center: GeoPoint2D) {
        let _topology = self.topology.read();
        self.environment.write().axis_center = Some(center);
        for tube in self.tubes.iter().filter(|t| t.is_assigned()) {
            tube.set_axis_center(center);
        }
    }

    pub fn set_prohibited_areas(&self, areas: Vec<ProhibitedArea>) {
        self.environment.write().prohibited_areas = areas;
    }

    pub fn environment(&self) -> Environment {
        self.environment.read().clone()
    }

    pub fn update_waypoints(&self, tube: TubeNumber, waypoints: Vec<Waypoint>) -> Result<(), ValidationError> {
        let _topology = self.topology.read();
        if waypoints.is_empty() {
            return Err(ValidationError::EmptyWaypoints);
        }
        if let Some(bad) = waypoints.iter().find(|w| !w.position.in_bounds()) {
            return Err(ValidationError::WaypointOutOfBounds {
                lat: bad.position.latitude,
                lon: bad.position.longitude,
                depth: bad.position.depth_m,
            });
        }
        if self.tube(tube).update_waypoints(waypoints) {
            Ok(())
        } else {
            Err(ValidationError::NotAssigned(tube.get()))
        }
    }

    /// Message-shaped variant (§4.4): silently drops any waypoint outside
    /// the planner's validity bounds rather than rejecting the whole
    /// message, then applies whatever survives.
    pub fn update_waypoints_filtered(&self, tube: TubeNumber, waypoints: Vec<Waypoint>) -> Result<(), ValidationError> {
        let filtered: Vec<Waypoint> = waypoints.into_iter().filter(|w| w.position.in_bounds()).collect();
        self.update_waypoints(tube, filtered)
    }

    pub fn compute_plan(&self, tube: TubeNumber) -> bool {
        let _topology = self.topology.read();
        self.tube(tube).compute_plan()
    }

    pub fn compute_all_plans(&self) {
        let _topology = self.topology.read();
        for tube in self.tubes.iter().filter(|t| t.is_assigned()) {
            tube.compute_plan();
        }
    }

    /// Ticks every assigned tube (§4.7 periodic timer a drives this via the
    /// Controller).
    pub fn tick_all(&self) {
        let _topology = self.topology.read();
        for tube in self.tubes.iter() {
            tube.tick();
        }
    }

    pub fn status(&self, tube: TubeNumber) -> TubeStatus {
        let _topology = self.topology.read();
        self.tube(tube).status()
    }

    pub fn all_status(&self) -> Vec<TubeStatus> {
        let _topology = self.topology.read();
        self.tubes.iter().map(|t| t.status()).collect()
    }

    pub fn result(&self, tube: TubeNumber) -> Option<EngagementPlan> {
        let _topology = self.topology.read();
        self.tube(tube).result()
    }

    pub fn all_results(&self) -> Vec<EngagementPlan> {
        let _topology = self.topology.read();
        self.tubes.iter().filter_map(|t| t.result()).collect()
    }

    /// Clears every tube's binding (§5 lock-order note: a structural
    /// exclusive operation, same footing as `assign`/`unassign`). Called by
    /// the Controller during its own stop sequence, after the pipeline has
    /// already been stopped so no further commands can reach the bank.
    pub fn shutdown(&self) {
        let _topology = self.topology.write();
        for tube in self.tubes.iter() {
            tube.clear();
        }
    }

    pub fn assigned_tubes(&self) -> Vec<TubeNumber> {
        let _topology = self.topology.read();
        self.tubes.iter().filter(|t| t.is_assigned()).map(|t| t.number()).collect()
    }

    pub fn assigned_count(&self) -> usize {
        self.assigned_tubes().len()
    }

    pub fn ready_count(&self) -> usize {
        let _topology = self.topology.read();
        self.tubes
            .iter()
            .filter(|t| t.weapon_state() == Some(WeaponCtrlState::Rtl))
            .count()
    }

    pub fn launched_count(&self) -> usize {
        let _topology = self.topology.read();
        self.tubes.iter().filter(|t| t.status().is_launched).count()
    }

    fn event(&self, launcher: Option<TubeNumber>, kind: EventKind) -> Event {
        Event::new(launcher, self.clock.epoch_ms(), kind)
    }
}

impl<S: Sleeper + 'static, C: Clock + 'static> TubeObserver for TubeBank<S, C> {
    fn on_state_changed(&self, tube: TubeNumber, old: WeaponCtrlState, new: WeaponCtrlState) {
        self.publisher.publish(self.event(Some(tube), EventKind::StateChanged { old, new }));
    }

    fn on_launch_status_changed(&self, tube: TubeNumber, launched: bool) {
        self.publisher.publish(self.event(Some(tube), EventKind::LaunchStatusChanged { launched }));
    }

    fn on_plan_updated(&self, tube: TubeNumber, is_valid: bool) {
        self.publisher.publish(self.event(Some(tube), EventKind::PlanUpdated { is_valid }));
    }
}

/// Infallible tube-number construction for `0..6` array indices; used only
/// by [`TubeBank::new`], which always builds exactly six slots.
fn tube_number_at(index: usize) -> TubeNumber {
    match TubeNumber::new((index + 1) as u16) {
        Ok(n) => n,
        Err(TubeNumberOutOfRange(_)) => unreachable!("bank array has exactly 6 slots"),
    }
}

#[cfg(test)]
#[path = "bank_tests.rs"]
mod tests;
