// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller (C7): wires the bank, the command pipeline, and the event
//! publisher together, owns the periodic refresh thread, and is the only
//! component that ever sees a raw [`IngressMessage`] — translating it
//! into either a queued [`Command`] or a direct bank environment update
//! (§4.7).

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use wcp_core::{Clock, Config, Sleeper, TubeNumber, WeaponCtrlState};
use wcp_wire::{
    AiWaypointInferResultMsg, AssignResponseMsg, EgressMessage, EngagementResultMsg,
    IngressMessage, InternalInferRequest, MinePlanListMsg,
};

use crate::bank::TubeBank;
use crate::error::FatalInitError;
use crate::mine_store::MinePlanStore;
use crate::pipeline::{
    AllWeaponControlCommand, AssignCommand, CommandPipeline, EmergencyStopCommand,
    UnassignCommand, UpdateWaypointsCommand, WeaponControlCommand,
};
use crate::publisher::{Event, EventKind, EventPublisher, Observer};

/// How finely the periodic thread slices its wait, bounding shutdown
/// latency the same way the 100 ms abort-check slice bounds Turn-On and
/// Launch cancellation (§5).
const PERIODIC_SLICE_MS: u64 = 100;

/// Where the Controller sends outbound bus messages (§6). The transport
/// itself (DDS, sockets) is out of scope; the daemon supplies the real
/// implementation, tests supply a recording stub.
pub trait EgressSink: Send + Sync {
    fn send(&self, message: EgressMessage);
}

/// Counters accumulated by the Controller across its lifetime (§3), its
/// only externally queryable health signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemStatistics {
    pub total_commands: u64,
    pub successful_commands: u64,
    pub failed_commands: u64,
    pub assigned_tube_count: usize,
    pub ready_tube_count: usize,
    pub launched_weapon_count: usize,
    pub start_time_ms: u64,
    pub last_periodic_update_ms: u64,
}

#[derive(Default)]
struct PeriodicState {
    since_bank_tick_ms: u64,
    since_plan_recompute_ms: u64,
    since_publish_ms: u64,
}

struct PeriodicSignal {
    stop: bool,
}

/// Wires C4/C5/C6 together and owns the periodic cadence thread (§4.7).
/// An explicit collaborator graph — the bank, pipeline, publisher, plan
/// store, and egress sink are all constructor arguments, never global
/// state.
pub struct Controller<S: Sleeper + 'static, C: Clock + 'static> {
    bank: Arc<TubeBank<S, C>>,
    pipeline: Arc<CommandPipeline<C>>,
    publisher: EventPublisher<C>,
    plan_store: Arc<dyn MinePlanStore>,
    egress: Arc<dyn EgressSink>,
    config: Config,
    clock: C,
    stats: Mutex<SystemStatistics>,
    periodic_signal: Mutex<PeriodicSignal>,
    periodic_condvar: Condvar,
    periodic: Mutex<Option<JoinHandle<()>>>,
    stopped: AtomicBool,
    /// Per-tube active plan-id selection, keyed by tube (mirrors the
    /// original's `SetSelectedPlanListNumber`/`m_selectedPlanListNumber`
    /// get/set pair rather than discarding the selection).
    selected_plans: Mutex<HashMap<TubeNumber, u32>>,
}

impl<S: Sleeper + 'static, C: Clock + 'static> Controller<S, C> {
    pub fn new(
        bank: Arc<TubeBank<S, C>>,
        pipeline: Arc<CommandPipeline<C>>,
        publisher: EventPublisher<C>,
        plan_store: Arc<dyn MinePlanStore>,
        egress: Arc<dyn EgressSink>,
        config: Config,
        clock: C,
    ) -> Arc<Self> {
        let start_time_ms = clock.epoch_ms();
        Arc::new(Self {
            bank,
            pipeline,
            publisher,
            plan_store,
            egress,
            config,
            clock,
            stats: Mutex::new(SystemStatistics { start_time_ms, ..Default::default() }),
            periodic_signal: Mutex::new(PeriodicSignal { stop: false }),
            periodic_condvar: Condvar::new(),
            periodic: Mutex::new(None),
            stopped: AtomicBool::new(false),
            selected_plans: Mutex::new(HashMap::new()),
        })
    }

    /// One-time setup (§4.7 Bootstrap): subscribes the Controller itself to
    /// the publisher (so command-dispatch and assignment events feed
    /// [`SystemStatistics`] and egress), starts the pipeline worker, and
    /// starts the periodic thread. Fails with [`FatalInitError`] if either
    /// thread can't be spawned.
    pub fn initialize(self: &Arc<Self>) -> Result<(), FatalInitError> {
        let observer: Arc<dyn Observer> = self.clone();
        self.publisher.subscribe(&observer);

        self.pipeline.start().map_err(|e| FatalInitError::Thread(e.to_string()))?;

        let periodic = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name("wcp-periodic".to_string())
            .spawn(move || periodic.periodic_loop())
            .map_err(|e| FatalInitError::Thread(e.to_string()))?;
        *self.periodic.lock() = Some(handle);

        self.publisher.publish(Event::new(None, self.clock.epoch_ms(), EventKind::SystemStarted));
        Ok(())
    }

    /// Translates one bus message into either a queued command or a direct
    /// bank update (§4.7, §6). Emergency-stop is the only family that goes
    /// on the priority queue.
    pub fn handle_ingress(&self, message: IngressMessage) {
        match message {
            IngressMessage::Assign(msg) => {
                self.record_submitted();
                let cmd = AssignCommand::new(&self.bank, msg.tube, msg.kind, msg.assignment);
                self.enqueue_normal(Box::new(cmd));
            }
            IngressMessage::Unassign { tube } => {
                self.record_submitted();
                let cmd = UnassignCommand::new(&self.bank, tube);
                self.enqueue_normal(Box::new(cmd));
            }
            IngressMessage::WeaponControl(msg) => {
                self.record_submitted();
                let cmd = WeaponControlCommand::new(&self.bank, msg.tube, msg.target_state);
                self.enqueue_normal(Box::new(cmd));
            }
            IngressMessage::AllWeaponControl(msg) => {
                self.record_submitted();
                let cmd = AllWeaponControlCommand::new(&self.bank, msg.target_state);
                self.enqueue_normal(Box::new(cmd));
            }
            IngressMessage::EmergencyStop(_) => {
                self.record_submitted();
                let cmd = EmergencyStopCommand::new(&self.bank);
                if let Err(e) = self.pipeline.enqueue_priority(Box::new(cmd)) {
                    tracing::error!("emergency stop rejected at enqueue: {e}");
                }
            }
            IngressMessage::WaypointUpdate(msg) => {
                self.record_submitted();
                let cmd = UpdateWaypointsCommand::new(&self.bank, msg.tube, msg.waypoints);
                self.enqueue_normal(Box::new(cmd));
            }
            IngressMessage::OwnShipNav(info) => self.bank.update_own_ship(info),
            IngressMessage::TargetInfo(info) => self.bank.update_target(info),
            IngressMessage::ProhibitedAreaInfo(areas) => self.bank.set_prohibited_areas(areas),
            IngressMessage::MinePlanRequest(req) => {
                let plans = self.plan_store.load(req.list_number).unwrap_or_default();
                self.egress.send(EgressMessage::MinePlanList(MinePlanListMsg {
                    list_number: req.list_number,
                    plans,
                }));
            }
            IngressMessage::MineEditedPlanList(edited) => {
                if let Err(e) = self.plan_store.save(edited.list_number, edited.plans) {
                    tracing::warn!("mine plan list {} rejected: {e}", edited.list_number);
                }
            }
            IngressMessage::MineSelectedPlan(selected) => {
                self.selected_plans.lock().insert(selected.tube, selected.plan_id);
            }
            IngressMessage::AiWaypointInferenceRequest(req) => {
                let axis_center = self.bank.environment().axis_center;
                self.egress.send(EgressMessage::InternalInferRequest(InternalInferRequest {
                    tube: req.tube,
                    axis_center,
                    params: req.params,
                }));
            }
            IngressMessage::InferenceResult(result) => {
                if result.error.is_none() {
                    if let Err(e) =
                        self.bank.update_waypoints_filtered(result.tube, result.waypoints.clone())
                    {
                        tracing::warn!("inferred waypoints rejected for tube {}: {e}", result.tube);
                    }
                }
                self.egress.send(EgressMessage::AiWaypointInferResult(AiWaypointInferResultMsg {
                    tube: result.tube,
                    waypoints: result.waypoints,
                    error: result.error,
                }));
            }
        }
    }

    fn enqueue_normal(&self, command: Box<dyn crate::pipeline::Command>) {
        if let Err(e) = self.pipeline.enqueue(command) {
            tracing::warn!("command rejected at enqueue: {e}");
        }
    }

    /// Counts a control/assignment bus event as submitted the moment it is
    /// translated, regardless of whether the pipeline later accepts,
    /// executes, or rejects it (§4.7).
    fn record_submitted(&self) {
        self.stats.lock().total_commands += 1;
    }

    /// The plan id last selected for `tube`, if any (mirrors the original's
    /// `GetSelectedPlanListNumber`).
    pub fn selected_plan(&self, tube: TubeNumber) -> Option<u32> {
        self.selected_plans.lock().get(&tube).copied()
    }

    fn periodic_loop(self: Arc<Self>) {
        let mut state = PeriodicState::default();
        loop {
            {
                let mut guard = self.periodic_signal.lock();
                if guard.stop {
                    return;
                }
                let _ = self
                    .periodic_condvar
                    .wait_for(&mut guard, Duration::from_millis(PERIODIC_SLICE_MS));
                if guard.stop {
                    return;
                }
            }

            state.since_bank_tick_ms += PERIODIC_SLICE_MS;
            state.since_plan_recompute_ms += PERIODIC_SLICE_MS;
            state.since_publish_ms += PERIODIC_SLICE_MS;

            if state.since_bank_tick_ms >= self.config.bank_tick_ms {
                state.since_bank_tick_ms = 0;
                self.run_isolated("bank-tick", || self.bank.tick_all());
            }
            if state.since_plan_recompute_ms >= self.config.plan_recompute_ms {
                state.since_plan_recompute_ms = 0;
                self.run_isolated("plan-recompute", || self.bank.compute_all_plans());
            }
            if state.since_publish_ms >= self.config.publish_ms {
                state.since_publish_ms = 0;
                self.run_isolated("publish-refresh", || self.publish_refresh());
            }
        }
    }

    /// Runs one periodic tick body with panic isolation (§4.7): a panicking
    /// tick is logged and the loop continues at the next cadence boundary
    /// rather than taking the thread down.
    fn run_isolated(&self, label: &'static str, f: impl FnOnce()) {
        if catch_unwind(AssertUnwindSafe(f)).is_err() {
            tracing::error!(tick = label, "periodic tick panicked, continuing at next cadence");
        }
    }

    fn publish_refresh(&self) {
        for status in self.bank.all_status().into_iter().filter(|s| s.kind.is_some()) {
            let time_to_target_s = self.bank.result(status.tube).map(|plan| plan.time_to_target_s);
            self.egress.send(EgressMessage::EngagementResult(EngagementResultMsg {
                tube: status.tube,
                state: status.weapon_state.unwrap_or(WeaponCtrlState::Off),
                is_plan_valid: status.is_plan_valid,
                time_to_target_s,
            }));
        }
        let mut stats = self.stats.lock();
        stats.assigned_tube_count = self.bank.assigned_count();
        stats.ready_tube_count = self.bank.ready_count();
        stats.launched_weapon_count = self.bank.launched_count();
        stats.last_periodic_update_ms = self.clock.epoch_ms();
    }

    pub fn get_system_statistics(&self) -> SystemStatistics {
        *self.stats.lock()
    }

    /// Zeroes the command counters and derived tube counts without
    /// affecting bank or pipeline state (§4.7); a following periodic tick
    /// repopulates the derived counts. `start_time_ms` is left untouched —
    /// it marks process start, not an accumulating counter.
    pub fn reset_statistics(&self) {
        let mut stats = self.stats.lock();
        let start_time_ms = stats.start_time_ms;
        *stats = SystemStatistics { start_time_ms, ..Default::default() };
    }

    /// Stops the pipeline, shuts down the bank, joins the periodic thread,
    /// and publishes system-stopped (§4.7). Safe to call more than once.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.pipeline.stop();
        self.bank.shutdown();
        {
            let mut guard = self.periodic_signal.lock();
            guard.stop = true;
        }
        self.periodic_condvar.notify_all();
        if let Some(handle) = self.periodic.lock().take() {
            let _ = handle.join();
        }
        self.publisher.publish(Event::new(None, self.clock.epoch_ms(), EventKind::SystemStopped));
    }
}

impl<S: Sleeper + 'static, C: Clock + 'static> Observer for Controller<S, C> {
    fn on_event(&self, event: &Event) {
        match &event.kind {
            EventKind::CommandExecuted { success, .. } => {
                let mut stats = self.stats.lock();
                if *success {
                    stats.successful_commands += 1;
                } else {
                    stats.failed_commands += 1;
                }
            }
            EventKind::WeaponAssigned { kind } => {
                if let Some(tube) = event.launcher_id {
                    self.egress.send(EgressMessage::AssignResponse(AssignResponseMsg {
                        tube,
                        kind: *kind,
                        success: true,
                        reason: None,
                    }));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
