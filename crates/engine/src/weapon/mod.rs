// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weapon State Machine (C1): the per-tube weapon's own lifecycle —
//! OFF, POC, ON, RTL, LAUNCH, POST_LAUNCH, ABORT — plus the two
//! cooperative, abort-interruptible procedures (Turn-On, Launch). Both
//! procedures run on whichever thread called [`Weapon::request_state`] —
//! the C5 pipeline worker, or a caller that bypassed the queue via
//! `execute_immediate` — rather than on a dedicated per-weapon thread
//! (§4.1 Execution substrate). Preemption works anyway: the abort flag is
//! a lock-free atomic, so an Abort issued concurrently from a different
//! thread is visible to the blocked procedure's next 100 ms slice check
//! without contending for the state mutex.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use wcp_core::{RealSleeper, Sleeper, TubeNumber, WeaponCtrlState, WeaponKind};

/// One scripted step of a launch sequence: a human-readable label and how
/// long the step takes, checked against the abort flag every 100 ms.
#[derive(Debug, Clone)]
pub struct LaunchStep {
    pub description: String,
    pub duration: Duration,
}

impl LaunchStep {
    pub fn new(description: impl Into<String>, duration: Duration) -> Self {
        Self { description: description.into(), duration }
    }
}

/// Per-kind static data supplied by the registry at construction time
/// (§9 A1): the default launch-sequence script, the power-on delay, and
/// whether the kind requires a pre-computed drop/fire plan before it can
/// leave ON for RTL.
#[derive(Debug, Clone)]
pub struct WeaponSpecification {
    pub launch_sequence: Vec<LaunchStep>,
    pub power_on_delay: Duration,
    pub requires_pre_planning: bool,
}

impl Default for WeaponSpecification {
    fn default() -> Self {
        Self {
            launch_sequence: vec![
                LaunchStep::new("seq1", Duration::from_secs(1)),
                LaunchStep::new("seq2", Duration::from_secs(1)),
                LaunchStep::new("seq3", Duration::from_secs(1)),
            ],
            power_on_delay: Duration::from_secs(3),
            requires_pre_planning: false,
        }
    }
}

/// Observes a single weapon's lifecycle. A [`crate::tube::LaunchTube`]
/// implements this onto its own weapon so it can re-emit events up to the
/// bank's [`crate::publisher::EventPublisher`] (§4.3).
pub trait WeaponObserver: Send + Sync {
    fn on_state_changed(&self, tube: TubeNumber, old: WeaponCtrlState, new: WeaponCtrlState);
    fn on_launch_status_changed(&self, tube: TubeNumber, launched: bool);
}

/// Returns whether `to` is a reachable target from `from` (§4.1's default
/// transition table). OFF is reachable from any state ("Turn-Off is safe
/// from any state"); every other edge is listed explicitly. Table
/// membership is necessary but not sufficient for a request to succeed —
/// e.g. ON -> RTL additionally requires the interlock to hold, and that
/// check happens in [`Weapon::request_state`], not here.
pub fn is_valid_transition(from: WeaponCtrlState, to: WeaponCtrlState) -> bool {
    use WeaponCtrlState::*;
    if to == Off {
        return true;
    }
    matches!((from, to), (Off, On) | (On, Rtl) | (Rtl, On) | (Rtl, Launch) | (Launch, Abort))
}

struct WeaponInner<S: Sleeper> {
    kind: WeaponKind,
    spec: WeaponSpecification,
    sleeper: S,
    tube: Mutex<Option<TubeNumber>>,
    state: Mutex<WeaponCtrlState>,
    /// Serializes the two blocking procedures (Turn-On, Launch) so two
    /// concurrent requests against the same weapon can't race each other.
    /// Turn-Off and Abort deliberately never take this lock.
    procedure_lock: Mutex<()>,
    launched: AtomicBool,
    fire_solution_ready: AtomicBool,
    drop_plan_ready: AtomicBool,
    abort: AtomicBool,
    observers: Mutex<Vec<Weak<dyn WeaponObserver>>>,
}

/// A single weapon's state machine. Cheap to clone — an `Arc` handle — so
/// the owning [`crate::tube::LaunchTube`] and anything racing to abort it
/// can share the same instance.
pub struct Weapon<S: Sleeper = RealSleeper> {
    inner: Arc<WeaponInner<S>>,
}

impl<S: Sleeper> Clone for Weapon<S> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<S: Sleeper> Weapon<S> {
    pub fn new(kind: WeaponKind, spec: WeaponSpecification, sleeper: S) -> Self {
        let drop_plan_ready = kind != WeaponKind::Mmine;
        Self {
            inner: Arc::new(WeaponInner {
                kind,
                spec,
                sleeper,
                tube: Mutex::new(None),
                state: Mutex::new(WeaponCtrlState::Off),
                procedure_lock: Mutex::new(()),
                launched: AtomicBool::new(false),
                fire_solution_ready: AtomicBool::new(false),
                drop_plan_ready: AtomicBool::new(drop_plan_ready),
                abort: AtomicBool::new(false),
                observers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn kind(&self) -> WeaponKind {
        self.inner.kind
    }

    pub fn spec(&self) -> &WeaponSpecification {
        &self.inner.spec
    }

    pub fn tube_number(&self) -> Option<TubeNumber> {
        *self.inner.tube.lock()
    }

    /// Binds the weapon to a tube and resets it to a clean OFF state.
    /// Idempotent — re-initializing an already-bound weapon is a plain
    /// reset plus rebind.
    pub fn initialize(&self, tube: TubeNumber) {
        *self.inner.tube.lock() = Some(tube);
        self.reset();
    }

    /// Returns to OFF, clears launched/interlock/abort state. Does not
    /// re-emit a state-changed notification if the weapon was already OFF.
    /// Raises the abort flag first so a procedure blocked on the calling
    /// thread's own earlier request unwinds instead of racing this reset.
    pub fn reset(&self) {
        self.inner.abort.store(true, Ordering::SeqCst);
        self.set_state_direct(WeaponCtrlState::Off);
        self.inner.launched.store(false, Ordering::SeqCst);
        self.inner.fire_solution_ready.store(false, Ordering::SeqCst);
        self.inner
            .drop_plan_ready
            .store(self.inner.kind != WeaponKind::Mmine, Ordering::SeqCst);
        self.inner.abort.store(false, Ordering::SeqCst);
    }

    pub fn current_state(&self) -> WeaponCtrlState {
        *self.inner.state.lock()
    }

    pub fn is_launched(&self) -> bool {
        self.inner.launched.load(Ordering::SeqCst)
    }

    pub fn set_fire_solution_ready(&self, ready: bool) {
        self.inner.fire_solution_ready.store(ready, Ordering::SeqCst);
    }

    /// MMINE-specific: whether the tube's assigned drop plan has been
    /// computed and accepted. Ignored for every other kind.
    pub fn set_drop_plan_ready(&self, ready: bool) {
        self.inner.drop_plan_ready.store(ready, Ordering::SeqCst);
    }

    /// Whether the weapon may leave ON for RTL: the fire solution must be
    /// ready, and MMINE additionally requires an accepted drop plan.
    pub fn check_interlock(&self) -> bool {
        let base = self.inner.fire_solution_ready.load(Ordering::SeqCst);
        if self.inner.kind == WeaponKind::Mmine {
            base && self.inner.drop_plan_ready.load(Ordering::SeqCst)
        } else {
            base
        }
    }

    /// Drives the automatic ON <-> RTL transitions that happen as the
    /// interlock condition changes, bypassing [`Weapon::request_state`]
    /// the same way the original's periodic `Update()` called `SetState`
    /// directly rather than going back through command validation.
    pub fn tick(&self) {
        match self.current_state() {
            WeaponCtrlState::On if self.check_interlock() => {
                self.set_state_direct(WeaponCtrlState::Rtl)
            }
            WeaponCtrlState::Rtl if !self.check_interlock() => {
                self.set_state_direct(WeaponCtrlState::On)
            }
            _ => {}
        }
    }

    /// Attempts a transition to `target`, blocking the calling thread for
    /// the duration of a Turn-On or Launch procedure. Returns whether
    /// `target` was actually reached: `false` covers both an invalid
    /// request and a valid one that failed during execution (e.g. an
    /// abort delivered mid-procedure, or ON -> RTL requested before the
    /// interlock is satisfied).
    pub fn request_state(&self, target: WeaponCtrlState) -> bool {
        let current = self.current_state();
        if current == target {
            return true;
        }
        if !is_valid_transition(current, target) {
            return false;
        }
        match target {
            WeaponCtrlState::On => self.run_turn_on(),
            WeaponCtrlState::Off => {
                self.turn_off_now();
                true
            }
            WeaponCtrlState::Rtl => self.run_to_rtl(),
            WeaponCtrlState::Launch => self.run_launch(),
            WeaponCtrlState::Abort => {
                self.abort_now();
                true
            }
            _ => false,
        }
    }

    fn run_to_rtl(&self) -> bool {
        if self.check_interlock() {
            self.set_state_direct(WeaponCtrlState::Rtl);
            true
        } else {
            false
        }
    }

    /// Clear abort; enter POC; run power-on-delay as a cooperative wait
    /// broken into 100 ms slices. On abort: enter OFF, return failure. On
    /// completion: enter ON.
    fn run_turn_on(&self) -> bool {
        let _guard = self.inner.procedure_lock.lock();
        self.inner.abort.store(false, Ordering::SeqCst);
        self.set_state_direct(WeaponCtrlState::Poc);
        let aborted = self.sleep_with_abort_check(self.inner.spec.power_on_delay);
        if aborted {
            self.set_state_direct(WeaponCtrlState::Off);
            false
        } else {
            self.set_state_direct(WeaponCtrlState::On);
            true
        }
    }

    /// Clear abort; enter LAUNCH; run each scripted step in order. On
    /// abort at any slice: enter ABORT, return failure, launched stays
    /// false. On completion: set launched=true, enter POST_LAUNCH.
    fn run_launch(&self) -> bool {
        let _guard = self.inner.procedure_lock.lock();
        self.inner.abort.store(false, Ordering::SeqCst);
        self.set_state_direct(WeaponCtrlState::Launch);
        for step in &self.inner.spec.launch_sequence {
            let aborted = self.sleep_with_abort_check(step.duration);
            if aborted {
                self.set_state_direct(WeaponCtrlState::Abort);
                return false;
            }
        }
        self.set_launched(true);
        self.set_state_direct(WeaponCtrlState::PostLaunch);
        true
    }

    /// Raises the abort flag so an in-flight procedure on another thread
    /// winds down at its next slice check, and forces OFF immediately.
    fn turn_off_now(&self) {
        self.inner.abort.store(true, Ordering::SeqCst);
        self.set_state_direct(WeaponCtrlState::Off);
    }

    /// Raises the abort flag only; the in-flight Launch procedure
    /// observes it within one 100 ms slice and sets ABORT itself.
    fn abort_now(&self) {
        self.inner.abort.store(true, Ordering::SeqCst);
    }

    fn set_launched(&self, launched: bool) {
        let old = self.inner.launched.swap(launched, Ordering::SeqCst);
        if old != launched {
            self.notify_launch_status_changed(launched);
        }
    }

    fn set_state_direct(&self, new: WeaponCtrlState) {
        let old = {
            let mut state = self.inner.state.lock();
            let old = *state;
            *state = new;
            old
        };
        if old != new {
            self.notify_state_changed(old, new);
        }
    }

    /// Sleeps in 100 ms slices, checking the abort flag between each one
    /// (and once more at the end). Returns whether the abort flag was
    /// raised at any point during the wait. The per-weapon state mutex is
    /// never held across this loop — only momentarily, inside
    /// `set_state_direct`, before and after — so a concurrent Abort from
    /// another thread is never blocked behind it.
    fn sleep_with_abort_check(&self, total: Duration) -> bool {
        const SLICE: Duration = Duration::from_millis(100);
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            if self.inner.abort.load(Ordering::SeqCst) {
                return true;
            }
            let this_slice = SLICE.min(total - elapsed);
            self.inner.sleeper.sleep(this_slice);
            elapsed += this_slice;
        }
        self.inner.abort.load(Ordering::SeqCst)
    }

    pub fn add_observer(&self, observer: &Arc<dyn WeaponObserver>) {
        let mut observers = self.inner.observers.lock();
        let already = observers
            .iter()
            .any(|w| w.upgrade().is_some_and(|existing| Arc::ptr_eq(&existing, observer)));
        if !already {
            observers.push(Arc::downgrade(observer));
        }
    }

    pub fn remove_observer(&self, observer: &Arc<dyn WeaponObserver>) {
        let mut observers = self.inner.observers.lock();
        observers.retain(|w| match w.upgrade() {
            Some(existing) => !Arc::ptr_eq(&existing, observer),
            None => false,
        });
    }

    fn notify_state_changed(&self, old: WeaponCtrlState, new: WeaponCtrlState) {
        let Some(tube) = self.tube_number() else { return };
        let live: Vec<Arc<dyn WeaponObserver>> =
            self.inner.observers.lock().iter().filter_map(Weak::upgrade).collect();
        for observer in live {
            observer.on_state_changed(tube, old, new);
        }
    }

    fn notify_launch_status_changed(&self, launched: bool) {
        let Some(tube) = self.tube_number() else { return };
        let live: Vec<Arc<dyn WeaponObserver>> =
            self.inner.observers.lock().iter().filter_map(Weak::upgrade).collect();
        for observer in live {
            observer.on_launch_status_changed(tube, launched);
        }
    }
}

#[cfg(test)]
#[path = "weapon_tests.rs"]
mod tests;
