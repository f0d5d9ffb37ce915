// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::AtomicUsize;
use std::sync::Mutex as StdMutex;
use wcp_core::InstantSleeper;

#[derive(Default)]
struct RecordingObserver {
    state_changes: StdMutex<Vec<(TubeNumber, WeaponCtrlState, WeaponCtrlState)>>,
    launch_changes: AtomicUsize,
}

impl WeaponObserver for RecordingObserver {
    fn on_state_changed(&self, tube: TubeNumber, old: WeaponCtrlState, new: WeaponCtrlState) {
        self.state_changes.lock().unwrap_or_else(|e| e.into_inner()).push((tube, old, new));
    }

    fn on_launch_status_changed(&self, _tube: TubeNumber, _launched: bool) {
        self.launch_changes.fetch_add(1, Ordering::SeqCst);
    }
}

fn tube1() -> TubeNumber {
    TubeNumber::new(1).expect("valid tube")
}

fn weapon(kind: WeaponKind) -> Weapon<InstantSleeper> {
    let w = Weapon::new(kind, WeaponSpecification::default(), InstantSleeper);
    w.initialize(tube1());
    w
}

#[test]
fn starts_off() {
    let w = weapon(WeaponKind::Alm);
    assert_eq!(w.current_state(), WeaponCtrlState::Off);
    assert!(!w.is_launched());
}

#[test]
fn turn_on_completes_to_on() {
    let w = weapon(WeaponKind::Alm);
    assert!(w.request_state(WeaponCtrlState::On));
    assert_eq!(w.current_state(), WeaponCtrlState::On);
}

#[test]
fn interlock_moves_on_to_rtl_and_back() {
    let w = weapon(WeaponKind::Alm);
    w.request_state(WeaponCtrlState::On);

    w.set_fire_solution_ready(true);
    w.tick();
    assert_eq!(w.current_state(), WeaponCtrlState::Rtl);

    w.set_fire_solution_ready(false);
    w.tick();
    assert_eq!(w.current_state(), WeaponCtrlState::On);
}

#[test]
fn direct_rtl_request_fails_until_interlock_holds() {
    let w = weapon(WeaponKind::Alm);
    w.request_state(WeaponCtrlState::On);
    assert!(!w.request_state(WeaponCtrlState::Rtl));
    assert_eq!(w.current_state(), WeaponCtrlState::On);

    w.set_fire_solution_ready(true);
    assert!(w.request_state(WeaponCtrlState::Rtl));
    assert_eq!(w.current_state(), WeaponCtrlState::Rtl);
}

#[test]
fn mmine_requires_both_fire_solution_and_drop_plan() {
    let w = weapon(WeaponKind::Mmine);
    w.request_state(WeaponCtrlState::On);

    w.set_fire_solution_ready(true);
    w.tick();
    assert_eq!(w.current_state(), WeaponCtrlState::On, "drop plan not yet ready");

    w.set_drop_plan_ready(true);
    w.tick();
    assert_eq!(w.current_state(), WeaponCtrlState::Rtl);
}

#[test]
fn launch_completes_and_marks_launched() {
    let w = weapon(WeaponKind::Asm);
    w.request_state(WeaponCtrlState::On);
    w.set_fire_solution_ready(true);
    w.tick();
    assert_eq!(w.current_state(), WeaponCtrlState::Rtl);

    assert!(w.request_state(WeaponCtrlState::Launch));
    assert_eq!(w.current_state(), WeaponCtrlState::PostLaunch);
    assert!(w.is_launched());
}

#[test]
fn abort_during_launch_never_sets_launched() {
    let w = weapon(WeaponKind::Asm);
    w.request_state(WeaponCtrlState::On);
    w.set_fire_solution_ready(true);
    w.tick();

    // Launch blocks the calling thread for the scripted sequence, so a
    // concurrent abort has to come from a second thread — exactly the
    // shape the real pipeline uses (queued Launch vs. out-of-band Abort).
    let launcher = w.clone();
    let launch_handle = std::thread::spawn(move || launcher.request_state(WeaponCtrlState::Launch));

    for _ in 0..10_000 {
        if w.current_state() == WeaponCtrlState::Launch {
            break;
        }
        std::thread::yield_now();
    }
    assert!(w.request_state(WeaponCtrlState::Abort));

    let launch_succeeded = launch_handle.join().unwrap_or(true);
    assert!(!launch_succeeded);
    assert_eq!(w.current_state(), WeaponCtrlState::Abort);
    assert!(!w.is_launched());
}

#[test]
fn turn_off_is_valid_from_any_state() {
    let w = weapon(WeaponKind::Aam);
    assert!(w.request_state(WeaponCtrlState::Off));
    w.request_state(WeaponCtrlState::On);
    assert!(w.request_state(WeaponCtrlState::Off));
    assert_eq!(w.current_state(), WeaponCtrlState::Off);
}

#[test]
fn rejects_invalid_transition() {
    let w = weapon(WeaponKind::Wgt);
    assert!(!w.request_state(WeaponCtrlState::Launch));
    assert_eq!(w.current_state(), WeaponCtrlState::Off);
}

#[test]
fn reset_clears_launched_and_interlock_flags() {
    let w = weapon(WeaponKind::Alm);
    w.request_state(WeaponCtrlState::On);
    w.set_fire_solution_ready(true);
    w.tick();

    w.reset();
    assert_eq!(w.current_state(), WeaponCtrlState::Off);
    assert!(!w.check_interlock());
    assert!(!w.is_launched());
}

#[test]
fn observer_sees_state_and_launch_transitions() {
    let w = weapon(WeaponKind::Asm);
    let observer: Arc<RecordingObserver> = Arc::new(RecordingObserver::default());
    let handle: Arc<dyn WeaponObserver> = observer.clone();
    w.add_observer(&handle);

    w.request_state(WeaponCtrlState::On);
    w.set_fire_solution_ready(true);
    w.tick();
    w.request_state(WeaponCtrlState::Launch);

    let changes = observer.state_changes.lock().unwrap_or_else(|e| e.into_inner());
    assert!(changes.contains(&(tube1(), WeaponCtrlState::Off, WeaponCtrlState::Poc)));
    assert!(changes.contains(&(tube1(), WeaponCtrlState::Poc, WeaponCtrlState::On)));
    assert!(changes.contains(&(tube1(), WeaponCtrlState::On, WeaponCtrlState::Rtl)));
    assert!(changes.contains(&(tube1(), WeaponCtrlState::Rtl, WeaponCtrlState::Launch)));
    assert!(changes.contains(&(tube1(), WeaponCtrlState::Launch, WeaponCtrlState::PostLaunch)));
    assert_eq!(observer.launch_changes.load(Ordering::SeqCst), 1);
}

#[test]
fn removed_observer_stops_receiving_notifications() {
    let w = weapon(WeaponKind::Alm);
    let observer: Arc<RecordingObserver> = Arc::new(RecordingObserver::default());
    let handle: Arc<dyn WeaponObserver> = observer.clone();
    w.add_observer(&handle);
    w.remove_observer(&handle);

    w.request_state(WeaponCtrlState::On);
    assert!(observer.state_changes.lock().unwrap_or_else(|e| e.into_inner()).is_empty());
}

#[test]
fn same_state_request_does_not_duplicate_notification() {
    let w = weapon(WeaponKind::Alm);
    let observer: Arc<RecordingObserver> = Arc::new(RecordingObserver::default());
    let handle: Arc<dyn WeaponObserver> = observer.clone();
    w.add_observer(&handle);

    w.request_state(WeaponCtrlState::Off);
    assert!(observer.state_changes.lock().unwrap_or_else(|e| e.into_inner()).is_empty());
}
