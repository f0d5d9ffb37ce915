// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use wcp_core::{FakeClock, GeoPoint3D, InstantSleeper};

use super::*;
use crate::publisher::EventPublisher;
use crate::registry::WeaponRegistry;

fn new_bank() -> Arc<TubeBank<InstantSleeper, FakeClock>> {
    let clock = FakeClock::new();
    let registry = WeaponRegistry::with_defaults(InstantSleeper);
    TubeBank::new(registry, clock.clone(), EventPublisher::new(clock))
}

fn assignment() -> AssignmentInfo {
    AssignmentInfo {
        target_id: Some(7),
        drop_point: None,
        launch_point: None,
        waypoints: vec![Waypoint::new(GeoPoint3D::new(2.0, 2.0, 0.0), 10.0)],
    }
}

#[test]
fn assign_command_binds_then_undo_unassigns() {
    let bank = new_bank();
    let tube = TubeNumber::new(1).expect("valid tube");
    let cmd = AssignCommand::new(&bank, tube, WeaponKind::Alm, assignment());

    cmd.execute().expect("assign succeeds");
    assert_eq!(bank.status(tube).kind, Some(WeaponKind::Alm));

    cmd.undo().expect("undo succeeds");
    assert_eq!(bank.status(tube).kind, None);
}

#[test]
fn assign_command_fails_after_bank_is_dropped() {
    let bank = new_bank();
    let tube = TubeNumber::new(1).expect("valid tube");
    let cmd = AssignCommand::new(&bank, tube, WeaponKind::Alm, assignment());
    drop(bank);

    let err = cmd.execute().unwrap_err();
    assert!(matches!(err, CommandError::Resource(ResourceError::BankExpired)));
}

#[test]
fn unassign_command_undo_restores_kind_with_empty_assignment() {
    let bank = new_bank();
    let tube = TubeNumber::new(1).expect("valid tube");
    bank.assign(tube, WeaponKind::Asm, assignment()).expect("assign");

    let cmd = UnassignCommand::new(&bank, tube);
    cmd.execute().expect("unassign succeeds");
    assert_eq!(bank.status(tube).kind, None);

    cmd.undo().expect("undo succeeds");
    assert_eq!(bank.status(tube).kind, Some(WeaponKind::Asm));
}

#[test]
fn weapon_control_command_undo_restores_previous_state() {
    let bank = new_bank();
    let tube = TubeNumber::new(1).expect("valid tube");
    bank.assign(tube, WeaponKind::Alm, assignment()).expect("assign");

    let cmd = WeaponControlCommand::new(&bank, tube, WeaponCtrlState::On);
    cmd.execute().expect("turn on succeeds");
    assert_eq!(bank.status(tube).weapon_state, Some(WeaponCtrlState::On));

    cmd.undo().expect("undo succeeds");
    assert_eq!(bank.status(tube).weapon_state, Some(WeaponCtrlState::Off));
}

#[test]
fn weapon_control_command_fails_on_unassigned_tube() {
    let bank = new_bank();
    let tube = TubeNumber::new(2).expect("valid tube");
    let cmd = WeaponControlCommand::new(&bank, tube, WeaponCtrlState::On);
    assert!(cmd.execute().is_err());
}

#[test]
fn all_weapon_control_command_turns_on_every_assigned_tube() {
    let bank = new_bank();
    let t1 = TubeNumber::new(1).expect("valid tube");
    let t2 = TubeNumber::new(2).expect("valid tube");
    bank.assign(t1, WeaponKind::Alm, assignment()).expect("assign t1");
    bank.assign(t2, WeaponKind::Asm, assignment()).expect("assign t2");

    let cmd = AllWeaponControlCommand::new(&bank, WeaponCtrlState::On);
    cmd.execute().expect("all-on succeeds");
    assert_eq!(bank.status(t1).weapon_state, Some(WeaponCtrlState::On));
    assert_eq!(bank.status(t2).weapon_state, Some(WeaponCtrlState::On));

    cmd.undo().expect("undo succeeds");
    assert_eq!(bank.status(t1).weapon_state, Some(WeaponCtrlState::Off));
    assert_eq!(bank.status(t2).weapon_state, Some(WeaponCtrlState::Off));
}

#[test]
fn emergency_stop_command_is_not_undoable_but_does_not_error() {
    let bank = new_bank();
    let tube = TubeNumber::new(1).expect("valid tube");
    bank.assign(tube, WeaponKind::Alm, assignment()).expect("assign");
    bank.request_state(tube, WeaponCtrlState::On);

    let cmd = EmergencyStopCommand::new(&bank);
    cmd.execute().expect("emergency stop succeeds");
    assert_eq!(bank.status(tube).weapon_state, Some(WeaponCtrlState::Off));
    cmd.undo().expect("undo is a documented no-op");
}

#[test]
fn update_waypoints_command_rejects_empty_list_at_validity_check() {
    let bank = new_bank();
    let tube = TubeNumber::new(1).expect("valid tube");
    let cmd = UpdateWaypointsCommand::new(&bank, tube, vec![]);
    assert!(!cmd.is_valid());
}

#[test]
fn update_waypoints_command_undo_restores_previous_waypoints() {
    let bank = new_bank();
    let tube = TubeNumber::new(1).expect("valid tube");
    bank.assign(tube, WeaponKind::Alm, assignment()).expect("assign");
    let original = bank.result(tube).expect("bound tube has a plan").waypoints;

    let replacement = vec![Waypoint::new(GeoPoint3D::new(3.0, 3.0, 0.0), 20.0)];
    let cmd = UpdateWaypointsCommand::new(&bank, tube, replacement.clone());
    cmd.execute().expect("update succeeds");
    assert_eq!(bank.result(tube).expect("plan").waypoints, replacement);

    cmd.undo().expect("undo succeeds");
    assert_eq!(bank.result(tube).expect("plan").waypoints, original);
}
