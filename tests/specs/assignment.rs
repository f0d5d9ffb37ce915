//! §8 scenario 1 + round-trip law: assigning and unassigning a tube, and
//! the invariant that a freshly assigned tube starts life in OFF.

use wcp_core::{TubeState, WeaponCtrlState, WeaponKind};

use crate::prelude::*;

#[test]
fn assign_mmine_to_tube_one_leaves_weapon_off_and_tube_assigned() {
    let h = harness();
    h.controller.initialize().expect("initialize succeeds");

    let mut assignment = seeded_assignment();
    assignment.drop_point = Some(wcp_core::GeoPoint3D::new(3.0, 3.0, 5.0));
    h.bank.assign(tube(1), WeaponKind::Mmine, assignment).expect("assign succeeds");

    let status = h.bank.status(tube(1));
    assert_eq!(status.tube_state, TubeState::Assigned);
    assert_eq!(status.weapon_state, Some(WeaponCtrlState::Off));
    assert_eq!(status.kind, Some(WeaponKind::Mmine));

    h.controller.stop();
}

#[test]
fn assign_then_unassign_returns_tube_to_empty_with_no_residual_weapon() {
    let h = harness();
    h.controller.initialize().expect("initialize succeeds");

    h.bank.assign(tube(1), WeaponKind::Alm, seeded_assignment()).expect("assign succeeds");
    h.bank.unassign(tube(1)).expect("unassign succeeds");

    let status = h.bank.status(tube(1));
    assert_eq!(status.tube_state, TubeState::Empty);
    assert_eq!(status.kind, None);
    assert_eq!(status.weapon_state, None);

    h.controller.stop();
}

#[test]
fn tube_numbers_zero_and_seven_are_rejected() {
    assert!(wcp_core::TubeNumber::new(0).is_err());
    assert!(wcp_core::TubeNumber::new(7).is_err());
}

#[test]
fn assign_unsupported_kind_is_rejected_and_leaves_tube_empty() {
    let h = harness();
    h.controller.initialize().expect("initialize succeeds");

    let err = h.bank.assign(tube(1), WeaponKind::Na, seeded_assignment()).unwrap_err();
    assert!(matches!(err, wcp_engine::error::ValidationError::UnsupportedKind(WeaponKind::Na)));
    assert_eq!(h.bank.status(tube(1)).tube_state, TubeState::Empty);

    h.controller.stop();
}
