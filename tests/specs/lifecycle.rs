//! §8 scenarios 2 and 3: Turn-On driving the automatic ON -> RTL interlock
//! transition once the bound planner produces a valid plan, and Launch
//! carrying the weapon through LAUNCH to POST_LAUNCH with `launched` set.

use wcp_core::{WeaponCtrlState, WeaponKind};

use crate::prelude::*;

#[test]
fn turn_on_then_tick_reaches_rtl_once_plan_is_valid() {
    let h = harness();
    h.controller.initialize().expect("initialize succeeds");
    seed_environment(&h.bank);

    h.bank.assign(tube(1), WeaponKind::Alm, seeded_assignment()).expect("assign succeeds");
    assert!(h.bank.request_state(tube(1), WeaponCtrlState::On));
    assert_eq!(h.bank.status(tube(1)).weapon_state, Some(WeaponCtrlState::On));

    wait_until(|| {
        h.bank.tick_all();
        h.bank.status(tube(1)).weapon_state == Some(WeaponCtrlState::Rtl)
    });
    assert!(h.bank.status(tube(1)).is_plan_valid);

    h.controller.stop();
}

#[test]
fn launch_from_rtl_marks_launched_and_reaches_post_launch() {
    let h = harness();
    h.controller.initialize().expect("initialize succeeds");
    seed_environment(&h.bank);

    h.bank.assign(tube(1), WeaponKind::Alm, seeded_assignment()).expect("assign succeeds");
    assert!(h.bank.request_state(tube(1), WeaponCtrlState::On));
    wait_until(|| {
        h.bank.tick_all();
        h.bank.status(tube(1)).weapon_state == Some(WeaponCtrlState::Rtl)
    });

    assert!(h.bank.request_state(tube(1), WeaponCtrlState::Launch));

    let status = h.bank.status(tube(1));
    assert_eq!(status.weapon_state, Some(WeaponCtrlState::PostLaunch));
    assert!(status.is_launched);
    assert_eq!(status.tube_state, wcp_core::TubeState::Launched);

    h.controller.stop();
}

#[test]
fn unassigning_a_ready_tube_resets_the_weapon_to_off() {
    let h = harness();
    h.controller.initialize().expect("initialize succeeds");
    seed_environment(&h.bank);

    h.bank.assign(tube(1), WeaponKind::Alm, seeded_assignment()).expect("assign succeeds");
    assert!(h.bank.request_state(tube(1), WeaponCtrlState::On));
    wait_until(|| {
        h.bank.tick_all();
        h.bank.status(tube(1)).weapon_state == Some(WeaponCtrlState::Rtl)
    });

    h.bank.unassign(tube(1)).expect("unassign succeeds");
    assert_eq!(h.bank.status(tube(1)).tube_state, wcp_core::TubeState::Empty);
    assert_eq!(h.bank.status(tube(1)).weapon_state, None);

    h.controller.stop();
}
