// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn post_launch_is_terminal_for_undo() {
    assert!(WeaponCtrlState::PostLaunch.is_terminal_for_undo());
    assert!(!WeaponCtrlState::On.is_terminal_for_undo());
}

#[test]
fn derive_empty_when_unassigned() {
    assert_eq!(TubeState::derive(false, WeaponCtrlState::Off, false), TubeState::Empty);
}

#[test]
fn derive_launched_takes_priority_over_state() {
    // Launched is checked before state, so even an (impossible) non-post-launch
    // state with launched=true reports LAUNCHED.
    assert_eq!(TubeState::derive(true, WeaponCtrlState::Rtl, true), TubeState::Launched);
}

#[test]
fn derive_ready_on_rtl() {
    assert_eq!(TubeState::derive(true, WeaponCtrlState::Rtl, false), TubeState::Ready);
}

#[test]
fn derive_assigned_otherwise() {
    assert_eq!(TubeState::derive(true, WeaponCtrlState::On, false), TubeState::Assigned);
    assert_eq!(TubeState::derive(true, WeaponCtrlState::Off, false), TubeState::Assigned);
}
