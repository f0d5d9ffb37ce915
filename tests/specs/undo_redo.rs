//! §8 scenario 6: a dispatched Assign can be undone back to an empty tube
//! and redone back to the assigned state with the same weapon kind.
//!
//! Driven directly against a standalone pipeline rather than through
//! `Controller`, whose public surface (§4.7) never re-exposes
//! `undo`/`redo` — those are a pipeline-level capability the daemon's own
//! CLI would hold the pipeline handle for directly.

use wcp_core::{TubeState, WeaponKind};
use wcp_engine::pipeline::AssignCommand;

use crate::prelude::*;

#[test]
fn undo_clears_the_assignment_and_redo_restores_it() {
    let h = pipeline_harness();
    h.pipeline.start().expect("worker starts");

    h.pipeline
        .enqueue(Box::new(AssignCommand::new(&h.bank, tube(1), WeaponKind::Alm, seeded_assignment())))
        .expect("enqueues");
    wait_until(|| h.bank.status(tube(1)).tube_state == TubeState::Assigned);

    h.pipeline.undo().expect("undo succeeds");
    assert_eq!(h.bank.status(tube(1)).tube_state, TubeState::Empty);
    assert_eq!(h.bank.status(tube(1)).kind, None);
    assert_eq!(h.pipeline.redo_depth(), 1);

    h.pipeline.redo().expect("redo succeeds");
    assert_eq!(h.bank.status(tube(1)).tube_state, TubeState::Assigned);
    assert_eq!(h.bank.status(tube(1)).kind, Some(WeaponKind::Alm));

    h.pipeline.stop();
}

#[test]
fn undo_with_an_empty_stack_fails_without_side_effects() {
    let h = pipeline_harness();
    h.pipeline.start().expect("worker starts");

    assert!(h.pipeline.undo().is_err());
    assert_eq!(h.bank.status(tube(1)).tube_state, TubeState::Empty);

    h.pipeline.stop();
}

#[test]
fn a_second_execute_after_undo_starts_a_fresh_redo_chain() {
    let h = pipeline_harness();
    h.pipeline.start().expect("worker starts");

    h.pipeline
        .enqueue(Box::new(AssignCommand::new(&h.bank, tube(1), WeaponKind::Alm, seeded_assignment())))
        .expect("enqueues");
    wait_until(|| h.bank.status(tube(1)).tube_state == TubeState::Assigned);
    h.pipeline.undo().expect("undo succeeds");
    wait_until(|| h.bank.status(tube(1)).tube_state == TubeState::Empty);

    h.pipeline
        .enqueue(Box::new(AssignCommand::new(&h.bank, tube(1), WeaponKind::Asm, seeded_assignment())))
        .expect("re-enqueues with a different kind");
    wait_until(|| h.bank.status(tube(1)).kind == Some(WeaponKind::Asm));

    assert_eq!(h.pipeline.redo_depth(), 0, "a fresh execute discards the stale redo entry");
    assert!(h.pipeline.redo().is_err());

    h.pipeline.stop();
}
