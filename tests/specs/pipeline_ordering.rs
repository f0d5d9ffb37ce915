//! §8 scenario 5: a priority command jumps ahead of already-queued normal
//! commands, and normal commands otherwise dispatch in FIFO order.

use wcp_core::WeaponKind;
use wcp_engine::pipeline::{AssignCommand, EmergencyStopCommand};

use crate::prelude::*;

#[test]
fn priority_command_dispatches_before_queued_normal_commands() {
    let h = pipeline_harness();
    h.pipeline.pause();
    h.pipeline.start().expect("worker starts");

    h.pipeline
        .enqueue(Box::new(AssignCommand::new(&h.bank, tube(2), WeaponKind::Alm, seeded_assignment())))
        .expect("A enqueues");
    h.pipeline
        .enqueue(Box::new(AssignCommand::new(&h.bank, tube(3), WeaponKind::Asm, seeded_assignment())))
        .expect("B enqueues");
    h.pipeline
        .enqueue_priority(Box::new(EmergencyStopCommand::new(&h.bank)))
        .expect("P enqueues");

    h.pipeline.resume();
    wait_until(|| h.pipeline.history().len() == 3);

    let history = h.pipeline.history();
    assert_eq!(history[0].command_name, "EmergencyStop");
    assert_eq!(history[1].command_name, "Assign");
    assert_eq!(history[2].command_name, "Assign");
    assert!(history.iter().all(|entry| entry.success));
    assert_eq!(h.bank.status(tube(2)).kind, Some(WeaponKind::Alm));
    assert_eq!(h.bank.status(tube(3)).kind, Some(WeaponKind::Asm));

    h.pipeline.stop();
}

#[test]
fn pausing_blocks_only_the_normal_queue() {
    let h = pipeline_harness();
    h.pipeline.start().expect("worker starts");
    h.pipeline.pause();
    assert!(h.pipeline.is_paused());

    h.pipeline
        .enqueue(Box::new(AssignCommand::new(&h.bank, tube(1), WeaponKind::Alm, seeded_assignment())))
        .expect("enqueues");
    std::thread::sleep(std::time::Duration::from_millis(20));
    assert_eq!(h.bank.status(tube(1)).kind, None, "normal queue stays frozen while paused");

    h.pipeline
        .enqueue_priority(Box::new(EmergencyStopCommand::new(&h.bank)))
        .expect("priority still runs while paused");
    wait_until(|| h.pipeline.history().len() == 1);

    h.pipeline.resume();
    wait_until(|| h.bank.status(tube(1)).kind == Some(WeaponKind::Alm));

    h.pipeline.stop();
}
