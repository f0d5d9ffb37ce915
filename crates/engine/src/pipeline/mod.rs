// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command Pipeline (C5): decouples bus-triggered intent from synchronous
//! execution against the bank, with priority preemption and reversible
//! history. A single worker thread blocks on a condition variable guarding
//! a predicate struct that also holds the two FIFO queues themselves,
//! avoiding any cross-lock ordering between "is there work" and "what is
//! the work" (§5 primitive mapping keeps queues and their wait condition
//! under one guard rather than nesting a queue mutex inside a separate
//! signal mutex).

pub mod commands;

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use wcp_core::Clock;

use crate::error::{CommandError, ValidationError};
use crate::publisher::{Event, EventKind, EventPublisher};

pub use commands::{
    AllWeaponControlCommand, AssignCommand, EmergencyStopCommand, UnassignCommand,
    UpdateWaypointsCommand, WeaponControlCommand,
};

/// A unit of work dispatched through the pipeline. Implementors carry a
/// non-owning handle to whatever they act on (the bank, per §9's redesign
/// note) and verify liveness inside `execute`/`undo` rather than the
/// pipeline holding a strong reference on their behalf.
pub trait Command: Send {
    fn execute(&self) -> Result<(), CommandError>;
    fn undo(&self) -> Result<(), CommandError>;
    fn name(&self) -> &'static str;

    /// Structural validity check at enqueue time, before the command ever
    /// reaches a worker thread. Default accepts everything; commands whose
    /// payload can be malformed independently of runtime bank state (e.g.
    /// an empty waypoint list) override this.
    fn is_valid(&self) -> bool {
        true
    }
}

/// One immutable record of a dispatched command (§4.5, §3 Command).
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub command_name: &'static str,
    pub success: bool,
    pub timestamp_ms: u64,
}

/// Counters queryable for tests and for the Controller's system statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub submitted: u64,
    pub rejected: u64,
    pub executed: u64,
    pub failed: u64,
}

struct Signal {
    stop: bool,
    paused: bool,
    priority: VecDeque<Box<dyn Command>>,
    normal: VecDeque<Box<dyn Command>>,
}

impl Signal {
    fn has_work(&self) -> bool {
        self.stop || !self.priority.is_empty() || (!self.paused && !self.normal.is_empty())
    }

    fn pop(&mut self) -> Option<Box<dyn Command>> {
        self.priority.pop_front().or_else(|| if self.paused { None } else { self.normal.pop_front() })
    }
}

/// Two-tier priority queue, worker thread, bounded history, and bounded
/// undo/redo stacks (§4.5). Cheap to clone — an `Arc` handle.
pub struct CommandPipeline<C: Clock + 'static> {
    signal: Mutex<Signal>,
    condvar: Condvar,
    history: Mutex<VecDeque<HistoryEntry>>,
    undo_stack: Mutex<VecDeque<Box<dyn Command>>>,
    redo_stack: Mutex<VecDeque<Box<dyn Command>>>,
    history_len: usize,
    undo_redo_depth: usize,
    stats: Mutex<PipelineStats>,
    publisher: EventPublisher<C>,
    clock: C,
    worker: Mutex<Option<std::thread::JoinHandle<()>>>,
}

impl<C: Clock + 'static> CommandPipeline<C> {
    pub fn new(history_len: usize, undo_redo_depth: usize, clock: C, publisher: EventPublisher<C>) -> Arc<Self> {
        Arc::new(Self {
            signal: Mutex::new(Signal {
                stop: false,
                paused: false,
                priority: VecDeque::new(),
                normal: VecDeque::new(),
            }),
            condvar: Condvar::new(),
            history: Mutex::new(VecDeque::new()),
            undo_stack: Mutex::new(VecDeque::new()),
            redo_stack: Mutex::new(VecDeque::new()),
            history_len,
            undo_redo_depth,
            stats: Mutex::new(PipelineStats::default()),
            publisher,
            clock,
            worker: Mutex::new(None),
        })
    }

    /// Spawns the worker thread. Idempotent only in the sense that calling
    /// it twice spawns two workers racing the same queues — callers are
    /// expected to call this once, from `Controller::initialize`.
    pub fn start(self: &Arc<Self>) -> std::io::Result<()> {
        let pipeline = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name("wcp-pipeline-worker".to_string())
            .spawn(move || pipeline.worker_loop())?;
        *self.worker.lock() = Some(handle);
        Ok(())
    }

    fn worker_loop(self: Arc<Self>) {
        loop {
            let mut guard = self.signal.lock();
            while !guard.has_work() {
                self.condvar.wait(&mut guard);
            }
            if guard.stop {
                return;
            }
            let Some(command) = guard.pop() else { continue };
            drop(guard);
            self.dispatch(command);
        }
    }

    fn dispatch(&self, command: Box<dyn Command>) {
        let result = command.execute();
        self.record_history(command.name(), result.is_ok());
        self.publish_executed(command.name(), result.is_ok());
        let mut stats = self.stats.lock();
        stats.executed += 1;
        if result.is_ok() {
            drop(stats);
            self.push_undo(command);
        } else {
            stats.failed += 1;
        }
    }

    /// Enqueues on the normal queue. Rejects an invalid command before it
    /// touches the queue (§4.5 validity rule).
    pub fn enqueue(&self, command: Box<dyn Command>) -> Result<(), ValidationError> {
        if !command.is_valid() {
            self.stats.lock().rejected += 1;
            return Err(ValidationError::MalformedCommand);
        }
        {
            let mut guard = self.signal.lock();
            guard.normal.push_back(command);
        }
        self.stats.lock().submitted += 1;
        self.condvar.notify_all();
        Ok(())
    }

    /// Enqueues on the priority queue, reserved for emergency-stop and
    /// equivalents; drained before the normal queue and unaffected by pause.
    pub fn enqueue_priority(&self, command: Box<dyn Command>) -> Result<(), ValidationError> {
        if !command.is_valid() {
            self.stats.lock().rejected += 1;
            return Err(ValidationError::MalformedCommand);
        }
        {
            let mut guard = self.signal.lock();
            guard.priority.push_back(command);
        }
        self.stats.lock().submitted += 1;
        self.condvar.notify_all();
        Ok(())
    }

    /// Synchronously validates and runs `command` on the calling thread,
    /// recording history but never touching the undo/redo stacks (§4.5).
    pub fn execute_immediate(&self, command: Box<dyn Command>) -> Result<(), CommandError> {
        if !command.is_valid() {
            return Err(ValidationError::MalformedCommand.into());
        }
        let result = command.execute();
        self.record_history(command.name(), result.is_ok());
        self.publish_executed(command.name(), result.is_ok());
        result
    }

    /// Pops the undo stack and calls `command.undo()`. On success, pushes
    /// onto the redo stack; on failure, pushes back onto the undo stack
    /// (§4.5).
    pub fn undo(&self) -> Result<(), CommandError> {
        let Some(command) = self.undo_stack.lock().pop_back() else {
            return Err(ValidationError::MalformedCommand.into());
        };
        match command.undo() {
            Ok(()) => {
                self.push_bounded(&self.redo_stack, command);
                Ok(())
            }
            Err(e) => {
                self.undo_stack.lock().push_back(command);
                Err(e)
            }
        }
    }

    /// Pops the redo stack and calls `command.execute()` (§4.5, symmetric
    /// with `undo`).
    pub fn redo(&self) -> Result<(), CommandError> {
        let Some(command) = self.redo_stack.lock().pop_back() else {
            return Err(ValidationError::MalformedCommand.into());
        };
        match command.execute() {
            Ok(()) => {
                self.record_history(command.name(), true);
                self.push_bounded(&self.undo_stack, command);
                Ok(())
            }
            Err(e) => {
                self.redo_stack.lock().push_back(command);
                Err(e)
            }
        }
    }

    /// Freezes normal-queue consumption; priority consumption continues.
    pub fn pause(&self) {
        self.signal.lock().paused = true;
    }

    pub fn resume(&self) {
        self.signal.lock().paused = false;
        self.condvar.notify_all();
    }

    pub fn is_paused(&self) -> bool {
        self.signal.lock().paused
    }

    /// Sets the stop flag, wakes the worker, joins it, then drains both
    /// queues (§4.5 lifecycle). Safe to call more than once.
    pub fn stop(&self) {
        {
            let mut guard = self.signal.lock();
            guard.stop = true;
        }
        self.condvar.notify_all();
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
        let mut guard = self.signal.lock();
        guard.priority.clear();
        guard.normal.clear();
    }

    pub fn stats(&self) -> PipelineStats {
        *self.stats.lock()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.lock().len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.lock().len()
    }

    fn push_undo(&self, command: Box<dyn Command>) {
        self.push_bounded(&self.undo_stack, command);
        self.redo_stack.lock().clear();
    }

    fn push_bounded(&self, stack: &Mutex<VecDeque<Box<dyn Command>>>, command: Box<dyn Command>) {
        let mut stack = stack.lock();
        stack.push_back(command);
        if stack.len() > self.undo_redo_depth {
            stack.pop_front();
        }
    }

    fn record_history(&self, name: &'static str, success: bool) {
        let mut history = self.history.lock();
        history.push_back(HistoryEntry { command_name: name, success, timestamp_ms: self.clock.epoch_ms() });
        if history.len() > self.history_len {
            history.pop_front();
        }
    }

    fn publish_executed(&self, name: &'static str, success: bool) {
        self.publisher.publish(Event::new(
            None,
            self.clock.epoch_ms(),
            EventKind::CommandExecuted { command_name: name.to_string(), success },
        ));
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
