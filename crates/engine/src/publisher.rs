// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event Publisher (C6): an observer registry with weak-subscriber
//! semantics. Publishers hold only [`Weak`] back-references to
//! subscribers; subscribers own their strong handle. This avoids the
//! reference cycle the original source's shared-pointer observer lists
//! were prone to (§9 Design Notes).

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use wcp_core::{Clock, TubeNumber, WeaponCtrlState, WeaponKind};

/// How often a full sweep for expired subscribers runs, absent an
/// intervening notification that happens to trigger one (§4.6).
pub const CLEANUP_INTERVAL_MS: u64 = 5 * 60 * 1000;

/// Event-specific payload (§4.6). `launcher_id` and `timestamp_ms` are
/// carried on the enclosing [`Event`], not duplicated per-variant.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    StateChanged { old: WeaponCtrlState, new: WeaponCtrlState },
    LaunchStatusChanged { launched: bool },
    PlanUpdated { is_valid: bool },
    TrajectoryCalculated { point_count: usize },
    WeaponAssigned { kind: WeaponKind },
    WeaponUnassigned { kind: WeaponKind },
    CommandExecuted { command_name: String, success: bool },
    SystemStarted,
    SystemStopped,
    Error { message: String },
}

/// A published event: a launcher (tube) id, a timestamp, and the payload.
/// `launcher_id` is `None` for system-wide events (started/stopped).
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub launcher_id: Option<TubeNumber>,
    pub timestamp_ms: u64,
    pub kind: EventKind,
}

impl Event {
    pub fn new(launcher_id: Option<TubeNumber>, timestamp_ms: u64, kind: EventKind) -> Self {
        Self { launcher_id, timestamp_ms, kind }
    }
}

/// Anything that wants to observe published events. Implementors should be
/// cheap and non-blocking; a slow observer stalls every other observer on
/// the same notification.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &Event);
}

/// Bookkeeping counters, queryable for tests and for the Controller's
/// system statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublisherStats {
    pub notifications_sent: u64,
    pub expired_reclaimed: u64,
    pub observer_errors: u64,
}

struct Inner<C: Clock> {
    observers: Mutex<Vec<Weak<dyn Observer>>>,
    stats: Mutex<PublisherStats>,
    last_sweep_ms: Mutex<u64>,
    clock: C,
}

/// Observer registry. Cheap to clone — internally an `Arc` handle, so the
/// same publisher can be shared between the bank, the tubes, and the
/// Controller without threading a reference through every constructor.
pub struct EventPublisher<C: Clock> {
    inner: Arc<Inner<C>>,
}

impl<C: Clock> Clone for EventPublisher<C> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<C: Clock> EventPublisher<C> {
    pub fn new(clock: C) -> Self {
        let epoch = clock.epoch_ms();
        Self {
            inner: Arc::new(Inner {
                observers: Mutex::new(Vec::new()),
                stats: Mutex::new(PublisherStats::default()),
                last_sweep_ms: Mutex::new(epoch),
                clock,
            }),
        }
    }

    /// Subscribe idempotently: a duplicate subscription (same observer
    /// pointer already present and still alive) is a no-op.
    pub fn subscribe(&self, observer: &Arc<dyn Observer>) {
        let mut observers = self.inner.observers.lock();
        let already = observers.iter().any(|w| {
            w.upgrade().is_some_and(|existing| Arc::ptr_eq(&existing, observer))
        });
        if already {
            tracing::warn!("duplicate observer subscription ignored");
            return;
        }
        observers.push(Arc::downgrade(observer));
    }

    /// Unsubscribe: removes the matching observer and anything already
    /// expired.
    pub fn unsubscribe(&self, observer: &Arc<dyn Observer>) {
        let mut observers = self.inner.observers.lock();
        observers.retain(|w| match w.upgrade() {
            Some(existing) => !Arc::ptr_eq(&existing, observer),
            None => false,
        });
    }

    /// Notify every live observer. Upgrade failures are cleanup
    /// opportunities, not errors. A panicking observer is caught, counted,
    /// and never prevents the remaining observers from being notified.
    pub fn publish(&self, event: Event) {
        let mut expired = 0usize;
        let mut errors = 0usize;

        // Snapshot strong handles first so an observer that unsubscribes
        // itself mid-notification can't deadlock on the registry lock.
        let live: Vec<Arc<dyn Observer>> = {
            let observers = self.inner.observers.lock();
            observers
                .iter()
                .filter_map(|w| match w.upgrade() {
                    Some(o) => Some(o),
                    None => {
                        expired += 1;
                        None
                    }
                })
                .collect()
        };

        for observer in &live {
            let result = catch_unwind(AssertUnwindSafe(|| observer.on_event(&event)));
            if result.is_err() {
                errors += 1;
                tracing::error!("observer panicked while handling {:?}", event.kind);
            }
        }

        {
            let mut stats = self.inner.stats.lock();
            stats.notifications_sent += 1;
            stats.expired_reclaimed += expired as u64;
            stats.observer_errors += errors as u64;
        }

        self.sweep_if_due();
    }

    /// Force a sweep of expired subscribers regardless of the cleanup
    /// interval. Exposed for tests and for a Controller-driven periodic
    /// call; `publish` already piggybacks a sweep once the interval
    /// elapses.
    pub fn sweep(&self) {
        let mut observers = self.inner.observers.lock();
        let before = observers.len();
        observers.retain(|w| w.upgrade().is_some());
        let reclaimed = before - observers.len();
        if reclaimed > 0 {
            self.inner.stats.lock().expired_reclaimed += reclaimed as u64;
        }
        *self.inner.last_sweep_ms.lock() = self.inner.clock.epoch_ms();
    }

    fn sweep_if_due(&self) {
        let now = self.inner.clock.epoch_ms();
        let due = {
            let last = self.inner.last_sweep_ms.lock();
            now.saturating_sub(*last) >= CLEANUP_INTERVAL_MS
        };
        if due {
            self.sweep();
        }
    }

    pub fn stats(&self) -> PublisherStats {
        *self.inner.stats.lock()
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }
}

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;
