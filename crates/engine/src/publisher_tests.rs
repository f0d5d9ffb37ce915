// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use wcp_core::FakeClock;

struct CountingObserver {
    count: AtomicUsize,
}

impl CountingObserver {
    fn new() -> Arc<Self> {
        Arc::new(Self { count: AtomicUsize::new(0) })
    }
}

impl Observer for CountingObserver {
    fn on_event(&self, _event: &Event) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

struct PanickingObserver;

impl Observer for PanickingObserver {
    fn on_event(&self, _event: &Event) {
        panic!("boom");
    }
}

fn system_started() -> Event {
    Event::new(None, 0, EventKind::SystemStarted)
}

#[test]
fn subscriber_receives_notifications() {
    let publisher = EventPublisher::new(FakeClock::new());
    let observer = CountingObserver::new();
    let handle: Arc<dyn Observer> = observer.clone();
    publisher.subscribe(&handle);

    publisher.publish(system_started());
    publisher.publish(system_started());

    assert_eq!(observer.count.load(Ordering::SeqCst), 2);
}

#[test]
fn duplicate_subscription_is_a_no_op() {
    let publisher = EventPublisher::new(FakeClock::new());
    let observer = CountingObserver::new();
    let handle: Arc<dyn Observer> = observer.clone();
    publisher.subscribe(&handle);
    publisher.subscribe(&handle);

    assert_eq!(publisher.observer_count(), 1);
}

#[test]
fn unsubscribe_stops_notifications() {
    let publisher = EventPublisher::new(FakeClock::new());
    let observer = CountingObserver::new();
    let handle: Arc<dyn Observer> = observer.clone();
    publisher.subscribe(&handle);
    publisher.unsubscribe(&handle);

    publisher.publish(system_started());
    assert_eq!(observer.count.load(Ordering::SeqCst), 0);
}

#[test]
fn dropped_subscriber_never_receives_further_notifications() {
    let publisher = EventPublisher::new(FakeClock::new());
    let observer = CountingObserver::new();
    let handle: Arc<dyn Observer> = observer.clone();
    publisher.subscribe(&handle);
    drop(handle);
    drop(observer);

    publisher.publish(system_started());
    publisher.sweep();
    assert_eq!(publisher.observer_count(), 0);
}

#[test]
fn panicking_observer_does_not_stop_others() {
    let publisher = EventPublisher::new(FakeClock::new());
    let bad: Arc<dyn Observer> = Arc::new(PanickingObserver);
    let good_owner = CountingObserver::new();
    let good: Arc<dyn Observer> = good_owner.clone();

    publisher.subscribe(&bad);
    publisher.subscribe(&good);

    publisher.publish(system_started());

    assert_eq!(good_owner.count.load(Ordering::SeqCst), 1);
    assert_eq!(publisher.stats().observer_errors, 1);
}

#[test]
fn sweep_reclaims_expired_slot_after_cleanup_interval() {
    let clock = FakeClock::new();
    let publisher = EventPublisher::new(clock.clone());
    let observer = CountingObserver::new();
    let handle: Arc<dyn Observer> = observer.clone();
    publisher.subscribe(&handle);
    drop(handle);
    drop(observer);

    clock.advance(std::time::Duration::from_millis(CLEANUP_INTERVAL_MS + 1));
    publisher.publish(system_started());

    assert_eq!(publisher.observer_count(), 0);
}
