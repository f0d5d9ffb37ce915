// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weapon control engine: the per-weapon state machine, per-kind engagement
//! planners, the launch-tube binding and tube-bank manager, the registry
//! that constructs weapon/planner pairs, the event publisher, and the
//! command pipeline and controller that tie them together into a running
//! process.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bank;
pub mod controller;
pub mod error;
pub mod mine_store;
pub mod pipeline;
pub mod planner;
pub mod publisher;
pub mod registry;
pub mod tube;
pub mod weapon;

pub use bank::{Environment, TubeBank};
pub use controller::{Controller, SystemStatistics};
pub use mine_store::{InMemoryMinePlanStore, MinePlanStore, PlanStoreError};
pub use pipeline::{Command, CommandPipeline, PipelineStats};
pub use planner::{EngagementPlan, EngagementPlanner};
pub use publisher::{Event, EventKind, EventPublisher, Observer, PublisherStats};
pub use registry::WeaponRegistry;
pub use tube::{LaunchTube, TubeObserver, TubeStatus};
pub use weapon::{is_valid_transition, LaunchStep, Weapon, WeaponObserver, WeaponSpecification};
