// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weapon/Planner Registry (A1): an explicit, non-global collaborator that
//! constructs a `(Weapon, Planner)` pair per [`WeaponKind`], replacing the
//! source lineage's singleton factory (§9 Design Notes). Passed into
//! [`crate::bank::TubeBank`] at construction rather than reached for as a
//! global, so tests can register stub kinds without touching process-wide
//! state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use wcp_core::{Sleeper, TubeNumber, WeaponKind};

use crate::planner::kinds::{MminePlanner, StraightLinePlanner};
use crate::planner::EngagementPlanner;
use crate::weapon::{LaunchStep, Weapon, WeaponSpecification};

type Constructor<S> = Arc<dyn Fn(TubeNumber) -> (Weapon<S>, Box<dyn EngagementPlanner>) + Send + Sync>;

/// Builds a `(Weapon, Box<dyn EngagementPlanner>)` pair for a given
/// [`WeaponKind`] and [`TubeNumber`]. Pre-populated with the five default
/// kinds at construction (`NA` has no constructor — it's the "unassigned
/// slot" tag, never itself assignable); open to additional registrations,
/// e.g. for tests that want a planner stub.
pub struct WeaponRegistry<S: Sleeper> {
    constructors: HashMap<WeaponKind, Constructor<S>>,
    sleeper: S,
}

impl<S: Sleeper + 'static> WeaponRegistry<S> {
    /// An empty registry with no constructors registered.
    pub fn empty(sleeper: S) -> Self {
        Self { constructors: HashMap::new(), sleeper }
    }

    /// The five default kinds, with specifications grounded in the
    /// source's default launch sequence and power-on delay (§3
    /// WeaponSpecification).
    pub fn with_defaults(sleeper: S) -> Self {
        let mut registry = Self::empty(sleeper);
        registry.register(WeaponKind::Alm, default_spec(), |tube| {
            Box::new(StraightLinePlanner::new(tube, WeaponKind::Alm))
        });
        registry.register(WeaponKind::Asm, default_spec(), |tube| {
            Box::new(StraightLinePlanner::new(tube, WeaponKind::Asm))
        });
        registry.register(WeaponKind::Aam, default_spec(), |tube| {
            Box::new(StraightLinePlanner::new(tube, WeaponKind::Aam))
        });
        registry.register(WeaponKind::Wgt, default_spec(), |tube| {
            Box::new(StraightLinePlanner::new(tube, WeaponKind::Wgt))
        });
        registry.register(WeaponKind::Mmine, mine_spec(), |tube| Box::new(MminePlanner::new(tube)));
        registry
    }

    /// Registers a constructor for `kind`: weapons built through it use
    /// `spec`; planners are produced fresh per assignment by
    /// `make_planner`.
    pub fn register(
        &mut self,
        kind: WeaponKind,
        spec: WeaponSpecification,
        make_planner: impl Fn(TubeNumber) -> Box<dyn EngagementPlanner> + Send + Sync + 'static,
    ) {
        let sleeper = self.sleeper.clone();
        self.constructors.insert(
            kind,
            Arc::new(move |tube| {
                let weapon = Weapon::new(kind, spec.clone(), sleeper.clone());
                weapon.initialize(tube);
                (weapon, make_planner(tube))
            }),
        );
    }

    /// Produces a freshly constructed `(Weapon, Planner)` pair for `kind`
    /// bound to `tube`, or `None` if no constructor is registered —
    /// surfaced by the bank as [`crate::error::ValidationError::UnsupportedKind`].
    pub fn create(&self, kind: WeaponKind, tube: TubeNumber) -> Option<(Weapon<S>, Box<dyn EngagementPlanner>)> {
        self.constructors.get(&kind).map(|ctor| ctor(tube))
    }

    pub fn supports(&self, kind: WeaponKind) -> bool {
        self.constructors.contains_key(&kind)
    }
}

fn default_spec() -> WeaponSpecification {
    WeaponSpecification {
        launch_sequence: vec![
            LaunchStep::new("seq1", Duration::from_secs(1)),
            LaunchStep::new("seq2", Duration::from_secs(1)),
            LaunchStep::new("seq3", Duration::from_secs(1)),
        ],
        power_on_delay: Duration::from_secs(3),
        requires_pre_planning: false,
    }
}

fn mine_spec() -> WeaponSpecification {
    WeaponSpecification {
        launch_sequence: vec![LaunchStep::new("drop_release", Duration::from_secs(1))],
        power_on_delay: Duration::from_secs(2),
        requires_pre_planning: true,
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
