// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy (§7). These are categories of failure, not a single
//! catch-all enum — each component family gets the variant shape that
//! matches how its callers need to react.

use thiserror::Error;
use wcp_core::TubeNumberOutOfRange;

/// Bad input rejected before anything was mutated. Always returned to the
/// caller; never logged as an error (the caller's job to decide if it's
/// noteworthy).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid tube number: {0}")]
    Tube(#[from] TubeNumberOutOfRange),
    #[error("tube {0} already assigned")]
    AlreadyAssigned(u16),
    #[error("tube {0} is not assigned")]
    NotAssigned(u16),
    #[error("weapon kind {0:?} has no registered factory")]
    UnsupportedKind(wcp_core::WeaponKind),
    #[error("waypoint out of bounds: lat={lat} lon={lon} depth={depth}")]
    WaypointOutOfBounds { lat: f64, lon: f64, depth: f64 },
    #[error("empty waypoint list")]
    EmptyWaypoints,
    #[error("null or malformed command")]
    MalformedCommand,
}

/// The state table rejected a requested transition. Local, non-fatal; no
/// observer notification is emitted for a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition {from} -> {to}")]
pub struct TransitionError {
    pub from: wcp_core::WeaponCtrlState,
    pub to: wcp_core::WeaponCtrlState,
}

/// A cooperative procedure (Turn-On or Launch) was aborted mid-way. This is
/// reported as failure of the *procedure*, never as failure of the Abort
/// request that caused it, and is not logged as an error (§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("procedure preempted by abort")]
pub struct PreemptionError;

/// A weak collaborator handle expired, or a factory returned nothing for a
/// kind it claims to support. Logged as a warning, returned as failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    #[error("tube bank handle expired")]
    BankExpired,
    #[error("registry produced no constructor for kind {0:?}")]
    FactoryMiss(wcp_core::WeaponKind),
}

/// A bulk broadcast operation (`request_all`, `emergency_stop`) saw at
/// least one per-tube failure. The aggregate result is `false` but
/// successes are not rolled back (§4.4 I2, §9 Open Question b).
#[derive(Debug, Clone, Error)]
#[error("{failed} of {attempted} tubes failed: {}", .reasons.join("; "))]
pub struct PartialBroadcastError {
    pub attempted: usize,
    pub failed: usize,
    pub reasons: Vec<String>,
}

/// An observer panicked or returned an error during notification. Counted
/// in publisher statistics, never propagated to the publisher's caller.
#[derive(Debug, Clone, Error)]
#[error("observer error: {0}")]
pub struct PublisherError(pub String);

/// Failure during Controller initialization; surfaces to `main` and the
/// process exits with a negative code (§6, §7).
#[derive(Debug, Error)]
pub enum FatalInitError {
    #[error("config error: {0}")]
    Config(String),
    #[error("bank initialization failed: {0}")]
    Bank(String),
    #[error("failed to start a controller thread: {0}")]
    Thread(String),
}

/// The error currency a [`crate::pipeline::Command`] body returns. Composes
/// the taxonomy entries a command body can actually hit — bad input, a
/// bank handle that outlived the bank, or a fan-out operation's partial
/// failure — into the one type the pipeline needs to log and to carry on
/// a `command-failed` observer event (§7).
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Partial(#[from] PartialBroadcastError),
}
