// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weapon kind tag and the validated tube-number newtype shared across the
//! wire, engine, and daemon crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Algorithmic specialization of a weapon. Drives which
/// [`EngagementPlanner`](../../wcp_engine/trait.EngagementPlanner.html) impl
/// the registry constructs for a tube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Alm,
    Asm,
    Aam,
    Wgt,
    Mmine,
    Na,
}

crate::simple_display! {
    WeaponKind {
        Alm => "ALM",
        Asm => "ASM",
        Aam => "AAM",
        Wgt => "WGT",
        Mmine => "MMINE",
        Na => "NA",
    }
}

/// Minimum valid tube number (inclusive).
pub const MIN_TUBE_NUMBER: u16 = 1;
/// Maximum valid tube number (inclusive). The bank is a fixed array of 6.
pub const MAX_TUBE_NUMBER: u16 = 6;

/// Error returned by [`TubeNumber::new`] when the raw value is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tube number {0} out of range [{MIN_TUBE_NUMBER}, {MAX_TUBE_NUMBER}]")]
pub struct TubeNumberOutOfRange(pub u16);

/// A validated tube number in `[1, 6]`. Zero is reserved, out-of-range is
/// rejected at construction so every downstream consumer can index the bank
/// array without re-checking bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct TubeNumber(u16);

impl TubeNumber {
    pub fn new(raw: u16) -> Result<Self, TubeNumberOutOfRange> {
        if (MIN_TUBE_NUMBER..=MAX_TUBE_NUMBER).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(TubeNumberOutOfRange(raw))
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Zero-based index into a 6-element tube array.
    pub fn index(self) -> usize {
        (self.0 - MIN_TUBE_NUMBER) as usize
    }

    /// Iterate every valid tube number, 1 through 6, in order.
    pub fn all() -> impl Iterator<Item = TubeNumber> {
        (MIN_TUBE_NUMBER..=MAX_TUBE_NUMBER).map(|n| TubeNumber(n))
    }
}

impl TryFrom<u16> for TubeNumber {
    type Error = TubeNumberOutOfRange;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<TubeNumber> for u16 {
    fn from(t: TubeNumber) -> u16 {
        t.0
    }
}

impl fmt::Display for TubeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;
