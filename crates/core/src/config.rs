// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered startup configuration (§9 A2): compiled-in defaults, optionally
//! overridden by a TOML file, optionally overridden again by environment
//! variables. Read once at process startup and handed to the pipeline,
//! bank, and controller as an explicit collaborator — nothing in this
//! crate lineage reaches for it as global state.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Bounds and cadences every long-lived component reads at construction
/// time. Field names match the `WCP_*` environment variables and the TOML
/// keys `merge_env`/`merge_file` recognize.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Bank tick cadence (§4.7 periodic timer a): how often the Controller
    /// drives `TubeBank::tick_all`.
    pub bank_tick_ms: u64,
    /// Plan-recompute cadence (§4.7 periodic timer b).
    pub plan_recompute_ms: u64,
    /// Engagement-result publish / control-state refresh cadence (§4.7
    /// periodic timer c).
    pub publish_ms: u64,
    /// Bounded command history length (§4.5); oldest entries drop first.
    pub history_len: usize,
    /// Bounded undo and redo stack depth, each (§4.5).
    pub undo_redo_depth: usize,
    /// `tracing` level filter string, e.g. `"info"` or `"wcp_engine=debug"`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_tick_ms: 100,
            plan_recompute_ms: 1_000,
            publish_ms: 1_000,
            history_len: 500,
            undo_redo_depth: 100,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    crate::setters! {
        into { log_level: String }
        set {
            bank_tick_ms: u64,
            plan_recompute_ms: u64,
            publish_ms: u64,
            history_len: usize,
            undo_redo_depth: usize
        }
    }

    /// Defaults, overridden by `path` (if given and present) and then by
    /// environment variables. A missing file at `path` is not an error —
    /// a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = path {
            if let Some(from_file) = ConfigFile::read(path)? {
                config = from_file.apply(config);
            }
        }
        Ok(config.merge_env())
    }

    fn merge_env(mut self) -> Self {
        if let Some(v) = env_u64("WCP_BANK_TICK_MS") {
            self.bank_tick_ms = v;
        }
        if let Some(v) = env_u64("WCP_PLAN_RECOMPUTE_MS") {
            self.plan_recompute_ms = v;
        }
        if let Some(v) = env_u64("WCP_PUBLISH_MS") {
            self.publish_ms = v;
        }
        if let Some(v) = env_u64("WCP_HISTORY_LEN") {
            self.history_len = v as usize;
        }
        if let Some(v) = env_u64("WCP_UNDO_REDO_DEPTH") {
            self.undo_redo_depth = v as usize;
        }
        if let Ok(v) = std::env::var("WCP_LOG_LEVEL") {
            if !v.is_empty() {
                self.log_level = v;
            }
        }
        self
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// The TOML file shape: every field optional, so a partial override file
/// only changes what it names.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    bank_tick_ms: Option<u64>,
    plan_recompute_ms: Option<u64>,
    publish_ms: Option<u64>,
    history_len: Option<usize>,
    undo_redo_depth: Option<usize>,
    log_level: Option<String>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(toml::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::Io(e.to_string())),
        }
    }

    fn apply(self, mut base: Config) -> Config {
        if let Some(v) = self.bank_tick_ms {
            base.bank_tick_ms = v;
        }
        if let Some(v) = self.plan_recompute_ms {
            base.plan_recompute_ms = v;
        }
        if let Some(v) = self.publish_ms {
            base.publish_ms = v;
        }
        if let Some(v) = self.history_len {
            base.history_len = v;
        }
        if let Some(v) = self.undo_redo_depth {
            base.undo_redo_depth = v;
        }
        if let Some(v) = self.log_level {
            base.log_level = v;
        }
        base
    }
}

/// Failure loading or parsing the config file. Read failures other than
/// "file not found" and TOML parse errors both surface here; an absent
/// file falls back to defaults silently (§9 A2 layering).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(String),
    #[error("parsing config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
