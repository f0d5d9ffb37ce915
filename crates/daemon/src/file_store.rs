// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed mine-drop-plan store (§6, §9 A1): one JSON file per plan
//! list under a base directory, written via a temp-file-then-rename so a
//! crash mid-write never leaves a half-written list behind.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use wcp_engine::mine_store::validate_plan_list;
use wcp_engine::{MinePlanStore, PlanStoreError};
use wcp_wire::MinePlan;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persists each plan list as `<base_dir>/list-<n>.json`.
pub struct FileMinePlanStore {
    base_dir: PathBuf,
}

impl FileMinePlanStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn list_path(&self, list_number: u32) -> PathBuf {
        self.base_dir.join(format!("list-{list_number}.json"))
    }
}

impl MinePlanStore for FileMinePlanStore {
    fn load(&self, list_number: u32) -> Option<Vec<MinePlan>> {
        let bytes = fs::read(self.list_path(list_number)).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn save(&self, list_number: u32, plans: Vec<MinePlan>) -> Result<(), PlanStoreError> {
        validate_plan_list(list_number, &plans)?;

        let path = self.list_path(list_number);
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&plans)
            .map_err(|e| PlanStoreError::Backend(e.to_string()))?;
        fs::write(&tmp_path, bytes).map_err(|e| PlanStoreError::Backend(e.to_string()))?;
        fs::rename(&tmp_path, &path).map_err(|e| PlanStoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;
