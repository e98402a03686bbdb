//! File-backed storage backend.
//!
//! Workflow snapshots are the only durable state of the system: one
//! `{workflow_id}.json` file per workflow under the configured data
//! directory. Execution records (procs, nodes, events, logs) stay in
//! memory on purpose; they describe process-local state that is defined
//! to be lost on restart.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    MarketflowError, Result,
    store::{DbCollection, DbStore, MemStore, Store, data::Workflow},
};

/// Collection of workflow snapshot files, one JSON document per id.
pub struct FsCollect {
    dir: PathBuf,
}

impl FsCollect {
    fn new(dir: PathBuf) -> Self {
        Self {
            dir,
        }
    }

    /// Resolve the file for a workflow id, refusing ids that could escape
    /// the data directory.
    fn path(
        &self,
        id: &str,
    ) -> Result<PathBuf> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(MarketflowError::Store(format!("invalid workflow id '{}'", id)));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    fn write(
        &self,
        data: &Workflow,
    ) -> Result<bool> {
        let path = self.path(data.id.as_str())?;
        let text = serde_json::to_string_pretty(data)?;
        fs::write(path, text)?;
        Ok(true)
    }
}

impl DbCollection for FsCollect {
    type Item = Workflow;

    fn exists(
        &self,
        id: &str,
    ) -> Result<bool> {
        Ok(self.path(id)?.exists())
    }

    fn find(
        &self,
        id: &str,
    ) -> Result<Workflow> {
        let path = self.path(id)?;
        if !path.exists() {
            return Err(MarketflowError::Store(format!("cannot find workflows '{}'", id)));
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn create(
        &self,
        data: &Workflow,
    ) -> Result<bool> {
        if self.exists(&data.id)? {
            return Err(MarketflowError::Store(format!("workflows '{}' already exists", data.id)));
        }
        self.write(data)
    }

    fn update(
        &self,
        data: &Workflow,
    ) -> Result<bool> {
        if !self.exists(&data.id)? {
            return Err(MarketflowError::Store(format!("cannot find workflows '{}'", data.id)));
        }
        self.write(data)
    }

    fn delete(
        &self,
        id: &str,
    ) -> Result<bool> {
        let path = self.path(id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}

/// Store backend with durable workflow snapshots.
pub struct FsStore {
    workflows: Arc<FsCollect>,
    ephemeral: MemStore,
}

impl FsStore {
    pub fn new<T: AsRef<Path>>(data_dir: T) -> Result<Self> {
        fs::create_dir_all(data_dir.as_ref())?;
        Ok(Self {
            workflows: Arc::new(FsCollect::new(data_dir.as_ref().to_path_buf())),
            ephemeral: MemStore::new(),
        })
    }
}

impl DbStore for FsStore {
    fn init(
        &self,
        s: &Store,
    ) {
        s.register::<Workflow>(self.workflows.clone());
        s.register(self.ephemeral.procs());
        s.register(self.ephemeral.nodes());
        s.register(self.ephemeral.events());
        s.register(self.ephemeral.logs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Workflow {
        Workflow {
            id: id.to_string(),
            goal: "Launch my new SaaS product".to_string(),
            category: "product-launch".to_string(),
            data: "{}".to_string(),
            create_time: 1,
            update_time: 0,
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCollect::new(dir.path().to_path_buf());

        store.create(&record("wf-abc123")).unwrap();
        assert!(dir.path().join("wf-abc123.json").exists());

        let found = store.find("wf-abc123").unwrap();
        assert_eq!(found.goal, "Launch my new SaaS product");

        assert!(store.delete("wf-abc123").unwrap());
        assert!(!store.exists("wf-abc123").unwrap());
    }

    #[test]
    fn test_create_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCollect::new(dir.path().to_path_buf());

        store.create(&record("wf-1")).unwrap();
        assert!(store.create(&record("wf-1")).is_err());
    }

    #[test]
    fn test_path_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCollect::new(dir.path().to_path_buf());

        assert!(store.find("../etc/passwd").is_err());
        assert!(store.find("").is_err());
    }
}
