//! In-memory storage backend.
//!
//! The default backend for tests and demos: every collection is a plain
//! hash map behind a read-write lock.

use std::{collections::HashMap, sync::Arc};

use crate::{
    MarketflowError, Result, ShareLock,
    store::{DbCollection, DbStore, Store, data::*},
};

/// Trait for records storable in a [`Collect`].
pub trait DbDocument: Clone + Send + Sync {
    fn id(&self) -> &str;
}

impl DbDocument for Workflow {
    fn id(&self) -> &str {
        &self.id
    }
}

impl DbDocument for Proc {
    fn id(&self) -> &str {
        &self.id
    }
}

impl DbDocument for Node {
    fn id(&self) -> &str {
        &self.id
    }
}

impl DbDocument for Event {
    fn id(&self) -> &str {
        &self.id
    }
}

impl DbDocument for Log {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One in-memory collection.
#[derive(Debug)]
pub struct Collect<T> {
    name: &'static str,
    rows: ShareLock<HashMap<String, T>>,
}

impl<T> Collect<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: ShareLock::new(HashMap::new().into()),
        }
    }
}

impl<T: DbDocument> DbCollection for Collect<T> {
    type Item = T;

    fn exists(
        &self,
        id: &str,
    ) -> Result<bool> {
        Ok(self.rows.read().unwrap().contains_key(id))
    }

    fn find(
        &self,
        id: &str,
    ) -> Result<T> {
        self.rows.read().unwrap().get(id).cloned().ok_or(MarketflowError::Store(format!("cannot find {} '{}'", self.name, id)))
    }

    fn create(
        &self,
        data: &T,
    ) -> Result<bool> {
        let mut rows = self.rows.write().unwrap();
        if rows.contains_key(data.id()) {
            return Err(MarketflowError::Store(format!("{} '{}' already exists", self.name, data.id())));
        }
        rows.insert(data.id().to_string(), data.clone());
        Ok(true)
    }

    fn update(
        &self,
        data: &T,
    ) -> Result<bool> {
        let mut rows = self.rows.write().unwrap();
        if !rows.contains_key(data.id()) {
            return Err(MarketflowError::Store(format!("cannot find {} '{}'", self.name, data.id())));
        }
        rows.insert(data.id().to_string(), data.clone());
        Ok(true)
    }

    fn delete(
        &self,
        id: &str,
    ) -> Result<bool> {
        Ok(self.rows.write().unwrap().remove(id).is_some())
    }
}

#[derive(Clone)]
pub struct MemStore {
    workflows: Arc<Collect<Workflow>>,
    procs: Arc<Collect<Proc>>,
    nodes: Arc<Collect<Node>>,
    events: Arc<Collect<Event>>,
    logs: Arc<Collect<Log>>,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DbStore for MemStore {
    fn init(
        &self,
        s: &Store,
    ) {
        s.register(self.workflows());
        s.register(self.procs());
        s.register(self.nodes());
        s.register(self.events());
        s.register(self.logs());
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            workflows: Arc::new(Collect::new("workflows")),
            procs: Arc::new(Collect::new("procs")),
            nodes: Arc::new(Collect::new("nodes")),
            events: Arc::new(Collect::new("events")),
            logs: Arc::new(Collect::new("logs")),
        }
    }

    pub fn workflows(&self) -> Arc<dyn DbCollection<Item = Workflow> + Send + Sync> {
        self.workflows.clone()
    }

    pub fn procs(&self) -> Arc<dyn DbCollection<Item = Proc> + Send + Sync> {
        self.procs.clone()
    }

    pub fn nodes(&self) -> Arc<dyn DbCollection<Item = Node> + Send + Sync> {
        self.nodes.clone()
    }

    pub fn events(&self) -> Arc<dyn DbCollection<Item = Event> + Send + Sync> {
        self.events.clone()
    }

    pub fn logs(&self) -> Arc<dyn DbCollection<Item = Log> + Send + Sync> {
        self.logs.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(id: &str) -> Proc {
        Proc {
            id: id.to_string(),
            wid: "wf-1".to_string(),
            state: "Pending".to_string(),
            start_time: 0,
            end_time: 0,
            err: None,
            timestamp: 0,
        }
    }

    #[test]
    fn test_create_find_update_delete() {
        let collect: Collect<Proc> = Collect::new("procs");

        collect.create(&proc("p1")).unwrap();
        assert!(collect.exists("p1").unwrap());
        assert!(collect.create(&proc("p1")).is_err());

        let mut found = collect.find("p1").unwrap();
        found.state = "Running".to_string();
        collect.update(&found).unwrap();
        assert_eq!(collect.find("p1").unwrap().state, "Running");

        assert!(collect.delete("p1").unwrap());
        assert!(!collect.delete("p1").unwrap());
        assert!(collect.find("p1").is_err());
    }

    #[test]
    fn test_update_missing_record_fails() {
        let collect: Collect<Proc> = Collect::new("procs");
        assert!(collect.update(&proc("ghost")).is_err());
    }
}
