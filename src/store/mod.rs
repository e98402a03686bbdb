//! Storage layer for persisting workflow snapshots and execution records.
//!
//! Provides an abstraction over different storage backends:
//! - `MemStore`: in-memory collections for testing
//! - `FsStore`: one JSON file per workflow snapshot on disk; execution
//!   records stay in memory because execution state is ephemeral by design

pub mod data;
mod fs;
mod mem;
mod store;

use strum::{AsRefStr, EnumIter};

pub use fs::FsStore;
pub use mem::MemStore;
pub use store::Store;

use crate::Result;

/// Identifiers for different storage collections.
#[derive(Debug, Clone, AsRefStr, PartialEq, Hash, Eq, EnumIter)]
pub enum StoreIden {
    /// Workflow snapshots.
    #[strum(serialize = "workflows")]
    Workflows,
    /// Execution (proc) records.
    #[strum(serialize = "procs")]
    Procs,
    /// Node execution records.
    #[strum(serialize = "nodes")]
    Nodes,
    /// Execution events.
    #[strum(serialize = "events")]
    Events,
    /// Log entries.
    #[strum(serialize = "logs")]
    Logs,
}

/// Trait for types that can identify their storage collection.
pub trait DbCollectionIden {
    /// Returns the collection identifier for this type.
    fn iden() -> StoreIden;
}

/// Trait for database collection operations.
pub trait DbCollection: Send + Sync {
    /// The type of items stored in this collection.
    type Item;

    /// Checks if a record with the given ID exists.
    fn exists(
        &self,
        id: &str,
    ) -> Result<bool>;

    /// Finds a record by ID.
    fn find(
        &self,
        id: &str,
    ) -> Result<Self::Item>;

    /// Creates a new record.
    fn create(
        &self,
        data: &Self::Item,
    ) -> Result<bool>;

    /// Updates an existing record.
    fn update(
        &self,
        data: &Self::Item,
    ) -> Result<bool>;

    /// Deletes a record by ID.
    fn delete(
        &self,
        id: &str,
    ) -> Result<bool>;
}

/// Trait for database store initialization.
pub trait DbStore {
    /// Initializes the backend and registers collections with the store.
    fn init(
        &self,
        s: &Store,
    );
}
