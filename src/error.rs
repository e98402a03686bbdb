//! Error types for Marketflow.
//!
//! All errors in Marketflow are represented by the `MarketflowError` enum,
//! which provides a closed set of kinds for the distinct failure categories.
//! The HTTP surface maps kinds to status codes instead of matching on
//! message strings.

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Marketflow operations.
///
/// Each variant represents a specific category of error that can occur
/// during goal analysis, workflow planning, execution, or storage.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MarketflowError {
    /// Engine-level errors (startup, shutdown, lifecycle).
    #[error("{0}")]
    Engine(String),

    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, snapshot decoding).
    #[error("{0}")]
    Convert(String),

    /// Invalid caller input (missing fields, unknown module names).
    #[error("{0}")]
    Validation(String),

    /// A workflow id that is not present in the store.
    #[error("{0}")]
    NotFound(String),

    /// The dependency graph contains a cycle; carries a node id on the cycle.
    #[error("dependency cycle detected at node '{0}'")]
    CycleDetected(String),

    /// Workflow snapshot errors.
    #[error("{0}")]
    Workflow(String),

    /// Node definition or lookup errors.
    #[error("{0}")]
    Node(String),

    /// Connection definition errors (unknown endpoints, self-loops).
    #[error("{0}")]
    Connection(String),

    /// Errors raised by the phase execution loop itself.
    #[error("{0}")]
    Execution(String),

    /// Stage runner errors (provider transport failures).
    #[error("{0}")]
    Runner(String),

    /// Storage operation errors.
    #[error("{0}")]
    Store(String),

    /// Message queue errors.
    #[error("{0}")]
    Queue(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl From<MarketflowError> for String {
    fn from(val: MarketflowError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for MarketflowError {
    fn from(error: std::io::Error) -> Self {
        MarketflowError::IoError(error.to_string())
    }
}

impl From<MarketflowError> for std::io::Error {
    fn from(val: MarketflowError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<serde_json::Error> for MarketflowError {
    fn from(error: serde_json::Error) -> Self {
        MarketflowError::Convert(error.to_string())
    }
}

impl From<reqwest::Error> for MarketflowError {
    fn from(error: reqwest::Error) -> Self {
        MarketflowError::Runner(error.to_string())
    }
}
