use serde::{Deserialize, Serialize};

use crate::catalog::{ModuleKind, StageCategory};

/// Display position of a node on the workflow canvas.
///
/// Cosmetic only; execution never reads it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// One instantiated stage inside a workflow snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeModel {
    /// node id, the kebab-case module slug
    pub id: String,
    pub module: ModuleKind,
    pub category: StageCategory,
    pub title: String,
    /// prompt with `{{...}}` tokens already substituted
    pub prompt: String,
    pub duration_secs: u64,
    pub provider: String,
    pub outputs: Vec<String>,
    /// ids of the nodes this stage depends on, all within the same workflow
    pub depends_on: Vec<String>,
    pub position: Position,
}
