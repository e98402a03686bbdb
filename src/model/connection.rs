use serde::{Deserialize, Serialize};

/// Directed edge between two nodes of a workflow.
///
/// Connections are derived mechanically from each node's dependency list and
/// regenerated whenever the nodes are rebuilt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionModel {
    pub id: String,
    pub source: String,
    pub target: String,
}
