use serde::{Deserialize, Serialize};

use crate::{
    MarketflowError, Result,
    analyzer::GoalCategory,
    model::{ConnectionModel, NodeModel, PlanModel},
};

/// Full workflow snapshot: the unit persisted to the store as one JSON
/// document per workflow id, and the shape returned by `generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowModel {
    pub id: String,
    pub goal: String,
    pub category: GoalCategory,
    pub created_at: i64,
    pub nodes: Vec<NodeModel>,
    pub connections: Vec<ConnectionModel>,
    pub execution_plan: PlanModel,
    pub recommendations: Vec<String>,
}

impl WorkflowModel {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<WorkflowModel>(s).map_err(|e| MarketflowError::Workflow(format!("{}", e)))
    }

    /// look up a node by id
    pub fn node(
        &self,
        id: &str,
    ) -> Option<&NodeModel> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
