use serde::{Deserialize, Serialize};

/// Ordered group of nodes executed concurrently.
///
/// Phases run strictly in sequence; the aggregate duration of a phase is the
/// maximum of its members' durations, not their sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseModel {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub nodes: Vec<String>,
    pub duration_secs: u64,
}

/// Execution plan computed once per workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanModel {
    pub phases: Vec<PhaseModel>,
    /// sum of the phase durations, in seconds
    pub total_estimated_time: u64,
    /// longest root-to-leaf dependency chain, reporting only
    pub critical_path: Vec<String>,
}
