#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    Start(WorkflowStartEvent),
    PhaseStarted(PhaseStartedEvent),
    Paused,
    Resumed,
    Succeeded,
    Failed(WorkflowFailedEvent),
    Aborted(WorkflowAbortedEvent),
}

impl WorkflowEvent {
    pub fn str(&self) -> &str {
        match self {
            WorkflowEvent::Start(_) => "Running",
            WorkflowEvent::PhaseStarted(_) => "Running",
            WorkflowEvent::Paused => "Paused",
            WorkflowEvent::Resumed => "Running",
            WorkflowEvent::Succeeded => "Completed",
            WorkflowEvent::Failed(_) => "Failed",
            WorkflowEvent::Aborted(_) => "Aborted",
        }
    }
}

/// Event emitted when a workflow execution starts
#[derive(Debug, Clone)]
pub struct WorkflowStartEvent {
    /// All node IDs in the workflow for batch initialization
    pub node_ids: Vec<String>,
}

/// Event emitted when a phase begins executing
#[derive(Debug, Clone)]
pub struct PhaseStartedEvent {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct WorkflowFailedEvent {
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct WorkflowAbortedEvent {
    pub reason: String,
}
