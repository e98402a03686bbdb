//! Event types for workflow execution.
//!
//! Events are emitted during execution to notify subscribers about phase
//! progress, stage completions, failures, and logs.

mod node;
mod workflow;

pub use node::*;
pub use workflow::*;

/// Generic event wrapper.
#[derive(Debug, Clone)]
pub struct Event<T> {
    inner: T,
}

/// Top-level event type for workflow graph events.
#[derive(Debug, Clone)]
pub enum GraphEvent {
    /// Workflow-level events (start, phase-started, succeeded, etc.).
    Workflow(WorkflowEvent),
    /// Node-level events (running, succeeded, failed).
    Node(NodeEvent),
}

/// Event message containing execution and node context.
#[derive(Debug, Clone)]
pub struct Message {
    /// Execution id that generated this event.
    pub xid: String,
    /// Workflow id the execution belongs to.
    pub wid: String,
    /// Node id that generated this event (empty for workflow events).
    pub nid: String,
    /// The actual event data.
    pub event: GraphEvent,
}

/// Log entry emitted during stage execution.
#[derive(Debug, Clone)]
pub struct Log {
    /// Execution id that generated this log.
    pub xid: String,
    /// Node id that generated this log.
    pub nid: String,
    /// Log message content.
    pub content: String,
    /// Timestamp in milliseconds of the log entry.
    pub timestamp: i64,
}

impl<T> std::ops::Deref for Event<T>
where
    T: std::fmt::Debug + Clone,
{
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> Event<T>
where
    T: std::fmt::Debug + Clone,
{
    pub fn new(inner: &T) -> Self {
        Self {
            inner: inner.clone(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl GraphEvent {
    pub fn is_complete(&self) -> bool {
        matches!(self, GraphEvent::Workflow(WorkflowEvent::Succeeded))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, GraphEvent::Workflow(WorkflowEvent::Failed(_)))
    }

    /// terminal workflow outcome: succeeded, failed, or aborted
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GraphEvent::Workflow(WorkflowEvent::Succeeded) | GraphEvent::Workflow(WorkflowEvent::Failed(_)) | GraphEvent::Workflow(WorkflowEvent::Aborted(_))
        )
    }
}
