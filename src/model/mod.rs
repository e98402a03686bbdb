mod connection;
mod node;
mod plan;
mod workflow;

pub use connection::ConnectionModel;
pub use node::{NodeModel, Position};
pub use plan::{PhaseModel, PlanModel};
pub use workflow::WorkflowModel;
