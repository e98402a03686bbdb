mod event;
mod log;
mod node;
mod proc;
mod workflow;

pub use event::Event;
pub use log::Log;
pub use node::Node;
pub use proc::Proc;
pub use workflow::Workflow;
