mod channel;
mod context;
mod executor;

pub use channel::{Channel, ChannelEvent, ChannelOptions};
pub use context::Context;
pub use executor::{ControlAction, Execution, ExecutionId, ExecutionStatus, RunState};
