//! Stage runner capability.
//!
//! A stage runner is how a node's content-generation work actually happens:
//! one stage in, one output blob out. The executor depends only on this
//! trait; whether the blob comes from a deterministic stub or a live
//! provider call is a configuration choice, never executor logic.

mod http;
mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, common::Vars, model::NodeModel};

pub use http::HttpRunner;
pub use mock::MockRunner;

/// Terminal status of one stage run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StageStatus {
    Succeeded,
    Failed,
}

/// Output returned by a stage run.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub status: StageStatus,
    pub output: Vars,
    pub error: Option<String>,
}

impl StageOutput {
    /// Create a successful stage output
    pub fn success(output: Vars) -> Self {
        Self {
            status: StageStatus::Succeeded,
            output,
            error: None,
        }
    }

    /// Create a failed stage output
    pub fn failed(error: String) -> Self {
        Self {
            status: StageStatus::Failed,
            output: Vars::new(),
            error: Some(error),
        }
    }
}

/// Executes one stage of a workflow.
#[async_trait]
pub trait StageRunner: Send + Sync {
    /// Run one stage and return its output.
    ///
    /// A domain-level failure (provider rejected the stage, generation did
    /// not converge) is a `StageOutput` with `Failed` status; an `Err` is
    /// reserved for transport-level breakage.
    async fn run(
        &self,
        workflow_id: &str,
        node: &NodeModel,
    ) -> Result<StageOutput>;
}
