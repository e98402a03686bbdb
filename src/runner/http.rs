//! HTTP stage runner.
//!
//! Posts a stage to an external content-generation endpoint and returns its
//! JSON response as the stage output. The contract is deliberately narrow:
//! one POST per stage, one blob back. Provider authentication and payload
//! shaping belong to the endpoint behind this URL, not to the engine.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    MarketflowError, Result,
    common::Vars,
    model::NodeModel,
    runner::{StageOutput, StageRunner},
};

pub struct HttpRunner {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRunner {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| MarketflowError::Runner(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl StageRunner for HttpRunner {
    async fn run(
        &self,
        workflow_id: &str,
        node: &NodeModel,
    ) -> Result<StageOutput> {
        let payload = json!({
            "workflowId": workflow_id,
            "nodeId": node.id,
            "module": node.module,
            "prompt": node.prompt,
            "outputs": node.outputs,
        });

        let response = self.client.post(&self.endpoint).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(StageOutput::failed(format!("provider returned {}", status)));
        }

        let body: Value = response.json().await?;
        Ok(StageOutput::success(Vars::from(body)))
    }
}
