//! Deterministic mock stage runner.
//!
//! Stands in for the real content-generation providers: sleeps the node's
//! nominal duration scaled down by the configured time scale, then returns a
//! canned blob selected by module kind. Forced per-node failures make the
//! executor's failure-isolation policy testable.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::{
    Result,
    catalog::ModuleKind,
    common::Vars,
    model::NodeModel,
    runner::{StageOutput, StageRunner},
};

/// Mock runner with scaled-down sleep timing.
pub struct MockRunner {
    /// multiplier applied to nominal stage durations (1.0 = real time)
    time_scale: f64,
    /// node ids forced to fail
    fail_nodes: HashSet<String>,
}

impl MockRunner {
    pub fn new(time_scale: f64) -> Self {
        Self {
            time_scale,
            fail_nodes: HashSet::new(),
        }
    }

    /// Force the node with this id to fail.
    pub fn fail_on(
        mut self,
        node_id: impl Into<String>,
    ) -> Self {
        self.fail_nodes.insert(node_id.into());
        self
    }
}

#[async_trait]
impl StageRunner for MockRunner {
    async fn run(
        &self,
        workflow_id: &str,
        node: &NodeModel,
    ) -> Result<StageOutput> {
        let delay = Duration::from_millis((node.duration_secs as f64 * 1000.0 * self.time_scale) as u64);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.fail_nodes.contains(&node.id) {
            return Ok(StageOutput::failed(format!("forced failure for stage {}", node.id)));
        }

        Ok(StageOutput::success(canned_output(workflow_id, node)))
    }
}

/// Canned result blob per module kind.
fn canned_output(
    workflow_id: &str,
    node: &NodeModel,
) -> Vars {
    let body = match node.module {
        ModuleKind::MarketResearch => json!({
            "summary": "Market shows steady demand with a mid-market pricing gap.",
            "trends": ["ai-assisted tooling", "consolidation of point solutions"],
            "confidence": 0.82,
        }),
        ModuleKind::AudienceAnalysis => json!({
            "personas": ["hands-on operator", "budget-owning manager", "skeptical power user"],
            "primary_channel": "linkedin",
            "confidence": 0.78,
        }),
        ModuleKind::ContentStrategy => json!({
            "pillars": ["outcome proof", "time saved", "switching is easy"],
            "cadence": "3 posts/week, 1 email/week",
        }),
        ModuleKind::CampaignConcept => json!({
            "concepts": [
                {"hook": "the before/after ledger", "emotion": "relief"},
                {"hook": "a week without busywork", "emotion": "aspiration"},
            ],
        }),
        ModuleKind::SalesCopy => json!({
            "headline": "Ship the work, skip the busywork",
            "variants": 5,
            "cta": "Start free",
        }),
        ModuleKind::VisualContent => json!({
            "hero_image": "hero-v1.png",
            "banners": ["1200x628", "1080x1080", "1600x400"],
        }),
        ModuleKind::VideoScript => json!({
            "length_seconds": 45,
            "scenes": 6,
            "hook": "What did your Monday actually produce?",
        }),
        ModuleKind::SocialPosts => json!({
            "posts": 7,
            "platforms": ["linkedin", "x"],
        }),
        ModuleKind::LandingPage => json!({
            "sections": ["hero", "proof", "objections", "cta"],
            "conversion_goal": "trial signup",
        }),
        ModuleKind::EmailCampaign => json!({
            "sequence": ["announcement", "deep-dive", "last-call"],
            "subject_lines": 3,
        }),
        ModuleKind::SeoOptimization => json!({
            "keywords": 18,
            "title_tags": 4,
            "meta_descriptions": 4,
        }),
        ModuleKind::AnalyticsSetup => json!({
            "events": ["visit", "signup", "activation"],
            "utm_scheme": "campaign/channel/asset",
        }),
        ModuleKind::CampaignReview => json!({
            "issues_found": 2,
            "verdict": "minor revisions",
        }),
        ModuleKind::LaunchApproval => json!({
            "decision": "go",
            "open_risks": [],
        }),
    };

    let mut vars = Vars::new();
    vars.set("workflowId", workflow_id);
    vars.set("stage", node.id.clone());
    vars.set("provider", node.provider.clone());
    vars.set("result", body);
    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::StageCategory,
        model::Position,
        runner::StageStatus,
    };

    fn node(id: &str, module: ModuleKind) -> NodeModel {
        NodeModel {
            id: id.to_string(),
            module,
            category: StageCategory::Creation,
            title: id.to_string(),
            prompt: String::new(),
            duration_secs: 100,
            provider: "copy-llm".to_string(),
            outputs: vec![],
            depends_on: vec![],
            position: Position::default(),
        }
    }

    #[tokio::test]
    async fn test_mock_returns_module_specific_blob() {
        let runner = MockRunner::new(0.0);
        let out = runner.run("wf-1", &node("sales-copy", ModuleKind::SalesCopy)).await.unwrap();

        assert_eq!(out.status, StageStatus::Succeeded);
        assert_eq!(out.output.get::<String>("stage"), Some("sales-copy".to_string()));
        let result: serde_json::Value = out.output.get("result").unwrap();
        assert_eq!(result["cta"], "Start free");
    }

    #[tokio::test]
    async fn test_forced_failure() {
        let runner = MockRunner::new(0.0).fail_on("sales-copy");
        let out = runner.run("wf-1", &node("sales-copy", ModuleKind::SalesCopy)).await.unwrap();

        assert_eq!(out.status, StageStatus::Failed);
        assert!(out.error.unwrap().contains("sales-copy"));
    }
}
