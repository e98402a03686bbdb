//! Workflow builder: turns an analyzed module list into concrete nodes and
//! connections.
//!
//! The builder applies the complexity profile, renders each stage's prompt,
//! resolves the static dependency table against the selected modules, and
//! lays the nodes out on a display grid.

use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};

use tracing::warn;

use crate::{
    Result,
    analyzer::{Complexity, GoalAnalysis},
    catalog::{self, ModuleKind},
    model::{ConnectionModel, NodeModel, Position},
    workflow::render_prompt,
};

const GRID_CELL_WIDTH: i32 = 260;
const GRID_CELL_HEIGHT: i32 = 180;

const DEFAULT_INDUSTRY: &str = "your industry";
const DEFAULT_AUDIENCE: &str = "a general audience";

/// Builder for one workflow's node set.
pub struct WorkflowBuilder {
    goal: String,
    industry: String,
    audience: String,
    complexity: Option<Complexity>,
    desired_outputs: Vec<ModuleKind>,
}

impl WorkflowBuilder {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            industry: DEFAULT_INDUSTRY.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            complexity: None,
            desired_outputs: Vec::new(),
        }
    }

    pub fn industry(
        mut self,
        industry: Option<String>,
    ) -> Self {
        if let Some(industry) = industry {
            self.industry = industry;
        }
        self
    }

    pub fn audience(
        mut self,
        audience: Option<String>,
    ) -> Self {
        if let Some(audience) = audience {
            self.audience = audience;
        }
        self
    }

    /// Override the complexity profile; defaults to the analyzer's verdict.
    pub fn complexity(
        mut self,
        complexity: Option<Complexity>,
    ) -> Self {
        self.complexity = complexity;
        self
    }

    /// Extra modules requested by the caller, appended when not already selected.
    pub fn desired_outputs(
        mut self,
        outputs: Vec<ModuleKind>,
    ) -> Self {
        self.desired_outputs = outputs;
        self
    }

    /// Build the node and connection lists for the analyzed goal.
    pub fn build(
        &self,
        analysis: &GoalAnalysis,
    ) -> Result<(Vec<NodeModel>, Vec<ConnectionModel>)> {
        let mut modules = analysis.required_modules.clone();
        for kind in &self.desired_outputs {
            if !modules.contains(kind) {
                modules.push(*kind);
            }
        }

        match self.complexity.unwrap_or(analysis.complexity) {
            // simple keeps roughly the first 60% of the chain
            Complexity::Simple => {
                let keep = (modules.len() * 3).div_ceil(5).max(1);
                modules.truncate(keep);
            }
            Complexity::Intermediate => {}
            // advanced bookends the chain with research and measurement
            Complexity::Advanced => {
                if !modules.contains(&ModuleKind::MarketResearch) {
                    modules.insert(0, ModuleKind::MarketResearch);
                }
                if !modules.contains(&ModuleKind::AnalyticsSetup) {
                    modules.push(ModuleKind::AnalyticsSetup);
                }
            }
        }

        let selected: HashSet<ModuleKind> = modules.iter().copied().collect();
        let total = modules.len();

        let mut nodes = Vec::with_capacity(total);
        for (slot, kind) in modules.iter().enumerate() {
            let Some(tpl) = catalog::template(*kind) else {
                // the catalog is expected to be total over ModuleKind; a gap
                // here means a stage silently vanishes, so make it loud
                warn!(module = kind.as_ref(), "no stage template, module skipped");
                continue;
            };

            let id = kind.as_ref().to_string();
            let depends_on: Vec<String> = catalog::dependencies(*kind).iter().filter(|dep| selected.contains(dep)).map(|dep| dep.as_ref().to_string()).collect();

            nodes.push(NodeModel {
                id: id.clone(),
                module: *kind,
                category: tpl.category,
                title: tpl.title.to_string(),
                prompt: render_prompt(tpl.prompt, &self.goal, &self.industry, &self.audience),
                duration_secs: tpl.duration_secs,
                provider: tpl.provider.to_string(),
                outputs: tpl.outputs.iter().map(|o| o.to_string()).collect(),
                depends_on,
                position: grid_position(slot, total, &id),
            });
        }

        let mut connections = Vec::new();
        for node in &nodes {
            for dep in &node.depends_on {
                connections.push(ConnectionModel {
                    id: format!("conn-{}-{}", dep, node.id),
                    source: dep.clone(),
                    target: node.id.clone(),
                });
            }
        }

        Ok((nodes, connections))
    }
}

/// Square grid layout with a little deterministic jitter so overlapping
/// canvases do not look machine-stamped. Display only.
fn grid_position(
    slot: usize,
    total: usize,
    id: &str,
) -> Position {
    let cols = (total as f64).sqrt().ceil().max(1.0) as usize;
    let col = (slot % cols) as i32;
    let row = (slot / cols) as i32;
    Position {
        x: col * GRID_CELL_WIDTH + jitter(id, 13),
        y: row * GRID_CELL_HEIGHT + jitter(id, 7),
    }
}

fn jitter(
    id: &str,
    salt: u64,
) -> i32 {
    let mut hasher = DefaultHasher::new();
    (id, salt).hash(&mut hasher);
    (hasher.finish() % 41) as i32 - 20
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer;

    fn launch_analysis() -> GoalAnalysis {
        analyzer::analyze("Launch my new SaaS product")
    }

    #[test]
    fn test_build_instantiates_every_selected_module() {
        let (nodes, connections) = WorkflowBuilder::new("Launch my new SaaS product").build(&launch_analysis()).unwrap();

        assert_eq!(nodes.len(), 8);
        assert!(!connections.is_empty());
        assert!(nodes.iter().any(|n| n.id == "launch-approval"));
    }

    #[test]
    fn test_simple_profile_truncates_the_chain() {
        let (nodes, _) = WorkflowBuilder::new("Launch my new SaaS product")
            .complexity(Some(Complexity::Simple))
            .build(&launch_analysis())
            .unwrap();

        // 60% of 8, rounded up
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].id, "market-research");
    }

    #[test]
    fn test_advanced_profile_adds_bookends() {
        let (nodes, _) = WorkflowBuilder::new("grow a newsletter for indie founders with weekly content")
            .complexity(Some(Complexity::Advanced))
            .build(&analyzer::analyze("grow a newsletter for indie founders with weekly content"))
            .unwrap();

        assert_eq!(nodes.first().map(|n| n.module), Some(ModuleKind::MarketResearch));
        assert!(nodes.iter().any(|n| n.module == ModuleKind::AnalyticsSetup));
    }

    #[test]
    fn test_dependencies_filtered_to_selected_modules() {
        let (nodes, connections) = WorkflowBuilder::new("Launch my new SaaS product").build(&launch_analysis()).unwrap();

        let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        for conn in &connections {
            assert!(ids.contains(conn.source.as_str()));
            assert!(ids.contains(conn.target.as_str()));
            assert_ne!(conn.source, conn.target);
        }
        // campaign-review is not selected, so launch-approval must not
        // reference it
        let approval = nodes.iter().find(|n| n.id == "launch-approval").unwrap();
        assert!(!approval.depends_on.contains(&"campaign-review".to_string()));
        assert!(approval.depends_on.contains(&"seo-optimization".to_string()));
    }

    #[test]
    fn test_desired_outputs_extend_the_selection() {
        let (nodes, _) = WorkflowBuilder::new("Launch my new SaaS product")
            .desired_outputs(vec![ModuleKind::VideoScript, ModuleKind::SalesCopy])
            .build(&launch_analysis())
            .unwrap();

        assert_eq!(nodes.len(), 9);
        assert_eq!(nodes.iter().filter(|n| n.module == ModuleKind::SalesCopy).count(), 1);
    }

    #[test]
    fn test_prompts_are_rendered() {
        let (nodes, _) = WorkflowBuilder::new("Launch my new SaaS product")
            .industry(Some("accounting software".to_string()))
            .audience(Some("finance leads".to_string()))
            .build(&launch_analysis())
            .unwrap();

        let research = nodes.iter().find(|n| n.id == "market-research").unwrap();
        assert!(research.prompt.contains("Launch my new SaaS product"));
        assert!(research.prompt.contains("accounting software"));
        assert!(!research.prompt.contains("{{"));
    }

    #[test]
    fn test_positions_are_deterministic() {
        let build = || WorkflowBuilder::new("Launch my new SaaS product").build(&launch_analysis()).unwrap().0;
        let first = build();
        let second = build();
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.position, b.position);
        }
    }
}
