//! Phase planning: orders a workflow graph into sequential execution phases.
//!
//! The planner walks the topological order and groups nodes into phases with
//! three closing rules: an open phase never holds more than two nodes, a
//! module transition across one of the breakpoint pairs closes the phase, and
//! a node whose dependency sits in the open phase closes it first. The last
//! rule is what guarantees that every node lands in a strictly later phase
//! than all of its dependencies.
//!
//! The breakpoint pairs are a policy table inherited from the product, not a
//! rule of the domain; change them freely, the ordering invariant does not
//! depend on them.

use crate::{
    MarketflowError, Result,
    catalog::ModuleKind,
    model::{PhaseModel, PlanModel},
    workflow::WorkflowGraph,
};

/// An open phase closes once it has accumulated this many nodes.
const PHASE_FILL_LIMIT: usize = 2;

/// Module transitions that force a phase break.
const PHASE_BREAKPOINTS: [(ModuleKind, ModuleKind); 4] = [
    (ModuleKind::MarketResearch, ModuleKind::ContentStrategy),
    (ModuleKind::AudienceAnalysis, ModuleKind::ContentStrategy),
    (ModuleKind::ContentStrategy, ModuleKind::SalesCopy),
    (ModuleKind::SeoOptimization, ModuleKind::LaunchApproval),
];

/// Phase names are positional; workflows deep enough to run out of names get
/// numbered phases.
const PHASE_NAMES: [(&str, &str); 5] = [
    ("Research & Discovery", "Ground the campaign in market and audience facts"),
    ("Strategy", "Shape the campaign direction and messaging"),
    ("Content Production", "Produce the campaign assets"),
    ("Optimization", "Tune the produced assets for reach"),
    ("Review & Launch", "Validate and sign off the campaign"),
];

/// Compute the execution plan for a workflow graph.
pub fn plan(graph: &WorkflowGraph) -> Result<PlanModel> {
    let order = graph.topo_order()?;

    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut prev_module: Option<ModuleKind> = None;

    for nid in order {
        let node = graph.node(&nid).ok_or(MarketflowError::Node(format!("node {} not found", nid)))?;

        let full = open.len() >= PHASE_FILL_LIMIT;
        let breakpoint = prev_module.is_some_and(|prev| PHASE_BREAKPOINTS.contains(&(prev, node.module)));
        let dependency_open = node.depends_on.iter().any(|dep| open.contains(dep));

        if (full || breakpoint || dependency_open) && !open.is_empty() {
            groups.push(std::mem::take(&mut open));
        }

        prev_module = Some(node.module);
        open.push(nid);
    }
    if !open.is_empty() {
        groups.push(open);
    }

    let mut phases = Vec::with_capacity(groups.len());
    for (index, nodes) in groups.into_iter().enumerate() {
        let duration_secs = nodes.iter().filter_map(|nid| graph.node(nid)).map(|n| n.duration_secs).max().unwrap_or(0);
        let (name, description) = phase_label(index);
        phases.push(PhaseModel {
            index,
            name,
            description,
            nodes,
            duration_secs,
        });
    }

    Ok(PlanModel {
        total_estimated_time: phases.iter().map(|p| p.duration_secs).sum(),
        critical_path: graph.critical_path(),
        phases,
    })
}

fn phase_label(index: usize) -> (String, String) {
    match PHASE_NAMES.get(index) {
        Some((name, description)) => (name.to_string(), description.to_string()),
        None => (format!("Phase {}", index + 1), "Additional campaign work".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{analyzer, workflow::WorkflowBuilder};

    fn launch_graph() -> WorkflowGraph {
        let analysis = analyzer::analyze("Launch my new SaaS product");
        let (nodes, connections) = WorkflowBuilder::new("Launch my new SaaS product").build(&analysis).unwrap();
        WorkflowGraph::new(&nodes, &connections).unwrap()
    }

    #[test]
    fn test_every_node_lands_in_exactly_one_phase() {
        let graph = launch_graph();
        let plan = plan(&graph).unwrap();

        let placed: Vec<&String> = plan.phases.iter().flat_map(|p| p.nodes.iter()).collect();
        assert_eq!(placed.len(), graph.node_count());
    }

    #[test]
    fn test_dependencies_always_land_in_earlier_phases() {
        let graph = launch_graph();
        let plan = plan(&graph).unwrap();

        let mut phase_of: HashMap<&str, usize> = HashMap::new();
        for phase in &plan.phases {
            for nid in &phase.nodes {
                phase_of.insert(nid, phase.index);
            }
        }

        for phase in &plan.phases {
            for nid in &phase.nodes {
                for dep in graph.dependencies_of(nid) {
                    assert!(
                        phase_of[dep.as_str()] < phase_of[nid.as_str()],
                        "{} must run strictly after its dependency {}",
                        nid,
                        dep
                    );
                }
            }
        }
    }

    #[test]
    fn test_phases_respect_the_fill_limit() {
        // the fill limit closes a phase before a third node joins it
        let plan = plan(&launch_graph()).unwrap();
        for phase in &plan.phases {
            assert!(!phase.nodes.is_empty());
            assert!(phase.nodes.len() <= PHASE_FILL_LIMIT);
        }
    }

    #[test]
    fn test_phase_duration_is_max_not_sum() {
        let graph = launch_graph();
        let plan = plan(&graph).unwrap();

        for phase in &plan.phases {
            let max = phase.nodes.iter().map(|nid| graph.node(nid).unwrap().duration_secs).max().unwrap();
            assert_eq!(phase.duration_secs, max);
        }
        assert_eq!(plan.total_estimated_time, plan.phases.iter().map(|p| p.duration_secs).sum::<u64>());
        assert!(plan.total_estimated_time > 0);
    }

    #[test]
    fn test_phase_names_are_positional() {
        let plan = plan(&launch_graph()).unwrap();
        assert_eq!(plan.phases[0].name, "Research & Discovery");
        assert_eq!(phase_label(7).0, "Phase 8");
    }

    #[test]
    fn test_critical_path_ends_in_a_terminal_category() {
        let graph = launch_graph();
        let plan = plan(&graph).unwrap();

        let last = plan.critical_path.last().expect("critical path must not be empty");
        let node = graph.node(last).unwrap();
        assert!(matches!(node.category, crate::catalog::StageCategory::Approval | crate::catalog::StageCategory::Optimization));
    }
}
