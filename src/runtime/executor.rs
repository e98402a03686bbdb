//! Phase executor: runs a planned workflow phase by phase.
//!
//! Phases run strictly in sequence. All stages of a phase are spawned
//! together and settle together; the relative order of siblings is
//! unspecified. A failed stage is recorded in the failed list and stops
//! neither its siblings nor the following phases, so a workflow only ends
//! `failed` when the execution loop itself errors. Pause is advisory: the
//! flag and the visible status flip immediately, in-flight stages are never
//! interrupted, and the loop parks between phases until resumed or aborted.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{runtime::Runtime, sync::watch, task::JoinHandle};
use tracing::{debug, error};

use crate::{
    MarketflowError, Result,
    common::{MemCache, Vars},
    events::{ErrorReason, Event, GraphEvent, Message, NodeEvent, PhaseStartedEvent, WorkflowAbortedEvent, WorkflowEvent, WorkflowFailedEvent, WorkflowStartEvent},
    model::{NodeModel, WorkflowModel},
    runner::{StageRunner, StageStatus},
    runtime::{Channel, Context},
    utils,
    workflow::WorkflowGraph,
};

/// execution id
pub type ExecutionId = String;

/// Overall state of one workflow execution.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunState {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    Paused,
}

/// Advisory control actions accepted while a workflow executes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ControlAction {
    Pause,
    Resume,
}

/// Per-workflow execution record.
///
/// Lives in process memory only and is lost on restart; the durable part of
/// a workflow is its snapshot, never its execution state.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStatus {
    pub workflow_id: String,
    pub status: RunState,
    pub current_phase: usize,
    pub completed_nodes: Vec<String>,
    pub failed_nodes: Vec<String>,
    /// processed nodes over total nodes, 0..=100
    pub progress: u8,
    pub started_at: i64,
    pub finished_at: Option<i64>,
}

impl ExecutionStatus {
    pub fn pending(wid: &str) -> Self {
        Self {
            workflow_id: wid.to_string(),
            status: RunState::Pending,
            current_phase: 0,
            completed_nodes: Vec::new(),
            failed_nodes: Vec::new(),
            progress: 0,
            started_at: utils::time::time_millis(),
            finished_at: None,
        }
    }
}

/// Outcome of one spawned stage task.
enum NodeOutcome {
    Succeeded(i64),
    Failed(ErrorReason),
    Stopped,
}

/// One live execution of a workflow snapshot.
pub struct Execution {
    id: ExecutionId,
    model: WorkflowModel,
    runner: Arc<dyn StageRunner>,
    ctx: Arc<Context>,
    statuses: Arc<MemCache<String, ExecutionStatus>>,
    results: Arc<MemCache<String, Vars>>,
    pause_flag: watch::Sender<bool>,
    stage_timeout: Option<Duration>,
    runtime: Arc<Runtime>,
}

impl Execution {
    pub fn new(
        model: WorkflowModel,
        runner: Arc<dyn StageRunner>,
        channel: Arc<Channel>,
        statuses: Arc<MemCache<String, ExecutionStatus>>,
        results: Arc<MemCache<String, Vars>>,
        stage_timeout: Option<Duration>,
        runtime: Arc<Runtime>,
    ) -> Result<Arc<Self>> {
        // fail fast on malformed snapshots before any stage runs
        WorkflowGraph::new(&model.nodes, &model.connections)?.topo_order()?;

        let xid = utils::longid();
        let ctx = Arc::new(Context::new(xid.clone(), model.id.clone(), channel));
        let (pause_flag, _) = watch::channel(false);

        Ok(Arc::new(Self {
            id: xid,
            model,
            runner,
            ctx,
            statuses,
            results,
            pause_flag,
            stage_timeout,
            runtime,
        }))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn wid(&self) -> &str {
        &self.model.id
    }

    pub fn is_complete(&self) -> bool {
        self.ctx.is_terminated()
    }

    pub fn is_paused(&self) -> bool {
        *self.pause_flag.borrow()
    }

    /// Starts the phase loop in the background.
    pub fn start(self: Arc<Self>) {
        let exec = self.clone();
        self.runtime.spawn(async move {
            match exec.run().await {
                Ok(()) => {}
                Err(err) => {
                    // an error out of the loop itself fails the workflow;
                    // aborts have already recorded their own outcome
                    if !exec.ctx.is_terminated() {
                        exec.fail(&err);
                    }
                }
            }
        });
    }

    /// Flip the advisory pause flag.
    ///
    /// The visible status changes immediately; the loop parks before the
    /// next phase, and stages already in flight run to completion.
    pub fn pause(&self) {
        if self.ctx.is_terminated() || self.is_paused() {
            return;
        }
        // send_replace stores the flag even while nothing is subscribed
        self.pause_flag.send_replace(true);
        self.update(|s| {
            if matches!(s.status, RunState::Pending | RunState::Running) {
                s.status = RunState::Paused;
            }
        });
        self.emit("", GraphEvent::Workflow(WorkflowEvent::Paused));
    }

    pub fn resume(&self) {
        if self.ctx.is_terminated() || !self.is_paused() {
            return;
        }
        self.pause_flag.send_replace(false);
        self.update(|s| {
            if s.status == RunState::Paused {
                s.status = RunState::Running;
            }
        });
        self.emit("", GraphEvent::Workflow(WorkflowEvent::Resumed));
    }

    /// Abort the execution: in-flight stages are cancelled at their next
    /// suspension point and the workflow is marked failed.
    pub fn abort(&self) {
        if self.ctx.is_terminated() {
            return;
        }
        self.update(|s| {
            s.status = RunState::Failed;
            s.finished_at = Some(utils::time::time_millis());
        });
        self.emit(
            "",
            GraphEvent::Workflow(WorkflowEvent::Aborted(WorkflowAbortedEvent {
                reason: "aborted by engine shutdown".to_string(),
            })),
        );
        self.ctx.done();
    }

    async fn run(&self) -> Result<()> {
        let node_ids = self.model.nodes.iter().map(|n| n.id.clone()).collect();
        self.emit(
            "",
            GraphEvent::Workflow(WorkflowEvent::Start(WorkflowStartEvent {
                node_ids,
            })),
        );
        self.update(|s| {
            if s.status != RunState::Paused {
                s.status = RunState::Running;
            }
        });

        for phase in &self.model.execution_plan.phases {
            self.wait_while_paused().await?;

            self.update(|s| s.current_phase = phase.index);
            self.emit(
                "",
                GraphEvent::Workflow(WorkflowEvent::PhaseStarted(PhaseStartedEvent {
                    index: phase.index,
                    name: phase.name.clone(),
                })),
            );
            debug!(wid = self.wid(), phase = phase.index, stages = phase.nodes.len(), "phase started");

            let mut handles = Vec::with_capacity(phase.nodes.len());
            for nid in &phase.nodes {
                let node = self
                    .model
                    .node(nid)
                    .cloned()
                    .ok_or(MarketflowError::Execution(format!("phase {} references unknown node {}", phase.index, nid)))?;
                handles.push(self.spawn_node(node));
            }

            // siblings settle together; their relative order is unspecified
            let settled = futures::future::join_all(handles.into_iter().map(|(nid, handle)| async move { (nid, handle.await) })).await;

            for (nid, joined) in settled {
                match joined {
                    Ok(NodeOutcome::Succeeded(_)) => {
                        self.update(|s| s.completed_nodes.push(nid.clone()));
                    }
                    Ok(NodeOutcome::Failed(_)) => {
                        // recorded and carried on: a failed stage blocks
                        // neither its siblings nor the following phases
                        self.update(|s| s.failed_nodes.push(nid.clone()));
                    }
                    Ok(NodeOutcome::Stopped) => {
                        return Err(MarketflowError::Execution("execution aborted".to_string()));
                    }
                    Err(e) => {
                        self.emit(&nid, GraphEvent::Node(NodeEvent::Failed(ErrorReason::Failed(e.to_string()))));
                        self.update(|s| s.failed_nodes.push(nid.clone()));
                    }
                }
            }

            self.publish_results();
        }

        self.update(|s| {
            s.status = RunState::Completed;
            s.finished_at = Some(utils::time::time_millis());
        });
        self.emit("", GraphEvent::Workflow(WorkflowEvent::Succeeded));
        self.ctx.done();
        Ok(())
    }

    /// Spawns a stage for execution in a separate task.
    fn spawn_node(
        &self,
        node: NodeModel,
    ) -> (String, JoinHandle<NodeOutcome>) {
        let ctx = self.ctx.clone();
        let runner = self.runner.clone();
        let stage_timeout = self.stage_timeout;
        let nid = node.id.clone();

        let handle = self.runtime.spawn(async move {
            let started = utils::time::time_millis();
            emit(&ctx, &node.id, GraphEvent::Node(NodeEvent::Running(started)));

            let wid = ctx.wid();
            let work = async {
                match stage_timeout {
                    Some(limit) => match tokio::time::timeout(limit, runner.run(&wid, &node)).await {
                        Ok(ret) => ret.map(Some),
                        Err(_) => Ok(None),
                    },
                    None => runner.run(&wid, &node).await.map(Some),
                }
            };

            let ret = tokio::select! {
                _ = ctx.wait_shutdown() => return NodeOutcome::Stopped,
                ret = work => ret,
            };

            let ended = utils::time::time_millis();
            match ret {
                Ok(Some(output)) => match output.status {
                    StageStatus::Succeeded => {
                        ctx.add_output(node.id.clone(), output.output);
                        ctx.emit_log(node.id.clone(), format!("stage completed in {}ms", ended - started));
                        emit(&ctx, &node.id, GraphEvent::Node(NodeEvent::Succeeded(ended)));
                        NodeOutcome::Succeeded(ended)
                    }
                    StageStatus::Failed => {
                        let reason = ErrorReason::Failed(output.error.unwrap_or_default());
                        emit(&ctx, &node.id, GraphEvent::Node(NodeEvent::Failed(reason.clone())));
                        NodeOutcome::Failed(reason)
                    }
                },
                Ok(None) => {
                    emit(&ctx, &node.id, GraphEvent::Node(NodeEvent::Failed(ErrorReason::Timeout)));
                    NodeOutcome::Failed(ErrorReason::Timeout)
                }
                Err(e) => {
                    let reason = ErrorReason::Failed(e.to_string());
                    emit(&ctx, &node.id, GraphEvent::Node(NodeEvent::Failed(reason.clone())));
                    NodeOutcome::Failed(reason)
                }
            }
        });

        (nid, handle)
    }

    async fn wait_while_paused(&self) -> Result<()> {
        let mut rx = self.pause_flag.subscribe();
        tokio::select! {
            _ = self.ctx.wait_shutdown() => Err(MarketflowError::Execution("execution aborted".to_string())),
            ret = rx.wait_for(|paused| !*paused) => ret.map(|_| ()).map_err(|e| MarketflowError::Execution(e.to_string())),
        }
    }

    fn fail(
        &self,
        err: &MarketflowError,
    ) {
        error!(wid = self.wid(), %err, "workflow execution failed");
        self.update(|s| {
            s.status = RunState::Failed;
            s.finished_at = Some(utils::time::time_millis());
        });
        self.emit(
            "",
            GraphEvent::Workflow(WorkflowEvent::Failed(WorkflowFailedEvent {
                error: err.to_string(),
            })),
        );
        self.ctx.done();
    }

    /// Read-modify-write of this workflow's status record; progress is
    /// recomputed from the completed and failed lists on every write.
    fn update(
        &self,
        f: impl FnOnce(&mut ExecutionStatus),
    ) {
        let wid = self.ctx.wid();
        let mut status = self.statuses.get(&wid).unwrap_or_else(|| ExecutionStatus::pending(&wid));
        f(&mut status);
        let total = self.model.nodes.len();
        if total > 0 {
            status.progress = (((status.completed_nodes.len() + status.failed_nodes.len()) * 100) / total) as u8;
        }
        self.statuses.set(wid, status);
    }

    /// Copy the stage outputs collected so far into the exposed result map.
    fn publish_results(&self) {
        let mut map = Vars::new();
        for (nid, vars) in self.ctx.outputs().iter() {
            map.set(nid.as_str(), Value::from(vars));
        }
        self.results.set(self.ctx.wid(), map);
    }

    fn emit(
        &self,
        nid: &str,
        event: GraphEvent,
    ) {
        emit(&self.ctx, nid, event);
    }
}

fn emit(
    ctx: &Context,
    nid: &str,
    event: GraphEvent,
) {
    let _ = ctx.channel().event_queue().send(Event::new(&Message {
        xid: ctx.xid(),
        wid: ctx.wid(),
        nid: nid.to_string(),
        event,
    }));
}
