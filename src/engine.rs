//! Workflow engine - the main entry point for Marketflow.
//!
//! The engine manages the lifecycle of workflows and executions, including:
//! - Analyzing goals and generating workflow snapshots
//! - Starting, pausing, resuming, and observing executions
//! - Managing the event channel and storage
//! - Graceful shutdown coordination

mod monitor;

use std::{
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::info;
use uuid::Uuid;

use crate::{
    Complexity, Config, MarketflowError, Result, RunnerMode, StoreType,
    analyzer::{self, GoalAnalysis},
    catalog::ModuleKind,
    common::{MemCache, Queue, Shutdown, Vars},
    model::WorkflowModel,
    planner,
    runner::{HttpRunner, MockRunner, StageRunner},
    runtime::{Channel, ChannelEvent, ChannelOptions, ControlAction, Execution, ExecutionId, ExecutionStatus, RunState},
    store::{DbStore, FsStore, MemStore, Store, data},
    utils,
    workflow::{WorkflowBuilder, WorkflowGraph},
};

use monitor::Monitor;

/// Maximum number of status/result records to keep in memory.
const STATUS_CACHE_SIZE: usize = 4096;
/// Maximum number of live executions to cache.
const EXECUTION_CACHE_SIZE: usize = 2048;
/// Size of the queue for completed execution notifications.
const EXECUTION_COMPLETE_QUEUE_SIZE: usize = 100;

/// Caller preferences applied when generating a workflow.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// complexity profile override; defaults to the analyzer's verdict
    pub complexity: Option<Complexity>,
    /// extra module slugs to include (e.g. "video-script")
    #[serde(default)]
    pub desired_outputs: Vec<String>,
}

/// Input for workflow generation.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub goal: String,
    pub industry: Option<String>,
    pub target_audience: Option<String>,
    pub budget: Option<f64>,
    pub timeline: Option<String>,
    pub preferences: Option<Preferences>,
}

impl GenerateRequest {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            industry: None,
            target_audience: None,
            budget: None,
            timeline: None,
            preferences: None,
        }
    }
}

/// The main workflow engine.
///
/// Engine is the central coordinator for Marketflow, responsible for:
/// - Turning goals into persisted workflow snapshots
/// - Running executions on the shared tokio runtime
/// - Coordinating the event channel for pub/sub messaging
/// - Keeping the in-memory execution status and result records
///
/// # Example
///
/// ```rust,ignore
/// let engine = EngineBuilder::new().build()?;
/// engine.launch();
///
/// let workflow = engine.generate(GenerateRequest::new("Launch my new SaaS product"))?;
/// engine.execute(&workflow.id)?;
/// let status = engine.status(&workflow.id)?;
///
/// engine.shutdown();
/// ```
pub struct Engine {
    /// Event channel for broadcasting execution events.
    channel: Arc<Channel>,
    /// Storage for workflow snapshots and execution records.
    store: Arc<Store>,
    /// Background monitor for event persistence.
    monitor: Monitor,
    /// The stage runner every execution uses.
    runner: Arc<dyn StageRunner>,
    /// Queue for receiving completed execution notifications.
    execs_complete_queue: Arc<Queue<String>>,
    /// In-memory cache of live executions, keyed by workflow id.
    execs: Arc<MemCache<String, Arc<Execution>>>,
    /// Execution status records, kept after completion for polling.
    statuses: Arc<MemCache<String, ExecutionStatus>>,
    /// Per-workflow stage result maps.
    results: Arc<MemCache<String, Vars>>,
    /// Optional per-stage timeout.
    stage_timeout: Option<Duration>,

    /// Flag indicating if the engine is running.
    running: Arc<AtomicBool>,
    /// Tokio runtime for async task execution.
    runtime: Arc<Runtime>,
    /// Shutdown coordinator for graceful termination.
    shutdown: Arc<Shutdown>,
}

impl Engine {
    /// Creates a new engine with the given configuration.
    pub(crate) fn new_with(
        config: &Config,
        runtime: Arc<Runtime>,
        runner_override: Option<Arc<dyn StageRunner>>,
    ) -> Result<Self> {
        let store = Store::new();
        let db: Box<dyn DbStore> = match config.store.store_type {
            StoreType::Mem => Box::new(MemStore::new()),
            StoreType::Fs => {
                let fs_config = config.store.fs.as_ref().ok_or(MarketflowError::Config("fs configuration is required when store type is fs".to_string()))?;
                Box::new(FsStore::new(&fs_config.data_dir)?)
            }
        };
        db.init(&store);

        let runner: Arc<dyn StageRunner> = match runner_override {
            Some(runner) => runner,
            None => match config.runner.mode {
                RunnerMode::Mock => Arc::new(MockRunner::new(config.executor.time_scale)),
                RunnerMode::Http => {
                    let http = config.runner.http.as_ref().ok_or(MarketflowError::Config("http configuration is required when runner mode is http".to_string()))?;
                    Arc::new(HttpRunner::new(&http.endpoint, Duration::from_millis(http.timeout_ms))?)
                }
            },
        };

        let store = Arc::new(store);
        let channel = Arc::new(Channel::new(runtime.clone()));
        let monitor = Monitor::new(store.clone(), channel.clone(), runtime.clone());

        Ok(Self {
            channel,
            store,
            monitor,
            runner,
            execs_complete_queue: Queue::new(EXECUTION_COMPLETE_QUEUE_SIZE),
            execs: Arc::new(MemCache::new(EXECUTION_CACHE_SIZE)),
            statuses: Arc::new(MemCache::new(STATUS_CACHE_SIZE)),
            results: Arc::new(MemCache::new(STATUS_CACHE_SIZE)),
            stage_timeout: config.executor.stage_timeout_ms.map(Duration::from_millis),
            running: Arc::new(AtomicBool::new(false)),
            runtime,
            shutdown: Arc::new(Shutdown::new()),
        })
    }

    /// Starts the engine and begins processing events.
    ///
    /// This method:
    /// - Starts the event monitor for persistence
    /// - Begins listening on the event channel
    /// - Spawns a background task to drop finished executions from the cache
    pub fn launch(&self) {
        if self.running.swap(true, Ordering::Relaxed) {
            return;
        }

        // Register handlers first, then start listening
        // This ensures no events are missed
        self.monitor.monitor();
        self.channel.listen();

        let execs_complete_queue = self.execs_complete_queue.clone();
        ChannelEvent::channel(self.channel.clone(), ChannelOptions::default()).on_event(move |e| {
            if e.event.is_terminal() {
                let _ = execs_complete_queue.send(e.wid.clone());
            }
        });

        let execs_complete_queue = self.execs_complete_queue.clone();
        let shutdown = self.shutdown.clone();
        let execs = self.execs.clone();
        self.runtime.spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.wait() => break,
                    Some(wid) = execs_complete_queue.next_async() => {
                        execs.remove(&wid);
                    }
                }
            }
        });
    }

    /// Gracefully shuts down the engine.
    ///
    /// This method:
    /// - Signals all components to stop
    /// - Aborts all live executions
    /// - Shuts down the event channel
    pub fn shutdown(&self) {
        if !self.running.swap(false, Ordering::Relaxed) {
            return;
        }

        self.shutdown.shutdown();
        for (_, exec) in self.execs.iter() {
            exec.abort();
        }
        self.channel.shutdown();
    }

    /// Analyze a free-text goal. Pure lookup, no side effects.
    pub fn analyze(
        &self,
        goal: &str,
    ) -> GoalAnalysis {
        analyzer::analyze(goal)
    }

    /// Generate a workflow snapshot for a goal and persist it.
    pub fn generate(
        &self,
        request: GenerateRequest,
    ) -> Result<WorkflowModel> {
        let analysis = analyzer::analyze(&request.goal);

        let preferences = request.preferences.clone().unwrap_or_default();
        let desired = parse_modules(&preferences.desired_outputs)?;

        let (nodes, connections) = WorkflowBuilder::new(request.goal.clone())
            .industry(request.industry.clone())
            .audience(request.target_audience.clone())
            .complexity(preferences.complexity)
            .desired_outputs(desired)
            .build(&analysis)?;

        let graph = WorkflowGraph::new(&nodes, &connections)?;
        let execution_plan = planner::plan(&graph)?;
        let recommendations = recommend(&request, &analysis, &nodes.iter().map(|n| n.module).collect::<Vec<_>>());

        let model = WorkflowModel {
            id: format!("wf-{}", Uuid::new_v4().simple()),
            goal: request.goal,
            category: analysis.category,
            created_at: utils::time::time_millis(),
            nodes,
            connections,
            execution_plan,
            recommendations,
        };

        self.store.deploy(&model)?;
        info!(wid = %model.id, category = model.category.as_ref(), nodes = model.nodes.len(), "workflow generated");

        Ok(model)
    }

    /// Start executing a stored workflow.
    ///
    /// Fire-and-forget: the returned execution id carries no guarantee about
    /// the final outcome; callers poll `status` to observe it.
    pub fn execute(
        &self,
        wid: &str,
    ) -> Result<ExecutionId> {
        if !self.running.load(Ordering::Relaxed) {
            return Err(MarketflowError::Engine("Engine is not running".to_string()));
        }

        let record = self.store.workflows().find(wid).map_err(|_| MarketflowError::NotFound(format!("workflow '{}' not found", wid)))?;
        let model = WorkflowModel::from_json(&record.data)?;

        if let Some(status) = self.statuses.get(&wid.to_string()) {
            if matches!(status.status, RunState::Pending | RunState::Running | RunState::Paused) {
                return Err(MarketflowError::Validation(format!("workflow '{}' is already executing", wid)));
            }
        }

        let exec = Execution::new(
            model,
            self.runner.clone(),
            self.channel.clone(),
            self.statuses.clone(),
            self.results.clone(),
            self.stage_timeout,
            self.runtime.clone(),
        )?;
        let xid = exec.id().to_string();

        self.store.procs().create(&data::Proc {
            id: xid.clone(),
            wid: wid.to_string(),
            state: "Pending".to_string(),
            start_time: utils::time::time_millis(),
            end_time: 0,
            err: None,
            timestamp: utils::time::time_millis(),
        })?;

        // reset the visible records before the first phase starts
        self.statuses.set(wid.to_string(), ExecutionStatus::pending(wid));
        self.results.set(wid.to_string(), Vars::new());
        self.execs.set(wid.to_string(), exec.clone());

        exec.start();
        info!(wid, xid = %xid, "execution started");

        Ok(xid)
    }

    /// Current execution status of a workflow.
    ///
    /// A stored workflow that has never been executed reports `pending`.
    pub fn status(
        &self,
        wid: &str,
    ) -> Result<ExecutionStatus> {
        if let Some(status) = self.statuses.get(&wid.to_string()) {
            return Ok(status);
        }
        if self.store.workflows().exists(wid)? {
            return Ok(ExecutionStatus::pending(wid));
        }
        Err(MarketflowError::NotFound(format!("workflow '{}' not found", wid)))
    }

    /// Per-node result map collected by the latest execution.
    pub fn results(
        &self,
        wid: &str,
    ) -> Result<Vars> {
        if let Some(results) = self.results.get(&wid.to_string()) {
            return Ok(results);
        }
        if self.store.workflows().exists(wid)? {
            return Ok(Vars::new());
        }
        Err(MarketflowError::NotFound(format!("workflow '{}' not found", wid)))
    }

    /// Pause or resume a live execution.
    ///
    /// Advisory only: pausing never interrupts stages already in flight.
    pub fn control(
        &self,
        wid: &str,
        action: ControlAction,
    ) -> Result<RunState> {
        let exec = self.execs.get(&wid.to_string()).ok_or(MarketflowError::NotFound(format!("no live execution for workflow '{}'", wid)))?;
        if exec.is_complete() {
            return Err(MarketflowError::Validation(format!("workflow '{}' is no longer executing", wid)));
        }

        match action {
            ControlAction::Pause => exec.pause(),
            ControlAction::Resume => exec.resume(),
        }

        self.status(wid).map(|s| s.status)
    }

    /// Returns a reference to the event channel.
    pub fn channel(&self) -> Arc<Channel> {
        self.channel.clone()
    }

    /// Returns a reference to the store.
    pub fn store(&self) -> Arc<Store> {
        self.store.clone()
    }
}

/// Parse caller-supplied module slugs, rejecting unknown names.
///
/// An unknown module used to vanish silently at build time; surfacing it as
/// a validation error keeps a typo from shrinking the workflow.
fn parse_modules(slugs: &[String]) -> Result<Vec<ModuleKind>> {
    slugs
        .iter()
        .map(|s| ModuleKind::from_str(s).map_err(|_| MarketflowError::Validation(format!("unknown module '{}'", s))))
        .collect()
}

fn recommend(
    request: &GenerateRequest,
    analysis: &GoalAnalysis,
    modules: &[ModuleKind],
) -> Vec<String> {
    let mut out = Vec::new();

    if !modules.contains(&ModuleKind::AnalyticsSetup) {
        out.push("Add the analytics-setup stage to measure campaign performance after launch.".to_string());
    }
    if request.budget.is_none() {
        out.push("No budget provided; estimates assume organic distribution only.".to_string());
    }
    if let Some(timeline) = &request.timeline {
        out.push(format!("Stage durations are nominal; review the execution plan against your '{}' timeline.", timeline));
    }
    if analysis.complexity == Complexity::Simple {
        out.push("The simple profile trims the stage chain; rerun with the advanced profile for research and analytics coverage.".to_string());
    }

    out
}
