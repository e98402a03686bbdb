//! End-to-end engine coverage: generate, execute, observe, control.

use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use marketflow::{
    Config, ControlAction, Engine, EngineBuilder, ExecutionStatus, GenerateRequest, MockRunner, RunState, StageRunner, StoreType,
};

const POLL_DEADLINE: Duration = Duration::from_secs(30);

fn engine_with_runner(runner: Arc<dyn StageRunner>) -> Engine {
    let mut config = Config::default();
    config.async_worker_thread_number = 4;
    let engine = EngineBuilder::new().config(config).runner(runner).build().unwrap();
    engine.launch();
    engine
}

fn wait_until(
    engine: &Engine,
    wid: &str,
    pred: impl Fn(&ExecutionStatus) -> bool,
) -> ExecutionStatus {
    let deadline = Instant::now() + POLL_DEADLINE;
    loop {
        let status = engine.status(wid).unwrap();
        if pred(&status) {
            return status;
        }
        assert!(Instant::now() < deadline, "timed out waiting on workflow {}, last status {:?}", wid, status);
        thread::sleep(Duration::from_millis(10));
    }
}

fn is_settled(status: &ExecutionStatus) -> bool {
    matches!(status.status, RunState::Completed | RunState::Failed)
}

#[test]
fn test_generate_launch_workflow_shape() {
    let engine = engine_with_runner(Arc::new(MockRunner::new(0.0)));

    let model = engine.generate(GenerateRequest::new("Launch my new SaaS product")).unwrap();

    assert!(model.id.starts_with("wf-"));
    assert!(model.nodes.len() >= 6);
    assert!(model.execution_plan.total_estimated_time > 0);

    // every connection stays inside the node set, with no self-loops
    for conn in &model.connections {
        assert!(model.node(&conn.source).is_some());
        assert!(model.node(&conn.target).is_some());
        assert_ne!(conn.source, conn.target);
    }

    // the critical path ends at the terminal stage of the selected chain
    let last = model.execution_plan.critical_path.last().unwrap();
    let category = model.node(last).unwrap().category;
    assert!(matches!(category, marketflow::StageCategory::Approval | marketflow::StageCategory::Optimization));

    engine.shutdown();
}

#[test]
fn test_execute_runs_every_stage_to_completion() {
    let engine = engine_with_runner(Arc::new(MockRunner::new(0.0)));

    let model = engine.generate(GenerateRequest::new("Launch my new SaaS product")).unwrap();
    let total = model.nodes.len();
    engine.execute(&model.id).unwrap();

    let status = wait_until(&engine, &model.id, is_settled);

    assert_eq!(status.status, RunState::Completed);
    assert_eq!(status.completed_nodes.len(), total);
    assert!(status.failed_nodes.is_empty());
    assert_eq!(status.progress, 100);
    assert!(status.finished_at.is_some());

    // one result blob per stage
    let results = engine.results(&model.id).unwrap();
    assert_eq!(results.len(), total);
    let copy: serde_json::Value = results.get("sales-copy").unwrap();
    assert_eq!(copy["stage"], "sales-copy");

    engine.shutdown();
}

#[test]
fn test_node_failure_is_isolated() {
    // sales-copy fails; its siblings and every later phase still run
    let engine = engine_with_runner(Arc::new(MockRunner::new(0.0).fail_on("sales-copy")));

    let model = engine.generate(GenerateRequest::new("Launch my new SaaS product")).unwrap();
    engine.execute(&model.id).unwrap();

    let status = wait_until(&engine, &model.id, is_settled);

    // a stage failure does not fail the workflow
    assert_eq!(status.status, RunState::Completed);
    assert_eq!(status.failed_nodes, vec!["sales-copy".to_string()]);
    assert_eq!(status.progress, 100);

    // downstream stages of the failed one still attempted and completed
    for downstream in ["email-campaign", "seo-optimization", "launch-approval"] {
        assert!(status.completed_nodes.contains(&downstream.to_string()), "{} should have run", downstream);
    }

    engine.shutdown();
}

#[test]
fn test_pause_is_advisory_and_resumable() {
    // slow enough that the run is still in flight when we pause
    let engine = engine_with_runner(Arc::new(MockRunner::new(0.001)));

    let model = engine.generate(GenerateRequest::new("Launch my new SaaS product")).unwrap();
    engine.execute(&model.id).unwrap();

    let paused = engine.control(&model.id, ControlAction::Pause).unwrap();
    assert_eq!(paused, RunState::Paused);
    assert_eq!(engine.status(&model.id).unwrap().status, RunState::Paused);

    let resumed = engine.control(&model.id, ControlAction::Resume).unwrap();
    assert_eq!(resumed, RunState::Running);

    let status = wait_until(&engine, &model.id, is_settled);
    assert_eq!(status.status, RunState::Completed);

    engine.shutdown();
}

#[test]
fn test_unknown_workflow_is_not_found() {
    let engine = engine_with_runner(Arc::new(MockRunner::new(0.0)));

    assert_eq!(engine.execute("wf-missing").unwrap_err().as_ref(), "not_found");
    assert_eq!(engine.status("wf-missing").unwrap_err().as_ref(), "not_found");
    assert_eq!(engine.results("wf-missing").unwrap_err().as_ref(), "not_found");
    assert_eq!(engine.control("wf-missing", ControlAction::Pause).unwrap_err().as_ref(), "not_found");

    engine.shutdown();
}

#[test]
fn test_execute_requires_a_launched_engine() {
    let engine = EngineBuilder::new().build().unwrap();
    assert_eq!(engine.execute("wf-any").unwrap_err().as_ref(), "engine");
}

#[test]
fn test_double_execute_is_rejected_while_running() {
    let engine = engine_with_runner(Arc::new(MockRunner::new(0.001)));

    let model = engine.generate(GenerateRequest::new("Launch my new SaaS product")).unwrap();
    engine.execute(&model.id).unwrap();

    assert_eq!(engine.execute(&model.id).unwrap_err().as_ref(), "validation");

    wait_until(&engine, &model.id, is_settled);
    engine.shutdown();
}

#[test]
fn test_status_of_stored_but_never_executed_workflow_is_pending() {
    let engine = engine_with_runner(Arc::new(MockRunner::new(0.0)));

    let model = engine.generate(GenerateRequest::new("Launch my new SaaS product")).unwrap();
    let status = engine.status(&model.id).unwrap();

    assert_eq!(status.status, RunState::Pending);
    assert!(engine.results(&model.id).unwrap().is_empty());

    engine.shutdown();
}

#[test]
fn test_fs_store_snapshots_survive_engine_restart() {
    let dir = tempfile::tempdir().unwrap();
    let fs_config = |dir: &std::path::Path| {
        let mut config = Config::default();
        config.async_worker_thread_number = 4;
        config.store.store_type = StoreType::Fs;
        config.store.fs = Some(marketflow::FsConfig {
            data_dir: dir.to_path_buf(),
        });
        config
    };

    let wid = {
        let engine = EngineBuilder::new().config(fs_config(dir.path())).runner(Arc::new(MockRunner::new(0.0))).build().unwrap();
        engine.launch();
        let model = engine.generate(GenerateRequest::new("Launch my new SaaS product")).unwrap();
        engine.shutdown();
        model.id
    };

    assert!(dir.path().join(format!("{}.json", wid)).exists());

    // a fresh engine over the same directory can execute the snapshot
    let engine = EngineBuilder::new().config(fs_config(dir.path())).runner(Arc::new(MockRunner::new(0.0))).build().unwrap();
    engine.launch();
    engine.execute(&wid).unwrap();
    let status = wait_until(&engine, &wid, is_settled);
    assert_eq!(status.status, RunState::Completed);

    engine.shutdown();
}
