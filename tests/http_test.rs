//! HTTP contract coverage over the axum router.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tower::ServiceExt;

use marketflow::{
    Config, EngineBuilder, MockRunner,
    http::{AppState, create_router},
};

fn test_stack() -> (Arc<Runtime>, Router) {
    let runtime = Arc::new(tokio::runtime::Builder::new_multi_thread().worker_threads(2).enable_all().build().unwrap());
    let engine = Arc::new(
        EngineBuilder::new()
            .config(Config::default())
            .runtime(runtime.clone())
            .runner(Arc::new(MockRunner::new(0.0)))
            .build()
            .unwrap(),
    );
    engine.launch();
    (runtime, create_router(AppState::new(engine)))
}

fn post(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn call(runtime: &Runtime, app: Router, request: Request<Body>) -> (StatusCode, Value) {
    runtime.block_on(async move {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, body)
    })
}

#[test]
fn test_analyze_returns_the_fixed_launch_modules() {
    let (runtime, app) = test_stack();

    let (status, body) = call(&runtime, app, post("/workflow/analyze", json!({"goal": "Launch my new SaaS product"})));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "product-launch");
    assert_eq!(body["requiredModules"].as_array().unwrap().len(), 8);
    assert_eq!(body["requiredModules"][0], "market-research");
    assert!(body["estimatedScope"].as_str().unwrap().contains("8 stages"));
}

#[test]
fn test_analyze_without_goal_is_a_400() {
    let (runtime, app) = test_stack();

    let (status, body) = call(&runtime, app, post("/workflow/analyze", json!({})));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "validation");
    assert!(body["details"].as_str().unwrap().contains("goal"));
}

#[test]
fn test_generate_execute_and_poll_round_trip() {
    let (runtime, app) = test_stack();

    let (status, body) = call(
        &runtime,
        app.clone(),
        post(
            "/workflow/generate",
            json!({
                "goal": "Launch my new SaaS product",
                "industry": "accounting software",
                "targetAudience": "finance teams",
            }),
        ),
    );
    assert_eq!(status, StatusCode::OK);
    let wid = body["workflowId"].as_str().unwrap().to_string();
    assert!(body["nodes"].as_array().unwrap().len() >= 6);
    assert!(body["executionPlan"]["totalEstimatedTime"].as_u64().unwrap() > 0);
    assert!(!body["executionPlan"]["criticalPath"].as_array().unwrap().is_empty());

    let (status, body) = call(&runtime, app.clone(), post("/workflow/execute", json!({"workflowId": wid})));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");

    // fire-and-forget: poll until the execution settles
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(30);
    let settled = loop {
        let (status, body) = call(&runtime, app.clone(), get(&format!("/workflow/status/{}", wid)));
        assert_eq!(status, StatusCode::OK);
        if body["status"] == "completed" || body["status"] == "failed" {
            break body;
        }
        assert!(std::time::Instant::now() < deadline, "workflow never settled: {}", body);
        std::thread::sleep(std::time::Duration::from_millis(10));
    };
    assert_eq!(settled["status"], "completed");
    assert_eq!(settled["progress"], 100);

    let (status, body) = call(&runtime, app, get(&format!("/workflow/results/{}", wid)));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["sales-copy"]["stage"], "sales-copy");
}

#[test]
fn test_unknown_workflow_is_a_404() {
    let (runtime, app) = test_stack();

    let (status, body) = call(&runtime, app.clone(), get("/workflow/status/wf-missing"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = call(&runtime, app, post("/workflow/execute", json!({"workflowId": "wf-missing"})));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn test_control_rejects_unknown_action() {
    let (runtime, app) = test_stack();

    let (status, body) = call(&runtime, app, post("/workflow/control", json!({"workflowId": "wf-1", "action": "rewind"})));

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
    assert!(body["details"].as_str().unwrap().contains("rewind"));
}

#[test]
fn test_generate_rejects_unknown_desired_output() {
    let (runtime, app) = test_stack();

    let (status, body) = call(
        &runtime,
        app,
        post(
            "/workflow/generate",
            json!({
                "goal": "Launch my new SaaS product",
                "preferences": {"desiredOutputs": ["video-script", "teleportation"]},
            }),
        ),
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
    assert!(body["details"].as_str().unwrap().contains("teleportation"));
}

#[test]
fn test_health_endpoint() {
    let (runtime, app) = test_stack();

    let (status, body) = call(&runtime, app, get("/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
