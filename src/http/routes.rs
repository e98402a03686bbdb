//! HTTP route handlers.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::{
    MarketflowError,
    analyzer::GoalAnalysis,
    engine::GenerateRequest,
    http::{
        AppState,
        models::{
            AnalyzeRequest, ApiError, ControlRequest, ControlResponse, ExecuteRequest, ExecuteResponse, GenerateBody, GenerateResponse, ResultsResponse, require,
        },
    },
    runtime::{ControlAction, ExecutionStatus, RunState},
};

/// Build the workflow API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/workflow/analyze", post(analyze_handler))
        .route("/workflow/generate", post(generate_handler))
        .route("/workflow/execute", post(execute_handler))
        .route("/workflow/status/:workflow_id", get(status_handler))
        .route("/workflow/results/:workflow_id", get(results_handler))
        .route("/workflow/control", post(control_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// POST /workflow/analyze - classify a goal into category and modules
async fn analyze_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<GoalAnalysis>, ApiError> {
    let goal = require(req.goal, "goal")?;
    Ok(Json(state.engine.analyze(&goal)))
}

/// POST /workflow/generate - build and persist a workflow snapshot
async fn generate_handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let goal = require(req.goal, "goal")?;

    let model = state.engine.generate(GenerateRequest {
        goal,
        industry: req.industry,
        target_audience: req.target_audience,
        budget: req.budget,
        timeline: req.timeline,
        preferences: req.preferences,
    })?;

    Ok(Json(GenerateResponse::from(model)))
}

/// POST /workflow/execute - start executing a stored workflow
///
/// Fire-and-forget: the response says only that execution started; callers
/// poll the status endpoint to observe the outcome.
async fn execute_handler(
    State(state): State<AppState>,
    Json(req): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let workflow_id = require(req.workflow_id, "workflowId")?;
    state.engine.execute(&workflow_id)?;

    Ok(Json(ExecuteResponse {
        workflow_id,
        status: RunState::Running,
    }))
}

/// GET /workflow/status/{workflow_id} - current execution status
async fn status_handler(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> Result<Json<ExecutionStatus>, ApiError> {
    Ok(Json(state.engine.status(&workflow_id)?))
}

/// GET /workflow/results/{workflow_id} - per-node result map
async fn results_handler(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let results = state.engine.results(&workflow_id)?;
    Ok(Json(ResultsResponse {
        workflow_id,
        results: Value::from(results),
    }))
}

/// POST /workflow/control - pause or resume a live execution
async fn control_handler(
    State(state): State<AppState>,
    Json(req): Json<ControlRequest>,
) -> Result<Json<ControlResponse>, ApiError> {
    let workflow_id = require(req.workflow_id, "workflowId")?;
    let action = require(req.action, "action")?;
    let action = ControlAction::from_str(&action).map_err(|_| MarketflowError::Validation(format!("unknown action '{}'", action)))?;

    let status = state.engine.control(&workflow_id, action)?;
    Ok(Json(ControlResponse {
        success: true,
        status,
    }))
}

/// GET /health
async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
