//! Request/response bodies and the error envelope of the HTTP contract.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    MarketflowError,
    engine::Preferences,
    model::{ConnectionModel, NodeModel, PlanModel, WorkflowModel},
    runtime::RunState,
};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub goal: Option<String>,
    pub industry: Option<String>,
    pub target_audience: Option<String>,
    pub budget: Option<f64>,
    pub timeline: Option<String>,
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub workflow_id: String,
    pub nodes: Vec<NodeModel>,
    pub connections: Vec<ConnectionModel>,
    pub execution_plan: PlanModel,
    pub recommendations: Vec<String>,
}

impl From<WorkflowModel> for GenerateResponse {
    fn from(model: WorkflowModel) -> Self {
        Self {
            workflow_id: model.id,
            nodes: model.nodes,
            connections: model.connections,
            execution_plan: model.execution_plan,
            recommendations: model.recommendations,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub workflow_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub workflow_id: String,
    pub status: RunState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    pub workflow_id: Option<String>,
    /// "pause" or "resume"; anything else is a validation error
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlResponse {
    pub success: bool,
    pub status: RunState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsResponse {
    pub workflow_id: String,
    pub results: Value,
}

/// Error envelope: every failed request carries the error kind plus detail.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub details: String,
}

/// Wrapper mapping [`MarketflowError`] kinds onto HTTP status codes.
#[derive(Debug)]
pub struct ApiError(pub MarketflowError);

impl From<MarketflowError> for ApiError {
    fn from(err: MarketflowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MarketflowError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketflowError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            success: false,
            error: self.0.as_ref().to_string(),
            details: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Reject a missing or blank required string field.
pub(crate) fn require(
    field: Option<String>,
    name: &str,
) -> Result<String, ApiError> {
    field
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError(MarketflowError::Validation(format!("missing required field: {}", name))))
}
