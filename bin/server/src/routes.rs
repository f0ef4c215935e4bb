//! HTTP routes for the workflow service.
//!
//! One write endpoint creates a workflow after validation; one read
//! endpoint returns a stored workflow with its components in original
//! order.

use crate::db::WorkflowRepository;
use crate::error::ApiError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use darkroom_core::WorkflowId;
use darkroom_workflow::{Component, ComponentRequest, Workflow, validate_workflow};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db_pool: PgPool,
}

/// Payload for creating a workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkflowRequest {
    /// Workflow name.
    pub name: String,
    /// Ordered components, possibly empty.
    #[serde(default)]
    pub components: Vec<ComponentRequest>,
}

/// Response for a created workflow.
#[derive(Debug, Serialize)]
pub struct CreateWorkflowResponse {
    /// The generated workflow identifier.
    pub workflow_id: String,
}

/// Response for a stored workflow.
#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    /// The workflow identifier.
    pub workflow_id: String,
    /// Workflow name.
    pub name: String,
    /// Components in their stored order.
    pub components: Vec<Component>,
}

impl From<&Workflow> for WorkflowResponse {
    fn from(workflow: &Workflow) -> Self {
        Self {
            workflow_id: workflow.id.to_string(),
            name: workflow.name.clone(),
            components: workflow.components.clone(),
        }
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/workflow", post(create_workflow))
        .route("/workflow/{id}", get(get_workflow))
        .with_state(state)
}

/// Validates and stores a submitted workflow.
async fn create_workflow(
    State(state): State<AppState>,
    Json(request): Json<CreateWorkflowRequest>,
) -> Result<(StatusCode, Json<CreateWorkflowResponse>), ApiError> {
    let components = validate_workflow(&request.name, &request.components)
        .map_err(ApiError::Validation)?;
    let workflow = Workflow::new(request.name, components);

    let repository = WorkflowRepository::new(state.db_pool.clone());
    let id = repository.create(&workflow).await.map_err(|report| {
        tracing::error!(error = %report, "failed to store workflow");
        ApiError::Storage
    })?;

    tracing::info!(
        workflow_id = %id,
        components = workflow.component_count(),
        "created workflow"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateWorkflowResponse {
            workflow_id: id.to_string(),
        }),
    ))
}

/// Returns a stored workflow by ID.
async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let workflow_id: WorkflowId = id
        .parse()
        .map_err(|_| ApiError::NotFound { id: id.clone() })?;

    let repository = WorkflowRepository::new(state.db_pool.clone());
    let workflow = repository
        .find_by_id(workflow_id)
        .await
        .map_err(|report| {
            tracing::error!(error = %report, "failed to load workflow");
            ApiError::Storage
        })?
        .ok_or(ApiError::NotFound { id })?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkroom_workflow::{ComponentType, Settings};

    #[test]
    fn create_request_components_default_to_empty() {
        let request: CreateWorkflowRequest =
            serde_json::from_str(r#"{"name": "t"}"#).expect("deserialize");
        assert_eq!(request.name, "t");
        assert!(request.components.is_empty());
    }

    #[test]
    fn create_request_preserves_component_order() {
        let request: CreateWorkflowRequest = serde_json::from_str(
            r#"{"name": "t", "components": [
                {"type": "import"},
                {"type": "crop", "settings": {"zoom": 2}},
                {"type": "export", "settings": {}}
            ]}"#,
        )
        .expect("deserialize");

        let types: Vec<_> = request
            .components
            .iter()
            .map(|c| c.component_type.as_str())
            .collect();
        assert_eq!(types, vec!["import", "crop", "export"]);
        assert!(request.components[0].settings.is_none());
        assert_eq!(
            request.components[2].settings.as_ref().map(|s| s.len()),
            Some(0)
        );
    }

    #[test]
    fn workflow_response_shape() {
        let workflow = Workflow::new(
            "t",
            vec![Component::with_settings(ComponentType::Crop, Settings::new())],
        );
        let response = WorkflowResponse::from(&workflow);
        let json = serde_json::to_value(&response).expect("serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "workflow_id": workflow.id.to_string(),
                "name": "t",
                "components": [{"type": "crop", "settings": {}}],
            })
        );
    }
}
