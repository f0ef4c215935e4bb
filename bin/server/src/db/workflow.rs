//! Database repository for workflows.
//!
//! A workflow and its components are written in one transaction: either the
//! whole aggregate is durably recorded or none of it is. Later readers never
//! observe a partial component list.

use crate::error::StoreError;
use chrono::Utc;
use darkroom_core::{ComponentId, WorkflowId};
use darkroom_workflow::{Component, ComponentType, Settings, Workflow};
use rootcause::prelude::Report;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use tracing::instrument;

/// Row type for workflow queries.
#[derive(FromRow)]
struct WorkflowRow {
    id: String,
    name: String,
}

/// Row type for component queries.
#[derive(FromRow)]
struct ComponentRow {
    component_type: String,
    settings: Option<serde_json::Value>,
}

/// Repository for workflow persistence.
pub struct WorkflowRepository {
    pool: PgPool,
}

impl WorkflowRepository {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a validated workflow with all of its components.
    ///
    /// The insert is atomic: the workflow row and every component row commit
    /// together or not at all. Returns the workflow's identifier. No retry
    /// is attempted; a failed transaction rolls back and surfaces the error.
    #[instrument(skip(self, workflow), fields(workflow_id = %workflow.id))]
    pub async fn create(&self, workflow: &Workflow) -> Result<WorkflowId, Report<StoreError>> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        sqlx::query(
            r#"
            INSERT INTO workflows (id, name, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(workflow.id.to_string())
        .bind(&workflow.name)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        for (position, component) in workflow.components.iter().enumerate() {
            let settings_json = component
                .settings
                .as_ref()
                .map(serde_json::to_value)
                .transpose()
                .map_err(|e| StoreError::Database {
                    details: e.to_string(),
                })?;

            sqlx::query(
                r#"
                INSERT INTO workflow_components
                    (id, workflow_id, position, component_type, settings)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(ComponentId::new().to_string())
            .bind(workflow.id.to_string())
            .bind(position as i32)
            .bind(component.component_type.as_str())
            .bind(settings_json)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;
        }

        tx.commit().await.map_err(database_error)?;

        Ok(workflow.id)
    }

    /// Finds a workflow by ID, with components in their stored order.
    #[instrument(skip(self), fields(workflow_id = %id))]
    pub async fn find_by_id(
        &self,
        id: WorkflowId,
    ) -> Result<Option<Workflow>, Report<StoreError>> {
        let row: Option<WorkflowRow> = sqlx::query_as(
            r#"
            SELECT id, name
            FROM workflows
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let component_rows: Vec<ComponentRow> = sqlx::query_as(
            r#"
            SELECT component_type, settings
            FROM workflow_components
            WHERE workflow_id = $1
            ORDER BY position
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        let mut components = Vec::with_capacity(component_rows.len());
        for component_row in component_rows {
            let component_type = ComponentType::from_str(&component_row.component_type)
                .map_err(|e| corrupt_record(&row.id, e))?;
            let settings: Option<Settings> = component_row
                .settings
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e| corrupt_record(&row.id, e))?;
            components.push(Component {
                component_type,
                settings,
            });
        }

        let workflow_id =
            WorkflowId::from_str(&row.id).map_err(|e| corrupt_record(&row.id, e))?;

        Ok(Some(Workflow::with_id(workflow_id, row.name, components)))
    }
}

fn database_error(e: sqlx::Error) -> StoreError {
    StoreError::Database {
        details: e.to_string(),
    }
}

fn corrupt_record(id: &str, e: impl std::error::Error) -> StoreError {
    StoreError::CorruptRecord {
        id: id.to_string(),
        details: e.to_string(),
    }
}
