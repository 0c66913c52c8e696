// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP server implementation.
//!
//! Routes `/api/issues/:project` to the issue resource handler. Validation
//! failures, unmatched ids and update/delete store failures all answer
//! `200 OK` with a JSON payload; only list/create store failures and
//! undecodable input use error statuses.

use std::net::SocketAddr;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use issues_core::{
    CreateIssue, CreateOutcome, DeleteIssue, DeleteOutcome, Issue, IssueResource, Reply,
    UpdateIssue, UpdateOutcome,
};

use crate::error::ApiError;
use crate::payload::Payload;
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/issues/:project",
            get(list_issues)
                .post(create_issue)
                .put(update_issue)
                .delete(delete_issue),
        )
        .with_state(state)
}

/// Run the HTTP server on the given address until Ctrl-C.
pub async fn run(addr: SocketAddr, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

async fn list_issues(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let mut store = state.store().await;
    let resource = IssueResource::new(&project, &mut **store, state.clock());
    match resource.list(query.iter().map(|(k, v)| (k, v))) {
        Ok(issues) => {
            debug!(project = %project, filters = query.len(), found = issues.len(), "Listed issues");
            Ok(Json(issues))
        }
        Err(e) => {
            if e.is_client_error() {
                debug!(project = %project, "Rejected filter: {}", e);
            } else {
                error!(project = %project, "List failed: {}", e);
            }
            Err(e.into())
        }
    }
}

async fn create_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Payload(input): Payload<CreateIssue>,
) -> Result<Response, ApiError> {
    let mut store = state.store().await;
    let mut resource = IssueResource::new(&project, &mut **store, state.clock());
    match resource.create(input) {
        Ok(CreateOutcome::Created(issue)) => {
            info!(project = %project, id = %issue.id, "Created issue");
            Ok(Json(issue).into_response())
        }
        Ok(CreateOutcome::MissingFields) => {
            debug!(project = %project, "Create rejected: missing required fields");
            Ok(Json(Reply::missing_fields()).into_response())
        }
        Err(e) => {
            error!(project = %project, "Create failed: {}", e);
            Err(e.into())
        }
    }
}

async fn update_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Payload(input): Payload<UpdateIssue>,
) -> Json<Reply> {
    let mut store = state.store().await;
    let outcome = IssueResource::new(&project, &mut **store, state.clock()).update(input);
    match &outcome {
        UpdateOutcome::Updated { id } => info!(project = %project, id = %id, "Updated issue"),
        UpdateOutcome::Failed { id, failure } => warn!(
            project = %project,
            id = %id,
            reason = failure.as_str(),
            "Update failed: {:?}",
            failure
        ),
        UpdateOutcome::MissingId | UpdateOutcome::NoFields { .. } => {
            debug!(project = %project, "Update rejected: {:?}", outcome)
        }
    }
    Json(outcome.into())
}

async fn delete_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Payload(input): Payload<DeleteIssue>,
) -> Json<Reply> {
    let mut store = state.store().await;
    let outcome = IssueResource::new(&project, &mut **store, state.clock()).delete(input);
    match &outcome {
        DeleteOutcome::Deleted { id } => info!(project = %project, id = %id, "Deleted issue"),
        DeleteOutcome::Failed { id, failure } => warn!(
            project = %project,
            id = %id,
            reason = failure.as_str(),
            "Delete failed: {:?}",
            failure
        ),
        DeleteOutcome::MissingId => debug!(project = %project, "Delete rejected: missing _id"),
    }
    Json(outcome.into())
}
