//! JSON REST handlers for scheduled actions.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use cadence_domain::action::{ActionDefinition, ActionStatus};
use cadence_domain::history::RunHistory;

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned once an action is scheduled.
#[derive(Serialize)]
pub struct CreatedBody {
    pub name: String,
}

/// Body of the status endpoint.
#[derive(Serialize)]
pub struct StatusBody {
    pub name: String,
    pub status: ActionStatus,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<String>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<CreatedBody>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the history endpoint.
pub enum HistoryResponse {
    Ok(Json<RunHistory>),
}

impl IntoResponse for HistoryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the status endpoint.
pub enum StatusResponse {
    Ok(Json<StatusBody>),
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoints.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/actions`: list registered action names.
pub async fn list(State(state): State<AppState>) -> Result<ListResponse, ApiError> {
    let names = state.scheduler.names().await?;
    Ok(ListResponse::Ok(Json(names)))
}

/// `POST /api/actions`: schedule a new action.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ActionDefinition>, JsonRejection>,
) -> Result<CreateResponse, ApiError> {
    let Json(definition) = payload?;
    let name = definition.name.clone();
    state.scheduler.add(definition).await?;
    Ok(CreateResponse::Created(Json(CreatedBody { name })))
}

/// `GET /api/actions/{name}/history`: history and counters of one action.
pub async fn history(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<HistoryResponse, ApiError> {
    let history = state.scheduler.history(&name).await?;
    Ok(HistoryResponse::Ok(Json(history)))
}

/// `GET /api/actions/{name}/status`: whether the action will run again.
pub async fn status(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusResponse, ApiError> {
    let status = state.scheduler.status(&name).await?;
    Ok(StatusResponse::Ok(Json(StatusBody { name, status })))
}

/// `DELETE /api/actions/{name}`: unschedule an action. Unknown names are
/// not an error.
pub async fn remove(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<DeleteResponse, ApiError> {
    state.scheduler.remove(&name).await?;
    Ok(DeleteResponse::NoContent)
}

/// `DELETE /api/actions`: unschedule every action.
pub async fn clear(State(state): State<AppState>) -> Result<DeleteResponse, ApiError> {
    state.scheduler.clear().await?;
    Ok(DeleteResponse::NoContent)
}
