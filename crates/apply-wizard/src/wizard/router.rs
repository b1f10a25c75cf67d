use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde_json::json;

use super::domain::FieldEdit;
use super::gateway::ApplicationGateway;
use super::repository::{SessionId, SessionRepository};
use super::service::{WizardService, WizardServiceError};
use super::session::SubmitOutcome;

/// Router exposing the wizard operations to a display layer.
pub fn wizard_router<R, G>(service: Arc<WizardService<R, G>>) -> Router
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    Router::new()
        .route("/api/v1/sessions", post(open_handler::<R, G>))
        .route(
            "/api/v1/sessions/:session_id",
            get(snapshot_handler::<R, G>).delete(abandon_handler::<R, G>),
        )
        .route(
            "/api/v1/sessions/:session_id/fields",
            patch(edit_handler::<R, G>),
        )
        .route(
            "/api/v1/sessions/:session_id/begin",
            post(begin_handler::<R, G>),
        )
        .route(
            "/api/v1/sessions/:session_id/advance",
            post(advance_handler::<R, G>),
        )
        .route(
            "/api/v1/sessions/:session_id/back",
            post(back_handler::<R, G>),
        )
        .route(
            "/api/v1/sessions/:session_id/edit",
            post(return_to_edit_handler::<R, G>),
        )
        .route(
            "/api/v1/sessions/:session_id/submit",
            post(submit_handler::<R, G>),
        )
        .route(
            "/api/v1/sessions/:session_id/reset",
            post(reset_handler::<R, G>),
        )
        .with_state(service)
}

pub(crate) async fn open_handler<R, G>(State(service): State<Arc<WizardService<R, G>>>) -> Response
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    match service.open() {
        Ok((id, snapshot)) => {
            let payload = json!({ "session_id": id, "session": snapshot });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn snapshot_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    match service.snapshot(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn abandon_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    match service.abandon(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn edit_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    Path(session_id): Path<String>,
    axum::Json(edit): axum::Json<FieldEdit>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    match service.edit_field(&SessionId(session_id), edit) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn begin_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    match service.begin(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn advance_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    match service.advance(&SessionId(session_id)) {
        Ok((outcome, snapshot)) => {
            let payload = json!({ "result": outcome, "session": snapshot });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn back_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    match service.back(&SessionId(session_id)) {
        Ok((_, snapshot)) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn return_to_edit_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    match service.return_to_edit(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    match service.submit(&SessionId(session_id)).await {
        Ok((outcome, snapshot)) => {
            let status = match &outcome {
                SubmitOutcome::Accepted { .. } => StatusCode::OK,
                SubmitOutcome::Incomplete { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                SubmitOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
            };
            let payload = json!({ "result": outcome, "session": snapshot });
            (status, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reset_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    match service.reset(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: WizardServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (err.status_code(), axum::Json(payload)).into_response()
}
