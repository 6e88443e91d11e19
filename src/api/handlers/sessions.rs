//! Chat session handlers.
//!
//! A question is answered synchronously: the response carries the assistant
//! turn that was appended. Failures inside the pipeline still return 200
//! with `is_error: true`, because they are recorded in the transcript.

use crate::{
    types::{
        AskRequest, AskResponse, CreateSessionRequest, Result, SessionResponse,
        UpdateSettingsRequest,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// Open a new chat session.
///
/// Clients should delete the session when done; idle sessions expire.
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionResponse)
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    payload: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let Json(payload) = payload.unwrap_or_default();
    let id = state
        .sessions
        .create(payload.model, payload.remember_history);
    let session = state.sessions.snapshot(&id)?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Settings and full transcript of a session.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(
        ("id" = String, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session details", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session is answering a question")
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(state.sessions.snapshot(&id)?))
}

/// Drop a session and its history.
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(
        ("id" = String, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ask a legal question in a session.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/messages",
    params(
        ("id" = String, Path, description = "Session ID")
    ),
    request_body = AskRequest,
    responses(
        (status = 200, description = "Assistant turn appended", body = AskResponse),
        (status = 400, description = "Empty question"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session is answering a question")
    ),
    tag = "sessions"
)]
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let outcome = state.sessions.ask(&id, &payload.question).await?;

    Ok(Json(AskResponse {
        session_id: id,
        is_error: outcome.is_error(),
        retrieved: outcome.retrieved,
        summarized_query: outcome.summarized_query,
        turn: outcome.turn,
    }))
}

/// Change the model or the history retention flag.
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/settings",
    params(
        ("id" = String, Path, description = "Session ID")
    ),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session is answering a question")
    ),
    tag = "sessions"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<SessionResponse>> {
    state
        .sessions
        .update_settings(&id, payload.model, payload.remember_history)?;
    Ok(Json(state.sessions.snapshot(&id)?))
}

/// Clear the session history.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/reset",
    params(
        ("id" = String, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "History cleared", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session is answering a question")
    ),
    tag = "sessions"
)]
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>> {
    state.sessions.reset(&id)?;
    Ok(Json(state.sessions.snapshot(&id)?))
}
