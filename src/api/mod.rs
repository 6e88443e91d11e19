//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Nyaya, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Sessions (`/api/sessions`)
//! - `POST /api/sessions` - Open a chat session
//! - `GET /api/sessions/{id}` - Session settings and transcript
//! - `DELETE /api/sessions/{id}` - Drop a session
//! - `POST /api/sessions/{id}/messages` - Ask a legal question
//! - `PUT /api/sessions/{id}/settings` - Change model or history retention
//! - `POST /api/sessions/{id}/reset` - Start over
//!
//! ## Models (`/api/models`)
//! - `GET /api/models` - Selectable completion models
//!
//! ## Health (`/health`)
//! - `GET /health` - Liveness check
//!
//! # OpenAPI Documentation
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`. When the
//! `swagger-ui` feature is enabled, interactive API documentation is
//! available at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::types::{
    AskRequest, AskResponse, CortexModel, CreateSessionRequest, ModelInfo, ModelsResponse,
    Role, SessionResponse, Turn, TurnKind, UpdateSettingsRequest,
};
use utoipa::OpenApi;

/// OpenAPI description of the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    info(title = "Nyaya Legal Assistant API"),
    paths(
        handlers::health,
        handlers::models::list_models,
        handlers::sessions::create_session,
        handlers::sessions::get_session,
        handlers::sessions::delete_session,
        handlers::sessions::ask,
        handlers::sessions::update_settings,
        handlers::sessions::reset_session,
    ),
    components(schemas(
        AskRequest,
        AskResponse,
        CortexModel,
        CreateSessionRequest,
        ModelInfo,
        ModelsResponse,
        Role,
        SessionResponse,
        Turn,
        TurnKind,
        UpdateSettingsRequest,
    )),
    tags(
        (name = "sessions", description = "Chat sessions and questions"),
        (name = "models", description = "Completion models"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
