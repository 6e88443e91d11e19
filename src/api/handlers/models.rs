//! Model listing handler.

use crate::types::{CortexModel, ModelInfo, ModelsResponse};
use crate::AppState;
use axum::{extract::State, Json};

/// List the completion models a session may select.
#[utoipa::path(
    get,
    path = "/api/models",
    responses(
        (status = 200, description = "Selectable models", body = ModelsResponse)
    ),
    tag = "models"
)]
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let default = state.sessions.defaults().model;
    let models = CortexModel::ALL
        .iter()
        .map(|&name| ModelInfo {
            name,
            is_default: name == default,
        })
        .collect();

    Json(ModelsResponse { models })
}
