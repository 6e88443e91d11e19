use crate::api::{handlers, ApiDoc};
use crate::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// Routes under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/models", get(handlers::models::list_models))
        .route("/sessions", post(handlers::sessions::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::delete_session),
        )
        .route("/sessions/{id}/messages", post(handlers::sessions::ask))
        .route(
            "/sessions/{id}/settings",
            put(handlers::sessions::update_settings),
        )
        .route("/sessions/{id}/reset", post(handlers::sessions::reset_session))
}

/// Full application router with tracing and CORS applied.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes());

    // SwaggerUi serves the document itself
    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route(
        "/api-docs/openapi.json",
        get(|| async { axum::Json(ApiDoc::openapi()) }),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
