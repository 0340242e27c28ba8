//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; system endpoints sit at
//! the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "fest-events", description = "Event records for the college fest"),
    paths(
        handlers::events::create_event,
        handlers::events::list_events,
        handlers::events::get_event,
        handlers::events::update_event,
        handlers::events::delete_event,
        handlers::system::health_handler,
        handlers::system::categories_handler,
    ),
    tags(
        (name = "Events", description = "Event CRUD"),
        (name = "System", description = "Health and catalog endpoints"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}

/// Builds the router, applies HTTP middleware and binds `state`.
pub fn build_app(state: AppState) -> Router {
    build_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
