//! # API REST
//!
//! REST API for the surgery manager.
//!
//! Handles:
//! - HTTP endpoints with axum, mounted under `/api`
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS, request tracing)
//!
//! Uses `api-shared` for the wire types and `surgery-core` for storage.

#![warn(rust_2018_idioms)]

pub mod error;
mod handlers;

use axum::{
    routing::{get, put},
    Router,
};
use surgery_core::SurgeryStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state for the REST API server.
///
/// Holds no per-request state; the store is the single source of truth.
#[derive(Clone)]
pub struct AppState {
    pub store: SurgeryStore,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_surgeries,
        handlers::get_surgery,
        handlers::create_surgery,
        handlers::update_surgery,
        handlers::cancel_surgery,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::Surgery,
        api_shared::PatientDetails,
        api_shared::SurgeryReq,
        api_shared::PatientReq,
        api_shared::SurgeryMessageRes,
        api_shared::ErrorRes,
        api_shared::SurgeryStatus,
    ))
)]
pub struct ApiDoc;

/// Builds the complete application router.
///
/// Routes:
/// - `GET /health`
/// - `GET|POST /api/surgeries`
/// - `GET|PUT /api/surgeries/:id`
/// - `PUT /api/surgeries/:id/cancel`
/// - `/swagger-ui` and `/api-docs/openapi.json`
pub fn router(state: AppState) -> Router {
    let surgeries = Router::new()
        .route(
            "/surgeries",
            get(handlers::list_surgeries).post(handlers::create_surgery),
        )
        .route(
            "/surgeries/:id",
            get(handlers::get_surgery).put(handlers::update_surgery),
        )
        .route("/surgeries/:id/cancel", put(handlers::cancel_surgery));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", surgeries)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
