//! Route configuration. API routes live under /api/v1; health probes in
//! [health](health).

mod health;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use courtly_core::Config;

use crate::api_doc::ApiDoc;
use crate::handlers::{bookings, organizations, resources};
use crate::state::AppState;

/// Setup all application routes.
pub fn setup_routes(state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(&state.config)?;

    let api = Router::new()
        .route(
            "/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/bookings/{id}", get(bookings::get_booking))
        .route("/bookings/{id}/confirm", post(bookings::confirm_booking))
        .route("/bookings/{id}/cancel", post(bookings::cancel_booking))
        .route("/resource-types", post(resources::create_resource_type))
        .route("/resources", post(resources::create_resource))
        .route(
            "/resources/{id}",
            patch(resources::update_resource).get(resources::get_resource),
        )
        .route("/organizations/{id}", get(organizations::get_organization))
        .route("/locations/{id}", get(organizations::get_location));

    let app = Router::new()
        .nest("/api/v1", api)
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(health::routes(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::PATCH, Method::OPTIONS];
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse()
                    .map_err(|e| anyhow::anyhow!("invalid CORS origin {:?}: {}", o, e))
            })
            .collect::<Result<_, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
