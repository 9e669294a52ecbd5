//! HTTP application wiring

use std::sync::Arc;

use anyhow::Result;
use auth::{AuthState, middleware::require_bearer, repositories::UserRepository};
use axum::{Router, middleware, routing::get};
use common::{ApiError, config::AppConfig};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::{
    models::{ClientDetails, ProductDetails, SupplierDetails},
    repositories::Collections,
    routes::{entity_routes, ping},
};

/// Build the full router: `/api/ping`, `/api/auth/*` and the entity routes
pub fn create_app(collections: &Collections, config: &AppConfig) -> Result<Router> {
    let users = UserRepository::new(Arc::new(collections.users.clone()));
    let auth_state = AuthState::new(&config.auth, users)?;

    let mut entities = Router::new()
        .merge(entity_routes::<ProductDetails>(Arc::new(
            collections.products.clone(),
        )))
        .merge(entity_routes::<ClientDetails>(Arc::new(
            collections.clients.clone(),
        )))
        .merge(entity_routes::<SupplierDetails>(Arc::new(
            collections.suppliers.clone(),
        )));

    if config.auth.protect_entities {
        entities = entities.route_layer(middleware::from_fn_with_state(
            auth_state.jwt_service.clone(),
            require_bearer,
        ));
    } else {
        warn!("Entity routes are served without authentication");
    }

    let health = Router::new()
        .route("/ping", get(ping))
        .with_state(Arc::<str>::from(config.server.ping_message.as_str()));

    let api = Router::new()
        .merge(health)
        .merge(auth::routes::create_router(auth_state))
        .merge(entities)
        .method_not_allowed_fallback(|| async { ApiError::MethodNotAllowed });

    Ok(Router::new()
        .nest("/api", api)
        .fallback(|| async { ApiError::NotFound("Route not found".to_string()) })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}
