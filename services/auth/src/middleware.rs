//! Middleware for bearer token validation

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use common::ApiError;
use tracing::debug;

use crate::jwt::JwtService;

/// Authenticated caller, inserted into the request extensions
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Unauthorized".to_string())
}

/// Reject requests without a valid `Authorization: Bearer <token>` header
pub async fn require_bearer(
    State(jwt_service): State<JwtService>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(unauthorized)?;

    let claims = jwt_service.validate_token(token).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        unauthorized()
    })?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(req).await)
}
