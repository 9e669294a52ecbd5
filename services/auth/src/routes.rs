//! Authentication routes

use axum::{Router, extract::State, http::StatusCode, routing::post};
use common::{ApiError, ApiResult, Envelope, JsonBody, StoreError};
use tracing::{error, info, warn};

use crate::{
    AuthState,
    models::{LoginRequest, RegisterRequest, UserProfile},
    validation::validate_registration,
};

/// Create the router for the authentication endpoints
pub fn create_router(state: AuthState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .with_state(state)
}

/// Map a repository failure to the handler error, keeping store semantics
fn repository_error(err: anyhow::Error) -> ApiError {
    match err.downcast::<StoreError>() {
        Ok(store_err) => store_err.into(),
        Err(other) => {
            error!("User repository failure: {:#}", other);
            ApiError::Internal(other.to_string())
        }
    }
}

/// User registration endpoint
pub async fn register(
    State(state): State<AuthState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Envelope<(), UserProfile>)> {
    validate_registration(&payload).map_err(ApiError::Validation)?;

    let user = state
        .users
        .register(&payload.username, &payload.email, &payload.password)
        .await
        .map_err(repository_error)?;

    info!("Registered user {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Envelope::done("User registered successfully").with_user(UserProfile::from(&user)),
    ))
}

/// User login endpoint
pub async fn login(
    State(state): State<AuthState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<Envelope<(), UserProfile>> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    info!("Login attempt for user: {}", payload.username);

    if !state.rate_limiter.try_acquire(&payload.username).await {
        warn!("Login for {} refused: locked out", payload.username);
        return Err(ApiError::TooManyRequests);
    }

    let Some(user) = state
        .users
        .authenticate(&payload.username, &payload.password)
        .await
        .map_err(repository_error)?
    else {
        warn!("Invalid credentials for user: {}", payload.username);
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    };

    state.rate_limiter.reset(&payload.username).await;

    let token = state.jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::Internal(e.to_string())
    })?;

    Ok(Envelope::done("Login successful")
        .with_user(UserProfile::from(&user))
        .with_token(token))
}
