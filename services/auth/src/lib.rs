//! Authentication for the back office service
//!
//! Registration and login against the `users.json` collection, signed
//! expiring tokens and the middleware that checks them.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod validation;

use anyhow::Result;
use common::config::AuthConfig;

use crate::{
    jwt::JwtService,
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::UserRepository,
};

/// State shared by the authentication handlers
#[derive(Clone)]
pub struct AuthState {
    pub users: UserRepository,
    pub jwt_service: JwtService,
    pub rate_limiter: RateLimiter,
}

impl AuthState {
    /// Build the auth state from configuration
    pub fn new(config: &AuthConfig, users: UserRepository) -> Result<Self> {
        Ok(AuthState {
            users,
            jwt_service: JwtService::new(config.into())?,
            rate_limiter: RateLimiter::new(RateLimiterConfig::from(config)),
        })
    }
}
