//! JWT service for token generation and validation
//!
//! Tokens are HS256-signed with the configured secret and carry an expiry.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::User;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub token_expiry: u64,
}

impl From<&common::config::AuthConfig> for JwtConfig {
    fn from(config: &common::config::AuthConfig) -> Self {
        JwtConfig {
            secret: config.jwt_secret.clone(),
            token_expiry: config.token_expiry_secs,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Generate a token for a user
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        self.encode_claims(&Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            iat: now,
            exp: now.saturating_add(self.config.token_expiry),
        })
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            token_expiry: 60,
        })
        .unwrap()
    }

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_validates() {
        let jwt = service("secret");
        let token = jwt.generate_token(&user()).unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn huge_expiry_saturates_instead_of_overflowing() {
        let jwt = JwtService::new(JwtConfig {
            secret: "secret".to_string(),
            token_expiry: u64::MAX,
        })
        .unwrap();

        let token = jwt.generate_token(&user()).unwrap();
        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.exp, u64::MAX);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = service("secret").generate_token(&user()).unwrap();
        assert!(service("another").validate_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service("secret");
        let token = jwt
            .encode_claims(&Claims {
                sub: "user-1".to_string(),
                username: "alice".to_string(),
                iat: 1_000,
                exp: 2_000,
            })
            .unwrap();

        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn unsigned_token_string_is_rejected() {
        let jwt = service("secret");
        assert!(jwt.validate_token("token_user-1_1700000000000").is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(
            JwtService::new(JwtConfig {
                secret: String::new(),
                token_expiry: 60,
            })
            .is_err()
        );
    }
}
