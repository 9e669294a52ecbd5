//! User repository on top of the `users.json` collection

use std::sync::{Arc, OnceLock};

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use common::{Repository, StoreResult};
use tracing::info;

use crate::models::{NewUser, User};

/// Hash a plaintext password into an argon2 PHC string
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

/// Check `password` against an argon2 PHC string
fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash verified for unknown usernames so both login failures cost the same
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| hash_password("not-a-real-password").ok())
        .as_deref()
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn Repository<User>>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(store: Arc<dyn Repository<User>>) -> Self {
        Self { store }
    }

    /// Draft for the bootstrap administrator account
    pub fn admin_seed(username: &str, email: &str, password: &str) -> Result<NewUser> {
        Ok(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        })
    }

    /// Create a new user, rejecting duplicate usernames and emails.
    ///
    /// The duplicate check and the insert run as one store operation.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        info!("Creating new user: {}", username);

        let draft = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };

        let conflict = |users: &[User]| {
            if users.iter().any(|u| u.username == username) {
                Some("Username already exists".to_string())
            } else if users.iter().any(|u| u.email == email) {
                Some("Email already exists".to_string())
            } else {
                None
            }
        };

        let user = self.store.create_unless(draft, &conflict).await?;
        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.store.list().await?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    /// Look up a user by username and check the password.
    ///
    /// Unknown usernames and wrong passwords both yield `Ok(None)`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.find_by_username(username).await? else {
            if let Some(hash) = dummy_hash() {
                verify_password(hash, password)?;
            }
            return Ok(None);
        };

        if verify_password(&user.password_hash, password)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}
