//! User model and related functionality

use chrono::{DateTime, Utc};
use common::Record;
use serde::{Deserialize, Serialize};

/// Collection file holding the user accounts
pub const USERS_FILE: &str = "users.json";

/// User entity as persisted in `users.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// New user creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl Record for User {
    type Draft = NewUser;

    fn from_draft(id: String, now: DateTime<Utc>, draft: NewUser) -> Self {
        User {
            id,
            username: draft.username,
            email: draft.email,
            password_hash: draft.password_hash,
            created_at: now,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Public view of a user, safe to return to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Request for user registration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request for user login
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
